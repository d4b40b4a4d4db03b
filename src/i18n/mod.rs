//! Internationalization support.
//!
//! The renderer only depends on the [`Translator`] trait; [`JsonTranslator`]
//! is the dictionary-file implementation used by the server.

pub mod translator;

pub use translator::{JsonTranslator, Translator};
