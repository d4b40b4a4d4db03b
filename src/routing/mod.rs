//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → path.rs (split, percent-decode)
//!     → language.rs (strip optional language prefix)
//!     → alias.rs (exact-match redirect / rewrite, single hop)
//!     → resolver.rs (nested → flat → first-segment template identity)
//!     → Return: RouteResult or explicit not-found
//! ```
//!
//! # Design Decisions
//! - Every stage is a pure function over an explicit configuration
//! - Deterministic: same input always resolves to the same identity
//! - No caching: the alias table and template store are consulted per request

pub mod alias;
pub mod language;
pub mod path;
pub mod resolver;

pub use alias::{AliasDecision, AliasEntry, AliasKind, AliasTable};
pub use language::LanguageContext;
pub use resolver::RouteResult;
