//! Content storage subsystem.
//!
//! Pages, components and structures are stored as JSON documents keyed by
//! template identity. The resolvers only see the existence predicate; the
//! renderer only sees raw JSON.

pub mod store;

pub use store::{ContentStore, FsContentStore, MemoryContentStore, Structure};
