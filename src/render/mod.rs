//! Structural renderer.
//!
//! # Data Flow
//! ```text
//! JSON document (page, structure or component)
//!     → node.rs (typed ComponentNode forest)
//!     → renderer.rs (pre-order walk, translation, editor annotations)
//!         → placeholder.rs ({{__system}} and {{variable}} expansion)
//!         → html.rs (escaping, name rules, URL post-processing)
//!     → HTML fragment
//! ```

pub mod context;
pub mod html;
pub mod node;
pub mod placeholder;
pub mod renderer;

pub use context::RenderContext;
pub use node::{ComponentNode, NodeKind};
pub use renderer::{sanitize_component_name, Renderer};
