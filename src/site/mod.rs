//! Site serving: the request pipeline and the documents it produces.

pub mod document;
pub mod layout;
pub mod pipeline;

pub use layout::{RouteLayout, RouteLayouts};
pub use pipeline::{Resolution, SitePipeline, SiteResponse};
