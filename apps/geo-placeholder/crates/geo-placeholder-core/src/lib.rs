//! Placeholder landing page that shows the visitor's edge metadata.

mod app;
mod handlers;
pub mod render;

pub use app::{build_router, GeoPlaceholderApp, NO_METADATA_BODY};
