use std::sync::Arc;

use edgepage_core::app::{App, Hooks};
use edgepage_core::context::RequestContext;
use edgepage_core::negotiate::JSON_SUFFIX;
use edgepage_core::router::RouteTable;

use crate::handlers::page;
use crate::render::PageRenderer;

/// Plain-text body for requests that did not pass through the edge network.
pub const NO_METADATA_BODY: &str = "Nothing to see here";

pub struct GeoPlaceholderApp;

impl Hooks for GeoPlaceholderApp {
    fn routes() -> RouteTable {
        build_router()
    }

    fn name() -> &'static str {
        "Geo Placeholder"
    }

    fn configure(app: &mut App) {
        app.require_geo_metadata(NO_METADATA_BODY);
    }
}

/// `/` serves the page; `/.json` serves the same data as JSON.
pub fn build_router() -> RouteTable {
    // The template is compiled into the binary; failing to parse it is a build defect.
    let renderer = Arc::new(PageRenderer::new().expect("page template should compile"));

    let html_renderer = Arc::clone(&renderer);
    let json_renderer = renderer;

    RouteTable::builder()
        .exact("/", move |ctx: RequestContext| {
            page(Arc::clone(&html_renderer), ctx)
        })
        .suffixed("/", JSON_SUFFIX, move |ctx: RequestContext| {
            page(Arc::clone(&json_renderer), ctx)
        })
        .build()
}
