use std::sync::Arc;

use edgepage_core::context::RequestContext;
use edgepage_core::error::EdgeError;
use edgepage_core::http::Response;
use edgepage_core::negotiate::{negotiate, OutputFormat};
use edgepage_core::response::{Html, IntoResponse, Json};
use edgepage_core::GeoMetadata;

use crate::render::{GeoReport, PageRenderer};

/// Serve the landing page, or its JSON projection when either negotiation trigger fires.
pub(crate) async fn page(
    renderer: Arc<PageRenderer>,
    ctx: RequestContext,
) -> Result<Response, EdgeError> {
    // The app-level guard answers requests without metadata before routing; an empty bag keeps
    // this handler usable on its own.
    let fallback = GeoMetadata::default();
    let geo = ctx.geo().unwrap_or(&fallback);

    let format = negotiate(&ctx);
    log::debug!("serving path={} format={:?}", ctx.path(), format);

    match format {
        OutputFormat::Json => {
            let report = GeoReport {
                geo,
                client_ip: ctx.client_ip(),
            };
            let json = Json::from_value(&report).map_err(EdgeError::internal)?;
            Ok(json.into_response())
        }
        OutputFormat::Html => {
            let html = renderer.render_html(geo, ctx.host())?;
            Ok(Html::new(html).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgepage_core::body::Body;
    use edgepage_core::http::{request_builder, StatusCode};
    use futures::executor::block_on;

    fn context(path: &str, headers: &[(&str, &str)], geo: Option<GeoMetadata>) -> RequestContext {
        let mut builder = request_builder().uri(format!("https://example.com{path}"));
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let mut request = builder.body(Body::empty()).expect("request");
        if let Some(geo) = geo {
            GeoMetadata::insert(&mut request, geo);
        }
        RequestContext::new(request)
    }

    fn renderer() -> Arc<PageRenderer> {
        Arc::new(PageRenderer::new().expect("renderer"))
    }

    fn content_type(response: &Response) -> Option<&str> {
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn html_by_default() {
        let ctx = context("/", &[], Some(GeoMetadata::default()));
        let response = block_on(page(renderer(), ctx)).expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some("text/html;charset=UTF-8"));
    }

    #[test]
    fn json_omits_client_ip_without_sources() {
        let ctx = context("/.json", &[], Some(GeoMetadata::default()));
        let response = block_on(page(renderer(), ctx)).expect("response");
        assert_eq!(content_type(&response), Some("application/json; charset=utf-8"));
        assert_eq!(response.body().as_bytes(), b"{}");
    }

    #[test]
    fn handler_tolerates_missing_metadata() {
        let ctx = context("/", &[("accept", "application/json")], None);
        let response = block_on(page(renderer(), ctx)).expect("response");
        assert_eq!(response.body().as_bytes(), b"{}");
    }
}
