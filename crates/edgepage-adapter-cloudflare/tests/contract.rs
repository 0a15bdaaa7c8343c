#![cfg(all(feature = "cloudflare", target_arch = "wasm32"))]

use edgepage_adapter_cloudflare::{dispatch, from_core_response, geo_metadata, into_core_request};
use edgepage_core::geo::GeoValue;
use edgepage_core::{
    response_builder, App, Body, EdgeError, GeoMetadata, Method, RequestContext, RouteTable,
    StatusCode,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use worker::{Context, Env, Method as CfMethod, Request as CfRequest, RequestInit};

wasm_bindgen_test_configure!(run_in_browser);

fn build_test_app() -> App {
    async fn city(ctx: RequestContext) -> Result<String, EdgeError> {
        let city = ctx
            .geo()
            .and_then(|geo| geo.city.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default();
        Ok(format!("{} {}", ctx.host(), city))
    }

    let mut app = App::new(RouteTable::builder().exact("/", city).build());
    app.require_geo_metadata("Nothing to see here");
    app
}

fn cf_request(method: CfMethod, path: &str, cf: Option<&str>) -> CfRequest {
    let mut init = RequestInit::new();
    init.with_method(method);

    let headers = worker::Headers::new().expect("headers");
    headers
        .set("cf-connecting-ip", "1.2.3.4")
        .expect("client ip header");
    init.with_headers(headers);

    let url = format!("https://fry69.dev{}", path);
    let request = CfRequest::new_with_init(&url, &init).expect("cf request");

    if let Some(cf) = cf {
        let value = js_sys::JSON::parse(cf).expect("cf json");
        js_sys::Reflect::set(request.inner().as_ref(), &JsValue::from_str("cf"), &value)
            .expect("attach cf");
    }
    request
}

fn test_env_ctx() -> (Env, Context) {
    (Env::default(), Context::default())
}

#[wasm_bindgen_test]
async fn into_core_request_lifts_cf_object_into_metadata() {
    let req = cf_request(
        CfMethod::Get,
        "/?q=1",
        Some(r#"{"city":"New York","asn":13335,"longitude":"-74.0060","botManagement":{}}"#),
    );

    let core_request = into_core_request(req).await.expect("core request");
    assert_eq!(core_request.method(), &Method::GET);
    assert_eq!(core_request.uri().path(), "/");
    assert_eq!(core_request.uri().query(), Some("q=1"));
    assert_eq!(
        core_request
            .headers()
            .get("cf-connecting-ip")
            .and_then(|value| value.to_str().ok()),
        Some("1.2.3.4")
    );

    let geo = GeoMetadata::get(&core_request).expect("metadata");
    assert_eq!(geo.city, Some(GeoValue::from("New York")));
    assert_eq!(geo.asn, Some(GeoValue::from(13335u32)));
    assert_eq!(geo.longitude, Some(GeoValue::from("-74.0060")));
}

#[wasm_bindgen_test]
fn missing_cf_object_yields_no_metadata() {
    let req = cf_request(CfMethod::Get, "/", None);
    assert!(geo_metadata(&req).expect("read cf").is_none());
}

#[wasm_bindgen_test]
async fn from_core_response_translates_status_headers_and_body() {
    let response = response_builder()
        .status(StatusCode::NOT_FOUND)
        .header("content-type", "text/plain")
        .body(Body::from("Not Found"))
        .expect("response");

    let mut cf_response = from_core_response(response).expect("cf response");
    assert_eq!(cf_response.status_code(), 404);
    let header = cf_response.headers().get("content-type").unwrap();
    assert_eq!(header.as_deref(), Some("text/plain"));
    assert_eq!(cf_response.text().await.expect("text"), "Not Found");
}

#[wasm_bindgen_test]
async fn dispatch_serves_fallback_without_cf() {
    let app = build_test_app();
    let (env, ctx) = test_env_ctx();
    let req = cf_request(CfMethod::Get, "/", None);

    let mut response = dispatch(&app, req, env, ctx).await.expect("cf response");
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text().await.expect("text"), "Nothing to see here");
}

#[wasm_bindgen_test]
async fn dispatch_runs_route_with_metadata() {
    let app = build_test_app();
    let (env, ctx) = test_env_ctx();
    let req = cf_request(CfMethod::Get, "/", Some(r#"{"city":"Berlin"}"#));

    let mut response = dispatch(&app, req, env, ctx).await.expect("cf response");
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text().await.expect("text"), "fry69.dev Berlin");
}
