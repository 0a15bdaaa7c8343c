use edgepage_core::app::App;
use edgepage_core::body::Body;
use edgepage_core::error::EdgeError;
use edgepage_core::geo::GeoMetadata;
use edgepage_core::http::{request_builder, Method as CoreMethod, Request, Uri};
use wasm_bindgen::JsValue;
use worker::{
    Context, Env, Error as WorkerError, Method, Request as CfRequest, Response as CfResponse,
};

use crate::response::from_core_response;

pub async fn into_core_request(mut req: CfRequest) -> Result<Request, EdgeError> {
    let geo = geo_metadata(&req)?;

    let method = into_core_method(req.method());
    let url = req
        .url()
        .map_err(|err| EdgeError::bad_request(format!("invalid URL: {}", err)))?;
    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|err| EdgeError::bad_request(format!("invalid URI: {}", err)))?;

    let mut builder = request_builder().method(method).uri(uri);
    for (name, value) in req.headers().entries() {
        builder = builder.header(name.as_str(), value);
    }

    let bytes = req.bytes().await.map_err(worker_error)?;
    let mut request = builder
        .body(Body::from(bytes))
        .map_err(EdgeError::internal)?;

    if let Some(geo) = geo {
        GeoMetadata::insert(&mut request, geo);
    }
    Ok(request)
}

/// Lift the request's `cf` object into `GeoMetadata`.
///
/// The raw object is read rather than the typed `worker::Cf` accessors so values keep the exact
/// text the runtime reported (coordinates arrive as strings such as `"-74.0060"`).
pub fn geo_metadata(req: &CfRequest) -> Result<Option<GeoMetadata>, EdgeError> {
    let cf = js_sys::Reflect::get(req.inner().as_ref(), &JsValue::from_str("cf"))
        .map_err(js_error)?;
    if cf.is_undefined() || cf.is_null() {
        return Ok(None);
    }

    let raw: String = js_sys::JSON::stringify(&cf).map_err(js_error)?.into();
    GeoMetadata::from_json(&raw)
        .map(Some)
        .map_err(EdgeError::internal)
}

pub async fn dispatch(
    app: &App,
    req: CfRequest,
    _env: Env,
    _ctx: Context,
) -> Result<CfResponse, WorkerError> {
    let core_request = into_core_request(req)
        .await
        .map_err(edge_error_to_worker)?;
    let response = app.handle(core_request).await;
    from_core_response(response).map_err(edge_error_to_worker)
}

fn js_error(err: JsValue) -> EdgeError {
    EdgeError::internal(anyhow::anyhow!("javascript error: {:?}", err))
}

pub(crate) fn worker_error(err: WorkerError) -> EdgeError {
    EdgeError::internal(anyhow::anyhow!("worker error: {}", err))
}

fn edge_error_to_worker(err: EdgeError) -> WorkerError {
    log::error!("cloudflare adapter error: {}", err);
    WorkerError::RustError(err.to_string())
}

fn into_core_method(method: Method) -> CoreMethod {
    CoreMethod::from_bytes(method.as_ref().as_bytes()).unwrap_or(CoreMethod::GET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn into_core_method_maps_known_methods() {
        assert_eq!(into_core_method(Method::Get), CoreMethod::GET);
        assert_eq!(into_core_method(Method::Head), CoreMethod::HEAD);
        assert_eq!(into_core_method(Method::Post), CoreMethod::POST);
    }

    #[wasm_bindgen_test]
    fn into_core_method_defaults_unknown_to_get() {
        let method = Method::from("FOO".to_string());
        assert_eq!(into_core_method(method), CoreMethod::GET);
    }
}
