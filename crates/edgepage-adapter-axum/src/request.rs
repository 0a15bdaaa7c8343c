use std::net::SocketAddr;

use axum::body::Body as AxumBody;
use axum::extract::connect_info::ConnectInfo;
use axum::http::Request;
use edgepage_core::body::Body;
use edgepage_core::context::ClientAddr;
use edgepage_core::error::EdgeError;
use edgepage_core::http::Request as CoreRequest;

/// Upper bound on buffered request bodies. The page never reads bodies, so this only guards
/// against unbounded uploads to the dev server.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Convert an Axum/Hyper request into a core request, recording the peer address as the
/// fallback client address.
pub async fn into_core_request(request: Request<AxumBody>) -> Result<CoreRequest, EdgeError> {
    let (mut parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| EdgeError::bad_request(format!("failed to read request body: {err}")))?;

    let remote_addr = parts
        .extensions
        .remove::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr);

    let mut core_request = CoreRequest::from_parts(parts, Body::from_bytes(bytes));
    if let Some(addr) = remote_addr {
        ClientAddr::insert(&mut core_request, addr.ip());
    }

    Ok(core_request)
}
