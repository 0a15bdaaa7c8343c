use std::convert::Infallible;
use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body as AxumBody;
use axum::http::{Request, Response};
use tokio::{runtime::Handle, task};
use tower::Service;

use edgepage_core::app::App;
use edgepage_core::context::ClientAddr;
use edgepage_core::geo::GeoMetadata;
use edgepage_core::response::IntoResponse;

use crate::request::into_core_request;
use crate::response::into_axum_response;

/// Tower service that runs an EdgePage `App` behind Axum/Hyper.
///
/// A local server is not behind the edge network, so requests carry no metadata unless a mock
/// bag is configured with [`EdgePageAxumService::with_geo_metadata`].
#[derive(Clone)]
pub struct EdgePageAxumService {
    app: Arc<App>,
    geo: Option<GeoMetadata>,
    client_ip: Option<IpAddr>,
}

impl EdgePageAxumService {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            geo: None,
            client_ip: None,
        }
    }

    /// Attach `geo` to every request, standing in for the edge runtime.
    #[must_use]
    pub fn with_geo_metadata(mut self, geo: GeoMetadata) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Report `addr` as the peer address instead of the socket's.
    #[must_use]
    pub fn with_client_ip(mut self, addr: IpAddr) -> Self {
        self.client_ip = Some(addr);
        self
    }
}

impl Service<Request<AxumBody>> for EdgePageAxumService {
    type Response = Response<AxumBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<AxumBody>) -> Self::Future {
        let app = Arc::clone(&self.app);
        let geo = self.geo.clone();
        let client_ip = self.client_ip;
        Box::pin(async move {
            let mut core_request = match into_core_request(request).await {
                Ok(req) => req,
                Err(err) => {
                    tracing::warn!("failed to convert request: {}", err);
                    return Ok(into_axum_response(err.into_response()));
                }
            };

            if let Some(geo) = geo {
                GeoMetadata::insert(&mut core_request, geo);
            }
            if let Some(addr) = client_ip {
                ClientAddr::insert(&mut core_request, addr);
            }

            // Handler futures are not `Send` (they must run on wasm32 too), so drive them to
            // completion on this worker thread.
            let core_response = task::block_in_place(move || {
                Handle::current().block_on(app.handle(core_request))
            });
            Ok(into_axum_response(core_response))
        })
    }
}
