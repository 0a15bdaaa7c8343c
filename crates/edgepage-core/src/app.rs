use web_time::Instant;

use crate::geo::GeoMetadata;
use crate::http::{Request, Response, StatusCode};
use crate::response::{text_response, IntoResponse};
use crate::router::RouteTable;

const DEFAULT_APP_NAME: &str = "EdgePage App";

/// Container around a `RouteTable` plus the request-level policies applied before routing.
pub struct App {
    routes: RouteTable,
    name: String,
    missing_metadata_body: Option<String>,
}

impl App {
    pub fn new(routes: RouteTable) -> Self {
        Self::with_name(routes, DEFAULT_APP_NAME)
    }

    pub fn with_name<S>(routes: RouteTable, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            routes,
            name: name.into(),
            missing_metadata_body: None,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S>(&mut self, name: S)
    where
        S: Into<String>,
    {
        self.name = name.into();
    }

    /// Answer requests that arrive without edge metadata with a plain `200` carrying `body`,
    /// before any routing happens.
    pub fn require_geo_metadata<S>(&mut self, body: S)
    where
        S: Into<String>,
    {
        self.missing_metadata_body = Some(body.into());
    }

    pub fn default_name() -> &'static str {
        DEFAULT_APP_NAME
    }

    /// Produce exactly one response for the request. Errors are rendered, never returned.
    pub async fn handle(&self, request: Request) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let response = match (&self.missing_metadata_body, GeoMetadata::get(&request)) {
            (Some(body), None) => {
                log::debug!("no edge metadata on request path={}", path);
                text_response(StatusCode::OK, body.clone())
            }
            _ => match self.routes.dispatch(request).await {
                Ok(response) => response,
                Err(err) => {
                    if err.status().is_server_error() {
                        log::error!("handler failed path={} error={}", path, err.message());
                    }
                    err.into_response()
                }
            },
        };

        let status = response.status();
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        if status.is_client_error() {
            log::warn!(
                "request method={} path={} status={} elapsed_ms={:.2}",
                method,
                path,
                status.as_u16(),
                elapsed
            );
        } else {
            log::info!(
                "request method={} path={} status={} elapsed_ms={:.2}",
                method,
                path,
                status.as_u16(),
                elapsed
            );
        }
        response
    }
}

/// Trait implemented by applications to describe how their `App` is assembled.
pub trait Hooks {
    /// Adjust the freshly constructed application before use. Defaults to no changes.
    fn configure(_app: &mut App) {}

    fn routes() -> RouteTable;

    fn name() -> &'static str {
        App::default_name()
    }

    fn build_app() -> App
    where
        Self: Sized,
    {
        let mut app = App::with_name(Self::routes(), Self::name());
        Self::configure(&mut app);
        app
    }
}
