//! Core primitives for rendering a single edge page across platform adapters.

pub mod app;
pub mod body;
pub mod context;
pub mod error;
pub mod geo;
pub mod handler;
pub mod http;
pub mod logging;
pub mod manifest;
pub mod negotiate;
pub mod response;
pub mod router;

pub use app::{App, Hooks};
pub use body::Body;
pub use context::{ClientAddr, RequestContext, CLIENT_IP_HEADER};
pub use error::EdgeError;
pub use geo::{GeoMetadata, GeoValue};
pub use http::{request_builder, response_builder, Method, Request, Response, StatusCode};
pub use negotiate::OutputFormat;
pub use router::{RouteMatcher, RouteTable};
