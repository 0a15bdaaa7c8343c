//! Axum adapter for running EdgePage applications locally.

#[cfg(feature = "axum")]
mod dev_server;
#[cfg(feature = "axum")]
mod request;
#[cfg(feature = "axum")]
mod response;
#[cfg(feature = "axum")]
mod service;

#[cfg(feature = "axum")]
pub use dev_server::{run_app, AxumDevServer, AxumDevServerConfig};
#[cfg(feature = "axum")]
pub use request::into_core_request;
#[cfg(feature = "axum")]
pub use response::into_axum_response;
#[cfg(feature = "axum")]
pub use service::EdgePageAxumService;

/// Adapter name used for `[logging.<adapter>]` lookups in the manifest.
pub const ADAPTER_NAME: &str = "axum";
