//! Adapter helpers for Cloudflare Workers.

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod logging;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod request;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod response;

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use logging::init_logger;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use request::{dispatch, geo_metadata, into_core_request};
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use response::from_core_response;

/// Adapter name used for `[logging.<adapter>]` lookups in the manifest.
pub const ADAPTER_NAME: &str = "cloudflare";

/// Build the app from its hooks and serve one Worker request.
///
/// Workers have no startup hook, so logging is initialised on first use and reused afterwards.
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub async fn run_app<A: edgepage_core::app::Hooks>(
    req: worker::Request,
    env: worker::Env,
    ctx: worker::Context,
) -> Result<worker::Response, worker::Error> {
    init_logger(log::LevelFilter::Info);
    let app = A::build_app();
    dispatch(&app, req, env, ctx).await
}

/// Like [`run_app`], but takes the log level from the manifest's `[logging.cloudflare]` table.
///
/// ```rust,ignore
/// run_app_with_manifest::<App>(include_str!("../../../geo-placeholder.toml"), req, env, ctx).await
/// ```
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub async fn run_app_with_manifest<A: edgepage_core::app::Hooks>(
    manifest_src: &str,
    req: worker::Request,
    env: worker::Env,
    ctx: worker::Context,
) -> Result<worker::Response, worker::Error> {
    let loader = edgepage_core::manifest::ManifestLoader::load_from_str(manifest_src)
        .map_err(|err| worker::Error::RustError(err.to_string()))?;
    let logging = loader.manifest().logging_or_default(ADAPTER_NAME);
    init_logger(logging.level_filter());

    let mut app = A::build_app();
    if let Some(name) = loader.manifest().app_name() {
        app.set_name(name);
    }
    dispatch(&app, req, env, ctx).await
}
