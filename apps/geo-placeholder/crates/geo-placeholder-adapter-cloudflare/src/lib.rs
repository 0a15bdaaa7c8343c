#![cfg_attr(target_arch = "wasm32", no_main)]

#[cfg(target_arch = "wasm32")]
use geo_placeholder_core::GeoPlaceholderApp;
#[cfg(target_arch = "wasm32")]
use worker::*;

#[cfg(target_arch = "wasm32")]
#[event(fetch)]
pub async fn main(req: Request, env: Env, ctx: Context) -> Result<Response> {
    edgepage_adapter_cloudflare::run_app_with_manifest::<GeoPlaceholderApp>(
        include_str!("../../../geo-placeholder.toml"),
        req,
        env,
        ctx,
    )
    .await
}
