use std::path::PathBuf;

use anyhow::Context;
use geo_placeholder_core::GeoPlaceholderApp;

/// Points the dev server at a manifest other than the bundled one.
const MANIFEST_ENV: &str = "GEO_PLACEHOLDER_MANIFEST";

const BUNDLED_MANIFEST: &str = include_str!("../../../geo-placeholder.toml");

fn main() {
    if let Err(err) = run() {
        eprintln!("geo-placeholder-adapter-axum failed: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let manifest = match std::env::var_os(MANIFEST_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read manifest {}", path.display()))?
        }
        None => BUNDLED_MANIFEST.to_string(),
    };

    edgepage_adapter_axum::run_app::<GeoPlaceholderApp>(&manifest).context("dev server")
}
