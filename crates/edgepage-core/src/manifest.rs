//! Application manifest (`*.toml`) parsing.
//!
//! ```toml
//! [app]
//! name = "Geo Placeholder"
//!
//! [dev]
//! addr = "127.0.0.1:8787"
//! client_ip = "203.0.113.7"
//!
//! [dev.geo]
//! city = "New York"
//! asn = 13335
//!
//! [logging.axum]
//! level = "debug"
//! echo_stdout = true
//! ```

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::geo::GeoMetadata;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("manifest failed validation: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

pub struct ManifestLoader {
    manifest: Arc<Manifest>,
}

impl ManifestLoader {
    pub fn load_from_str(contents: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(Self {
            manifest: Arc::new(manifest),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&contents)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct Manifest {
    #[serde(default)]
    #[validate(nested)]
    pub app: ManifestApp,
    #[serde(default)]
    pub dev: ManifestDev,
    #[serde(default)]
    pub logging: BTreeMap<String, ManifestLoggingConfig>,
}

impl Manifest {
    pub fn app_name(&self) -> Option<&str> {
        self.app.name.as_deref()
    }

    pub fn logging_for(&self, adapter: &str) -> Option<ResolvedLoggingConfig> {
        self.logging
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(adapter))
            .map(|(_, cfg)| ResolvedLoggingConfig::from_manifest(cfg))
    }

    pub fn logging_or_default(&self, adapter: &str) -> ResolvedLoggingConfig {
        self.logging_for(adapter).unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ManifestApp {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: Option<String>,
}

/// Settings used only by the local development server.
#[derive(Debug, Default, Deserialize)]
pub struct ManifestDev {
    #[serde(default)]
    pub addr: Option<SocketAddr>,
    /// Reported as the client address when the request carries no edge header.
    #[serde(default)]
    pub client_ip: Option<IpAddr>,
    /// Metadata attached to every local request. Leave unset to exercise the no-metadata path.
    #[serde(default)]
    pub geo: Option<GeoMetadata>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ManifestLoggingConfig {
    #[serde(default)]
    pub level: Option<LogLevel>,
    #[serde(default)]
    pub echo_stdout: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLoggingConfig {
    pub level: LogLevel,
    pub echo_stdout: bool,
}

impl Default for ResolvedLoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            echo_stdout: true,
        }
    }
}

impl ResolvedLoggingConfig {
    fn from_manifest(cfg: &ManifestLoggingConfig) -> Self {
        let defaults = Self::default();
        Self {
            level: cfg.level.unwrap_or(defaults.level),
            echo_stdout: cfg.echo_stdout.unwrap_or(defaults.echo_stdout),
        }
    }

    /// Effective filter: `Off` when stdout echo is disabled.
    pub fn level_filter(&self) -> LevelFilter {
        if self.echo_stdout {
            self.level.into()
        } else {
            LevelFilter::Off
        }
    }
}
