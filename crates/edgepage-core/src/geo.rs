use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::Request;

/// Marker rendered in place of a metadata field the platform did not supply.
pub const UNDEFINED_MARKER: &str = "undefined";

/// A single metadata value as reported by the edge platform.
///
/// Platforms mix representations (Cloudflare reports `asn` as a number and coordinates as
/// strings), so both are accepted and written back out exactly as received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for GeoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoValue::Text(text) => f.write_str(text),
            GeoValue::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for GeoValue {
    fn from(value: &str) -> Self {
        GeoValue::Text(value.to_string())
    }
}

impl From<String> for GeoValue {
    fn from(value: String) -> Self {
        GeoValue::Text(value)
    }
}

impl From<u32> for GeoValue {
    fn from(value: u32) -> Self {
        GeoValue::Number(value.into())
    }
}

/// Geolocation and network hints attached to a request by the edge runtime.
///
/// The bag itself is optional (see [`GeoMetadata::get`]); every field inside it is optional as
/// well. Unknown keys in the platform payload are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_protocol: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_organization: Option<GeoValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colo: Option<GeoValue>,
}

impl GeoMetadata {
    /// Parse the platform's JSON representation of the metadata bag.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn insert(request: &mut Request, metadata: GeoMetadata) {
        request.extensions_mut().insert(metadata);
    }

    pub fn get(request: &Request) -> Option<&GeoMetadata> {
        request.extensions().get::<GeoMetadata>()
    }

    pub fn is_empty(&self) -> bool {
        *self == GeoMetadata::default()
    }
}

/// Display a field, substituting [`UNDEFINED_MARKER`] when it is absent.
pub fn or_undefined(value: Option<&GeoValue>) -> String {
    value
        .map(ToString::to_string)
        .unwrap_or_else(|| UNDEFINED_MARKER.to_string())
}
