use edgepage_core::error::EdgeError;
use edgepage_core::geo::{or_undefined, GeoMetadata};
use handlebars::Handlebars;
use serde::Serialize;

pub const REPOSITORY_URL: &str = "https://github.com/fry69/cloudflare-worker-placeholder";
pub const REPOSITORY_NAME: &str = "Cloudflare Worker Placeholder";

const PAGE_TEMPLATE: &str = "page";

/// Values interpolated into the page. Every field is already resolved to display text, with
/// missing metadata spelled `undefined`.
#[derive(Debug, Serialize)]
struct PageView<'a> {
    host: &'a str,
    city: String,
    country: String,
    latitude: String,
    longitude: String,
    http_protocol: String,
    asn: String,
    as_organization: String,
    colo: String,
    repository_url: &'static str,
    repository_name: &'static str,
}

impl<'a> PageView<'a> {
    fn new(geo: &GeoMetadata, host: &'a str) -> Self {
        Self {
            host,
            city: or_undefined(geo.city.as_ref()),
            country: or_undefined(geo.country.as_ref()),
            latitude: or_undefined(geo.latitude.as_ref()),
            longitude: or_undefined(geo.longitude.as_ref()),
            http_protocol: or_undefined(geo.http_protocol.as_ref()),
            asn: or_undefined(geo.asn.as_ref()),
            as_organization: or_undefined(geo.as_organization.as_ref()),
            colo: or_undefined(geo.colo.as_ref()),
            repository_url: REPOSITORY_URL,
            repository_name: REPOSITORY_NAME,
        }
    }
}

/// JSON projection: the metadata bag as received plus the client address when known.
#[derive(Debug, Serialize)]
pub struct GeoReport<'a> {
    #[serde(flatten)]
    pub geo: &'a GeoMetadata,
    #[serde(rename = "clientIp", skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
}

/// Page renderer holding the compiled template.
///
/// Host and metadata values are interpolated verbatim; the platform is trusted to supply them.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, EdgeError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(PAGE_TEMPLATE, include_str!("templates/page.html.hbs"))
            .map_err(EdgeError::render)?;
        Ok(Self { registry })
    }

    pub fn render_html(&self, geo: &GeoMetadata, host: &str) -> Result<String, EdgeError> {
        self.registry
            .render(PAGE_TEMPLATE, &PageView::new(geo, host))
            .map_err(EdgeError::render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> PageRenderer {
        PageRenderer::new().expect("template compiles")
    }

    #[test]
    fn renders_present_fields_verbatim() {
        let geo = GeoMetadata {
            city: Some("São Paulo".into()),
            latitude: Some("-23.5475".into()),
            longitude: Some("-46.6361".into()),
            asn: Some(28573u32.into()),
            ..GeoMetadata::default()
        };
        let html = renderer().render_html(&geo, "example.com").expect("html");

        assert!(html.contains("<title>Welcome to example.com</title>"));
        assert!(html.contains("<h1>Welcome to example.com</h1>"));
        assert!(html.contains("You're visiting from São Paulo, undefined"));
        assert!(html.contains("ASN: 28573 (undefined)"));
        assert!(html.contains("L.marker([-23.5475, -46.6361]).addTo(map)"));
        assert!(html.contains(REPOSITORY_URL));
    }

    #[test]
    fn host_is_not_escaped() {
        let html = renderer()
            .render_html(&GeoMetadata::default(), "a&b<c>")
            .expect("html");
        assert!(html.contains("<title>Welcome to a&b<c></title>"));
    }

    #[test]
    fn tile_url_placeholders_survive_rendering() {
        let html = renderer()
            .render_html(&GeoMetadata::default(), "example.com")
            .expect("html");
        assert!(html.contains("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
        assert!(html.contains("setView([undefined, undefined], 10);"));
    }

    #[test]
    fn report_flattens_metadata_and_adds_client_ip() {
        let geo = GeoMetadata {
            colo: Some("EWR".into()),
            ..GeoMetadata::default()
        };
        let report = GeoReport {
            geo: &geo,
            client_ip: Some("1.2.3.4".into()),
        };
        assert_eq!(
            serde_json::to_value(&report).expect("json"),
            json!({ "colo": "EWR", "clientIp": "1.2.3.4" })
        );

        let anonymous = GeoReport {
            geo: &geo,
            client_ip: None,
        };
        assert_eq!(
            serde_json::to_value(&anonymous).expect("json"),
            json!({ "colo": "EWR" })
        );
    }
}
