use std::net::IpAddr;

use crate::geo::GeoMetadata;
use crate::http::header::{ACCEPT, HOST};
use crate::http::{HeaderMap, Request};

/// Header the edge network sets to the originating client's address.
pub const CLIENT_IP_HEADER: &str = "cf-connecting-ip";

/// Peer address recorded by an adapter when the platform exposes one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientAddr(pub IpAddr);

impl ClientAddr {
    pub fn insert(request: &mut Request, addr: IpAddr) {
        request.extensions_mut().insert(ClientAddr(addr));
    }

    pub fn get(request: &Request) -> Option<IpAddr> {
        request.extensions().get::<ClientAddr>().map(|addr| addr.0)
    }
}

/// Request context exposed to route handlers.
pub struct RequestContext {
    request: Request,
}

impl RequestContext {
    pub fn new(request: Request) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// Case-insensitive header lookup returning the value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    pub fn accept(&self) -> Option<&str> {
        self.header(ACCEPT.as_str())
    }

    pub fn geo(&self) -> Option<&GeoMetadata> {
        GeoMetadata::get(&self.request)
    }

    /// Hostname of the request URL, without port.
    ///
    /// Origin-form requests (as received by a local server) carry no authority in the URI, so the
    /// `Host` header is consulted instead.
    pub fn host(&self) -> &str {
        if let Some(host) = self.request.uri().host() {
            return host;
        }
        self.header(HOST.as_str()).map(strip_port).unwrap_or("")
    }

    /// Client address from the edge header, falling back to the adapter-provided peer address.
    pub fn client_ip(&self) -> Option<String> {
        self.header(CLIENT_IP_HEADER)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .or_else(|| ClientAddr::get(&self.request).map(|addr| addr.to_string()))
    }
}

fn strip_port(authority: &str) -> &str {
    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    match authority.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => authority,
    }
}
