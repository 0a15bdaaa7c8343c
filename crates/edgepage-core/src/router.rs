use std::fmt;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::EdgeError;
use crate::handler::{BoxHandler, IntoHandler};
use crate::http::{Request, Response};
use crate::negotiate::{path_requests_json, OutputFormat};

/// How a route decides whether it owns a request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteMatcher {
    /// Matches the path verbatim.
    Exact(String),
    /// Matches `base` immediately followed by `suffix`, e.g. `/` + `.json`.
    Suffixed { base: String, suffix: String },
}

impl RouteMatcher {
    pub fn exact(path: impl Into<String>) -> Self {
        RouteMatcher::Exact(path.into())
    }

    pub fn suffixed(base: impl Into<String>, suffix: impl Into<String>) -> Self {
        RouteMatcher::Suffixed {
            base: base.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            RouteMatcher::Exact(expected) => path == expected,
            RouteMatcher::Suffixed { base, suffix } => path
                .strip_suffix(suffix.as_str())
                .is_some_and(|stem| stem == base),
        }
    }

    /// Format forced by the path alone; `None` leaves the choice to the `Accept` header.
    pub fn implied_format(&self) -> Option<OutputFormat> {
        path_requests_json(&self.pattern()).then_some(OutputFormat::Json)
    }

    /// The single path this matcher accepts.
    pub fn pattern(&self) -> String {
        match self {
            RouteMatcher::Exact(path) => path.clone(),
            RouteMatcher::Suffixed { base, suffix } => format!("{base}{suffix}"),
        }
    }
}

impl fmt::Display for RouteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

struct Route {
    matcher: RouteMatcher,
    handler: BoxHandler,
}

#[derive(Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact<H>(self, path: &str, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.route(RouteMatcher::exact(path), handler)
    }

    pub fn suffixed<H>(self, base: &str, suffix: &str, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.route(RouteMatcher::suffixed(base, suffix), handler)
    }

    pub fn route<H>(mut self, matcher: RouteMatcher, handler: H) -> Self
    where
        H: IntoHandler,
    {
        let pattern = matcher.pattern();
        assert!(
            pattern.starts_with('/'),
            "route pattern must begin with '/': {pattern}"
        );
        if self.routes.iter().any(|route| route.matcher.pattern() == pattern) {
            panic!("duplicate route definition for {pattern}");
        }
        self.routes.push(Route {
            matcher,
            handler: handler.into_handler(),
        });
        self
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: Arc::new(self.routes),
        }
    }
}

/// Ordered list of `{matcher, handler}` pairs. The first matching entry wins.
#[derive(Clone)]
pub struct RouteTable {
    routes: Arc<Vec<Route>>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// Matchers in registration order.
    pub fn routes(&self) -> Vec<RouteMatcher> {
        self.routes.iter().map(|route| route.matcher.clone()).collect()
    }

    pub fn is_allowed(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    pub async fn dispatch(&self, request: Request) -> Result<Response, EdgeError> {
        let path = request.uri().path().to_string();
        match self.find(&path) {
            Some(route) => route.handler.call(RequestContext::new(request)).await,
            None => Err(EdgeError::not_found(path)),
        }
    }

    fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matcher.matches(path))
    }
}
