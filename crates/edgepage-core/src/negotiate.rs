//! Response format selection.
//!
//! Two independent triggers pick JSON: a `.json` suffix on the path, or an `Accept` header that
//! names `application/json`. Either one is enough.

use crate::context::RequestContext;

pub const JSON_SUFFIX: &str = ".json";
pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
}

pub fn path_requests_json(path: &str) -> bool {
    path.ends_with(JSON_SUFFIX)
}

/// True when any media range in the `Accept` value is `application/json`.
pub fn accept_requests_json(accept: Option<&str>) -> bool {
    let Some(accept) = accept else {
        return false;
    };

    accept.split(',').any(|range| {
        let media_type = range.split(';').next().map(str::trim).unwrap_or("");
        media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE)
    })
}

pub fn negotiate(ctx: &RequestContext) -> OutputFormat {
    if path_requests_json(ctx.path()) || accept_requests_json(ctx.accept()) {
        OutputFormat::Json
    } else {
        OutputFormat::Html
    }
}
