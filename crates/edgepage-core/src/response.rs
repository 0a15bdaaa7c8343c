use crate::body::Body;
use crate::http::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    response_builder, HeaderValue, Response, StatusCode,
};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html;charset=UTF-8";
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";

/// Convert common return types into `Response`.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        text_response(StatusCode::OK, self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        text_response(StatusCode::OK, self)
    }
}

/// Plain text body served as `text/plain`.
pub struct Text<T>(T);

impl<T> Text<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> IntoResponse for Text<T>
where
    T: Into<String>,
{
    fn into_response(self) -> Response {
        text_response(StatusCode::OK, self.0.into())
    }
}

/// Rendered HTML document.
pub struct Html<T>(T);

impl<T> Html<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T> IntoResponse for Html<T>
where
    T: Into<String>,
{
    fn into_response(self) -> Response {
        response_with_type(StatusCode::OK, TEXT_HTML, Body::text(self.0.into()))
    }
}

/// Pre-serialised JSON document.
pub struct Json(Body);

impl Json {
    pub fn from_value<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: serde::Serialize,
    {
        Body::json(value).map(Self)
    }
}

impl IntoResponse for Json {
    fn into_response(self) -> Response {
        response_with_type(StatusCode::OK, APPLICATION_JSON, self.0)
    }
}

impl<T> IntoResponse for (StatusCode, T)
where
    T: IntoResponse,
{
    fn into_response(self) -> Response {
        let (status, inner) = self;
        let mut response = inner.into_response();
        *response.status_mut() = status;
        response
    }
}

pub fn text_response<B>(status: StatusCode, body: B) -> Response
where
    B: Into<Body>,
{
    response_with_type(status, TEXT_PLAIN, body.into())
}

pub fn response_with_type(status: StatusCode, content_type: &'static str, body: Body) -> Response {
    response_builder()
        .status(status)
        .header(CONTENT_TYPE, HeaderValue::from_static(content_type))
        .header(CONTENT_LENGTH, body.len().to_string())
        .body(body)
        .expect("static response builder should not fail")
}
