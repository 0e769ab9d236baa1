//! HTTP response type.

use std::collections::HashMap;

/// Header carrying the media type of the body.
pub const CONTENT_TYPE: &str = "Content-Type";

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a new response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a 200 OK response.
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Creates a response with HTML content.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(body.into())
    }

    /// Creates a response with JSON content.
    pub fn json<T: serde::Serialize>(data: &T) -> Self {
        match serde_json::to_vec(data) {
            Ok(body) => Self::ok()
                .header(CONTENT_TYPE, "application/json")
                .body(body),
            Err(_) => Self::internal_server_error(),
        }
    }

    /// Creates a response with plain text content.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body.into())
    }

    /// Creates a 200 response carrying an asset file. The content type is
    /// left unset when `content_type` is `None`.
    pub fn asset(bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        let response = Self::ok().body(bytes);
        match content_type {
            Some(ct) => response.header(CONTENT_TYPE, ct),
            None => response,
        }
    }

    /// Creates a 404 Not Found response with the given body.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(404).body(body.into())
    }

    /// Creates the 404 sent when an asset file cannot be read.
    pub fn file_not_found() -> Self {
        Self::not_found("File not found")
    }

    /// Creates a 405 Method Not Allowed response for `path`.
    pub fn method_not_allowed(path: &str) -> Self {
        Self::new(405).body(format!("Method not allowed for {path}"))
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_server_error() -> Self {
        Self::new(500).body("Internal Server Error")
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the status code.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the `Content-Type` header, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).map(String::as_str)
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_html() {
        let res = Response::html("<h1>Hello</h1>");
        assert_eq!(res.status, 200);
        assert_eq!(res.content_type(), Some("text/html; charset=utf-8"));
        assert_eq!(res.body_string(), Some("<h1>Hello</h1>".to_string()));
    }

    #[test]
    fn test_response_json() {
        let data = serde_json::json!({"name": "test"});
        let res = Response::json(&data);
        assert_eq!(res.status, 200);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.body_string(), Some(r#"{"name":"test"}"#.to_string()));
    }

    #[test]
    fn test_method_not_allowed_body() {
        let res = Response::method_not_allowed("/test/get/method");
        assert_eq!(res.status, 405);
        assert_eq!(
            res.body_string(),
            Some("Method not allowed for /test/get/method".to_string())
        );
    }

    #[test]
    fn test_asset_without_content_type() {
        let res = Response::asset(b"GIF89a".to_vec(), None);
        assert_eq!(res.status, 200);
        assert!(res.content_type().is_none());
        assert_eq!(res.body, b"GIF89a");
    }

    #[test]
    fn test_not_found_bodies() {
        let res = Response::not_found("Route /api/moo does not exist").status(404);
        assert_eq!(res.body_string().as_deref(), Some("Route /api/moo does not exist"));

        let res = Response::file_not_found();
        assert_eq!(res.status, 404);
        assert!(res.headers.is_empty());
        assert_eq!(res.body, b"File not found");
    }
}
