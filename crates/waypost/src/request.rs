//! HTTP request type.

use std::collections::HashMap;
use std::fmt;

use crate::query::Query;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Options,
    ];

    /// Parses a method name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns the upper-case method name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path parameters bound by a parametric route match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    bound: HashMap<String, String>,
}

impl PathParams {
    /// No bound parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to the parameter `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bound.insert(name.into(), value.into());
    }

    /// Value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bound.get(name).map(String::as_str)
    }

    /// Returns `true` when nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bound.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Collapses runs of `/` into one. An empty path becomes `/`.
///
/// ```
/// assert_eq!(waypost::normalize_path("//a///b//"), "/a/b/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// An HTTP request as seen by route handlers.
///
/// Built from a method and the raw request target; the path is
/// normalized and the query string decoded on construction.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request target exactly as received, query string included.
    pub raw_url: String,
    /// Pathname with repeated separators collapsed.
    pub path: String,
    /// `path` split on `/`; the leading empty segment is kept.
    pub segments: Vec<String>,
    /// Decoded query string.
    pub query: Query,
    /// Path parameters bound by a parametric match. Empty for exact matches.
    pub params: PathParams,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request from a method and raw request target.
    pub fn new(method: Method, raw_url: impl Into<String>) -> Self {
        let raw_url = raw_url.into();
        let without_fragment = raw_url.split('#').next().unwrap_or_default();
        let (pathname, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));
        let path = normalize_path(pathname);
        let segments = path.split('/').map(str::to_string).collect();

        Self {
            method,
            path,
            segments,
            query: Query::parse(query),
            params: PathParams::new(),
            headers: HashMap::new(),
            body: Vec::new(),
            raw_url,
        }
    }

    /// Creates a GET request.
    pub fn get(raw_url: impl Into<String>) -> Self {
        Self::new(Method::Get, raw_url)
    }

    /// Creates a POST request.
    pub fn post(raw_url: impl Into<String>) -> Self {
        Self::new(Method::Post, raw_url)
    }

    /// Creates a PUT request.
    pub fn put(raw_url: impl Into<String>) -> Self {
        Self::new(Method::Put, raw_url)
    }

    /// Creates a DELETE request.
    pub fn delete(raw_url: impl Into<String>) -> Self {
        Self::new(Method::Delete, raw_url)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Looks up a header by name, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
    }

    /// Gets a query parameter.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query.get(key)
    }

    /// Gets a bound path parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
