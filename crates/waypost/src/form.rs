//! Request body parsing for form submissions.

use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;

use crate::error::Result;
use crate::query::Query;
use crate::request::{Method, Request};

const URL_ENCODED: &str = "application/x-www-form-urlencoded";

/// Errors produced by a [`FormParser`].
#[derive(Debug, Error)]
pub enum FormError {
    /// The parser cannot decode bodies of this media type.
    #[error("unsupported form content type: {0}")]
    UnsupportedContentType(String),

    /// The body could not be decoded.
    #[error("malformed form body: {0}")]
    Malformed(String),
}

/// A file uploaded in a form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub filename: Option<String>,
    /// Client-supplied media type.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Vec<u8>,
}

/// Decoded form fields and uploaded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    /// Text fields; repeated names collect into sequences.
    pub fields: Query,
    /// Uploaded files by field name.
    pub files: HashMap<String, UploadedFile>,
}

/// Decodes request bodies into [`FormData`].
///
/// Implement this to plug in a multipart decoder; [`UrlEncodedForm`]
/// handles url-encoded bodies only.
pub trait FormParser: Send + Sync {
    /// Parses the body of `request`.
    fn parse<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, std::result::Result<FormData, FormError>>;
}

/// Parses `application/x-www-form-urlencoded` bodies. A body without a
/// content type is treated as url-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncodedForm;

impl FormParser for UrlEncodedForm {
    fn parse<'a>(
        &'a self,
        request: &'a Request,
    ) -> BoxFuture<'a, std::result::Result<FormData, FormError>> {
        async move {
            if let Some(content_type) = request.get_header("content-type") {
                let media_type = content_type
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim();
                if !media_type.eq_ignore_ascii_case(URL_ENCODED) {
                    return Err(FormError::UnsupportedContentType(media_type.to_string()));
                }
            }

            Ok(FormData {
                fields: Query::parse_bytes(&request.body),
                files: HashMap::new(),
            })
        }
        .boxed()
    }
}

/// Runs `parser` on a POST request's body.
///
/// Returns `None` without touching the body for any other method.
///
/// ```
/// # tokio_test::block_on(async {
/// use waypost::{parse_body, Request, UrlEncodedForm};
///
/// let req = Request::post("/submit").body("test=test+string");
/// let form = parse_body(&UrlEncodedForm, &req).await.unwrap().unwrap();
/// assert_eq!(form.fields.get("test"), Some("test string"));
///
/// assert!(parse_body(&UrlEncodedForm, &Request::get("/submit")).await.is_none());
/// # });
/// ```
pub async fn parse_body(parser: &dyn FormParser, request: &Request) -> Option<Result<FormData>> {
    if request.method != Method::Post {
        return None;
    }
    Some(parser.parse(request).await.map_err(Into::into))
}
