//! # waypost
//!
//! A request router that maps paths to handlers, binds regex-constrained
//! path parameters, and falls back to static assets.
//!
//! This crate provides:
//! - Route templates with `:name(regex)` parameters
//! - Exact-match, then asset, then first-registered parametric matching
//! - Per-route HTTP method constraints
//! - Static asset roots selected by path namespace or file extension
//! - Query string and url-encoded form decoding
//!
//! It does not own a socket. A listener (see the `waypost-server` crate)
//! turns each incoming request into a [`Request`] and calls
//! [`Router::handle`].
//!
//! ## Quick Start
//!
//! ```
//! # tokio_test::block_on(async {
//! use waypost::{Method, Request, Response, Router};
//!
//! async fn hello_handler(_req: Request) -> Response {
//!     Response::text("Hello, World!")
//! }
//!
//! async fn hedgehog_handler(req: Request) -> Response {
//!     let id = req.params.get("id").unwrap_or("unknown");
//!     Response::text(format!("{id} Hedgehog"))
//! }
//!
//! let mut router = Router::new();
//! router.add_route(["/", "about"], hello_handler).unwrap();
//! router
//!     .get("/api/register/hedgehog/:id([a-z]+)", hedgehog_handler)
//!     .unwrap();
//!
//! let res = router.dispatch(Method::Get, "/api/register/hedgehog/hii").await;
//! assert_eq!(res.body_string(), Some("hii Hedgehog".to_string()));
//!
//! let res = router.dispatch(Method::Get, "/api/register/hedgehog").await;
//! assert_eq!(res.status, 404);
//! # });
//! ```
//!
//! ## Path Parameters
//!
//! Every parameter needs a constraint. The constraint is anchored at the
//! start of the path segment, so `:slug([a-z]+)` accepts `test-route`:
//!
//! ```ignore
//! router.add_route("/:slug([a-z]+)", handler)?;
//! router.add_route("/:id", handler)?; // Err(MalformedPattern)
//! ```
//!
//! ## Static Assets
//!
//! ```ignore
//! router.add_asset_path("css", "public/css/", false, "")?;
//! router.add_asset_path("png,gif,images", "public/images/", false, "")?;
//! // GET /style.css          -> public/css/style.css  (text/css)
//! // GET /images/loader.gif  -> public/images/loader.gif
//! ```

mod assets;
mod config;
mod error;
mod form;
mod guard;
mod pattern;
mod query;
mod request;
mod response;
mod router;
mod routes;

pub use assets::{
    content_type_for, AssetBinding, AssetSource, AssetTable, AssetTarget, FsAssetSource,
};
pub use config::{RouterConfig, DEFAULT_PREFIX};
pub use error::{Result, RouterError};
pub use form::{parse_body, FormData, FormError, FormParser, UploadedFile, UrlEncodedForm};
pub use guard::{check as check_method, MethodFilter};
pub use pattern::{RouteTemplate, Segment, PARAM_SIGIL};
pub use query::{Query, QueryValue};
pub use request::{normalize_path, Method, PathParams, Request};
pub use response::{Response, CONTENT_TYPE};
pub use router::{Resolution, Router};
pub use routes::{handler, Handler, IntoTemplates, Route, RouteTable};
