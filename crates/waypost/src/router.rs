//! Main router implementation.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::assets::{AssetSource, AssetTable, AssetTarget, FsAssetSource};
use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::guard::{self, MethodFilter};
use crate::request::{Method, PathParams, Request};
use crate::response::Response;
use crate::routes::{handler, IntoTemplates, Route, RouteTable};

/// Outcome of matching a request path, before the method guard runs.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// The normalized path is a registered template verbatim.
    Exact(&'a Route),
    /// A parametric route reconciled with every path segment.
    Parametric(&'a Route, PathParams),
    /// The path looks like a file and maps to a bound asset root.
    Asset(AssetTarget),
    /// Nothing applies.
    NotFound,
}

/// Routes requests to handlers or static assets.
///
/// Routes and assets are registered up front through `&mut self`; once the
/// router is shared (typically behind an `Arc`) it is only read.
pub struct Router {
    config: RouterConfig,
    routes: RouteTable,
    assets: AssetTable,
    asset_source: Arc<dyn AssetSource>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Creates an empty router from `config`.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            routes: RouteTable::new(config.prefix.clone()),
            assets: AssetTable::new(),
            asset_source: Arc::new(FsAssetSource),
            config,
        }
    }

    /// Replaces the collaborator used to read asset files.
    #[must_use]
    pub fn with_asset_source(mut self, source: impl AssetSource + 'static) -> Self {
        self.asset_source = Arc::new(source);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Adds a route accepting any method.
    ///
    /// `templates` is a single template or a list; a list registers every
    /// template with the same handler, or none of them on error.
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedPattern`] or [`RouterError::DuplicateRoute`].
    pub fn add_route<F, Fut>(&mut self, templates: impl IntoTemplates, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(MethodFilter::Any, templates, handler)
    }

    /// Adds a route restricted to `method`.
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedPattern`] or [`RouterError::DuplicateRoute`].
    pub fn route<F, Fut>(
        &mut self,
        method: impl Into<MethodFilter>,
        templates: impl IntoTemplates,
        handler_fn: F,
    ) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes
            .register(templates, method.into(), handler(handler_fn))
    }

    /// Adds a GET route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn get<F, Fut>(&mut self, templates: impl IntoTemplates, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Get, templates, handler)
    }

    /// Adds a POST route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn post<F, Fut>(&mut self, templates: impl IntoTemplates, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Post, templates, handler)
    }

    /// Adds a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn put<F, Fut>(&mut self, templates: impl IntoTemplates, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Put, templates, handler)
    }

    /// Adds a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Router::route`].
    pub fn delete<F, Fut>(&mut self, templates: impl IntoTemplates, handler: F) -> Result<()>
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Delete, templates, handler)
    }

    /// Binds one or more comma-separated asset keys to `root`.
    ///
    /// `strip_prefix` is removed from the start of the relative file path
    /// before it is joined onto `root`.
    ///
    /// # Errors
    ///
    /// [`RouterError::MissingAssetKey`] if `keys` names no key,
    /// [`RouterError::DuplicateAsset`] if a key is bound and `overwrite` is
    /// `false`.
    pub fn add_asset_path(
        &mut self,
        keys: &str,
        root: impl Into<PathBuf>,
        overwrite: bool,
        strip_prefix: &str,
    ) -> Result<()> {
        self.assets.register(keys, root, overwrite, strip_prefix)
    }

    /// Registered templates and their method constraints, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, MethodFilter)> {
        self.routes
            .iter()
            .map(|route| (route.template.template(), route.method))
    }

    /// Bound asset keys.
    pub fn asset_keys(&self) -> impl Iterator<Item = &str> {
        self.assets.keys()
    }

    /// Decides what serves `request`.
    ///
    /// In order: an exact template match; for paths containing `.`, an
    /// asset binding (parametric routes are never tried for such paths);
    /// the first parametric route in registration order; otherwise
    /// [`Resolution::NotFound`]. A path with a trailing `/` that matches
    /// nothing as given is retried without it at each route lookup.
    pub fn resolve(&self, request: &Request) -> Resolution<'_> {
        let trailing = request.path.len() > 1 && request.path.ends_with('/');

        let exact = self.routes.exact(&request.path).or_else(|| {
            trailing
                .then(|| self.routes.exact(&request.path[..request.path.len() - 1]))
                .flatten()
        });
        if let Some(route) = exact {
            return Resolution::Exact(route);
        }

        if request.path.contains('.') {
            return self
                .assets
                .resolve(&request.path)
                .map_or(Resolution::NotFound, Resolution::Asset);
        }

        let segments = &request.segments;
        let parametric = self.routes.scan(segments).or_else(|| {
            trailing
                .then(|| self.routes.scan(&segments[..segments.len() - 1]))
                .flatten()
        });
        match parametric {
            Some((route, params)) => Resolution::Parametric(route, params),
            None => Resolution::NotFound,
        }
    }

    /// Handles an incoming request.
    pub async fn handle(&self, mut request: Request) -> Response {
        let result = match self.resolve(&request) {
            Resolution::Exact(route) => {
                debug!(path = %request.path, template = route.template.template(), "Exact route match");
                self.invoke(route, request).await
            }
            Resolution::Parametric(route, params) => {
                debug!(
                    path = %request.path,
                    template = route.template.template(),
                    params = params.len(),
                    "Parametric route match"
                );
                request.params = params;
                self.invoke(route, request).await
            }
            Resolution::Asset(target) => {
                debug!(path = %request.path, file = %target.file.display(), "Serving asset");
                self.serve_asset(target).await
            }
            Resolution::NotFound => Err(RouterError::NotFound {
                method: request.method.to_string(),
                path: request.path,
            }),
        };

        result.unwrap_or_else(|err| self.error_response(&err))
    }

    /// Builds a [`Request`] from `method` and the raw request target and
    /// handles it.
    pub async fn dispatch(&self, method: Method, raw_url: &str) -> Response {
        self.handle(Request::new(method, raw_url)).await
    }

    async fn invoke(&self, route: &Route, request: Request) -> Result<Response> {
        if !guard::check(request.method, route.method) {
            return Err(RouterError::MethodNotAllowed {
                method: request.method.to_string(),
                path: request.path,
            });
        }
        Ok((route.handler)(request).await)
    }

    async fn serve_asset(&self, target: AssetTarget) -> Result<Response> {
        match self.asset_source.read(&target.file).await {
            Ok(bytes) => Ok(Response::asset(bytes, target.content_type)),
            Err(source) => Err(RouterError::AssetRead {
                path: target.file,
                source,
            }),
        }
    }

    fn error_response(&self, err: &RouterError) -> Response {
        match err {
            RouterError::NotFound { method, path } => {
                debug!(%method, %path, "No route matched");
                Response::not_found(self.config.not_found_body(path))
            }
            RouterError::MethodNotAllowed { method, path } => {
                debug!(%method, %path, "Method not allowed");
                Response::method_not_allowed(path)
            }
            RouterError::AssetRead { .. } => {
                warn!(error = %err, "Asset read failed");
                Response::file_not_found()
            }
            _ => {
                warn!(error = %err, "Unexpected error while handling request");
                Response::internal_server_error()
            }
        }
    }
}
