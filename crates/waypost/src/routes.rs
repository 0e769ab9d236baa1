//! The route table.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{Result, RouterError};
use crate::guard::MethodFilter;
use crate::pattern::RouteTemplate;
use crate::request::{normalize_path, PathParams, Request};
use crate::response::Response;

/// A boxed async handler function.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Boxes an async function into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |req| f(req).boxed())
}

/// A single route definition.
#[derive(Clone)]
pub struct Route {
    /// Compiled template, keyed by its normalized string.
    pub template: RouteTemplate,
    /// Accepted HTTP method.
    pub method: MethodFilter,
    /// Request handler.
    pub handler: Handler,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("template", &self.template.template())
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// One or more route templates accepted by a single registration call.
pub trait IntoTemplates {
    /// Collects the templates.
    fn into_templates(self) -> Vec<String>;
}

impl IntoTemplates for &str {
    fn into_templates(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoTemplates for String {
    fn into_templates(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoTemplates for &String {
    fn into_templates(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<T: AsRef<str>> IntoTemplates for &[T] {
    fn into_templates(self) -> Vec<String> {
        self.iter().map(|t| t.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>, const N: usize> IntoTemplates for [T; N] {
    fn into_templates(self) -> Vec<String> {
        self.iter().map(|t| t.as_ref().to_string()).collect()
    }
}

impl<T: AsRef<str>> IntoTemplates for Vec<T> {
    fn into_templates(self) -> Vec<String> {
        self.iter().map(|t| t.as_ref().to_string()).collect()
    }
}

/// Registered routes in registration order, with an index by normalized
/// template for exact lookups.
#[derive(Debug)]
pub struct RouteTable {
    prefix: String,
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Creates an empty table whose templates are normalized with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Prepends the prefix unless the template already starts with it, then
    /// collapses repeated `/` the same way request paths are collapsed.
    ///
    /// ```
    /// use waypost::RouteTable;
    ///
    /// let table = RouteTable::new("/");
    /// assert_eq!(table.normalize("about"), "/about");
    /// assert_eq!(table.normalize("//about"), "/about");
    ///
    /// let table = RouteTable::new("/api/");
    /// assert_eq!(table.normalize("/users"), "/api/users");
    /// ```
    pub fn normalize(&self, template: &str) -> String {
        if template.starts_with(&self.prefix) {
            normalize_path(template)
        } else {
            normalize_path(&format!("{}{template}", self.prefix))
        }
    }

    /// Registers every template with the same method and handler.
    ///
    /// All templates are compiled and checked before any is inserted, so a
    /// failing batch leaves the table unchanged.
    ///
    /// # Errors
    ///
    /// [`RouterError::MalformedPattern`] if a template does not compile,
    /// [`RouterError::DuplicateRoute`] if a normalized template is already
    /// registered or appears twice in the batch.
    pub fn register(
        &mut self,
        templates: impl IntoTemplates,
        method: MethodFilter,
        handler: Handler,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::new();
        for template in templates.into_templates() {
            let normalized = self.normalize(&template);
            if self.index.contains_key(&normalized) || !seen.insert(normalized.clone()) {
                return Err(RouterError::DuplicateRoute(normalized));
            }
            compiled.push(RouteTemplate::compile(&normalized)?);
        }

        for template in compiled {
            self.index
                .insert(template.template().to_string(), self.routes.len());
            self.routes.push(Route {
                template,
                method,
                handler: Arc::clone(&handler),
            });
        }
        Ok(())
    }

    /// Looks up a route whose normalized template equals `path`.
    pub fn exact(&self, path: &str) -> Option<&Route> {
        self.index.get(path).map(|&i| &self.routes[i])
    }

    /// Returns the first route, in registration order, whose template
    /// reconciles with every path segment, together with the bound
    /// parameters.
    pub fn scan<S: AsRef<str>>(&self, segments: &[S]) -> Option<(&Route, PathParams)> {
        self.routes.iter().find_map(|route| {
            route
                .template
                .match_segments(segments)
                .map(|params| (route, params))
        })
    }

    /// Returns `true` if the normalized form of `template` is registered.
    pub fn contains(&self, template: &str) -> bool {
        self.index.contains_key(&self.normalize(template))
    }

    /// Iterates over routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
