//! Error types for routing.

use std::path::PathBuf;

use thiserror::Error;

use crate::form::FormError;

/// Router-specific errors.
///
/// Registration failures (`MalformedPattern`, `DuplicateRoute`,
/// `DuplicateAsset`, `MissingAssetKey`) are returned to the caller that tried to register.
/// The per-request variants never leave [`Router::handle`](crate::Router::handle);
/// they are rendered into a [`Response`](crate::Response) instead.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route template could not be compiled.
    #[error("malformed route pattern '{template}': {reason}")]
    MalformedPattern {
        /// The offending template, after prefix normalization.
        template: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A route with the same normalized template already exists.
    #[error("Route already exists {0}")]
    DuplicateRoute(String),

    /// The asset key is already bound to a root.
    #[error("Asset {0} path has already been defined")]
    DuplicateAsset(String),

    /// An asset registration named no key.
    #[error("no asset key in '{0}'")]
    MissingAssetKey(String),

    /// No route matched the request.
    #[error("no route matched: {method} {path}")]
    NotFound { method: String, path: String },

    /// Method not allowed for this route.
    #[error("method not allowed: {method} for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Reading an asset file failed.
    #[error("failed to read asset {}: {source}", path.display())]
    AssetRead {
        /// Resolved file-system path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Parsing a request body failed.
    #[error(transparent)]
    Form(#[from] FormError),
}

impl RouterError {
    pub(crate) fn malformed(template: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised while registering routes or assets.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedPattern { .. }
                | Self::DuplicateRoute(_)
                | Self::DuplicateAsset(_)
                | Self::MissingAssetKey(_)
        )
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
