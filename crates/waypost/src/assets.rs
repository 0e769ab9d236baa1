//! Static asset bindings and resolution.
//!
//! An asset key is either the first path segment (`/js/app.js` uses key
//! `js`) or the file extension (`/style.css` uses key `css`). The key
//! selects a root directory; the rest of the path names the file below it.
//! Reading the file is delegated to an [`AssetSource`].

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};

use crate::error::{Result, RouterError};

/// Suffix/key to media type. Other files get no content type.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("js", "text/javascript"),
    ("css", "text/css"),
    ("svg", "image/svg+xml"),
];

/// A root directory bound to an asset key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBinding {
    /// The key this binding was registered under.
    pub key: String,
    /// Directory files are resolved against.
    pub root: PathBuf,
    /// Removed from the start of the relative file path before joining.
    pub strip_prefix: String,
}

/// A resolved asset request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTarget {
    /// The key that selected the binding.
    pub key: String,
    /// File to read: the binding root joined with the relative file path.
    pub file: PathBuf,
    /// Media type from the fixed table, if the key or suffix is known.
    pub content_type: Option<&'static str>,
}

/// Asset bindings by key.
#[derive(Debug, Default)]
pub struct AssetTable {
    bindings: HashMap<String, AssetBinding>,
}

impl AssetTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds each comma-separated key in `keys` to `root`.
    ///
    /// Keys are checked before any is bound, so a rejected call leaves the
    /// table unchanged.
    ///
    /// # Errors
    ///
    /// [`RouterError::MissingAssetKey`] if `keys` holds no non-blank key,
    /// [`RouterError::DuplicateAsset`] if a key is already bound and
    /// `overwrite` is `false`.
    pub fn register(
        &mut self,
        keys: &str,
        root: impl Into<PathBuf>,
        overwrite: bool,
        strip_prefix: &str,
    ) -> Result<()> {
        let raw = keys;
        let keys: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() {
            return Err(RouterError::MissingAssetKey(raw.to_string()));
        }

        if !overwrite {
            if let Some(taken) = keys.iter().find(|k| self.bindings.contains_key(**k)) {
                return Err(RouterError::DuplicateAsset((*taken).to_string()));
            }
        }

        let root = root.into();
        for key in keys {
            self.bindings.insert(
                key.to_string(),
                AssetBinding {
                    key: key.to_string(),
                    root: root.clone(),
                    strip_prefix: strip_prefix.to_string(),
                },
            );
        }
        Ok(())
    }

    /// Returns the binding for `key`.
    pub fn get(&self, key: &str) -> Option<&AssetBinding> {
        self.bindings.get(key)
    }

    /// Iterates over the bound keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Maps a normalized request path to a file below a bound root.
    ///
    /// Returns `None` when neither the first path segment nor the file
    /// extension is a bound key.
    pub fn resolve(&self, path: &str) -> Option<AssetTarget> {
        let relative = path.trim_start_matches('/');
        let namespace = relative.split('/').next().unwrap_or_default();

        let (binding, file) = if let Some(binding) = self.bindings.get(namespace) {
            let file = relative
                .strip_prefix(namespace)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(relative);
            (binding, file)
        } else {
            let binding = extension(relative).and_then(|ext| self.bindings.get(ext))?;
            (binding, relative)
        };

        let file = if binding.strip_prefix.is_empty() {
            file
        } else {
            file.strip_prefix(binding.strip_prefix.as_str())
                .unwrap_or(file)
        };

        let mut full = binding.root.clone();
        // Empty, `.` and `..` components are dropped so the file stays under the root.
        for part in file.split('/') {
            if !part.is_empty() && part != "." && part != ".." {
                full.push(part);
            }
        }

        Some(AssetTarget {
            key: binding.key.clone(),
            content_type: content_type_for(&binding.key, file),
            file: full,
        })
    }
}

/// Extension of the last segment of `path`.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Picks a media type from the asset key, then from the file suffix.
pub fn content_type_for(key: &str, file: &str) -> Option<&'static str> {
    CONTENT_TYPES
        .iter()
        .find(|(k, _)| *k == key)
        .or_else(|| {
            let ext = extension(file)?;
            CONTENT_TYPES.iter().find(|(k, _)| *k == ext)
        })
        .map(|(_, ct)| *ct)
}

/// Reads asset bytes on behalf of the router.
pub trait AssetSource: Send + Sync {
    /// Reads the whole file at `path`.
    fn read<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<Vec<u8>>>;
}

/// Reads assets from the local file system with `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetSource;

impl AssetSource for FsAssetSource {
    fn read<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, io::Result<Vec<u8>>> {
        tokio::fs::read(path).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AssetTable {
        let mut table = AssetTable::new();
        table.register("css", "tests/css/", false, "").unwrap();
        table.register("js", "tests/js", false, "").unwrap();
        table.register("images", "tests/images/", false, "").unwrap();
        table
    }

    #[test]
    fn test_resolve_by_extension() {
        let target = table().resolve("/style.css").unwrap();
        assert_eq!(target.key, "css");
        assert_eq!(target.file, Path::new("tests/css/style.css"));
        assert_eq!(target.content_type, Some("text/css"));
    }

    #[test]
    fn test_resolve_by_namespace() {
        let target = table().resolve("/images/loader.gif").unwrap();
        assert_eq!(target.key, "images");
        assert_eq!(target.file, Path::new("tests/images/loader.gif"));
        assert_eq!(target.content_type, None);
    }

    #[test]
    fn test_namespace_is_stripped_only_once() {
        let target = table().resolve("/js/js/app.js").unwrap();
        assert_eq!(target.file, Path::new("tests/js/js/app.js"));
    }

    #[test]
    fn test_nested_file_by_extension() {
        let target = table()
            .resolve("/jspm_packages/github/capaj/systemjs-hot-reloader@0.5.7.js")
            .unwrap();
        assert_eq!(target.key, "js");
        assert_eq!(
            target.file,
            Path::new("tests/js/jspm_packages/github/capaj/systemjs-hot-reloader@0.5.7.js")
        );
        assert_eq!(target.content_type, Some("text/javascript"));
    }

    #[test]
    fn test_custom_key_uses_suffix_for_content_type() {
        let mut table = AssetTable::new();
        table.register("random-string1", "tests/js/", false, "").unwrap();
        let target = table.resolve("/random-string1/empty.js").unwrap();
        assert_eq!(target.file, Path::new("tests/js/empty.js"));
        assert_eq!(target.content_type, Some("text/javascript"));
    }

    #[test]
    fn test_strip_prefix() {
        let mut table = AssetTable::new();
        table.register("static", "public", false, "v2/").unwrap();
        let target = table.resolve("/static/v2/app.css").unwrap();
        assert_eq!(target.file, Path::new("public/app.css"));
        assert_eq!(target.content_type, Some("text/css"));
    }

    #[test]
    fn test_parent_components_are_dropped() {
        let target = table().resolve("/css/../../etc/passwd.css").unwrap();
        assert_eq!(target.file, Path::new("tests/css/etc/passwd.css"));
    }

    #[test]
    fn test_unknown_key() {
        assert!(table().resolve("/unknown/file.txt").is_none());
        assert!(table().resolve("/archive.tar").is_none());
    }

    #[test]
    fn test_comma_keys_fan_out() {
        let mut table = AssetTable::new();
        table.register("png, gif,jpg", "img", false, "").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("gif").unwrap().root, Path::new("img"));
    }

    #[test]
    fn test_blank_key_list_is_rejected() {
        let mut table = AssetTable::new();
        for keys in ["", ",", " , ,"] {
            let err = table.register(keys, "img", false, "").unwrap_err();
            assert!(matches!(err, RouterError::MissingAssetKey(ref k) if k == keys));
            assert!(err.is_registration_error());
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_key() {
        let mut table = table();
        let err = table.register("fonts,css", "other", false, "").unwrap_err();
        assert_eq!(err.to_string(), "Asset css path has already been defined");
        assert!(table.get("fonts").is_none());
        assert_eq!(table.get("css").unwrap().root, Path::new("tests/css/"));
    }

    #[test]
    fn test_overwrite() {
        let mut table = table();
        table.register("css", "other", true, "").unwrap();
        assert_eq!(table.get("css").unwrap().root, Path::new("other"));
    }

    #[test]
    fn test_content_type_table() {
        assert_eq!(content_type_for("svg", "x"), Some("image/svg+xml"));
        assert_eq!(content_type_for("images", "empty.svg"), Some("image/svg+xml"));
        assert_eq!(content_type_for("images", "loader.gif"), None);
    }

    #[tokio::test]
    async fn test_fs_source_missing_file() {
        let err = FsAssetSource
            .read(Path::new("definitely/not/here.css"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
