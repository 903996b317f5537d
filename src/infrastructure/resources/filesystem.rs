//! Filesystem and URL resource resolution

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::domain::error::ResourceResolutionError;
use crate::domain::models::{ResourceHandle, ResourceLocation};
use crate::domain::ports::ResourceResolver;

const BUNDLED_PREFIX: &str = "classpath:";

/// Resolves model locators against the local filesystem
///
/// - `classpath:<path>` names a resource under `resource_root`
/// - `file:` URLs name local files, `http(s)` URLs remote ones
/// - anything else is a path, relative ones joined to `base_dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemResourceResolver {
    base_dir: PathBuf,
    resource_root: PathBuf,
}

impl FileSystemResourceResolver {
    /// Resolver for relative paths under `base_dir` and bundled resources
    /// under `resource_root`
    pub fn new(base_dir: impl Into<PathBuf>, resource_root: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            resource_root: resource_root.into(),
        }
    }

    /// Resolver rooted at the current working directory, with bundled
    /// resources under `./resources`
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let resources = cwd.join("resources");
        Ok(Self::new(cwd, resources))
    }

    /// Directory relative paths are joined to
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory `classpath:` locators resolve under
    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    fn resolve_bundled(&self, locator: &str, rest: &str) -> Result<ResourceHandle, ResourceResolutionError> {
        let relative = rest.trim_start_matches('/');
        if relative.is_empty() {
            return Err(ResourceResolutionError::new(locator, "bundled resource path is empty"));
        }
        Ok(ResourceHandle::new(
            locator,
            ResourceLocation::Bundled(self.resource_root.join(relative)),
        ))
    }

    fn resolve_url(locator: &str, url: Url) -> Result<ResourceHandle, ResourceResolutionError> {
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| ResourceResolutionError::new(locator, "not a valid file URL"))?;
                Ok(ResourceHandle::new(locator, ResourceLocation::File(path)))
            }
            "http" | "https" => Ok(ResourceHandle::new(locator, ResourceLocation::Url(url))),
            other => Err(ResourceResolutionError::new(
                locator,
                format!("unsupported scheme '{other}'"),
            )),
        }
    }
}

impl ResourceResolver for FileSystemResourceResolver {
    fn resolve(&self, locator: &str) -> Result<ResourceHandle, ResourceResolutionError> {
        let trimmed = locator.trim();
        if trimmed.is_empty() {
            return Err(ResourceResolutionError::new(locator, "locator is empty"));
        }

        if let Some(rest) = trimmed
            .get(..BUNDLED_PREFIX.len())
            .filter(|head| head.eq_ignore_ascii_case(BUNDLED_PREFIX))
            .map(|head| &trimmed[head.len()..])
        {
            return self.resolve_bundled(trimmed, rest);
        }

        // Single-letter schemes are Windows drive letters, not URLs
        match Url::parse(trimmed) {
            Ok(url) if url.scheme().len() > 1 => Self::resolve_url(trimmed, url),
            _ => {
                let path = Path::new(trimmed);
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.base_dir.join(path)
                };
                Ok(ResourceHandle::new(trimmed, ResourceLocation::File(path)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FileSystemResourceResolver {
        FileSystemResourceResolver::new("/srv/app", "/srv/app/resources")
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let handle = resolver().resolve("/remote").unwrap();
        assert_eq!(handle.location(), &ResourceLocation::File("/remote".into()));
        assert_eq!(handle.locator(), "/remote");
    }

    #[test]
    fn test_relative_path_joins_base_dir() {
        let handle = resolver().resolve("NONE").unwrap();
        assert_eq!(handle.location(), &ResourceLocation::File("/srv/app/NONE".into()));

        let handle = resolver().resolve("models/graph.pb").unwrap();
        assert_eq!(
            handle.location(),
            &ResourceLocation::File("/srv/app/models/graph.pb".into())
        );
    }

    #[test]
    fn test_bundled_resource() {
        let handle = resolver().resolve("classpath:/models/mnist.pb").unwrap();
        assert_eq!(
            handle.location(),
            &ResourceLocation::Bundled("/srv/app/resources/models/mnist.pb".into())
        );

        let err = resolver().resolve("classpath:/").unwrap_err();
        assert_eq!(err.locator, "classpath:/");
    }

    #[test]
    fn test_file_url() {
        let handle = resolver().resolve("file:///tmp/model.pb").unwrap();
        assert_eq!(handle.location(), &ResourceLocation::File("/tmp/model.pb".into()));
    }

    #[test]
    fn test_http_url_is_not_fetched() {
        let handle = resolver()
            .resolve("https://storage.example.com/models/inception.pb")
            .unwrap();
        match handle.location() {
            ResourceLocation::Url(url) => assert_eq!(url.host_str(), Some("storage.example.com")),
            other => panic!("Expected Url location, got {other:?}"),
        }
        assert_eq!(handle.exists(), None);
    }

    #[test]
    fn test_unsupported_scheme_fails() {
        let err = resolver().resolve("ftp://example.com/model.pb").unwrap_err();
        assert!(err.reason.contains("ftp"));
    }

    #[test]
    fn test_empty_locator_fails() {
        assert!(resolver().resolve("").is_err());
        assert!(resolver().resolve("   ").is_err());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let r = resolver();
        for locator in ["/remote", "NONE", "classpath:a.pb", "https://example.com/m.pb"] {
            assert_eq!(r.resolve(locator).unwrap(), r.resolve(locator).unwrap());
        }
    }
}
