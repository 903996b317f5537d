//! Resolved model resources

use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Where a resolved resource lives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceLocation {
    /// Local filesystem path
    File(PathBuf),
    /// Remote URL, fetched lazily by whoever loads the model
    Url(Url),
    /// Resource bundled with the application under its resource root
    Bundled(PathBuf),
}

/// Handle to a model artifact, produced by a `ResourceResolver`
///
/// Resolution never touches the network, and two handles resolved from the
/// same locator by the same resolver compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    locator: String,
    location: ResourceLocation,
}

impl ResourceHandle {
    /// Pair a locator with the location it resolved to
    pub fn new(locator: impl Into<String>, location: ResourceLocation) -> Self {
        Self {
            locator: locator.into(),
            location,
        }
    }

    /// The locator string the handle was resolved from
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Where the resource lives
    pub const fn location(&self) -> &ResourceLocation {
        &self.location
    }

    /// Whether the resource exists, or `None` when that needs a remote lookup
    pub fn exists(&self) -> Option<bool> {
        match &self.location {
            ResourceLocation::File(path) | ResourceLocation::Bundled(path) => Some(path.exists()),
            ResourceLocation::Url(_) => None,
        }
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            ResourceLocation::File(path) => write!(f, "file [{}]", path.display()),
            ResourceLocation::Url(url) => write!(f, "URL [{url}]"),
            ResourceLocation::Bundled(path) => write!(f, "bundled resource [{}]", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_describes_location() {
        let file = ResourceHandle::new("/models/a.pb", ResourceLocation::File("/models/a.pb".into()));
        assert_eq!(file.to_string(), "file [/models/a.pb]");

        let url = Url::parse("https://example.com/model.pb").unwrap();
        let remote = ResourceHandle::new("https://example.com/model.pb", ResourceLocation::Url(url));
        assert_eq!(remote.to_string(), "URL [https://example.com/model.pb]");
        assert_eq!(remote.exists(), None);
    }

    #[test]
    fn test_exists_checks_local_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.pb");
        let handle = ResourceHandle::new("model.pb", ResourceLocation::File(path.clone()));
        assert_eq!(handle.exists(), Some(false));

        std::fs::write(&path, b"graph").unwrap();
        assert_eq!(handle.exists(), Some(true));
    }
}
