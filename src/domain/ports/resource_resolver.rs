//! Resource resolution port

use crate::domain::error::ResourceResolutionError;
use crate::domain::models::ResourceHandle;

/// Port for turning a model locator string into a resource handle
///
/// Implementations decide what a locator means in their environment (local
/// files, URLs, resources bundled with the application). They must not
/// perform network I/O, and resolving the same locator twice must yield
/// equal handles.
pub trait ResourceResolver: Send + Sync {
    /// Resolve `locator` to a handle
    fn resolve(&self, locator: &str) -> Result<ResourceHandle, ResourceResolutionError>;
}
