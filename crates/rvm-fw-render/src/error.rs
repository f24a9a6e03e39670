//! Render error types.

use rvm_fw_catalog::{Catalog, FamilyId, Resource};

/// Errors that can occur while rendering an artifact.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A family the artifact needs has no current release.
    #[error("no current release for '{family}'; the artifact cannot be rendered")]
    MissingCurrentRelease { family: String },
}

/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// The current release of `family`, or an error naming the family.
pub fn require_current(catalog: &Catalog, family: FamilyId) -> Result<&Resource> {
    catalog
        .get(family)
        .current()
        .ok_or_else(|| RenderError::MissingCurrentRelease {
            family: family.name().to_string(),
        })
}
