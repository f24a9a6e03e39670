//! Archive catalog for an RVM mirror.
//!
//! Scans a tree of downloaded archives (Ruby interpreters, RVM releases,
//! RubyGems and the libraries RVM builds), classifies every file into a
//! family from its name, and selects the current release of each family.
//!
//! # Architecture
//!
//! - **Families**: a static table of naming conventions and layout
//! - **Classifier**: version/patch extraction per family
//! - **ResourceSet**: one family's archives, ordering, current selection
//! - **CatalogBuilder**: one fail-fast pass over the archive tree
//! - **Snapshot**: the catalog persisted as JSON with an integrity digest

pub mod builder;
pub mod catalog;
pub mod checksum;
pub mod classifier;
pub mod error;
pub mod family;
pub mod resource;
pub mod resource_set;
pub mod snapshot;

// Re-exports for convenience.
pub use builder::CatalogBuilder;
pub use catalog::Catalog;
pub use checksum::Checksum;
pub use classifier::{classify, identify_interpreter, strip_archive_suffix, Classified, Classifier};
pub use error::{CatalogError, Result};
pub use family::{FamilyId, FamilyKind, FamilySpec, KnownLineStyle, Rule};
pub use resource::Resource;
pub use resource_set::ResourceSet;
