//! Renders a catalog into the plain-text files RVM reads from a mirror.
//!
//! All renderers are pure functions of a [`Catalog`]. A renderer that
//! needs a family's current release fails with
//! [`RenderError::MissingCurrentRelease`] rather than emitting partial
//! output.

pub mod checksums;
pub mod db;
pub mod error;
pub mod known;
pub mod listing;
pub mod version;

#[cfg(test)]
mod fixtures;

use rvm_fw_catalog::Catalog;

// Re-exports for convenience.
pub use checksums::render_checksums;
pub use db::{render_db, with_host, HOST_PLACEHOLDER};
pub use error::{require_current, RenderError, Result};
pub use known::render_known;
pub use listing::render_listing;
pub use version::render_version;

/// The artifacts served to RVM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `config/known`
    Known,
    /// `config/db`, with the host placeholder unresolved
    Db,
    /// `config/md5`
    Checksums,
    /// `releases/stable-version.txt`
    Version,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Artifact::Known,
        Artifact::Db,
        Artifact::Checksums,
        Artifact::Version,
    ];

    /// Render this artifact from `catalog`.
    pub fn render(self, catalog: &Catalog) -> Result<String> {
        match self {
            Artifact::Known => render_known(catalog),
            Artifact::Db => render_db(catalog),
            Artifact::Checksums => Ok(render_checksums(catalog)),
            Artifact::Version => render_version(catalog),
        }
    }

    /// Conventional file name when written next to other artifacts.
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Known => "known",
            Artifact::Db => "db",
            Artifact::Checksums => "md5",
            Artifact::Version => "stable-version.txt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_artifact_renders_from_a_complete_mirror() {
        let catalog = fixtures::mirror();
        for artifact in Artifact::ALL {
            let text = artifact.render(&catalog).unwrap();
            assert!(text.ends_with('\n'), "{artifact:?}");
        }
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = Artifact::ALL.iter().map(|a| a.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Artifact::ALL.len());
    }
}
