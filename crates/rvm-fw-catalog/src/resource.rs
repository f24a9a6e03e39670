//! A single classified archive.

use serde::{Deserialize, Serialize};

use crate::checksum::Checksum;
use crate::classifier::Classifier;
use crate::error::Result;
use crate::family::FamilyId;

/// One archive in the mirror with its extracted version, patch and digest.
///
/// The selection flags are owned by [`crate::ResourceSet`]; a freshly
/// classified resource has both cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Directory relative to the archive root, `/`-separated.
    pub directory: String,
    pub filename: String,
    pub family: FamilyId,
    pub version: String,
    #[serde(default)]
    pub patch: Option<String>,
    pub checksum: Checksum,
    #[serde(default)]
    pub current_for_version: bool,
    #[serde(default)]
    pub current_for_all_versions: bool,
}

impl Resource {
    /// Classify `filename` with `classifier` and build an unselected resource.
    pub fn classify(
        classifier: &Classifier,
        directory: impl Into<String>,
        filename: impl Into<String>,
        checksum: Checksum,
    ) -> Result<Self> {
        let filename = filename.into();
        let classified = classifier.classify(&filename)?;
        Ok(Resource {
            directory: directory.into(),
            filename,
            family: classifier.family(),
            version: classified.version,
            patch: classified.patch,
            checksum,
            current_for_version: false,
            current_for_all_versions: false,
        })
    }

    /// `version-patch`, or just the version for families without patches.
    pub fn release(&self) -> String {
        match &self.patch {
            Some(patch) => format!("{}-{}", self.version, patch),
            None => self.version.clone(),
        }
    }

    /// Path relative to the archive root.
    pub fn path(&self) -> String {
        if self.directory.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.directory, self.filename)
        }
    }
}
