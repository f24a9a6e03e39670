//! Persisted catalog snapshots.
//!
//! A snapshot lets artifacts be rendered later without rescanning the
//! archive tree. It is a JSON document holding every family's resources,
//! selection flags included, plus a SHA-256 digest of that content:
//!
//! ```json
//! {
//!   "format": 1,
//!   "integrity": "<sha256 of the families object>",
//!   "families": { "ruby": [ { "directory": "ruby-lang/1.9", ... } ] }
//! }
//! ```
//!
//! Saving goes through a temporary file in the destination directory so a
//! reader never sees a partially written snapshot.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::checksum::sha256_hex;
use crate::error::{CatalogError, Result};
use crate::family::FamilyId;
use crate::resource::Resource;
use crate::resource_set::ResourceSet;

/// Snapshot layout version written by this crate.
pub const SNAPSHOT_FORMAT: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    format: u32,
    integrity: String,
    families: BTreeMap<FamilyId, Vec<Resource>>,
}

fn families_of(catalog: &Catalog) -> BTreeMap<FamilyId, Vec<Resource>> {
    catalog
        .iter()
        .map(|set| (set.family(), set.resources().to_vec()))
        .collect()
}

fn integrity_of(families: &BTreeMap<FamilyId, Vec<Resource>>) -> Result<String> {
    Ok(sha256_hex(&serde_json::to_vec(families)?))
}

/// Serialize `catalog` to snapshot JSON.
pub fn to_json(catalog: &Catalog) -> Result<String> {
    let families = families_of(catalog);
    let snapshot = SnapshotFile {
        format: SNAPSHOT_FORMAT,
        integrity: integrity_of(&families)?,
        families,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Parse snapshot JSON back into a catalog.
///
/// `origin` names the snapshot in integrity errors.
pub fn from_json(text: &str, origin: &Path) -> Result<Catalog> {
    let snapshot: SnapshotFile = serde_json::from_str(text)?;
    if snapshot.format != SNAPSHOT_FORMAT {
        return Err(CatalogError::InvalidSnapshot {
            detail: format!(
                "unsupported format {} (expected {SNAPSHOT_FORMAT})",
                snapshot.format
            ),
        });
    }

    let actual = integrity_of(&snapshot.families)?;
    if actual != snapshot.integrity {
        return Err(CatalogError::SnapshotIntegrity {
            path: origin.to_path_buf(),
            expected: snapshot.integrity,
            actual,
        });
    }

    let sets = snapshot
        .families
        .into_iter()
        .map(|(family, resources)| ResourceSet::from_resources(family, resources))
        .collect::<Result<Vec<_>>>()?;
    Catalog::from_sets(sets)
}

/// Write `catalog` to `path`, replacing any previous snapshot atomically.
pub fn save(catalog: &Catalog, path: &Path) -> Result<()> {
    let json = to_json(catalog)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CatalogError::Io(e.error))?;

    info!(path = %path.display(), archives = catalog.len(), "snapshot saved");
    Ok(())
}

/// Read and verify the snapshot at `path`.
pub fn load(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)?;
    let catalog = from_json(&text, path)?;
    info!(path = %path.display(), archives = catalog.len(), "snapshot loaded");
    Ok(catalog)
}
