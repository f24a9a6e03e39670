//! Building a catalog from the archive tree.
//!
//! Layout:
//! ```text
//! <root>/
//!   ruby-lang/<series>/<interpreter archive>   (all interpreters)
//!   releases/rvm-<version>.tar.gz
//!   rubygems/rubygems-<version>.tgz
//!   packages/<package>/<package archive>
//! ```
//!
//! The build is all-or-nothing: the first archive that cannot be classified
//! or digested aborts it, as does a directory under `packages/` that no
//! package family owns. A half-built catalog is never returned. Entries
//! whose name starts with `.` are skipped at every level.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::catalog::Catalog;
use crate::checksum::Checksum;
use crate::classifier::{identify_interpreter, strip_archive_suffix, Classifier};
use crate::error::{CatalogError, Result};
use crate::family::{FamilyId, FamilyKind};
use crate::resource::Resource;
use crate::resource_set::ResourceSet;

/// What an interpreter archive name must start with to be routed.
const INTERPRETER_PREFIXES: &str = "ruby-, ruby-enterprise-, jruby-, MacRuby- or rubinius-";

/// Parent of every package family's directory.
const PACKAGES_DIR: &str = "packages";

/// Scans an archive root into a [`Catalog`].
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    root: PathBuf,
}

impl CatalogBuilder {
    /// Create a builder for the archive tree at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CatalogBuilder { root: root.into() }
    }

    /// The archive root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan every family and select current releases.
    pub fn build(&self) -> Result<Catalog> {
        self.check_package_directories()?;
        let sets = FamilyId::ALL
            .into_iter()
            .map(|family| self.build_family(family))
            .collect::<Result<Vec<_>>>()?;
        let catalog = Catalog::from_sets(sets)?;
        info!(
            root = %self.root.display(),
            archives = catalog.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    /// Scan one family's directory and select its current releases.
    ///
    /// A missing directory yields an empty set. Hidden entries are pruned
    /// at every level and symlinks are followed.
    pub fn build_family(&self, family: FamilyId) -> Result<ResourceSet> {
        let spec = family.spec();
        let classifier = Classifier::new(family)?;
        let mut set = ResourceSet::new(family)?;

        let base = self.root.join(spec.subdirectory);
        if !base.is_dir() {
            debug!(%family, path = %base.display(), "no archive directory");
            return Ok(set);
        }

        for entry in walk(&base, spec.depth) {
            let entry = entry.map_err(|e| scan_error(&base, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            if spec.is_shared_interpreter_tree() {
                match identify_interpreter(strip_archive_suffix(&filename)) {
                    Some(owner) if owner == family => {}
                    Some(_) => continue,
                    None => {
                        return Err(CatalogError::Classification {
                            filename,
                            family: spec.name.to_string(),
                            pattern: INTERPRETER_PREFIXES.to_string(),
                        })
                    }
                }
            }

            let directory = self.relative(entry.path().parent().unwrap_or(entry.path()));
            let checksum = Checksum::of_file(entry.path())?;
            let resource = Resource::classify(&classifier, directory, filename, checksum)?;
            debug!(
                %family,
                file = %resource.filename,
                release = %resource.release(),
                "classified archive"
            );
            set.push(resource);
        }

        set.select_current_version();
        match set.current() {
            Some(current) => info!(
                %family,
                archives = set.len(),
                current = %current.release(),
                "family scanned"
            ),
            None if set.is_empty() => debug!(%family, "family scanned, no archives"),
            None => warn!(%family, archives = set.len(), "no stable release to mark current"),
        }
        Ok(set)
    }

    /// Every directory under `packages/` must belong to a package family.
    fn check_package_directories(&self) -> Result<()> {
        let base = self.root.join(PACKAGES_DIR);
        if !base.is_dir() {
            return Ok(());
        }
        let owned: Vec<&str> = FamilyId::of_kind(FamilyKind::Package)
            .map(|family| family.spec().subdirectory)
            .collect();

        for entry in walk(&base, 1) {
            let entry = entry.map_err(|e| scan_error(&base, e))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let directory = self.relative(entry.path());
            if !owned.contains(&directory.as_str()) {
                return Err(CatalogError::Classification {
                    filename: directory,
                    family: "package".to_string(),
                    pattern: format!("one of {}", owned.join(", ")),
                });
            }
        }
        Ok(())
    }

    /// `/`-separated form of `path` relative to the root.
    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Entries exactly `depth` levels below `base`, in file-name order, with
/// hidden entries (`.git`, `.svn`, `.DS_Store`) pruned at every level.
fn walk(base: &Path, depth: usize) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    // Entries shallower than `min_depth` never reach the predicate, so each
    // yielded path is checked component by component.
    let prefix = base.to_path_buf();
    WalkDir::new(base)
        .min_depth(depth)
        .max_depth(depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            let hidden = is_hidden(&prefix, entry.path());
            if hidden {
                debug!(path = %entry.path().display(), "ignoring hidden entry");
            }
            !hidden
        })
}

/// Whether any component of `path` below `base` starts with `.`.
fn is_hidden(base: &Path, path: &Path) -> bool {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

fn scan_error(base: &Path, error: walkdir::Error) -> CatalogError {
    CatalogError::Scan {
        path: error.path().map_or_else(|| base.to_path_buf(), Path::to_path_buf),
        detail: error.to_string(),
    }
}
