//! All archives of one family, with ordering and current release selection.
//!
//! Versions and patches are compared as plain strings, not numerically:
//! `1.10.0` sorts before `1.9.3` and `p10` before `p9`. The generated RVM
//! configuration has always been produced this way and downstream
//! consumers depend on it.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use crate::classifier::Classifier;
use crate::error::{CatalogError, Result};
use crate::family::{FamilyId, FamilySpec, KnownLineStyle};
use crate::resource::Resource;

/// The resources of one family plus the family's configuration.
#[derive(Debug, Clone)]
pub struct ResourceSet {
    spec: &'static FamilySpec,
    stable_patch: Option<Regex>,
    resources: Vec<Resource>,
}

impl ResourceSet {
    /// Create an empty set for `family`.
    pub fn new(family: FamilyId) -> Result<Self> {
        let spec = family.spec();
        let stable_patch = spec
            .stable_patch
            .map(Regex::new)
            .transpose()
            .map_err(|source| CatalogError::InvalidPattern {
                family: spec.name.to_string(),
                source,
            })?;
        Ok(ResourceSet {
            spec,
            stable_patch,
            resources: Vec::new(),
        })
    }

    /// Rebuild a set from previously selected resources, keeping their flags.
    ///
    /// Every record must belong to `family`, still classify to the version
    /// and patch it carries, and the selection flags must be consistent.
    pub fn from_resources(family: FamilyId, resources: Vec<Resource>) -> Result<Self> {
        let mut set = ResourceSet::new(family)?;
        let classifier = Classifier::new(family)?;

        for resource in &resources {
            if resource.family != family {
                return Err(invalid(format!(
                    "'{}' is filed under {family} but belongs to {}",
                    resource.filename, resource.family
                )));
            }
            let classified = classifier.classify(&resource.filename)?;
            if classified.version != resource.version || classified.patch != resource.patch {
                return Err(invalid(format!(
                    "'{}' records release {} but its name says {}",
                    resource.filename,
                    resource.release(),
                    match &classified.patch {
                        Some(patch) => format!("{}-{patch}", classified.version),
                        None => classified.version.clone(),
                    }
                )));
            }
            if resource.current_for_all_versions && !resource.current_for_version {
                return Err(invalid(format!(
                    "'{}' is current for all versions but not for its own",
                    resource.filename
                )));
            }
        }

        let overall = resources.iter().filter(|r| r.current_for_all_versions).count();
        if overall > 1 {
            return Err(invalid(format!(
                "{family} has {overall} releases marked current for all versions"
            )));
        }

        let mut per_version: HashMap<&str, usize> = HashMap::new();
        for resource in resources.iter().filter(|r| r.current_for_version) {
            let count = per_version.entry(resource.version.as_str()).or_default();
            *count += 1;
            if *count > 1 {
                return Err(invalid(format!(
                    "{family} {} has more than one current release",
                    resource.version
                )));
            }
        }

        set.resources = resources;
        Ok(set)
    }

    pub fn family(&self) -> FamilyId {
        self.spec.id
    }

    pub fn spec(&self) -> &'static FamilySpec {
        self.spec
    }

    /// Resources in insertion order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Add a resource of this family. Selection flags are left untouched
    /// until the next [`select_current_version`](Self::select_current_version).
    pub fn push(&mut self, resource: Resource) {
        debug_assert_eq!(resource.family, self.spec.id);
        self.resources.push(resource);
    }

    /// Resources sorted ascending by version (or `version-patch`), compared
    /// as strings. Equal keys keep insertion order.
    pub fn sorted_versions(&self) -> Vec<&Resource> {
        let mut sorted: Vec<&Resource> = self.resources.iter().collect();
        sorted.sort_by_cached_key(|r| r.release());
        sorted
    }

    /// Distinct versions present, descending by string comparison.
    pub fn distinct_versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.resources.iter().map(|r| r.version.as_str()).collect();
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions.dedup();
        versions
    }

    /// Whether `resource` carries a patch the family considers stable.
    pub fn is_stable(&self, resource: &Resource) -> bool {
        match (&self.stable_patch, &resource.patch) {
            (Some(pattern), Some(patch)) => pattern.is_match(patch),
            _ => false,
        }
    }

    /// Mark the current release of each version and of the family as a whole.
    ///
    /// Previous flags are cleared first. Returns the overall current
    /// release, or `None` when the set is empty or, for patched families,
    /// no version has a stable patch.
    pub fn select_current_version(&mut self) -> Option<&Resource> {
        for resource in &mut self.resources {
            resource.current_for_version = false;
            resource.current_for_all_versions = false;
        }

        let overall = if self.spec.has_patch {
            self.select_stable_patches()
        } else {
            self.greatest_version()
        };

        let Some(index) = overall else {
            debug!(family = %self.spec.id, "no current release");
            return None;
        };
        let resource = &mut self.resources[index];
        resource.current_for_version = true;
        resource.current_for_all_versions = true;
        debug!(
            family = %self.spec.id,
            release = %resource.release(),
            "selected current release"
        );
        Some(&self.resources[index])
    }

    /// The overall current release, if one was selected.
    pub fn current(&self) -> Option<&Resource> {
        self.resources.iter().find(|r| r.current_for_all_versions)
    }

    /// Flag the greatest stable patch of every version; return the one
    /// belonging to the greatest version that has any.
    fn select_stable_patches(&mut self) -> Option<usize> {
        let versions: Vec<String> = self
            .distinct_versions()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut overall = None;
        for version in &versions {
            if let Some(index) = self.greatest_stable_patch(version) {
                self.resources[index].current_for_version = true;
                overall.get_or_insert(index);
            }
        }
        overall
    }

    fn greatest_stable_patch(&self, version: &str) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, resource) in self.resources.iter().enumerate() {
            if resource.version != version || !self.is_stable(resource) {
                continue;
            }
            match best {
                Some(b) if self.resources[b].patch >= resource.patch => {}
                _ => best = Some(index),
            }
        }
        best
    }

    fn greatest_version(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (index, resource) in self.resources.iter().enumerate() {
            match best {
                Some(b) if self.resources[b].version >= resource.version => {}
                _ => best = Some(index),
            }
        }
        best
    }

    /// The entry for `resource` in RVM's `known` list.
    ///
    /// Bracketed parts are defaults the user may omit: the version of the
    /// family's current release, and the patch of a version's current
    /// release. Interpreter-prefix families always bracket their name.
    pub fn generate_known_line(&self, resource: &Resource) -> String {
        let name = self.spec.name;
        let mut line = match self.spec.known_style {
            KnownLineStyle::Default if resource.current_for_all_versions => {
                format!("{name}[-{}]", resource.version)
            }
            KnownLineStyle::Default => format!("{name}-{}", resource.version),
            KnownLineStyle::InterpreterPrefix => format!("[{name}-]{}", resource.version),
        };

        if self.spec.has_patch {
            if let Some(patch) = &resource.patch {
                if resource.current_for_version {
                    line.push_str(&format!("[-{patch}]"));
                } else {
                    line.push_str(&format!("-{patch}"));
                }
            }
        }
        line
    }
}

fn invalid(detail: String) -> CatalogError {
    CatalogError::InvalidSnapshot { detail }
}
