//! Filename classification.
//!
//! Turns an archive filename into the version (and patch, for families
//! that carry one) its family's naming convention encodes. Interpreter
//! archives all live under `ruby-lang/`, so they are first routed to a
//! family by [`identify_interpreter`] before extraction.

use regex::Regex;

use crate::error::{CatalogError, Result};
use crate::family::{FamilyId, FamilySpec, Rule};

/// Archive suffixes stripped before matching, longest first.
pub const ARCHIVE_SUFFIXES: [&str; 5] = [".tar.gz", ".tar.bz2", ".tar.xz", ".tgz", ".zip"];

/// Version and patch extracted from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub version: String,
    pub patch: Option<String>,
}

/// Strip a recognised archive suffix, if any.
pub fn strip_archive_suffix(filename: &str) -> &str {
    ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| filename.strip_suffix(suffix))
        .unwrap_or(filename)
}

fn tokens(basename: &str) -> Vec<&str> {
    basename.split(|c: char| c == '-' || c == ' ').collect()
}

/// Decide which interpreter family a `ruby-lang/` archive belongs to.
///
/// `ruby-enterprise-*` is REE; otherwise the first token selects the
/// family. Returns `None` for names no interpreter claims.
pub fn identify_interpreter(basename: &str) -> Option<FamilyId> {
    let bits = tokens(basename);
    match (bits.first().copied(), bits.get(1).copied()) {
        (Some("ruby"), Some("enterprise")) => Some(FamilyId::Ree),
        (Some("ruby"), _) => Some(FamilyId::Ruby),
        (Some("jruby"), _) => Some(FamilyId::Jruby),
        (Some("MacRuby"), _) => Some(FamilyId::Macruby),
        (Some("rubinius"), _) => Some(FamilyId::Rbx),
        _ => None,
    }
}

/// Extracts versions for one family with its compiled rule.
#[derive(Debug, Clone)]
pub struct Classifier {
    spec: &'static FamilySpec,
    pattern: Regex,
}

impl Classifier {
    /// Compile the family's rule.
    pub fn new(family: FamilyId) -> Result<Self> {
        let spec = family.spec();
        let source = match spec.rule {
            Rule::Pattern(pattern) => pattern,
            Rule::Tokens { version_pattern, .. } => version_pattern,
        };
        let pattern = Regex::new(source).map_err(|source| CatalogError::InvalidPattern {
            family: spec.name.to_string(),
            source,
        })?;
        Ok(Classifier { spec, pattern })
    }

    pub fn family(&self) -> FamilyId {
        self.spec.id
    }

    /// Extract version and patch from `filename`.
    ///
    /// Fails when the name does not follow the family's convention, or the
    /// family carries patches and none was found.
    pub fn classify(&self, filename: &str) -> Result<Classified> {
        let basename = strip_archive_suffix(filename);
        let classified = match self.spec.rule {
            Rule::Pattern(_) => self.classify_pattern(basename),
            Rule::Tokens { version, patch, .. } => self.classify_tokens(basename, version, patch),
        };

        match classified {
            Some(c) if c.patch.is_some() == self.spec.has_patch => Ok(c),
            _ => Err(self.error(filename)),
        }
    }

    fn classify_pattern(&self, basename: &str) -> Option<Classified> {
        let caps = self.pattern.captures(basename)?;
        Some(Classified {
            version: caps.name("version")?.as_str().to_string(),
            patch: caps.name("patch").map(|m| m.as_str().to_string()),
        })
    }

    fn classify_tokens(
        &self,
        basename: &str,
        version: usize,
        patch: Option<usize>,
    ) -> Option<Classified> {
        if identify_interpreter(basename) != Some(self.spec.id) {
            return None;
        }
        let bits = tokens(basename);
        let version = bits.get(version).filter(|v| self.pattern.is_match(v))?;
        let patch = patch
            .and_then(|index| bits.get(index))
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string());
        Some(Classified {
            version: version.to_string(),
            patch,
        })
    }

    fn error(&self, filename: &str) -> CatalogError {
        CatalogError::Classification {
            filename: filename.to_string(),
            family: self.spec.name.to_string(),
            pattern: self.spec.rule.describe(),
        }
    }
}

/// Classify `filename` as a member of `family`.
pub fn classify(filename: &str, family: FamilyId) -> Result<Classified> {
    Classifier::new(family)?.classify(filename)
}
