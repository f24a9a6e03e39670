//! Static registry of archive families.
//!
//! Every archive in the mirror belongs to exactly one family. A family
//! knows where its archives live below the archive root, how to pull a
//! version (and optionally a patch) out of a filename, which patches count
//! as stable, and how its entries are written in the `known` list.
//!
//! Families are iterated in the order they are declared in [`REGISTRY`];
//! renderers rely on that order for their output layout.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an archive family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyId {
    Ruby,
    Jruby,
    Rbx,
    Ree,
    Macruby,
    Rvm,
    Rubygems,
    Readline,
    Libyaml,
    Openssl,
    Zlib,
    Iconv,
    Autoconf,
    Ncurses,
    Pkgconfig,
    Gettext,
    Curl,
    Libxml2,
    Libxslt,
}

impl FamilyId {
    /// All families in declared order.
    pub const ALL: [FamilyId; 19] = [
        FamilyId::Ruby,
        FamilyId::Jruby,
        FamilyId::Rbx,
        FamilyId::Ree,
        FamilyId::Macruby,
        FamilyId::Rvm,
        FamilyId::Rubygems,
        FamilyId::Readline,
        FamilyId::Libyaml,
        FamilyId::Openssl,
        FamilyId::Zlib,
        FamilyId::Iconv,
        FamilyId::Autoconf,
        FamilyId::Ncurses,
        FamilyId::Pkgconfig,
        FamilyId::Gettext,
        FamilyId::Curl,
        FamilyId::Libxml2,
        FamilyId::Libxslt,
    ];

    /// The static configuration for this family.
    pub fn spec(self) -> &'static FamilySpec {
        &REGISTRY[self as usize]
    }

    /// Short name used in artifacts (`ruby`, `jruby`, `libyaml`, ...).
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Iterate the families of one kind, in declared order.
    pub fn of_kind(kind: FamilyKind) -> impl Iterator<Item = FamilyId> {
        FamilyId::ALL
            .into_iter()
            .filter(move |id| id.spec().kind == kind)
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Broad category of a family; decides which artifact sections list it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    /// A Ruby implementation under `ruby-lang/`.
    Interpreter,
    /// RVM release tarballs.
    Tool,
    /// RubyGems releases.
    RubyGems,
    /// A supporting library built by RVM.
    Package,
}

/// How version and patch are extracted from a bare filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Anchored regex over the bare filename with a `version` group and an
    /// optional `patch` group.
    Pattern(&'static str),
    /// Token offsets into the bare filename split on `-` and space. The
    /// version token must match `version_pattern`.
    Tokens {
        version: usize,
        patch: Option<usize>,
        version_pattern: &'static str,
    },
}

impl Rule {
    /// Human-readable form of the rule, used in classification errors.
    pub fn describe(&self) -> String {
        match self {
            Rule::Pattern(pattern) => pattern.to_string(),
            Rule::Tokens {
                version,
                patch: Some(patch),
                version_pattern,
            } => format!("token {version} matching {version_pattern}, patch at token {patch}"),
            Rule::Tokens {
                version,
                patch: None,
                version_pattern,
            } => format!("token {version} matching {version_pattern}"),
        }
    }
}

/// How a family writes its entries in the `known` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownLineStyle {
    /// `name[-version][-patch]`: version bracketed when it is the overall
    /// current release.
    Default,
    /// `[name-]version[-patch]`: the name is the implied default interpreter
    /// and always omissible; the version is never bracketed.
    InterpreterPrefix,
}

/// Static configuration of one family.
#[derive(Debug, Clone, Copy)]
pub struct FamilySpec {
    pub id: FamilyId,
    /// Short name used in artifact keys.
    pub name: &'static str,
    /// Human label used for headers.
    pub label: &'static str,
    /// Directory below the archive root holding this family's archives.
    pub subdirectory: &'static str,
    /// Path components below `subdirectory` at which archives sit.
    pub depth: usize,
    pub rule: Rule,
    pub has_patch: bool,
    /// Regex a patch must match to be considered a stable release.
    pub stable_patch: Option<&'static str>,
    pub known_style: KnownLineStyle,
    pub kind: FamilyKind,
}

impl FamilySpec {
    /// Whether archives of this family share `ruby-lang/` with the other
    /// interpreters and must be routed by token dispatch first.
    pub fn is_shared_interpreter_tree(&self) -> bool {
        matches!(self.rule, Rule::Tokens { .. })
    }
}

const VERSION: &str = r"^\d+(?:\.\d+)+$";

const fn interpreter(
    id: FamilyId,
    name: &'static str,
    label: &'static str,
    version: usize,
    patch: Option<usize>,
    stable_patch: Option<&'static str>,
    known_style: KnownLineStyle,
) -> FamilySpec {
    FamilySpec {
        id,
        name,
        label,
        subdirectory: "ruby-lang",
        depth: 2,
        rule: Rule::Tokens {
            version,
            patch,
            version_pattern: VERSION,
        },
        has_patch: patch.is_some(),
        stable_patch,
        known_style,
        kind: FamilyKind::Interpreter,
    }
}

const fn package(
    id: FamilyId,
    name: &'static str,
    subdirectory: &'static str,
    pattern: &'static str,
) -> FamilySpec {
    FamilySpec {
        id,
        name,
        label: name,
        subdirectory,
        depth: 1,
        rule: Rule::Pattern(pattern),
        has_patch: false,
        stable_patch: None,
        known_style: KnownLineStyle::Default,
        kind: FamilyKind::Package,
    }
}

/// All families, indexed by `FamilyId as usize`.
pub static REGISTRY: [FamilySpec; 19] = [
    interpreter(
        FamilyId::Ruby,
        "ruby",
        "MRI Rubies",
        1,
        Some(2),
        Some(r"^p\d+$"),
        KnownLineStyle::InterpreterPrefix,
    ),
    interpreter(
        FamilyId::Jruby,
        "jruby",
        "JRuby",
        2,
        None,
        None,
        KnownLineStyle::Default,
    ),
    interpreter(
        FamilyId::Rbx,
        "rbx",
        "Rubinius",
        1,
        Some(2),
        Some(r"^\d{8}$"),
        KnownLineStyle::Default,
    ),
    interpreter(
        FamilyId::Ree,
        "ree",
        "Ruby Enterprise Edition",
        2,
        Some(3),
        Some(r"^\d{4}\.\d{2}$"),
        KnownLineStyle::Default,
    ),
    interpreter(
        FamilyId::Macruby,
        "macruby",
        "MacRuby",
        1,
        None,
        None,
        KnownLineStyle::Default,
    ),
    FamilySpec {
        id: FamilyId::Rvm,
        name: "rvm",
        label: "RVM",
        subdirectory: "releases",
        depth: 1,
        rule: Rule::Pattern(r"^rvm-(?P<version>\d+\.\d+\.\d+)$"),
        has_patch: false,
        stable_patch: None,
        known_style: KnownLineStyle::Default,
        kind: FamilyKind::Tool,
    },
    FamilySpec {
        id: FamilyId::Rubygems,
        name: "rubygems",
        label: "RubyGems",
        subdirectory: "rubygems",
        depth: 1,
        rule: Rule::Pattern(r"^rubygems-(?P<version>\d+(?:\.\d+)+)$"),
        has_patch: false,
        stable_patch: None,
        known_style: KnownLineStyle::Default,
        kind: FamilyKind::RubyGems,
    },
    package(
        FamilyId::Readline,
        "readline",
        "packages/readline",
        r"^readline-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Libyaml,
        "libyaml",
        "packages/libyaml",
        r"^yaml-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Openssl,
        "openssl",
        "packages/openssl",
        r"^openssl-(?P<version>\d+(?:\.\d+)+[a-z]?)$",
    ),
    package(
        FamilyId::Zlib,
        "zlib",
        "packages/zlib",
        r"^zlib-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Iconv,
        "iconv",
        "packages/iconv",
        r"^libiconv-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Autoconf,
        "autoconf",
        "packages/autoconf",
        r"^autoconf-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Ncurses,
        "ncurses",
        "packages/ncurses",
        r"^ncurses-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Pkgconfig,
        "pkgconfig",
        "packages/pkgconfig",
        r"^pkg-config-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Gettext,
        "gettext",
        "packages/gettext",
        r"^gettext-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Curl,
        "curl",
        "packages/curl",
        r"^curl-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Libxml2,
        "libxml2",
        "packages/libxml2",
        r"^libxml2-(?P<version>\d+(?:\.\d+)+)$",
    ),
    package(
        FamilyId::Libxslt,
        "libxslt",
        "packages/libxslt",
        r"^libxslt-(?P<version>\d+(?:\.\d+)+)$",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_indexed_by_id() {
        for (index, spec) in REGISTRY.iter().enumerate() {
            assert_eq!(spec.id as usize, index, "{} is out of place", spec.name);
        }
        assert_eq!(FamilyId::ALL.len(), REGISTRY.len());
        for id in FamilyId::ALL {
            assert_eq!(id.spec().id, id);
        }
    }

    #[test]
    fn patch_rules_agree_with_has_patch() {
        for spec in &REGISTRY {
            match spec.rule {
                Rule::Tokens { patch, .. } => assert_eq!(patch.is_some(), spec.has_patch),
                Rule::Pattern(pattern) => {
                    assert_eq!(pattern.contains("(?P<patch>"), spec.has_patch)
                }
            }
            assert_eq!(spec.stable_patch.is_some(), spec.has_patch, "{}", spec.name);
        }
    }

    #[test]
    fn patterns_compile() {
        for spec in &REGISTRY {
            let pattern = match spec.rule {
                Rule::Pattern(p) => p,
                Rule::Tokens { version_pattern, .. } => version_pattern,
            };
            regex::Regex::new(pattern).unwrap();
            if let Some(stable) = spec.stable_patch {
                regex::Regex::new(stable).unwrap();
            }
        }
    }

    #[test]
    fn serde_names_match_registry_names() {
        for id in FamilyId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.name()));
        }
    }

    #[test]
    fn kinds_partition_families() {
        let interpreters: Vec<_> = FamilyId::of_kind(FamilyKind::Interpreter).collect();
        assert_eq!(
            interpreters,
            vec![
                FamilyId::Ruby,
                FamilyId::Jruby,
                FamilyId::Rbx,
                FamilyId::Ree,
                FamilyId::Macruby
            ]
        );
        assert_eq!(FamilyId::of_kind(FamilyKind::Package).count(), 12);
        assert!(FamilyId::Ruby.spec().is_shared_interpreter_tree());
        assert!(!FamilyId::Zlib.spec().is_shared_interpreter_tree());
    }
}
