//! `rvm-fw.toml` parsing and mirror configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the configuration file searched for from the working directory up.
pub const CONFIG_FILE: &str = "rvm-fw.toml";

/// The top-level configuration of a mirror.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FwConfig {
    /// Archive tree location.
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Catalog snapshot location.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Serving defaults.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[archive]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive root, relative to the config file's directory.
    #[serde(default = "default_archive_root")]
    pub root: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            root: default_archive_root(),
        }
    }
}

fn default_archive_root() -> String {
    "public/rubies".to_string()
}

/// `[snapshot]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot file, relative to the config file's directory.
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "config/rubies.json".to_string()
}

/// `[server]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host substituted into the db file, e.g. `http://mirror.local:4567`.
    #[serde(default)]
    pub host: Option<String>,
}

impl FwConfig {
    /// Search upward from `start_dir` for `rvm-fw.toml`, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = FwConfig::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Configuration together with the directory its relative paths hang off.
#[derive(Debug, Clone)]
pub struct Mirror {
    pub config: FwConfig,
    pub base_dir: PathBuf,
}

impl Mirror {
    /// Load the nearest configuration above `cwd`, or defaults rooted at `cwd`.
    pub fn discover(cwd: &Path) -> Result<Self> {
        Ok(match FwConfig::find_and_load(cwd)? {
            Some((config, base_dir)) => {
                tracing::debug!(dir = %base_dir.display(), "using {CONFIG_FILE}");
                Mirror { config, base_dir }
            }
            None => Mirror {
                config: FwConfig::default(),
                base_dir: cwd.to_path_buf(),
            },
        })
    }

    pub fn archive_root(&self) -> PathBuf {
        self.base_dir.join(&self.config.archive.root)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.snapshot.path)
    }

    pub fn host(&self) -> Option<&str> {
        self.config.server.host.as_deref()
    }

    /// The template written by `rvm-fw init`.
    pub fn template() -> &'static str {
        r#"[archive]
root = "public/rubies"

[snapshot]
path = "config/rubies.json"

[server]
# host = "http://localhost:4567"
"#
    }
}
