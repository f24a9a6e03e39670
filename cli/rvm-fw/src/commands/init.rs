//! `rvm-fw init`: mirror scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rvm_fw_catalog::FamilyId;

use crate::config::{Mirror, CONFIG_FILE};

/// Create `rvm-fw.toml` and an empty archive tree in `dir`.
pub fn run(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    fs::write(&config_path, Mirror::template())
        .with_context(|| format!("writing {}", config_path.display()))?;

    let mirror = Mirror::discover(dir)?;
    let root = mirror.archive_root();
    let mut created = Vec::new();
    for family in FamilyId::ALL {
        let top = family
            .spec()
            .subdirectory
            .split('/')
            .next()
            .unwrap_or_default();
        if created.contains(&top) {
            continue;
        }
        fs::create_dir_all(root.join(top))
            .with_context(|| format!("creating {}", root.join(top).display()))?;
        created.push(top);
    }

    let snapshot_dir = mirror.snapshot_path();
    if let Some(parent) = snapshot_dir.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    println!("Created mirror in {}", dir.display());
    println!("  {CONFIG_FILE}");
    for top in &created {
        println!("  {}/{top}/", mirror.config.archive.root);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_config_and_tree() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();

        assert!(dir.path().join(CONFIG_FILE).is_file());
        for top in ["ruby-lang", "releases", "rubygems", "packages"] {
            assert!(dir.path().join("public/rubies").join(top).is_dir(), "{top}");
        }
        assert!(dir.path().join("config").is_dir());
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();
        assert!(run(dir.path()).is_err());
    }
}
