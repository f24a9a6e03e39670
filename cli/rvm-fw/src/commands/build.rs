//! `rvm-fw build`: scan the archive tree and persist a snapshot.

use std::path::Path;

use anyhow::{Context, Result};
use rvm_fw_catalog::{snapshot, Catalog, CatalogBuilder};

/// Build the catalog from `root` and save it to `snapshot_path`.
///
/// Nothing is written when the build fails.
pub fn run(root: &Path, snapshot_path: &Path) -> Result<Catalog> {
    let catalog = CatalogBuilder::new(root)
        .build()
        .with_context(|| format!("building catalog from {}", root.display()))?;

    snapshot::save(&catalog, snapshot_path)
        .with_context(|| format!("saving snapshot to {}", snapshot_path.display()))?;

    print!("{}", summary(&catalog));
    println!("Snapshot written to {}", snapshot_path.display());
    Ok(catalog)
}

/// One line per non-empty family: name, archive count, current release.
pub(crate) fn summary(catalog: &Catalog) -> String {
    let mut out = String::new();
    for set in catalog.iter().filter(|set| !set.is_empty()) {
        let current = set
            .current()
            .map(|r| r.release())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<10} {:>3} archives  current {current}\n",
            set.spec().name,
            set.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, relative.as_bytes()).unwrap();
    }

    #[test]
    fn build_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public/rubies");
        touch(&root, "ruby-lang/1.9/ruby-1.9.3-p551.tar.gz");
        touch(&root, "ruby-lang/2.0/ruby-2.0.0-rc1.tar.gz");
        let snapshot_path = dir.path().join("config/rubies.json");

        let catalog = run(&root, &snapshot_path).unwrap();
        assert!(snapshot_path.is_file());
        assert_eq!(catalog.len(), 2);

        let text = summary(&catalog);
        assert_eq!(text, "  ruby         2 archives  current 1.9.3-p551\n");
    }

    #[test]
    fn failed_build_leaves_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("public/rubies");
        touch(&root, "packages/zlib/zlib-1.2.7.tar.gz");
        let snapshot_path = dir.path().join("rubies.json");
        run(&root, &snapshot_path).unwrap();
        let before = std::fs::read_to_string(&snapshot_path).unwrap();

        touch(&root, "packages/zlib/zlib-final.tar.gz");
        let err = run(&root, &snapshot_path).unwrap_err();
        assert!(format!("{err:#}").contains("zlib-final.tar.gz"));
        assert_eq!(std::fs::read_to_string(&snapshot_path).unwrap(), before);
    }
}
