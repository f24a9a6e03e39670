//! `rvm-fw list`: show the catalogued archives.

use std::path::Path;

use anyhow::{Context, Result};
use rvm_fw_catalog::snapshot;
use rvm_fw_render::render_listing;

pub fn run(snapshot_path: &Path) -> Result<()> {
    let catalog = snapshot::load(snapshot_path)
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;
    print!("{}", render_listing(&catalog));
    Ok(())
}
