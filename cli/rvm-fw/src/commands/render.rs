//! `rvm-fw render`: emit RVM's configuration files from a snapshot.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rvm_fw_catalog::{snapshot, Catalog};
use rvm_fw_render::{with_host, Artifact};

/// Render one artifact, or every artifact when `artifact` is `None`.
///
/// A single artifact goes to `output` or stdout. All artifacts need an
/// output directory and are written under their conventional file names.
pub fn run(
    snapshot_path: &Path,
    artifact: Option<Artifact>,
    host: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let catalog = snapshot::load(snapshot_path)
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;

    match artifact {
        Some(artifact) => {
            let text = render_one(&catalog, artifact, host)?;
            match output {
                Some(path) => write_file(path, &text)?,
                None => std::io::stdout()
                    .write_all(text.as_bytes())
                    .context("writing to stdout")?,
            }
        }
        None => {
            let Some(dir) = output else {
                bail!("rendering all artifacts needs --output <DIR>");
            };
            // Render everything before touching the directory.
            let mut rendered = Vec::with_capacity(Artifact::ALL.len());
            for artifact in Artifact::ALL {
                rendered.push((artifact, render_one(&catalog, artifact, host)?));
            }
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            for (artifact, text) in rendered {
                let path = dir.join(artifact.file_name());
                write_file(&path, &text)?;
                println!("  wrote {}", path.display());
            }
        }
    }
    Ok(())
}

/// Render `artifact`, resolving the db host placeholder when a host is known.
pub(crate) fn render_one(
    catalog: &Catalog,
    artifact: Artifact,
    host: Option<&str>,
) -> Result<String> {
    let text = artifact
        .render(catalog)
        .with_context(|| format!("rendering {}", artifact.file_name()))?;
    Ok(match (artifact, host) {
        (Artifact::Db, Some(host)) => with_host(&text, host),
        _ => text,
    })
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
