//! The published RVM version (`stable-version.txt`).

use rvm_fw_catalog::{Catalog, FamilyId};

use crate::error::{require_current, Result};

/// The current RVM release's version on a single line.
pub fn render_version(catalog: &Catalog) -> Result<String> {
    let rvm = require_current(catalog, FamilyId::Rvm)?;
    Ok(format!("{}\n", rvm.version))
}
