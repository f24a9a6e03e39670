//! RVM's `md5` file: `<filename>=<md5>` for every archive.

use rvm_fw_catalog::Catalog;

/// Render the checksum map, one line per archive in catalog order.
pub fn render_checksums(catalog: &Catalog) -> String {
    let mut out = String::new();
    for resource in catalog.resources() {
        out.push_str(&format!("{}={}\n", resource.filename, resource.checksum));
    }
    out
}
