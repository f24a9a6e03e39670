//! Human-readable listing of a catalog.
//!
//! ```text
//! MRI Rubies (ruby)
//!   + ruby-lang/1.8/ruby-1.8.7-p374.tar.gz  1.8.7-p374  3a1c...
//!   * ruby-lang/1.9/ruby-1.9.3-p551.tar.gz  1.9.3-p551  8f0e...
//!
//! 2 archives in 1 families (* current, + current for its version)
//! ```

use rvm_fw_catalog::Catalog;

/// Render every non-empty family as an aligned table.
pub fn render_listing(catalog: &Catalog) -> String {
    let mut out = String::new();
    let mut families = 0;

    for set in catalog.iter().filter(|set| !set.is_empty()) {
        families += 1;
        let spec = set.spec();
        out.push_str(&format!("{} ({})\n", spec.label, spec.name));

        let rows: Vec<(char, String, String, &str)> = set
            .sorted_versions()
            .into_iter()
            .map(|r| {
                let marker = if r.current_for_all_versions {
                    '*'
                } else if r.current_for_version {
                    '+'
                } else {
                    ' '
                };
                (marker, r.path(), r.release(), r.checksum.as_str())
            })
            .collect();

        let path_width = rows.iter().map(|(_, p, _, _)| p.len()).max().unwrap_or(0);
        let release_width = rows.iter().map(|(_, _, r, _)| r.len()).max().unwrap_or(0);
        for (marker, path, release, checksum) in &rows {
            out.push_str(&format!(
                "  {marker} {path:<path_width$}  {release:<release_width$}  {checksum}\n"
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} archives in {families} families (* current, + current for its version)\n",
        catalog.len()
    ));
    out
}
