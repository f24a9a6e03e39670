//! RVM's `known` list of installable interpreters.
//!
//! ```text
//! # MRI Rubies
//! [ruby-]1.8.7[-p374]
//! [ruby-]1.9.3[-p551]
//!
//! # JRuby
//! jruby-1.6.7
//! jruby[-1.7.4]
//! ```
//!
//! Entries follow `sorted_versions()`, except that a release shipped in
//! more than one archive format (`.tar.gz` and `.tar.bz2`) is intentionally
//! listed once.

use rvm_fw_catalog::{Catalog, FamilyId, FamilyKind, Resource, ResourceSet};

use crate::error::{require_current, Result};

/// Render the `known` list. Requires a current `ruby`.
pub fn render_known(catalog: &Catalog) -> Result<String> {
    require_current(catalog, FamilyId::Ruby)?;

    let mut groups = Vec::new();
    for family in FamilyId::of_kind(FamilyKind::Interpreter) {
        let set = catalog.get(family);
        if set.is_empty() {
            continue;
        }
        let mut group = format!("# {}\n", set.spec().label);
        for resource in known_entries(set) {
            group.push_str(&set.generate_known_line(resource));
            group.push('\n');
        }
        groups.push(group);
    }
    Ok(groups.join("\n"))
}

/// Sorted resources with one entry per release.
///
/// The same release packed twice (`.tar.gz` and `.tar.bz2`) lists once,
/// preferring the copy that carries the selection flags.
fn known_entries(set: &ResourceSet) -> Vec<&Resource> {
    let mut entries: Vec<&Resource> = Vec::new();
    for resource in set.sorted_versions() {
        match entries.last_mut() {
            Some(last) if last.release() == resource.release() => {
                if resource.current_for_version && !last.current_for_version {
                    *last = resource;
                }
            }
            _ => entries.push(resource),
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_groups_in_family_order() {
        let known = render_known(&fixtures::mirror()).unwrap();
        assert_eq!(
            known,
            "# MRI Rubies\n\
             [ruby-]1.8.7-p358\n\
             [ruby-]1.8.7[-p374]\n\
             [ruby-]1.9.3-p484\n\
             [ruby-]1.9.3[-p551]\n\
             [ruby-]2.0.0-rc2\n\
             \n\
             # JRuby\n\
             jruby-1.6.7\n\
             jruby[-1.7.4]\n\
             \n\
             # Ruby Enterprise Edition\n\
             ree[-1.8.7][-2012.02]\n"
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let catalog = fixtures::mirror();
        let first = render_known(&catalog).unwrap();
        let second = render_known(&catalog).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn requires_current_ruby() {
        let catalog = fixtures::catalog(&[(
            FamilyId::Ruby,
            "ruby-lang/2.0",
            "ruby-2.0.0-preview1.tar.gz",
        )]);
        match render_known(&catalog).unwrap_err() {
            RenderError::MissingCurrentRelease { family } => assert_eq!(family, "ruby"),
        }
    }

    #[test]
    fn duplicate_release_lists_flagged_copy_once() {
        let catalog = fixtures::catalog(&[
            (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.3-p551.tar.bz2"),
            (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.3-p551.tar.gz"),
        ]);
        let known = render_known(&catalog).unwrap();
        assert_eq!(known, "# MRI Rubies\n[ruby-]1.9.3[-p551]\n");
    }
}
