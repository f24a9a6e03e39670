//! RVM's `db` file: download locations and default versions.
//!
//! The layout is consumed by RVM's own parser and must not drift. One
//! `key=value` per line, in this order:
//!
//! 1. per interpreter family, in declared order:
//!    - `<name>_<major.minor>_url={{host}}/rubies/<directory>` per release
//!      series, newest first
//!    - `<name>_version=<current version>`
//!    - `<name>_<version>_patch_level=<patch>` per version with a current
//!      release, newest first (patched families only)
//! 2. `rubygems_url` and `rubygems_version`
//! 3. `<package>_url` for every supporting library
//!
//! URLs start with [`HOST_PLACEHOLDER`]; whoever serves the file
//! substitutes the real host (see [`with_host`]).

use rvm_fw_catalog::{Catalog, FamilyId, FamilyKind, ResourceSet};

use crate::error::{require_current, Result};

/// Token standing in for `scheme://host[:port]` in rendered URLs.
pub const HOST_PLACEHOLDER: &str = "{{host}}";

/// Families whose current release must exist for the db to render.
const REQUIRED: [FamilyId; 2] = [FamilyId::Ruby, FamilyId::Rubygems];

/// Render the `db` file.
pub fn render_db(catalog: &Catalog) -> Result<String> {
    for family in REQUIRED {
        require_current(catalog, family)?;
    }

    let mut out = String::new();
    for family in FamilyId::of_kind(FamilyKind::Interpreter) {
        write_interpreter(&mut out, catalog.get(family));
    }

    let rubygems = require_current(catalog, FamilyId::Rubygems)?;
    out.push_str(&format!(
        "rubygems_url={HOST_PLACEHOLDER}/rubies/{}\n",
        FamilyId::Rubygems.spec().subdirectory
    ));
    out.push_str(&format!("rubygems_version={}\n", rubygems.version));

    for family in FamilyId::of_kind(FamilyKind::Package) {
        out.push_str(&format!(
            "{}_url={HOST_PLACEHOLDER}/rubies/{}\n",
            family.name(),
            family.spec().subdirectory
        ));
    }
    Ok(out)
}

fn write_interpreter(out: &mut String, set: &ResourceSet) {
    let name = set.spec().name;
    let versions = set.distinct_versions();

    let mut series: Vec<&str> = Vec::new();
    for version in &versions {
        let prefix = release_series(version);
        if series.contains(&prefix) {
            continue;
        }
        series.push(prefix);
        if let Some(resource) = set.resources().iter().find(|r| r.version == *version) {
            out.push_str(&format!(
                "{name}_{prefix}_url={HOST_PLACEHOLDER}/rubies/{}\n",
                resource.directory
            ));
        }
    }

    if let Some(current) = set.current() {
        out.push_str(&format!("{name}_version={}\n", current.version));
    }

    if set.spec().has_patch {
        for version in &versions {
            let current = set
                .resources()
                .iter()
                .find(|r| r.version == *version && r.current_for_version);
            if let Some(patch) = current.and_then(|r| r.patch.as_deref()) {
                out.push_str(&format!("{name}_{version}_patch_level={patch}\n"));
            }
        }
    }
}

/// `major.minor` of a dotted version; versions with a single component are
/// their own series.
fn release_series(version: &str) -> &str {
    match version.match_indices('.').nth(1) {
        Some((index, _)) => &version[..index],
        None => version,
    }
}

/// Replace the host placeholder with `host` (trailing `/` dropped).
pub fn with_host(rendered: &str, host: &str) -> String {
    rendered.replace(HOST_PLACEHOLDER, host.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_exact_layout() {
        let db = render_db(&fixtures::mirror()).unwrap();
        let expected = "\
ruby_2.0_url={{host}}/rubies/ruby-lang/2.0
ruby_1.9_url={{host}}/rubies/ruby-lang/1.9
ruby_1.8_url={{host}}/rubies/ruby-lang/1.8
ruby_version=1.9.3
ruby_1.9.3_patch_level=p551
ruby_1.8.7_patch_level=p374
jruby_1.7_url={{host}}/rubies/ruby-lang/jruby
jruby_1.6_url={{host}}/rubies/ruby-lang/jruby
jruby_version=1.7.4
ree_1.8_url={{host}}/rubies/ruby-lang/ree
ree_version=1.8.7
ree_1.8.7_patch_level=2012.02
rubygems_url={{host}}/rubies/rubygems
rubygems_version=1.8.24
readline_url={{host}}/rubies/packages/readline
libyaml_url={{host}}/rubies/packages/libyaml
openssl_url={{host}}/rubies/packages/openssl
zlib_url={{host}}/rubies/packages/zlib
iconv_url={{host}}/rubies/packages/iconv
autoconf_url={{host}}/rubies/packages/autoconf
ncurses_url={{host}}/rubies/packages/ncurses
pkgconfig_url={{host}}/rubies/packages/pkgconfig
gettext_url={{host}}/rubies/packages/gettext
curl_url={{host}}/rubies/packages/curl
libxml2_url={{host}}/rubies/packages/libxml2
libxslt_url={{host}}/rubies/packages/libxslt
";
        assert_eq!(db, expected);
    }

    #[test]
    fn series_are_deduplicated() {
        let catalog = fixtures::catalog(&[
            (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.2-p320.tar.gz"),
            (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.3-p551.tar.gz"),
            (FamilyId::Rubygems, "rubygems", "rubygems-1.8.24.tgz"),
        ]);
        let db = render_db(&catalog).unwrap();
        assert_eq!(db.matches("ruby_1.9_url=").count(), 1);
        assert!(db.contains("ruby_1.9.2_patch_level=p320\n"));
    }

    #[test]
    fn empty_ruby_family_is_an_error() {
        let catalog =
            fixtures::catalog(&[(FamilyId::Rubygems, "rubygems", "rubygems-1.8.24.tgz")]);
        match render_db(&catalog).unwrap_err() {
            RenderError::MissingCurrentRelease { family } => assert_eq!(family, "ruby"),
        }
    }

    #[test]
    fn missing_rubygems_is_an_error() {
        let catalog = fixtures::catalog(&[(
            FamilyId::Ruby,
            "ruby-lang/1.9",
            "ruby-1.9.3-p551.tar.gz",
        )]);
        match render_db(&catalog).unwrap_err() {
            RenderError::MissingCurrentRelease { family } => assert_eq!(family, "rubygems"),
        }
    }

    #[test]
    fn release_series_takes_major_minor() {
        assert_eq!(release_series("1.9.3"), "1.9");
        assert_eq!(release_series("0.12"), "0.12");
        assert_eq!(release_series("10"), "10");
    }

    #[test]
    fn host_substitution() {
        let db = "ruby_1.9_url={{host}}/rubies/ruby-lang/1.9\n";
        assert_eq!(
            with_host(db, "http://mirror.local:4567/"),
            "ruby_1.9_url=http://mirror.local:4567/rubies/ruby-lang/1.9\n"
        );
    }
}
