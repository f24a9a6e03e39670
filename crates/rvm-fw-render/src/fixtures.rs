//! Catalog fixtures shared by the renderer tests.

use rvm_fw_catalog::{Catalog, Checksum, Classifier, FamilyId, Resource, ResourceSet};

/// Build a catalog from `(family, directory, filename)` triples, selecting
/// current releases per family. Checksums are the MD5 of the filename.
pub(crate) fn catalog(archives: &[(FamilyId, &str, &str)]) -> Catalog {
    let mut sets = Vec::new();
    for family in FamilyId::ALL {
        let classifier = Classifier::new(family).unwrap();
        let mut set = ResourceSet::new(family).unwrap();
        for (_, directory, filename) in archives.iter().filter(|(f, _, _)| *f == family) {
            set.push(
                Resource::classify(
                    &classifier,
                    *directory,
                    *filename,
                    Checksum::compute(filename.as_bytes()),
                )
                .unwrap(),
            );
        }
        set.select_current_version();
        sets.push(set);
    }
    Catalog::from_sets(sets).unwrap()
}

/// A small but complete mirror.
pub(crate) fn mirror() -> Catalog {
    catalog(&[
        (FamilyId::Ruby, "ruby-lang/1.8", "ruby-1.8.7-p358.tar.gz"),
        (FamilyId::Ruby, "ruby-lang/1.8", "ruby-1.8.7-p374.tar.gz"),
        (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.3-p484.tar.gz"),
        (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.3-p551.tar.gz"),
        (FamilyId::Ruby, "ruby-lang/1.9", "ruby-1.9.3-p551.tar.bz2"),
        (FamilyId::Ruby, "ruby-lang/2.0", "ruby-2.0.0-rc2.tar.gz"),
        (FamilyId::Jruby, "ruby-lang/jruby", "jruby-bin-1.6.7.tar.gz"),
        (FamilyId::Jruby, "ruby-lang/jruby", "jruby-bin-1.7.4.tar.gz"),
        (
            FamilyId::Ree,
            "ruby-lang/ree",
            "ruby-enterprise-1.8.7-2012.02.tar.gz",
        ),
        (FamilyId::Rvm, "releases", "rvm-1.13.0.tar.gz"),
        (FamilyId::Rubygems, "rubygems", "rubygems-1.8.24.tgz"),
        (FamilyId::Readline, "packages/readline", "readline-6.2.tar.gz"),
        (FamilyId::Libyaml, "packages/libyaml", "yaml-0.1.4.tar.gz"),
    ])
}
