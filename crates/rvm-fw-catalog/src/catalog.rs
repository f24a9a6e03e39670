//! The complete family → resource set mapping.

use crate::error::Result;
use crate::family::FamilyId;
use crate::resource::Resource;
use crate::resource_set::ResourceSet;

/// Every family's resource set, in declared family order.
///
/// A catalog always holds a set for every family; families with no
/// archives have an empty set.
#[derive(Debug, Clone)]
pub struct Catalog {
    sets: Vec<ResourceSet>,
}

impl Catalog {
    /// A catalog with an empty set for every family.
    pub fn empty() -> Result<Self> {
        let sets = FamilyId::ALL
            .into_iter()
            .map(ResourceSet::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Catalog { sets })
    }

    /// Assemble a catalog from sets; families not given get an empty set.
    /// A later set for the same family replaces an earlier one.
    pub fn from_sets(sets: impl IntoIterator<Item = ResourceSet>) -> Result<Self> {
        let mut catalog = Catalog::empty()?;
        for set in sets {
            let index = set.family() as usize;
            catalog.sets[index] = set;
        }
        Ok(catalog)
    }

    /// The set for `family`.
    pub fn get(&self, family: FamilyId) -> &ResourceSet {
        &self.sets[family as usize]
    }

    /// All sets in declared family order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceSet> {
        self.sets.iter()
    }

    /// Every resource, family by family, in each set's stored order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.sets.iter().flat_map(|set| set.resources())
    }

    /// Total number of resources.
    pub fn len(&self) -> usize {
        self.sets.iter().map(ResourceSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
