// src/index/mod.rs

//! Queryable index of installed package specifications
//!
//! The resolver only needs two questions answered: "what is the
//! specification for this exact identifier" and "which installed versions
//! of this name satisfy a constraint". Any storage backend can answer them
//! by implementing `PackageIndex`.

pub mod installed;

pub use installed::InstalledIndex;

use crate::error::Result;
use crate::packages::{PackageIdentifier, PackageSpecification};
use crate::version::VersionConstraint;
use std::collections::BTreeMap;

/// Read-only query interface over installed specifications
pub trait PackageIndex {
    /// Resolve an exact identifier to its specification
    ///
    /// Returns `Ok(None)` when nothing is installed under that identifier.
    /// Errors are reserved for backend failures.
    fn lookup(&self, id: &PackageIdentifier) -> Result<Option<PackageSpecification>>;

    /// Installed specifications named `name` that satisfy `constraint`,
    /// sorted ascending by version (possibly empty)
    fn search(
        &self,
        name: &str,
        constraint: &VersionConstraint,
    ) -> Result<Vec<PackageSpecification>>;
}

/// In-memory index, kept sorted ascending by version per name
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    specs: BTreeMap<String, Vec<PackageSpecification>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a specification, replacing any entry with an equal version
    pub fn insert(&mut self, spec: PackageSpecification) {
        let versions = self.specs.entry(spec.name.clone()).or_default();
        match versions.binary_search_by(|s| s.version.cmp(&spec.version)) {
            Ok(pos) => versions[pos] = spec,
            Err(pos) => versions.insert(pos, spec),
        }
    }

    /// Number of installed specifications across all names
    pub fn len(&self) -> usize {
        self.specs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl FromIterator<PackageSpecification> for MemoryIndex {
    fn from_iter<I: IntoIterator<Item = PackageSpecification>>(iter: I) -> Self {
        let mut index = Self::new();
        for spec in iter {
            index.insert(spec);
        }
        index
    }
}

impl PackageIndex for MemoryIndex {
    fn lookup(&self, id: &PackageIdentifier) -> Result<Option<PackageSpecification>> {
        Ok(self
            .specs
            .get(&id.name)
            .and_then(|versions| versions.iter().find(|s| s.version == id.version))
            .cloned())
    }

    fn search(
        &self,
        name: &str,
        constraint: &VersionConstraint,
    ) -> Result<Vec<PackageSpecification>> {
        Ok(self
            .specs
            .get(name)
            .map(|versions| {
                versions
                    .iter()
                    .filter(|s| constraint.satisfied_by(&s.version))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::GemVersion;

    fn spec(name: &str, version: &str) -> PackageSpecification {
        PackageSpecification::new(name, GemVersion::parse(version).unwrap())
    }

    fn versions(specs: &[PackageSpecification]) -> Vec<String> {
        specs.iter().map(|s| s.version.to_string()).collect()
    }

    #[test]
    fn test_memory_index_search_sorted_ascending() {
        let index: MemoryIndex = vec![
            spec("rake", "0.7.0.1"),
            spec("rake", "0.5"),
            spec("rake", "0.6.2"),
        ]
        .into_iter()
        .collect();

        let all = index.search("rake", &VersionConstraint::any()).unwrap();
        assert_eq!(versions(&all), vec!["0.5", "0.6.2", "0.7.0.1"]);

        let newer = index
            .search("rake", &VersionConstraint::parse(">= 0.6.2").unwrap())
            .unwrap();
        assert_eq!(versions(&newer), vec!["0.6.2", "0.7.0.1"]);
    }

    #[test]
    fn test_memory_index_search_unknown_name() {
        let index = MemoryIndex::new();
        assert!(index.search("missing", &VersionConstraint::any()).unwrap().is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_memory_index_lookup() {
        let mut index = MemoryIndex::new();
        index.insert(spec("rails", "1.0.0"));

        let id = PackageIdentifier::parse_full_name("rails-1.0.0").unwrap();
        assert_eq!(index.lookup(&id).unwrap().unwrap().name, "rails");

        // Trailing zeros compare equal
        let short = PackageIdentifier::parse_full_name("rails-1.0").unwrap();
        assert!(index.lookup(&short).unwrap().is_some());

        let other = PackageIdentifier::parse_full_name("rails-1.1").unwrap();
        assert!(index.lookup(&other).unwrap().is_none());
    }

    #[test]
    fn test_memory_index_insert_replaces_same_version() {
        let mut index = MemoryIndex::new();
        index.insert(spec("rails", "1.0.0"));
        index.insert(spec("rails", "1.0.0").with_dependency(crate::packages::Dependency::new(
            "rake",
            VersionConstraint::any(),
        )));

        assert_eq!(index.len(), 1);
        let id = PackageIdentifier::parse_full_name("rails-1.0.0").unwrap();
        assert_eq!(index.lookup(&id).unwrap().unwrap().dependencies.len(), 1);
    }
}
