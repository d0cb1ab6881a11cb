// src/index/installed.rs

//! `PackageIndex` backed by the installed-specification database

use crate::db::models::{SpecDependencyEntry, SpecificationEntry};
use crate::error::Result;
use crate::index::PackageIndex;
use crate::packages::{Dependency, PackageIdentifier, PackageSpecification};
use crate::version::{GemVersion, VersionConstraint};
use rusqlite::Connection;
use tracing::warn;

/// Index over the `specifications` and `spec_dependencies` tables
pub struct InstalledIndex<'a> {
    conn: &'a Connection,
}

impl<'a> InstalledIndex<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Installed versions of `name` whose version text parses
    ///
    /// Rows with unparseable versions are skipped with a warning; they can
    /// never satisfy a constraint or match an identifier.
    fn installed_versions(&self, name: &str) -> Result<Vec<(GemVersion, SpecificationEntry)>> {
        let entries = SpecificationEntry::find_by_name(self.conn, name)?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| match GemVersion::parse(&entry.version) {
                Ok(version) => Some((version, entry)),
                Err(e) => {
                    warn!("Skipping installed {}-{}: {}", entry.name, entry.version, e);
                    None
                }
            })
            .collect())
    }

    fn load(&self, version: GemVersion, entry: &SpecificationEntry) -> Result<PackageSpecification> {
        let dependencies = match entry.id {
            Some(id) => SpecDependencyEntry::find_by_spec(self.conn, id)?
                .into_iter()
                .map(|dep| Ok(Dependency::new(dep.name, VersionConstraint::parse(&dep.requirement)?)))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(PackageSpecification {
            name: entry.name.clone(),
            version,
            dependencies,
        })
    }
}

impl PackageIndex for InstalledIndex<'_> {
    fn lookup(&self, id: &PackageIdentifier) -> Result<Option<PackageSpecification>> {
        // Prefer the row whose version text matches; `1.0` and `1.0.0` compare
        // equal but may be installed as separate specifications
        let exact = SpecificationEntry::find_exact(self.conn, &id.name, id.version.as_str())?;
        if let Some(entry) = exact {
            return Ok(Some(self.load(id.version.clone(), &entry)?));
        }

        let found = self
            .installed_versions(&id.name)?
            .into_iter()
            .find(|(version, _)| *version == id.version);

        match found {
            Some((version, entry)) => Ok(Some(self.load(version, &entry)?)),
            None => Ok(None),
        }
    }

    fn search(
        &self,
        name: &str,
        constraint: &VersionConstraint,
    ) -> Result<Vec<PackageSpecification>> {
        let mut candidates = self
            .installed_versions(name)?
            .into_iter()
            .filter(|(version, _)| constraint.satisfied_by(version))
            .collect::<Vec<_>>();

        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        candidates
            .into_iter()
            .map(|(version, entry)| self.load(version, &entry))
            .collect()
    }
}
