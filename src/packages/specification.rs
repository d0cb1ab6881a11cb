// src/packages/specification.rs

//! Installed package specifications and their declared dependencies

use crate::error::{Error, Result};
use crate::packages::PackageIdentifier;
use crate::version::{GemVersion, VersionConstraint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared runtime dependency: a package name and the versions it accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub constraint: VersionConstraint,
}

impl Dependency {
    pub fn new(name: impl Into<String>, constraint: VersionConstraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }
}

impl fmt::Display for Dependency {
    /// Renders the descriptor used in diagnostics, e.g. `rake (>= 0.6.2)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.constraint)
    }
}

/// Metadata for one installed package version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpecification {
    pub name: String,
    pub version: GemVersion,
    /// Dependencies in declared order
    pub dependencies: Vec<Dependency>,
}

impl PackageSpecification {
    pub fn new(name: impl Into<String>, version: GemVersion) -> Self {
        Self {
            name: name.into(),
            version,
            dependencies: Vec::new(),
        }
    }

    /// Builder-style helper to append a dependency
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn identifier(&self) -> PackageIdentifier {
        PackageIdentifier::new(self.name.clone(), self.version.clone())
    }

    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// Serialized form of a specification, as found in import files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecificationRecord {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

/// Serialized form of a dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub name: String,
    /// Requirement list such as ">= 1.0, < 2.0" (empty means any version)
    #[serde(default)]
    pub requirement: String,
}

impl SpecificationRecord {
    /// Validate and convert into a specification
    pub fn into_specification(self) -> Result<PackageSpecification> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidIdentifier(format!("{}-{}", self.name, self.version)));
        }
        let version = GemVersion::parse(&self.version)?;
        let dependencies = self
            .dependencies
            .into_iter()
            .map(|dep| Ok(Dependency::new(dep.name, VersionConstraint::parse(&dep.requirement)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(PackageSpecification {
            name: self.name,
            version,
            dependencies,
        })
    }
}

/// Parse a JSON array of specification records and validate each one
pub fn parse_records(json: &str) -> Result<Vec<PackageSpecification>> {
    let records: Vec<SpecificationRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(SpecificationRecord::into_specification)
        .collect()
}

impl From<&PackageSpecification> for SpecificationRecord {
    fn from(spec: &PackageSpecification) -> Self {
        Self {
            name: spec.name.clone(),
            version: spec.version.to_string(),
            dependencies: spec
                .dependencies
                .iter()
                .map(|dep| DependencyRecord {
                    name: dep.name.clone(),
                    requirement: dep.constraint.to_string(),
                })
                .collect(),
        }
    }
}
