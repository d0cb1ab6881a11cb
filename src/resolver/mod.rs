// src/resolver/mod.rs

//! Lock resolution over installed specifications
//!
//! Starting from one or more root identifiers, the resolver walks the
//! dependency graph breadth-first and pins exactly one version per package
//! name. The first version reached for a name wins; later paths to the same
//! name are never re-emitted. For each dependency the highest installed
//! version satisfying its constraint is selected.
//!
//! Dependencies with no installed candidate either abort the run (strict)
//! or are recorded as diagnostics and skipped (lenient).

use crate::error::{Error, Result};
use crate::index::PackageIndex;
use crate::packages::{Dependency, PackageIdentifier};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};

/// A dependency that no installed version satisfies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The package whose specification declared the dependency
    pub requiring: PackageIdentifier,
    pub dependency: Dependency,
}

impl Diagnostic {
    /// Human-readable message, e.g.
    /// `Unable to satisfy 'rake (>= 0.6.2)' from currently installed gems.`
    pub fn message(&self) -> String {
        format!(
            "Unable to satisfy '{}' from currently installed gems.",
            self.dependency
        )
    }
}

/// One step of the resolution log, indexing into `locked` or `diagnostics`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    Locked(usize),
    Unsatisfied(usize),
}

/// Result of a resolution run
///
/// Keeps locked packages and diagnostics in discovery order, plus the
/// interleaving of the two so a lockfile can place each diagnostic where it
/// was found.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    locked: Vec<PackageIdentifier>,
    diagnostics: Vec<Diagnostic>,
    events: Vec<LockEvent>,
}

impl Resolution {
    /// Pinned packages in breadth-first emission order
    pub fn locked(&self) -> &[PackageIdentifier] {
        &self.locked
    }

    /// Unsatisfied dependencies in discovery order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn events(&self) -> &[LockEvent] {
        &self.events
    }

    /// True when every dependency encountered was satisfied
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn push_locked(&mut self, id: PackageIdentifier) {
        self.events.push(LockEvent::Locked(self.locked.len()));
        self.locked.push(id);
    }

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.events.push(LockEvent::Unsatisfied(self.diagnostics.len()));
        self.diagnostics.push(diagnostic);
    }
}

/// Breadth-first lock resolver
///
/// Holds only a reference to the index; all traversal state lives inside
/// `resolve`, so one resolver can serve any number of runs.
pub struct LockResolver<'a, I: PackageIndex> {
    index: &'a I,
}

impl<'a, I: PackageIndex> LockResolver<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Resolve `roots` into a flat list of exact versions
    ///
    /// # Errors
    ///
    /// * `Error::SpecificationNotFound` - a root or selected candidate has no
    ///   installed specification (always fatal)
    /// * `Error::UnsatisfiableDependency` - in strict mode, the first
    ///   dependency in traversal order with no installed candidate
    /// * Backend errors from the index
    pub fn resolve(&self, roots: &[PackageIdentifier], strict: bool) -> Result<Resolution> {
        let mut pending: VecDeque<PackageIdentifier> = roots.iter().cloned().collect();
        let mut locked_names: HashSet<String> = HashSet::new();
        let mut resolution = Resolution::default();

        debug!("Resolving {} root(s), strict = {}", pending.len(), strict);

        while let Some(id) = pending.pop_front() {
            let spec = self
                .index
                .lookup(&id)?
                .ok_or_else(|| Error::SpecificationNotFound(id.clone()))?;

            if locked_names.insert(id.name.clone()) {
                debug!("Locking {}", spec.full_name());
                resolution.push_locked(spec.identifier());
            } else {
                debug!("{} already locked, not emitting {}", id.name, id);
            }

            for dep in &spec.dependencies {
                if locked_names.contains(&dep.name) {
                    continue;
                }

                let candidates = self.index.search(&dep.name, &dep.constraint)?;

                // Candidates arrive ascending, so the last is the newest
                match candidates.last() {
                    Some(best) => {
                        debug!("{} requires {}, selected {}", id, dep, best.full_name());
                        pending.push_back(best.identifier());
                    }
                    None => {
                        let diagnostic = Diagnostic {
                            requiring: id.clone(),
                            dependency: dep.clone(),
                        };
                        if strict {
                            return Err(Error::UnsatisfiableDependency(Box::new(diagnostic)));
                        }
                        warn!("{} (required by {})", diagnostic.message(), id);
                        resolution.push_diagnostic(diagnostic);
                    }
                }
            }
        }

        info!(
            "Resolved {} package(s) with {} unsatisfied dependency(ies)",
            resolution.locked.len(),
            resolution.diagnostics.len()
        );
        Ok(resolution)
    }
}
