// src/lib.rs

//! Gemlock
//!
//! Generates lockdown files that pin every gem reachable from a set of
//! roots to one exact, currently installed version.
//!
//! # Architecture
//!
//! - Database-first: installed specifications live in SQLite
//! - Index: a query interface over installed metadata, with SQLite and
//!   in-memory backends
//! - Resolver: breadth-first walk, highest satisfying version, first name wins
//! - Lockfile: buffered `gem 'name', '= version'` statements

pub mod db;
mod error;
pub mod index;
pub mod lockfile;
pub mod packages;
pub mod resolver;
pub mod version;

pub use error::{Error, Result};
pub use index::{InstalledIndex, MemoryIndex, PackageIndex};
pub use lockfile::Lockfile;
pub use packages::{Dependency, PackageIdentifier, PackageSpecification};
pub use resolver::{Diagnostic, LockResolver, Resolution};
pub use version::{GemVersion, VersionConstraint};
