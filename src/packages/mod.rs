// src/packages/mod.rs

//! Package identity and metadata
//!
//! This module provides the identifier (`NAME-VERSION`) and specification
//! types that the index serves and the resolver walks.

pub mod identifier;
pub mod specification;

pub use identifier::PackageIdentifier;
pub use specification::{
    Dependency, DependencyRecord, PackageSpecification, SpecificationRecord, parse_records,
};
