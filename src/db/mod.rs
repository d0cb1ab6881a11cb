// src/db/mod.rs

//! Database layer for installed specifications
//!
//! This module handles all SQLite operations including:
//! - Database initialization and schema creation
//! - Connection management
//! - Transaction handling
//! - Registering specifications with their dependencies

pub mod models;
pub mod schema;

use crate::error::{Error, Result};
use crate::packages::PackageSpecification;
use models::{SpecDependencyEntry, SpecificationEntry};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::{debug, info};

/// Initialize a new gemlock database at the specified path
///
/// Creates the database file and applies the schema.
/// This is idempotent - calling it on an existing database is safe.
///
/// # Arguments
///
/// * `db_path` - Path where the database should be created
pub fn init(db_path: &str) -> Result<()> {
    debug!("Initializing database at: {}", db_path);

    if let Some(parent) = Path::new(db_path).parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::InitError(format!("Failed to create database directory: {}", e)))?;
    }

    let conn = Connection::open(db_path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )?;

    schema::migrate(&conn)?;

    info!("Database initialized successfully");
    Ok(())
}

/// Open an existing gemlock database
///
/// # Arguments
///
/// * `db_path` - Path to the database file
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        return Err(Error::DatabaseNotFound(db_path.to_string()));
    }

    let conn = Connection::open(db_path)?;

    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )?;

    Ok(conn)
}

/// Run `f` inside a transaction
///
/// Commits when `f` returns `Ok`, rolls back (on drop) when it returns `Err`.
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Store a specification and its dependencies
///
/// An existing row with the same name and version text is replaced, so
/// re-importing a specification updates its dependency list.
pub fn register(conn: &Connection, spec: &PackageSpecification) -> Result<i64> {
    let version = spec.version.to_string();

    if let Some(existing) = SpecificationEntry::find_exact(conn, &spec.name, &version)?
        && let Some(id) = existing.id
    {
        debug!("Replacing installed specification {}", spec.full_name());
        SpecificationEntry::delete(conn, id)?;
    }

    let mut entry = SpecificationEntry::new(spec.name.clone(), version);
    let spec_id = entry.insert(conn)?;

    for (position, dep) in spec.dependencies.iter().enumerate() {
        SpecDependencyEntry::new(
            spec_id,
            position as i64,
            dep.name.clone(),
            dep.constraint.to_string(),
        )
        .insert(conn)?;
    }

    debug!(
        "Registered {} with {} dependencies",
        spec.full_name(),
        spec.dependencies.len()
    );
    Ok(spec_id)
}
