// src/db/models.rs

//! Data models for gemlock database entities
//!
//! This module defines Rust structs that correspond to database tables
//! and provides methods for creating, reading, and deleting records.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SPEC_COLUMNS: &str = "id, name, version, installed_at";

/// An installed specification row
#[derive(Debug, Clone)]
pub struct SpecificationEntry {
    pub id: Option<i64>,
    pub name: String,
    /// Version text exactly as installed
    pub version: String,
    pub installed_at: Option<String>,
}

impl SpecificationEntry {
    /// Create a new SpecificationEntry
    pub fn new(name: String, version: String) -> Self {
        Self {
            id: None,
            name,
            version,
            installed_at: None,
        }
    }

    /// Insert this specification into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO specifications (name, version) VALUES (?1, ?2)",
            params![&self.name, &self.version],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a specification by exact name and version text
    pub fn find_exact(conn: &Connection, name: &str, version: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM specifications WHERE name = ?1 AND version = ?2",
            SPEC_COLUMNS
        ))?;

        let entry = stmt.query_row([name, version], Self::from_row).optional()?;

        Ok(entry)
    }

    /// Find all installed versions of a name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM specifications WHERE name = ?1 ORDER BY id",
            SPEC_COLUMNS
        ))?;

        let entries = stmt
            .query_map([name], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// List all installed specifications
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM specifications ORDER BY name, id",
            SPEC_COLUMNS
        ))?;

        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Search specifications whose name contains a pattern
    pub fn search(conn: &Connection, pattern: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM specifications WHERE name LIKE ?1 ORDER BY name, id",
            SPEC_COLUMNS
        ))?;

        let like = format!("%{}%", pattern);
        let entries = stmt
            .query_map([like], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Delete a specification by ID (dependencies cascade)
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        conn.execute("DELETE FROM specifications WHERE id = ?1", [id])?;
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            version: row.get(2)?,
            installed_at: row.get(3)?,
        })
    }
}

/// A declared dependency of an installed specification
#[derive(Debug, Clone)]
pub struct SpecDependencyEntry {
    pub id: Option<i64>,
    pub specification_id: i64,
    /// Declaration order within the specification
    pub position: i64,
    pub name: String,
    /// Requirement list text, e.g. ">= 1.0, < 2.0"
    pub requirement: String,
}

impl SpecDependencyEntry {
    /// Create a new SpecDependencyEntry
    pub fn new(specification_id: i64, position: i64, name: String, requirement: String) -> Self {
        Self {
            id: None,
            specification_id,
            position,
            name,
            requirement,
        }
    }

    /// Insert this dependency into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO spec_dependencies (specification_id, position, name, requirement)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                &self.specification_id,
                &self.position,
                &self.name,
                &self.requirement,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find all dependencies of a specification, in declared order
    pub fn find_by_spec(conn: &Connection, specification_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, specification_id, position, name, requirement
             FROM spec_dependencies WHERE specification_id = ?1 ORDER BY position",
        )?;

        let deps = stmt
            .query_map([specification_id], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(deps)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            specification_id: row.get(1)?,
            position: row.get(2)?,
            name: row.get(3)?,
            requirement: row.get(4)?,
        })
    }
}
