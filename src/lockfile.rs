// src/lockfile.rs

//! Lockdown file rendering
//!
//! A lockfile is a Ruby script that pins every resolved gem to an exact
//! version. It must be loaded before any other require statement:
//!
//! ```text
//! require "rubygems"
//! gem 'rails', '= 1.0.0'
//! # Unable to satisfy 'sqlite3 (>= 1.1)' from currently installed gems.
//! gem 'rake', '= 0.7.0.1'
//! gem 'activesupport', '= 1.2.5'
//! ```
//!
//! Diagnostics from a lenient run appear as comments at the point in the
//! traversal where they were discovered.

use crate::error::{Error, Result};
use crate::packages::PackageIdentifier;
use crate::resolver::{LockEvent, Resolution};
use crate::version::GemVersion;
use std::fmt;

/// Bootstrap statement that always opens a lockfile
pub const HEADER: &str = "require \"rubygems\"";

/// One line of a lockfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Pin(PackageIdentifier),
    Comment(String),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Pin(id) => write!(f, "gem '{}', '= {}'", id.name, id.version),
            Statement::Comment(text) => write!(f, "# {}", text),
        }
    }
}

/// A complete lockfile, buffered in memory until written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lockfile {
    statements: Vec<Statement>,
}

impl Lockfile {
    /// Build the statement list in resolution event order
    pub fn from_resolution(resolution: &Resolution) -> Self {
        let statements = resolution
            .events()
            .iter()
            .map(|event| match *event {
                LockEvent::Locked(i) => Statement::Pin(resolution.locked()[i].clone()),
                LockEvent::Unsatisfied(i) => {
                    Statement::Comment(resolution.diagnostics()[i].message())
                }
            })
            .collect();

        Self { statements }
    }

    /// Pinned identifiers, in file order
    pub fn pins(&self) -> impl Iterator<Item = &PackageIdentifier> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Pin(id) => Some(id),
            Statement::Comment(_) => None,
        })
    }

    /// Render the whole file, one newline-terminated statement per line
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(32 * (self.statements.len() + 1));
        out.push_str(HEADER);
        out.push('\n');
        for statement in &self.statements {
            out.push_str(&statement.to_string());
            out.push('\n');
        }
        out
    }

    /// Read a lockfile back into statements
    ///
    /// Blank lines and the `require` header are ignored; anything else must
    /// be a comment or a `gem 'name', '= version'` pin.
    pub fn parse(text: &str) -> Result<Self> {
        let mut statements = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("require ") {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                statements.push(Statement::Comment(comment.trim().to_string()));
                continue;
            }

            let pin = parse_pin(line).ok_or_else(|| Error::InvalidLockfile {
                line: i + 1,
                text: line.to_string(),
            })?;
            statements.push(Statement::Pin(pin));
        }

        Ok(Self { statements })
    }
}

impl fmt::Display for Lockfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Parse `gem 'name', '= version'`
fn parse_pin(line: &str) -> Option<PackageIdentifier> {
    let rest = line.strip_prefix("gem ")?.trim();
    let (name, rest) = quoted(rest)?;
    let rest = rest.trim_start().strip_prefix(',')?.trim_start();
    let (requirement, rest) = quoted(rest)?;
    if !rest.trim().is_empty() || name.is_empty() {
        return None;
    }

    let version = requirement.strip_prefix('=')?.trim();
    let version = GemVersion::parse(version).ok()?;
    Some(PackageIdentifier::new(name, version))
}

/// Split a leading single-quoted string off `s`
fn quoted(s: &str) -> Option<(&str, &str)> {
    let inner = s.strip_prefix('\'')?;
    let end = inner.find('\'')?;
    Some((&inner[..end], &inner[end + 1..]))
}
