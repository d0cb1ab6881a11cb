// src/version/mod.rs

//! Version handling and requirement satisfaction for installed gems
//!
//! Versions follow RubyGems ordering: dot-separated segments, where a
//! segment containing letters marks a prerelease and sorts before any
//! numeric segment in the same position. Requirements are conjunctions
//! of operator clauses such as `">= 1.0, < 2.0"` or `"~> 0.6.2"`.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Number(u64),
    Text(String),
}

impl Segment {
    fn compare(&self, other: &Segment) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => a.cmp(b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            // Prerelease text always sorts below a release number
            (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
        }
    }
}

/// A parsed gem version
///
/// The original text is kept verbatim: `Display` never normalizes, so
/// `"1.0"` and `"1.0.0"` compare equal but print as written.
#[derive(Debug, Clone)]
pub struct GemVersion {
    text: String,
    segments: Vec<Segment>,
}

impl GemVersion {
    /// Parse a version string
    ///
    /// Examples:
    /// - "1.0" → [1, 0]
    /// - "0.7.0.1" → [0, 7, 0, 1]
    /// - "2.0.0.rc1" → [2, 0, 0, "rc", 1]
    /// - "1.0-beta" → [1, 0, "pre", "beta"]
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = || Error::InvalidVersion(s.to_string());

        if !text.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(invalid());
        }

        let expanded = text.replace('-', ".pre.");
        let mut segments = Vec::new();
        for part in expanded.split('.') {
            if part.is_empty() {
                return Err(invalid());
            }
            split_part(part, &mut segments).ok_or_else(invalid)?;
        }

        Ok(Self {
            text: text.to_string(),
            segments,
        })
    }

    /// Whether any segment carries prerelease text
    pub fn is_prerelease(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Text(_)))
    }

    /// The version as originally written
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Segments with trailing zeros removed, so `1.0` and `1` are equal
    fn canonical(&self) -> &[Segment] {
        let mut end = self.segments.len();
        while end > 0 && self.segments[end - 1] == Segment::Number(0) {
            end -= 1;
        }
        &self.segments[..end]
    }

    /// Leading numeric segments (the version with any prerelease stripped)
    fn release_numbers(&self) -> Vec<u64> {
        self.segments
            .iter()
            .map_while(|s| match s {
                Segment::Number(n) => Some(*n),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Release portion of this version, used by the pessimistic operator
    fn release(&self) -> GemVersion {
        if !self.is_prerelease() {
            return self.clone();
        }
        from_numbers(&self.release_numbers())
    }

    /// Upper bound for `~>`: drop the last release segment and increment
    /// the new last one (`1.2.3` → `1.3`, `1` → `2`)
    fn bump(&self) -> GemVersion {
        let mut numbers = self.release_numbers();
        if numbers.len() > 1 {
            numbers.pop();
        }
        if let Some(last) = numbers.last_mut() {
            *last = last.saturating_add(1);
        }
        from_numbers(&numbers)
    }
}

fn from_numbers(numbers: &[u64]) -> GemVersion {
    let numbers: &[u64] = if numbers.is_empty() { &[0] } else { numbers };
    GemVersion {
        text: numbers
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("."),
        segments: numbers.iter().copied().map(Segment::Number).collect(),
    }
}

/// Split one dot-separated part at digit/letter boundaries
fn split_part(part: &str, segments: &mut Vec<Segment>) -> Option<()> {
    let mut current = String::new();
    let mut numeric = false;

    for c in part.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != numeric {
            segments.push(make_segment(&current, numeric)?);
            current.clear();
        }
        numeric = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        segments.push(make_segment(&current, numeric)?);
    }
    Some(())
}

fn make_segment(text: &str, numeric: bool) -> Option<Segment> {
    if numeric {
        text.parse::<u64>().ok().map(Segment::Number)
    } else {
        Some(Segment::Text(text.to_string()))
    }
}

impl fmt::Display for GemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for GemVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for GemVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.canonical();
        let rhs = other.canonical();
        let zero = Segment::Number(0);

        for i in 0..lhs.len().max(rhs.len()) {
            let a = lhs.get(i).unwrap_or(&zero);
            let b = rhs.get(i).unwrap_or(&zero);
            match a.compare(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for GemVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GemVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GemVersion {}

impl Hash for GemVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

/// Requirement operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// `~>`: at least this version, below the next significant release
    Pessimistic,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Pessimistic => "~>",
        }
    }
}

// Two-character operators first so ">=" is not read as ">"
const OPERATORS: [Operator; 7] = [
    Operator::Pessimistic,
    Operator::GreaterOrEqual,
    Operator::LessOrEqual,
    Operator::NotEqual,
    Operator::Equal,
    Operator::GreaterThan,
    Operator::LessThan,
];

/// A single requirement clause: operator plus version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub op: Operator,
    pub version: GemVersion,
}

impl Requirement {
    pub fn new(op: Operator, version: GemVersion) -> Self {
        Self { op, version }
    }

    /// Parse one clause; a bare version means `=`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (op, rest) = OPERATORS
            .iter()
            .find_map(|op| s.strip_prefix(op.as_str()).map(|rest| (*op, rest)))
            .unwrap_or((Operator::Equal, s));

        let version = GemVersion::parse(rest.trim())
            .map_err(|_| Error::InvalidConstraint(s.to_string()))?;

        Ok(Self { op, version })
    }

    /// Check if a version satisfies this clause
    pub fn satisfied_by(&self, version: &GemVersion) -> bool {
        let required = &self.version;
        match self.op {
            Operator::Equal => version == required,
            Operator::NotEqual => version != required,
            Operator::GreaterThan => version > required,
            Operator::LessThan => version < required,
            Operator::GreaterOrEqual => version >= required,
            Operator::LessOrEqual => version <= required,
            Operator::Pessimistic => {
                version >= required && version.release() < required.bump()
            }
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.as_str(), self.version)
    }
}

/// Conjunction of requirement clauses, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    clauses: Vec<Requirement>,
}

impl VersionConstraint {
    /// Constraint from explicit clauses; no clauses means "any version"
    pub fn new(clauses: Vec<Requirement>) -> Self {
        if clauses.is_empty() {
            return Self::any();
        }
        Self { clauses }
    }

    /// The unconstrained default, `>= 0`
    pub fn any() -> Self {
        Self {
            clauses: vec![Requirement::new(
                Operator::GreaterOrEqual,
                from_numbers(&[0]),
            )],
        }
    }

    /// Parse a comma-separated requirement list
    ///
    /// Examples:
    /// - ">= 0.6.2" → [>= 0.6.2]
    /// - ">= 1.0, < 2.0" → [>= 1.0, < 2.0]
    /// - "" or "*" → [>= 0]
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            return Ok(Self::any());
        }

        let clauses = s
            .split(',')
            .map(|part| {
                if part.trim().is_empty() {
                    Err(Error::InvalidConstraint(s.to_string()))
                } else {
                    Requirement::parse(part)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[Requirement] {
        &self.clauses
    }

    /// Check if a version satisfies every clause
    pub fn satisfied_by(&self, version: &GemVersion) -> bool {
        self.clauses.iter().all(|c| c.satisfied_by(version))
    }
}

impl Default for VersionConstraint {
    fn default() -> Self {
        Self::any()
    }
}

impl FromStr for VersionConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}
