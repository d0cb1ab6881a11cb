// src/packages/identifier.rs

//! Package identifiers (`NAME-VERSION` full names)

use crate::error::{Error, Result};
use crate::version::GemVersion;
use std::fmt;
use std::str::FromStr;

/// A package name pinned to one exact version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentifier {
    pub name: String,
    pub version: GemVersion,
}

impl PackageIdentifier {
    pub fn new(name: impl Into<String>, version: GemVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Split a full name into name and version
    ///
    /// The split happens at the last `-` that is followed by a digit, so
    /// hyphenated names survive:
    /// - "rails-1.0.0" → ("rails", "1.0.0")
    /// - "ruby-prof-0.4.1" → ("ruby-prof", "0.4.1")
    pub fn parse_full_name(full_name: &str) -> Result<Self> {
        let full_name = full_name.trim();
        let invalid = || Error::InvalidIdentifier(full_name.to_string());

        let split = full_name
            .char_indices()
            .filter(|&(i, c)| {
                c == '-'
                    && full_name[i + 1..]
                        .chars()
                        .next()
                        .is_some_and(|next| next.is_ascii_digit())
            })
            .map(|(i, _)| i)
            .next_back()
            .ok_or_else(invalid)?;

        let name = &full_name[..split];
        if name.is_empty() {
            return Err(invalid());
        }
        let version = GemVersion::parse(&full_name[split + 1..]).map_err(|_| invalid())?;

        Ok(Self::new(name, version))
    }

    /// The `NAME-VERSION` form, using the version text as written
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

impl FromStr for PackageIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_full_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_full_name() {
        let id = PackageIdentifier::parse_full_name("rails-1.0.0").unwrap();
        assert_eq!(id.name, "rails");
        assert_eq!(id.version.as_str(), "1.0.0");
    }

    #[test]
    fn test_parse_hyphenated_name() {
        let id = PackageIdentifier::parse_full_name("ruby-prof-0.4.1").unwrap();
        assert_eq!(id.name, "ruby-prof");
        assert_eq!(id.version.as_str(), "0.4.1");
    }

    #[test]
    fn test_parse_prerelease_with_dash() {
        // The last dash before a digit wins, the "-beta" suffix is not a digit
        let id = PackageIdentifier::parse_full_name("rack-1.0-beta").unwrap();
        assert_eq!(id.name, "rack");
        assert_eq!(id.version.as_str(), "1.0-beta");
    }

    #[test]
    fn test_parse_invalid_full_names() {
        assert!(PackageIdentifier::parse_full_name("rails").is_err());
        assert!(PackageIdentifier::parse_full_name("-1.0").is_err());
        assert!(PackageIdentifier::parse_full_name("rails-").is_err());
        assert!(matches!(
            PackageIdentifier::parse_full_name("rails-1.x y"),
            Err(Error::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_full_name_roundtrip() {
        let id: PackageIdentifier = "activesupport-1.2.5".parse().unwrap();
        assert_eq!(id.full_name(), "activesupport-1.2.5");
        assert_eq!(id.to_string(), "activesupport-1.2.5");
    }
}
