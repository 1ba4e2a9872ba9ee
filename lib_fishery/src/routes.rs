//! # Routes, Stream Kinds and Field Specs
//!
//! The closed set of collections we know how to fetch, and for each stream
//! kind the field projected out of every record. Genera and species share the
//! same iteration engine; this table is the only place they differ.

use std::fmt;
use std::str::FromStr;

use crate::errors::{FisheryError, FisheryResult};

/// Identifies which data collection to retrieve from a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    /// The `genera` collection.
    Genera,
    /// The `species` collection.
    Species,
}

impl RouteName {
    /// The path segment / file stem used for this route.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Genera => "genera",
            RouteName::Species => "species",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static association between a route and the field extracted from each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Collection fetched for the stream.
    pub route: RouteName,
    /// Record field projected on every emission.
    pub field: &'static str,
}

/// The kinds of record stream the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Genus names (`GenName` from `genera`).
    Genera,
    /// Species names (`Species` from `species`).
    Species,
}

impl StreamKind {
    /// Every known kind, in the default processing order.
    pub const ALL: [StreamKind; 2] = [StreamKind::Genera, StreamKind::Species];

    /// The per-kind route/field configuration.
    pub fn field_spec(&self) -> FieldSpec {
        match self {
            StreamKind::Genera => FieldSpec {
                route: RouteName::Genera,
                field: "GenName",
            },
            StreamKind::Species => FieldSpec {
                route: RouteName::Species,
                field: "Species",
            },
        }
    }

    /// Lowercase name, identical to the route name.
    pub fn as_str(&self) -> &'static str {
        self.field_spec().route.as_str()
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = FisheryError;

    fn from_str(s: &str) -> FisheryResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genera" => Ok(StreamKind::Genera),
            "species" => Ok(StreamKind::Species),
            other => Err(FisheryError::Config(format!(
                "unknown stream kind '{}' (expected one of: genera, species)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_specs_match_the_collections() {
        let genera = StreamKind::Genera.field_spec();
        assert_eq!(genera.route, RouteName::Genera);
        assert_eq!(genera.field, "GenName");

        let species = StreamKind::Species.field_spec();
        assert_eq!(species.route.as_str(), "species");
        assert_eq!(species.field, "Species");
    }

    #[test]
    fn parses_known_kinds_case_insensitively() {
        assert_eq!("Genera".parse::<StreamKind>().unwrap(), StreamKind::Genera);
        assert_eq!(" species ".parse::<StreamKind>().unwrap(), StreamKind::Species);
    }

    #[test]
    fn unknown_kind_is_a_config_error() {
        let err = "families".parse::<StreamKind>().unwrap_err();
        assert!(matches!(err, FisheryError::Config(ref m) if m.contains("families")));

        let err = "genus".parse::<StreamKind>().unwrap_err();
        assert!(matches!(err, FisheryError::Config(ref m) if m.contains("genus")));
    }
}
