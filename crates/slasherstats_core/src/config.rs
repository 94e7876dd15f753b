//! Record manager configuration.
//!
//! # Responsibility
//! - Name the behaviour choices a front end makes when building a manager.
//! - Parse those choices from flag/config text.
//!
//! # Invariants
//! - Defaults are the recommended behaviour: derived points, entity
//!   validation, duplicate titles rejected.

use crate::validation::ValidationProfile;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Points granted per stored movie.
pub const POINTS_PER_MOVIE: i64 = 10;

/// Source of truth for account points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsMode {
    /// `count(records) * 10`, recomputed on every read.
    #[default]
    Derived,
    /// Session counter moved by each successful add/delete. Can go negative
    /// when deleting records added in an earlier session.
    Tracked,
}

impl FromStr for PointsMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "derived" => Ok(Self::Derived),
            "tracked" => Ok(Self::Tracked),
            other => Err(format!(
                "unsupported points mode `{other}`; expected derived|tracked"
            )),
        }
    }
}

impl Display for PointsMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Derived => f.write_str("derived"),
            Self::Tracked => f.write_str("tracked"),
        }
    }
}

/// What `add` does when the title is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTitlePolicy {
    /// Keep titles unique (case-insensitive).
    #[default]
    Reject,
    /// Store duplicates; lookups return the earliest one.
    Allow,
}

impl FromStr for DuplicateTitlePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(format!(
                "unsupported duplicate title policy `{other}`; expected reject|allow"
            )),
        }
    }
}

impl Display for DuplicateTitlePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Allow => f.write_str("allow"),
        }
    }
}

/// Behaviour switches for `MovieManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub points_mode: PointsMode,
    pub validation: ValidationProfile,
    pub duplicate_titles: DuplicateTitlePolicy,
}

impl ManagerConfig {
    /// Permissive settings of a plain in-memory tracker: tracked points,
    /// date/rating checks only, duplicates allowed.
    pub fn lenient() -> Self {
        Self {
            points_mode: PointsMode::Tracked,
            validation: ValidationProfile::Basic,
            duplicate_titles: DuplicateTitlePolicy::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DuplicateTitlePolicy, ManagerConfig, PointsMode};
    use crate::validation::ValidationProfile;

    #[test]
    fn defaults_are_recommended_settings() {
        let config = ManagerConfig::default();
        assert_eq!(config.points_mode, PointsMode::Derived);
        assert_eq!(config.validation, ValidationProfile::Entity);
        assert_eq!(config.duplicate_titles, DuplicateTitlePolicy::Reject);
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("TRACKED".parse::<PointsMode>(), Ok(PointsMode::Tracked));
        assert_eq!(
            " allow".parse::<DuplicateTitlePolicy>(),
            Ok(DuplicateTitlePolicy::Allow)
        );
        let err = "sometimes".parse::<PointsMode>().unwrap_err();
        assert!(err.contains("derived|tracked"));
    }
}
