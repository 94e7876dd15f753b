//! Stateless validation rules for candidate movie records.
//!
//! # Responsibility
//! - Decide whether a watch date and a rating are acceptable.
//! - Collect every failing field of a record for form re-display.
//!
//! # Invariants
//! - Rules are pure: no I/O, no shared mutable state.
//! - Dates resolve strictly; `02-30-2021` never rolls over into March.

use crate::model::movie::{FieldError, MovieField, MovieRecord, MovieValidationError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// `chrono` pattern for `MM-DD-YYYY`.
pub const WATCH_DATE_FORMAT: &str = "%m-%d-%Y";
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;
/// Year of the earliest surviving motion picture.
pub const MIN_RELEASE_YEAR: i32 = 1888;
pub const MIN_RUNTIME_MINUTES: i32 = 1;

// chrono accepts single-digit months and days; the stored form does not.
static WATCH_DATE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid watch date regex"));

/// Which rule set a record store enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationProfile {
    /// Date and rating only. Any text, including empty, is accepted.
    Basic,
    /// Date and rating plus non-blank text fields and numeric minimums.
    #[default]
    Entity,
}

impl FromStr for ValidationProfile {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "entity" => Ok(Self::Entity),
            other => Err(format!(
                "unsupported validation profile `{other}`; expected basic|entity"
            )),
        }
    }
}

impl Display for ValidationProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Entity => f.write_str("entity"),
        }
    }
}

/// Parses a `MM-DD-YYYY` watch date with strict calendar resolution.
pub fn parse_watch_date(text: &str) -> Option<NaiveDate> {
    if !WATCH_DATE_SHAPE_RE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, WATCH_DATE_FORMAT).ok()
}

/// Returns whether `text` is a real calendar date in `MM-DD-YYYY` form.
pub fn is_valid_date(text: &str) -> bool {
    parse_watch_date(text).is_some()
}

/// Returns whether `value` lies in `[0.0, 10.0]`. NaN is never valid.
pub fn is_valid_rating(value: f64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks `movie` against `profile`, reporting every failed field.
pub fn validate_movie(
    movie: &MovieRecord,
    profile: ValidationProfile,
) -> Result<(), MovieValidationError> {
    let mut errors = Vec::new();

    if profile == ValidationProfile::Entity {
        for (field, value) in [
            (MovieField::Title, movie.title.as_str()),
            (MovieField::Director, movie.director.as_str()),
            (MovieField::StreamingPlatform, movie.streaming_platform.as_str()),
        ] {
            if is_blank(value) {
                errors.push(FieldError::new(field, "must not be blank"));
            }
        }
        if movie.release_year < MIN_RELEASE_YEAR {
            errors.push(FieldError::new(
                MovieField::ReleaseYear,
                format!("must be {MIN_RELEASE_YEAR} or later"),
            ));
        }
        if movie.runtime_minutes < MIN_RUNTIME_MINUTES {
            errors.push(FieldError::new(
                MovieField::RuntimeMinutes,
                format!("must be at least {MIN_RUNTIME_MINUTES} minute"),
            ));
        }
    }

    if !is_valid_rating(movie.rating) {
        errors.push(FieldError::new(
            MovieField::Rating,
            format!("must be between {MIN_RATING:.1} and {MAX_RATING:.1}"),
        ));
    }
    if !is_valid_date(&movie.date_watched) {
        errors.push(FieldError::new(
            MovieField::DateWatched,
            format!("`{}` is not a valid MM-DD-YYYY date", movie.date_watched),
        ));
    }

    match MovieValidationError::from_errors(errors) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_date, is_valid_rating, validate_movie, ValidationProfile};
    use crate::model::movie::{MovieField, MovieRecord};

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(is_valid_rating(0.0));
        assert!(is_valid_rating(10.0));
        assert!(is_valid_rating(7.8));
        assert!(!is_valid_rating(-0.1));
        assert!(!is_valid_rating(10.01));
        assert!(!is_valid_rating(f64::NAN));
        assert!(!is_valid_rating(f64::INFINITY));
    }

    #[test]
    fn rating_predicate_matches_range_on_a_sweep() {
        let mut value = -2.0_f64;
        while value <= 12.0 {
            assert_eq!(is_valid_rating(value), (0.0..=10.0).contains(&value));
            value += 0.25;
        }
    }

    #[test]
    fn date_accepts_real_calendar_dates() {
        assert!(is_valid_date("10-30-2021"));
        assert!(is_valid_date("02-29-2024"));
        assert!(is_valid_date("12-31-1999"));
    }

    #[test]
    fn date_rejects_calendar_invalid_combinations() {
        assert!(!is_valid_date("13-01-2021"));
        assert!(!is_valid_date("01-32-2021"));
        assert!(!is_valid_date("02-30-2021"));
        assert!(!is_valid_date("02-29-2023"));
        assert!(!is_valid_date("00-10-2021"));
    }

    #[test]
    fn date_rejects_other_shapes() {
        assert!(!is_valid_date("2021-10-30"));
        assert!(!is_valid_date("1-5-2021"));
        assert!(!is_valid_date("10/30/2021"));
        assert!(!is_valid_date(" 10-30-2021"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn basic_profile_accepts_empty_text() {
        let movie = MovieRecord::new("", "", 0, 0, "", 5.0, "", "01-01-2020");
        validate_movie(&movie, ValidationProfile::Basic).unwrap();
    }

    #[test]
    fn entity_profile_reports_every_failed_field() {
        let movie = MovieRecord::new(" ", "", 1700, 0, "", 11.0, "", "13-40-2020");
        let err = validate_movie(&movie, ValidationProfile::Entity).unwrap_err();

        for field in [
            MovieField::Title,
            MovieField::Director,
            MovieField::ReleaseYear,
            MovieField::RuntimeMinutes,
            MovieField::StreamingPlatform,
            MovieField::Rating,
            MovieField::DateWatched,
        ] {
            assert!(err.has_field(field), "missing error for {field}");
        }
        assert!(!err.has_field(MovieField::Tags));
    }

    #[test]
    fn profile_parses_from_text() {
        assert_eq!("Basic".parse::<ValidationProfile>(), Ok(ValidationProfile::Basic));
        assert_eq!(" entity ".parse::<ValidationProfile>(), Ok(ValidationProfile::Entity));
        assert!("strict".parse::<ValidationProfile>().is_err());
    }
}
