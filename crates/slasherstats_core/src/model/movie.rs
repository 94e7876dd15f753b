//! Movie record domain model.
//!
//! # Responsibility
//! - Define the canonical record for one watched horror movie.
//! - Name the user-editable fields and their textual edit rules.
//! - Carry per-field validation failures back to front ends.
//!
//! # Invariants
//! - `title` is the human-facing lookup key and is matched case-insensitively.
//! - `id` is assigned by the store and is never reused for another record.
//! - `date_watched` is kept in its textual `MM-DD-YYYY` form.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a persisted movie record.
pub type MovieId = i64;

/// One watched horror movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// `None` until the record has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MovieId>,
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub runtime_minutes: i32,
    pub streaming_platform: String,
    /// Inclusive range `0.0..=10.0`.
    pub rating: f64,
    /// Free-form, comma-separated by convention.
    pub tags: String,
    /// `MM-DD-YYYY`.
    pub date_watched: String,
}

impl MovieRecord {
    /// Creates an unsaved record. Field order follows the bulk import layout.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        director: impl Into<String>,
        release_year: i32,
        runtime_minutes: i32,
        streaming_platform: impl Into<String>,
        rating: f64,
        tags: impl Into<String>,
        date_watched: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            director: director.into(),
            release_year,
            runtime_minutes,
            streaming_platform: streaming_platform.into(),
            rating,
            tags: tags.into(),
            date_watched: date_watched.into(),
        }
    }

    /// Case-folded lookup key for this record's title.
    pub fn title_key(&self) -> String {
        normalize_title_key(&self.title)
    }

    /// Copies every field except `id` and `title` from `source`.
    pub fn overwrite_details(&mut self, source: &MovieRecord) {
        self.director = source.director.clone();
        self.release_year = source.release_year;
        self.runtime_minutes = source.runtime_minutes;
        self.streaming_platform = source.streaming_platform.clone();
        self.rating = source.rating;
        self.tags = source.tags.clone();
        self.date_watched = source.date_watched.clone();
    }

    /// Applies one textual edit, parsing numeric fields.
    ///
    /// Only the parse step happens here; range and format rules are checked
    /// by `validation::validate_movie` when the record is saved.
    ///
    /// # Errors
    /// - `MovieField::Title` is rejected; the title is the lookup key.
    /// - Numeric fields reject text that does not parse.
    pub fn apply_edit(&mut self, field: MovieField, value: &str) -> Result<(), FieldError> {
        match field {
            MovieField::Title => {
                return Err(FieldError::new(
                    field,
                    "title is the lookup key and cannot be edited",
                ))
            }
            MovieField::Director => self.director = value.to_string(),
            MovieField::ReleaseYear => self.release_year = parse_int(field, value)?,
            MovieField::RuntimeMinutes => self.runtime_minutes = parse_int(field, value)?,
            MovieField::StreamingPlatform => self.streaming_platform = value.to_string(),
            MovieField::Rating => self.rating = parse_float(field, value)?,
            MovieField::Tags => self.tags = value.to_string(),
            MovieField::DateWatched => self.date_watched = value.to_string(),
        }
        Ok(())
    }
}

impl Display for MovieRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Director: {}", self.director)?;
        writeln!(f, "Release Year: {}", self.release_year)?;
        writeln!(f, "Runtime Minutes: {}", self.runtime_minutes)?;
        writeln!(f, "Streaming Platform: {}", self.streaming_platform)?;
        writeln!(f, "Rating: {:.1}", self.rating)?;
        writeln!(f, "Tags: {}", self.tags)?;
        write!(f, "Date Watched: {}", self.date_watched)
    }
}

/// Normalizes a title into its case-insensitive lookup key.
pub fn normalize_title_key(title: &str) -> String {
    title.to_lowercase()
}

pub(crate) fn parse_int(field: MovieField, value: &str) -> Result<i32, FieldError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| FieldError::new(field, format!("`{}` is not a whole number", value.trim())))
}

pub(crate) fn parse_float(field: MovieField, value: &str) -> Result<f64, FieldError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| FieldError::new(field, format!("`{}` is not a number", value.trim())))
}

/// User-editable movie fields, in bulk import / console menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovieField {
    Title,
    Director,
    ReleaseYear,
    RuntimeMinutes,
    StreamingPlatform,
    Rating,
    Tags,
    DateWatched,
}

impl MovieField {
    /// All fields in positional order.
    pub const ALL: [MovieField; 8] = [
        MovieField::Title,
        MovieField::Director,
        MovieField::ReleaseYear,
        MovieField::RuntimeMinutes,
        MovieField::StreamingPlatform,
        MovieField::Rating,
        MovieField::Tags,
        MovieField::DateWatched,
    ];

    /// Resolves a 1-based console menu index.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|position| Self::ALL.get(position).copied())
    }

    /// 1-based console menu index.
    pub fn menu_index(self) -> usize {
        self as usize + 1
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Director => "Director",
            Self::ReleaseYear => "Release Year",
            Self::RuntimeMinutes => "Runtime Minutes",
            Self::StreamingPlatform => "Streaming Platform",
            Self::Rating => "Rating",
            Self::Tags => "Tags",
            Self::DateWatched => "Date Watched",
        }
    }

    /// Form/wire field name.
    pub fn form_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Director => "director",
            Self::ReleaseYear => "releaseYear",
            Self::RuntimeMinutes => "runtimeMinutes",
            Self::StreamingPlatform => "streamingPlatform",
            Self::Rating => "rating",
            Self::Tags => "tags",
            Self::DateWatched => "dateWatched",
        }
    }
}

impl Display for MovieField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.form_name())
    }
}

/// One failed field with a message suitable for form re-display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: MovieField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: MovieField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Error for FieldError {}

/// Validation failure for a candidate record, listing every failed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieValidationError {
    errors: Vec<FieldError>,
}

impl MovieValidationError {
    /// Returns `None` when `errors` is empty.
    pub fn from_errors(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for `field`, if that field failed.
    pub fn message_for(&self, field: MovieField) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn has_field(&self, field: MovieField) -> bool {
        self.message_for(field).is_some()
    }
}

impl From<FieldError> for MovieValidationError {
    fn from(value: FieldError) -> Self {
        Self {
            errors: vec![value],
        }
    }
}

impl Display for MovieValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "invalid movie: {joined}")
    }
}

impl Error for MovieValidationError {}

#[cfg(test)]
mod tests {
    use super::{normalize_title_key, MovieField, MovieRecord};

    fn scream() -> MovieRecord {
        MovieRecord::new(
            "Scream",
            "Wes Craven",
            1996,
            111,
            "HBO Max",
            7.8,
            "slasher",
            "10-30-2021",
        )
    }

    #[test]
    fn menu_index_roundtrips_for_every_field() {
        for field in MovieField::ALL {
            assert_eq!(MovieField::from_menu_index(field.menu_index()), Some(field));
        }
        assert_eq!(MovieField::from_menu_index(0), None);
        assert_eq!(MovieField::from_menu_index(9), None);
    }

    #[test]
    fn title_key_is_case_folded() {
        assert_eq!(normalize_title_key("SCREAM"), "scream");
        assert_eq!(scream().title_key(), "scream");
    }

    #[test]
    fn apply_edit_parses_numeric_fields() {
        let mut movie = scream();
        movie.apply_edit(MovieField::Rating, " 9.1 ").unwrap();
        movie.apply_edit(MovieField::RuntimeMinutes, "112").unwrap();
        assert_eq!(movie.rating, 9.1);
        assert_eq!(movie.runtime_minutes, 112);

        let err = movie.apply_edit(MovieField::ReleaseYear, "ninety").unwrap_err();
        assert_eq!(err.field, MovieField::ReleaseYear);
        assert_eq!(movie.release_year, 1996);
    }

    #[test]
    fn apply_edit_rejects_title_changes() {
        let mut movie = scream();
        let err = movie.apply_edit(MovieField::Title, "Scream 2").unwrap_err();
        assert_eq!(err.field, MovieField::Title);
        assert_eq!(movie.title, "Scream");
    }

    #[test]
    fn overwrite_details_keeps_title_and_id() {
        let mut stored = scream();
        stored.id = Some(4);
        let mut replacement = scream();
        replacement.title = "other".to_string();
        replacement.director = "Someone Else".to_string();
        replacement.rating = 5.0;

        stored.overwrite_details(&replacement);
        assert_eq!(stored.id, Some(4));
        assert_eq!(stored.title, "Scream");
        assert_eq!(stored.director, "Someone Else");
        assert_eq!(stored.rating, 5.0);
    }
}
