//! Raw form input for movie records.
//!
//! A web form post or a console prompt session produces eight strings; this
//! module turns them into a `MovieRecord` or a per-field error list.

use crate::model::movie::{parse_float, parse_int, MovieField, MovieRecord, MovieValidationError};
use crate::validation::{
    validate_movie, ValidationProfile, MIN_RATING, MIN_RELEASE_YEAR, MIN_RUNTIME_MINUTES,
};
use serde::Deserialize;

/// Unparsed field values as submitted by a front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieForm {
    pub title: String,
    pub director: String,
    pub release_year: String,
    pub runtime_minutes: String,
    pub streaming_platform: String,
    pub rating: String,
    pub tags: String,
    pub date_watched: String,
}

impl MovieForm {
    /// Sets one field by its positional identity.
    pub fn set(&mut self, field: MovieField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MovieField::Title => self.title = value,
            MovieField::Director => self.director = value,
            MovieField::ReleaseYear => self.release_year = value,
            MovieField::RuntimeMinutes => self.runtime_minutes = value,
            MovieField::StreamingPlatform => self.streaming_platform = value,
            MovieField::Rating => self.rating = value,
            MovieField::Tags => self.tags = value,
            MovieField::DateWatched => self.date_watched = value,
        }
    }

    /// Parses and validates the form.
    ///
    /// Text fields other than the date are kept verbatim. Numeric parse
    /// failures and rule violations are reported together, one entry per
    /// failed field.
    pub fn bind(&self, profile: ValidationProfile) -> Result<MovieRecord, MovieValidationError> {
        let mut parse_errors = Vec::new();

        let release_year = parse_int(MovieField::ReleaseYear, &self.release_year)
            .map_err(|err| parse_errors.push(err))
            .ok();
        let runtime_minutes = parse_int(MovieField::RuntimeMinutes, &self.runtime_minutes)
            .map_err(|err| parse_errors.push(err))
            .ok();
        let rating = parse_float(MovieField::Rating, &self.rating)
            .map_err(|err| parse_errors.push(err))
            .ok();

        // Placeholders keep unparsed numbers out of the rule pass below.
        let movie = MovieRecord::new(
            self.title.as_str(),
            self.director.as_str(),
            release_year.unwrap_or(MIN_RELEASE_YEAR),
            runtime_minutes.unwrap_or(MIN_RUNTIME_MINUTES),
            self.streaming_platform.as_str(),
            rating.unwrap_or(MIN_RATING),
            self.tags.as_str(),
            self.date_watched.trim(),
        );

        let mut errors = parse_errors;
        if let Err(rule_errors) = validate_movie(&movie, profile) {
            for error in rule_errors.errors() {
                if !errors.iter().any(|existing| existing.field == error.field) {
                    errors.push(error.clone());
                }
            }
        }

        match MovieValidationError::from_errors(errors) {
            Some(err) => Err(err),
            None => Ok(movie),
        }
    }
}

impl From<&MovieRecord> for MovieForm {
    fn from(movie: &MovieRecord) -> Self {
        Self {
            title: movie.title.clone(),
            director: movie.director.clone(),
            release_year: movie.release_year.to_string(),
            runtime_minutes: movie.runtime_minutes.to_string(),
            streaming_platform: movie.streaming_platform.clone(),
            rating: movie.rating.to_string(),
            tags: movie.tags.clone(),
            date_watched: movie.date_watched.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MovieForm;
    use crate::model::movie::{MovieField, MovieRecord};
    use crate::validation::ValidationProfile;

    fn filled_form() -> MovieForm {
        let mut form = MovieForm::default();
        form.set(MovieField::Title, "The Thing");
        form.set(MovieField::Director, "John Carpenter");
        form.set(MovieField::ReleaseYear, "1982");
        form.set(MovieField::RuntimeMinutes, "109");
        form.set(MovieField::StreamingPlatform, "Shudder");
        form.set(MovieField::Rating, "8.2");
        form.set(MovieField::Tags, "creature");
        form.set(MovieField::DateWatched, "11-05-2020");
        form
    }

    #[test]
    fn bind_produces_record() {
        let movie = filled_form().bind(ValidationProfile::Entity).unwrap();
        assert_eq!(
            movie,
            MovieRecord::new(
                "The Thing",
                "John Carpenter",
                1982,
                109,
                "Shudder",
                8.2,
                "creature",
                "11-05-2020"
            )
        );
    }

    #[test]
    fn bind_reports_parse_and_rule_failures_once_per_field() {
        let mut form = filled_form();
        form.set(MovieField::ReleaseYear, "nineteen");
        form.set(MovieField::Rating, "12.0");
        form.set(MovieField::Director, "  ");

        let err = form.bind(ValidationProfile::Entity).unwrap_err();
        assert_eq!(err.errors().len(), 3);
        assert!(err
            .message_for(MovieField::ReleaseYear)
            .unwrap()
            .contains("whole number"));
        assert!(err.has_field(MovieField::Rating));
        assert!(err.has_field(MovieField::Director));
    }

    #[test]
    fn form_roundtrips_from_record() {
        let movie = filled_form().bind(ValidationProfile::Entity).unwrap();
        assert_eq!(MovieForm::from(&movie), filled_form());
    }
}
