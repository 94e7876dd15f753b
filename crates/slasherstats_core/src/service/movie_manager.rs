//! Movie record manager.
//!
//! # Responsibility
//! - Orchestrate add/find/update/delete/list over a `MovieRepository`.
//! - Apply validation rules and the duplicate-title policy before writes.
//! - Answer account point queries in the configured `PointsMode`.
//!
//! # Invariants
//! - A failed operation never mutates the store or the point counter.
//! - Update replaces every field except `title` and `id`.
//! - Every `false`/`None` at the boolean boundary is preceded by a log line.
//! - Log lines carry ids and error codes only, never movie text.

use crate::config::{DuplicateTitlePolicy, ManagerConfig, PointsMode, POINTS_PER_MOVIE};
use crate::model::movie::{FieldError, MovieField, MovieId, MovieRecord, MovieValidationError};
use crate::repo::movie_repo::{MovieRepository, RepoError};
use crate::validation::validate_movie;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Why a manager operation did not happen.
#[derive(Debug)]
pub enum ManagerError {
    /// The front end supplied no record at all.
    MissingRecord,
    Validation(MovieValidationError),
    /// Another record already uses this title (reject policy).
    DuplicateTitle(String),
    /// No record matches this title.
    NotFound(String),
    Repo(RepoError),
}

impl ManagerError {
    /// Stable metadata-only code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRecord => "missing_record",
            Self::Validation(_) => "validation_failed",
            Self::DuplicateTitle(_) => "duplicate_title",
            Self::NotFound(_) => "not_found",
            Self::Repo(_) => "store_failure",
        }
    }

    /// Field errors for form re-display, empty for non-validation failures.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(err) => err.errors(),
            _ => &[],
        }
    }
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRecord => write!(f, "no movie supplied"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateTitle(title) => write!(f, "a movie titled `{title}` already exists"),
            Self::NotFound(title) => write!(f, "movie with title `{title}` not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ManagerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<MovieValidationError> for ManagerError {
    fn from(value: MovieValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FieldError> for ManagerError {
    fn from(value: FieldError) -> Self {
        Self::Validation(value.into())
    }
}

/// Use-case facade over a movie repository.
///
/// Each operation comes in two forms: `try_*` returns a typed error for
/// front ends that report details, the plain form returns `bool`/`Option`.
pub struct MovieManager<R: MovieRepository> {
    repo: R,
    config: ManagerConfig,
    tracked_points: i64,
}

impl<R: MovieRepository> MovieManager<R> {
    /// Creates a manager with default configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, ManagerConfig::default())
    }

    pub fn with_config(repo: R, config: ManagerConfig) -> Self {
        Self {
            repo,
            config,
            tracked_points: 0,
        }
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    /// Validates and stores a new record, returning it with its id.
    ///
    /// # Errors
    /// - `Validation` when the record breaks the configured profile.
    /// - `DuplicateTitle` when the reject policy finds the title stored.
    /// - `Repo` on store failure.
    pub fn try_add(&mut self, movie: &MovieRecord) -> ManagerResult<MovieRecord> {
        validate_movie(movie, self.config.validation)?;

        if self.config.duplicate_titles == DuplicateTitlePolicy::Reject
            && self.repo.find_by_title(&movie.title)?.is_some()
        {
            return Err(ManagerError::DuplicateTitle(movie.title.clone()));
        }

        let mut stored = movie.clone();
        stored.id = None;
        let id = self.repo.create_movie(&stored)?;
        stored.id = Some(id);

        if self.config.points_mode == PointsMode::Tracked {
            self.tracked_points += POINTS_PER_MOVIE;
        }
        info!("event=movie_add module=manager status=ok id={id}");
        Ok(stored)
    }

    /// Adds `movie`; `None` models a front-end entry that failed to bind.
    pub fn add_movie(&mut self, movie: Option<&MovieRecord>) -> bool {
        let result = match movie {
            Some(movie) => self.try_add(movie),
            None => Err(ManagerError::MissingRecord),
        };
        report("movie_add", result).is_some()
    }

    /// Case-insensitive exact title lookup; earliest record on duplicates.
    pub fn try_find(&self, title: &str) -> ManagerResult<Option<MovieRecord>> {
        Ok(self.repo.find_by_title(title)?)
    }

    pub fn find_movie(&self, title: &str) -> Option<MovieRecord> {
        report("movie_find", self.try_find(title)).flatten()
    }

    /// Overwrites the stored record matching `updated.title`.
    ///
    /// All fields except `title` and `id` come from `updated`. Points are
    /// unchanged.
    pub fn try_update(&mut self, updated: &MovieRecord) -> ManagerResult<MovieRecord> {
        let mut stored = self.require(&updated.title)?;
        stored.overwrite_details(updated);
        validate_movie(&stored, self.config.validation)?;
        self.repo.update_movie(&stored)?;

        info!(
            "event=movie_update module=manager status=ok id={}",
            stored.id.unwrap_or_default()
        );
        Ok(stored)
    }

    pub fn update_movie(&mut self, updated: &MovieRecord) -> bool {
        report("movie_update", self.try_update(updated)).is_some()
    }

    /// Applies one textual field edit to the record titled `title`.
    ///
    /// # Errors
    /// - `Validation` for title edits, unparsable numbers and rule failures.
    pub fn try_update_field(
        &mut self,
        title: &str,
        field: MovieField,
        new_value: &str,
    ) -> ManagerResult<MovieRecord> {
        let mut edited = self.require(title)?;
        edited.apply_edit(field, new_value)?;
        self.try_update(&edited)
    }

    pub fn update_field(&mut self, title: &str, field: MovieField, new_value: &str) -> bool {
        report(
            "movie_update_field",
            self.try_update_field(title, field, new_value),
        )
        .is_some()
    }

    /// Removes the record titled `title` and returns it.
    pub fn try_delete(&mut self, title: &str) -> ManagerResult<MovieRecord> {
        let stored = self.require(title)?;
        let id = stored_id(&stored)?;
        self.repo.delete_movie(id)?;

        if self.config.points_mode == PointsMode::Tracked {
            self.tracked_points -= POINTS_PER_MOVIE;
        }
        info!("event=movie_delete module=manager status=ok id={id}");
        Ok(stored)
    }

    pub fn delete_movie(&mut self, title: &str) -> bool {
        report("movie_delete", self.try_delete(title)).is_some()
    }

    /// Owned snapshot of all records in insertion order.
    pub fn try_list(&self) -> ManagerResult<Vec<MovieRecord>> {
        Ok(self.repo.list_movies()?)
    }

    pub fn list_movies(&self) -> Vec<MovieRecord> {
        report("movie_list", self.try_list()).unwrap_or_default()
    }

    pub fn try_account_points(&self) -> ManagerResult<i64> {
        match self.config.points_mode {
            PointsMode::Tracked => Ok(self.tracked_points),
            PointsMode::Derived => {
                let count = self.repo.count_movies()?;
                Ok(i64::try_from(count)
                    .unwrap_or(i64::MAX)
                    .saturating_mul(POINTS_PER_MOVIE))
            }
        }
    }

    /// Current account points; `0` when the store cannot be counted.
    pub fn account_points(&self) -> i64 {
        report("points_query", self.try_account_points()).unwrap_or_default()
    }

    fn require(&self, title: &str) -> ManagerResult<MovieRecord> {
        self.repo
            .find_by_title(title)?
            .ok_or_else(|| ManagerError::NotFound(title.to_string()))
    }
}

fn stored_id(movie: &MovieRecord) -> ManagerResult<MovieId> {
    movie.id.ok_or_else(|| {
        ManagerError::Repo(RepoError::InvalidData(
            "stored movie is missing its id".to_string(),
        ))
    })
}

/// Collapses a typed result to the boolean boundary, logging the failure.
fn report<T>(event: &str, result: ManagerResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err @ ManagerError::Repo(_)) => {
            error!(
                "event={event} module=manager status=error error_code={} error={err}",
                err.code()
            );
            None
        }
        Err(err) => {
            let fields = err
                .field_errors()
                .iter()
                .map(|field_error| field_error.field.form_name())
                .collect::<Vec<_>>()
                .join(",");
            warn!(
                "event={event} module=manager status=rejected error_code={} fields={fields}",
                err.code()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ManagerError, MovieManager};
    use crate::config::ManagerConfig;
    use crate::model::movie::{MovieField, MovieRecord};
    use crate::repo::memory_repo::InMemoryMovieRepository;

    fn manager() -> MovieManager<InMemoryMovieRepository> {
        MovieManager::new(InMemoryMovieRepository::new())
    }

    fn movie(title: &str) -> MovieRecord {
        MovieRecord::new(
            title,
            "Director",
            2025,
            100,
            "Platform",
            5.0,
            "tag",
            "06-25-2025",
        )
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ManagerError::MissingRecord.code(), "missing_record");
        assert_eq!(
            ManagerError::NotFound("x".to_string()).code(),
            "not_found"
        );
    }

    #[test]
    fn add_clears_caller_supplied_id() {
        let mut manager = manager();
        let mut input = movie("Movie");
        input.id = Some(99);

        let stored = manager.try_add(&input).unwrap();
        assert_eq!(stored.id, Some(1));
    }

    #[test]
    fn update_field_rejects_title_edits_without_mutation() {
        let mut manager = manager();
        manager.try_add(&movie("Movie")).unwrap();

        let err = manager
            .try_update_field("movie", MovieField::Title, "Other")
            .unwrap_err();
        assert!(matches!(err, ManagerError::Validation(_)));
        assert_eq!(err.field_errors()[0].field, MovieField::Title);
        assert!(manager.find_movie("Movie").is_some());
    }

    #[test]
    fn update_field_validates_merged_record() {
        let mut manager = manager();
        manager.try_add(&movie("Movie")).unwrap();

        assert!(!manager.update_field("Movie", MovieField::Rating, "12.0"));
        assert!(!manager.update_field("Movie", MovieField::DateWatched, "02-30-2025"));
        assert!(manager.update_field("Movie", MovieField::Tags, "slasher, remake"));

        let stored = manager.find_movie("MOVIE").unwrap();
        assert_eq!(stored.rating, 5.0);
        assert_eq!(stored.date_watched, "06-25-2025");
        assert_eq!(stored.tags, "slasher, remake");
    }

    #[test]
    fn lenient_config_tracks_points_and_allows_duplicates() {
        let mut manager =
            MovieManager::with_config(InMemoryMovieRepository::new(), ManagerConfig::lenient());
        assert!(manager.add_movie(Some(&movie("Twin"))));
        assert!(manager.add_movie(Some(&movie("twin"))));
        assert_eq!(manager.account_points(), 20);
        assert_eq!(manager.list_movies().len(), 2);
    }
}
