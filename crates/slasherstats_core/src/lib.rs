//! Core domain logic for SlasherStats, a watched-horror-movie tracker.
//! This crate owns the record rules; front ends only collect input and
//! render results.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{DuplicateTitlePolicy, ManagerConfig, PointsMode, POINTS_PER_MOVIE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::form::MovieForm;
pub use model::movie::{FieldError, MovieField, MovieId, MovieRecord, MovieValidationError};
pub use repo::memory_repo::InMemoryMovieRepository;
pub use repo::movie_repo::{MovieRepository, RepoError, RepoResult, SqliteMovieRepository};
pub use service::bulk_import::{
    parse_import_line, parse_import_record, ImportReport, SkipReason, SkippedLine,
};
pub use service::movie_manager::{ManagerError, ManagerResult, MovieManager};
pub use validation::{is_valid_date, is_valid_rating, validate_movie, ValidationProfile};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
