//! Movie repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and title lookup over the `horror_movies` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `title_key` is always written from `normalize_title_key(title)`.
//! - Write paths refuse records whose identity does not match the operation.

use crate::db::DbError;
use crate::model::movie::{normalize_title_key, MovieId, MovieRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MOVIE_SELECT_SQL: &str = "SELECT
    id,
    title,
    director,
    release_year,
    runtime_minutes,
    streaming_platform,
    rating,
    tags,
    date_watched
FROM horror_movies";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for movie persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(MovieId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "movie not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid movie data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record store contract used by the movie manager.
pub trait MovieRepository {
    /// Persists a new record and returns its assigned id.
    fn create_movie(&mut self, movie: &MovieRecord) -> RepoResult<MovieId>;
    /// Replaces the stored record with the same id.
    fn update_movie(&mut self, movie: &MovieRecord) -> RepoResult<()>;
    /// Removes one record by id.
    fn delete_movie(&mut self, id: MovieId) -> RepoResult<()>;
    fn get_movie(&self, id: MovieId) -> RepoResult<Option<MovieRecord>>;
    /// Case-insensitive exact title match; lowest id on ties.
    fn find_by_title(&self, title: &str) -> RepoResult<Option<MovieRecord>>;
    /// All records in ascending id order.
    fn list_movies(&self) -> RepoResult<Vec<MovieRecord>>;
    fn count_movies(&self) -> RepoResult<u64>;
}

impl<R: MovieRepository + ?Sized> MovieRepository for Box<R> {
    fn create_movie(&mut self, movie: &MovieRecord) -> RepoResult<MovieId> {
        (**self).create_movie(movie)
    }

    fn update_movie(&mut self, movie: &MovieRecord) -> RepoResult<()> {
        (**self).update_movie(movie)
    }

    fn delete_movie(&mut self, id: MovieId) -> RepoResult<()> {
        (**self).delete_movie(id)
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Option<MovieRecord>> {
        (**self).get_movie(id)
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Option<MovieRecord>> {
        (**self).find_by_title(title)
    }

    fn list_movies(&self) -> RepoResult<Vec<MovieRecord>> {
        (**self).list_movies()
    }

    fn count_movies(&self) -> RepoResult<u64> {
        (**self).count_movies()
    }
}

/// SQLite-backed movie repository.
pub struct SqliteMovieRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovieRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn create_movie(&mut self, movie: &MovieRecord) -> RepoResult<MovieId> {
        if let Some(id) = movie.id {
            return Err(RepoError::InvalidData(format!(
                "new movie already carries id {id}"
            )));
        }

        self.conn.execute(
            "INSERT INTO horror_movies (
                title,
                title_key,
                director,
                release_year,
                runtime_minutes,
                streaming_platform,
                rating,
                tags,
                date_watched
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                movie.title.as_str(),
                movie.title_key(),
                movie.director.as_str(),
                movie.release_year,
                movie.runtime_minutes,
                movie.streaming_platform.as_str(),
                movie.rating,
                movie.tags.as_str(),
                movie.date_watched.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_movie(&mut self, movie: &MovieRecord) -> RepoResult<()> {
        let id = movie.id.ok_or_else(|| {
            RepoError::InvalidData(format!("cannot update unsaved movie `{}`", movie.title))
        })?;

        let changed = self.conn.execute(
            "UPDATE horror_movies
             SET
                title = ?1,
                title_key = ?2,
                director = ?3,
                release_year = ?4,
                runtime_minutes = ?5,
                streaming_platform = ?6,
                rating = ?7,
                tags = ?8,
                date_watched = ?9
             WHERE id = ?10;",
            params![
                movie.title.as_str(),
                movie.title_key(),
                movie.director.as_str(),
                movie.release_year,
                movie.runtime_minutes,
                movie.streaming_platform.as_str(),
                movie.rating,
                movie.tags.as_str(),
                movie.date_watched.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_movie(&mut self, id: MovieId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM horror_movies WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Option<MovieRecord>> {
        let movie = self
            .conn
            .query_row(
                &format!("{MOVIE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_movie_row,
            )
            .optional()?;
        Ok(movie)
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Option<MovieRecord>> {
        let movie = self
            .conn
            .query_row(
                &format!("{MOVIE_SELECT_SQL} WHERE title_key = ?1 ORDER BY id ASC LIMIT 1;"),
                [normalize_title_key(title)],
                parse_movie_row,
            )
            .optional()?;
        Ok(movie)
    }

    fn list_movies(&self) -> RepoResult<Vec<MovieRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOVIE_SELECT_SQL} ORDER BY id ASC;"))?;
        let movies = stmt
            .query_map([], parse_movie_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    fn count_movies(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM horror_movies;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative movie count {count}")))
    }
}

fn parse_movie_row(row: &Row<'_>) -> rusqlite::Result<MovieRecord> {
    Ok(MovieRecord {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        director: row.get("director")?,
        release_year: row.get("release_year")?,
        runtime_minutes: row.get("runtime_minutes")?,
        streaming_platform: row.get("streaming_platform")?,
        rating: row.get("rating")?,
        tags: row.get("tags")?,
        date_watched: row.get("date_watched")?,
    })
}
