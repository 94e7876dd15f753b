//! Process-lifetime in-memory movie repository.
//!
//! Keeps records in insertion order. Ids are assigned from a counter that
//! never goes backwards, so a deleted id is not handed out again.

use crate::model::movie::{normalize_title_key, MovieId, MovieRecord};
use crate::repo::movie_repo::{MovieRepository, RepoError, RepoResult};

/// Vec-backed repository for sessions without a database file.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    movies: Vec<MovieRecord>,
    last_id: MovieId,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: MovieId) -> Option<usize> {
        self.movies.iter().position(|movie| movie.id == Some(id))
    }
}

impl MovieRepository for InMemoryMovieRepository {
    fn create_movie(&mut self, movie: &MovieRecord) -> RepoResult<MovieId> {
        if let Some(id) = movie.id {
            return Err(RepoError::InvalidData(format!(
                "new movie already carries id {id}"
            )));
        }

        self.last_id += 1;
        let mut stored = movie.clone();
        stored.id = Some(self.last_id);
        self.movies.push(stored);
        Ok(self.last_id)
    }

    fn update_movie(&mut self, movie: &MovieRecord) -> RepoResult<()> {
        let id = movie.id.ok_or_else(|| {
            RepoError::InvalidData(format!("cannot update unsaved movie `{}`", movie.title))
        })?;
        let index = self.position(id).ok_or(RepoError::NotFound(id))?;
        self.movies[index] = movie.clone();
        Ok(())
    }

    fn delete_movie(&mut self, id: MovieId) -> RepoResult<()> {
        let index = self.position(id).ok_or(RepoError::NotFound(id))?;
        self.movies.remove(index);
        Ok(())
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Option<MovieRecord>> {
        Ok(self.position(id).map(|index| self.movies[index].clone()))
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Option<MovieRecord>> {
        let key = normalize_title_key(title);
        Ok(self
            .movies
            .iter()
            .find(|movie| movie.title_key() == key)
            .cloned())
    }

    fn list_movies(&self) -> RepoResult<Vec<MovieRecord>> {
        Ok(self.movies.clone())
    }

    fn count_movies(&self) -> RepoResult<u64> {
        Ok(self.movies.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryMovieRepository;
    use crate::model::movie::MovieRecord;
    use crate::repo::movie_repo::{MovieRepository, RepoError};

    fn movie(title: &str) -> MovieRecord {
        MovieRecord::new(title, "", 0, 0, "", 5.0, "", "01-01-2020")
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut repo = InMemoryMovieRepository::new();
        let first = repo.create_movie(&movie("a")).unwrap();
        repo.delete_movie(first).unwrap();
        let second = repo.create_movie(&movie("b")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn find_by_title_returns_earliest_duplicate() {
        let mut repo = InMemoryMovieRepository::new();
        let first = repo.create_movie(&movie("Halloween")).unwrap();
        repo.create_movie(&movie("HALLOWEEN")).unwrap();

        let found = repo.find_by_title("halloween").unwrap().unwrap();
        assert_eq!(found.id, Some(first));
    }

    #[test]
    fn list_is_a_detached_copy() {
        let mut repo = InMemoryMovieRepository::new();
        repo.create_movie(&movie("Alien")).unwrap();

        let mut listed = repo.list_movies().unwrap();
        listed[0].title = "changed".to_string();
        listed.clear();

        assert_eq!(repo.list_movies().unwrap()[0].title, "Alien");
    }

    #[test]
    fn update_and_delete_unknown_id_return_not_found() {
        let mut repo = InMemoryMovieRepository::new();
        let mut ghost = movie("ghost");
        ghost.id = Some(42);

        assert!(matches!(
            repo.update_movie(&ghost).unwrap_err(),
            RepoError::NotFound(42)
        ));
        assert!(matches!(
            repo.delete_movie(42).unwrap_err(),
            RepoError::NotFound(42)
        ));
    }
}
