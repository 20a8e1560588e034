//! MovieLens-backed movie catalog
//!
//! Plays the role of an online "top movies" service on top of a local
//! MovieLens dataset. The dataset is loaded on first use; a failed load is
//! reported as an unavailable catalog and attempted again on the next call.

use data_loader::DataIndex;
use pipeline::{FetchError, GenreLabel, Movie, MovieCatalogClient};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Movie catalog served from a MovieLens `DataIndex`
pub struct MovieLensCatalog {
    /// Where to load the dataset from when it is not loaded yet
    data_dir: Option<PathBuf>,

    /// Cached index, only ever set after a successful load
    index: Mutex<Option<Arc<DataIndex>>>,

    /// Length of the top catalog (default: 250)
    catalog_size: usize,

    /// Minimum ratings for a movie to be listed anywhere (default: 500)
    min_votes: u32,
}

impl MovieLensCatalog {
    /// Catalog that loads `data_dir` lazily
    pub fn from_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            index: Mutex::new(None),
            catalog_size: 250,
            min_votes: 500,
        }
    }

    /// Catalog over an index that is already in memory
    pub fn from_index(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_dir: None,
            index: Mutex::new(Some(data_index)),
            catalog_size: 250,
            min_votes: 500,
        }
    }

    /// Configure the top catalog length (default: 250)
    pub fn with_catalog_size(mut self, size: usize) -> Self {
        self.catalog_size = size;
        self
    }

    /// Configure the minimum rating count (default: 500)
    pub fn with_min_votes(mut self, votes: u32) -> Self {
        self.min_votes = votes;
        self
    }

    /// The loaded index, loading it first if needed
    fn index(&self) -> Result<Arc<DataIndex>, FetchError> {
        let mut guard = self
            .index
            .lock()
            .map_err(|_| FetchError::Unavailable("catalog state poisoned".to_string()))?;

        if let Some(index) = guard.as_ref() {
            return Ok(index.clone());
        }

        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| FetchError::Unavailable("no dataset configured".to_string()))?;

        info!("Loading MovieLens catalog from {}", data_dir.display());
        let index = DataIndex::load_from_files(data_dir).map_err(|e| {
            warn!(error = %e, "Failed to load MovieLens catalog");
            FetchError::Unavailable(e.to_string())
        })?;

        let index = Arc::new(index);
        *guard = Some(index.clone());
        Ok(index)
    }
}

/// Strip a dataset movie down to what the quiz sees
fn to_quiz_movie(movie: &data_loader::Movie) -> Movie {
    Movie::new(movie.id.to_string(), movie.title.clone(), movie.year)
}

impl MovieCatalogClient for MovieLensCatalog {
    #[instrument(skip(self))]
    fn fetch_top_catalog(&self) -> Result<Vec<Movie>, FetchError> {
        let index = self.index()?;
        let movies: Vec<Movie> = index
            .top_rated(self.catalog_size, self.min_votes)
            .into_iter()
            .map(to_quiz_movie)
            .collect();

        if movies.is_empty() {
            return Err(FetchError::Unavailable(format!(
                "no movie has at least {} ratings",
                self.min_votes
            )));
        }

        debug!("Top catalog has {} movies", movies.len());
        Ok(movies)
    }

    fn fetch_genres(&self, movie: &Movie) -> Result<Vec<GenreLabel>, FetchError> {
        let index = self.index()?;
        let movie_id = movie
            .id
            .parse::<data_loader::MovieId>()
            .map_err(|_| FetchError::NotFound(movie.id.clone()))?;

        index
            .get_movie(movie_id)
            .map(|m| m.genres.clone())
            .ok_or_else(|| FetchError::NotFound(movie.id.clone()))
    }

    #[instrument(skip(self))]
    fn fetch_top_by_genres(
        &self,
        genres: &[GenreLabel],
        limit: usize,
    ) -> Result<Vec<Movie>, FetchError> {
        if genres.is_empty() {
            return Err(FetchError::InvalidQuery("empty genre selection".to_string()));
        }

        let index = self.index()?;
        let movies: Vec<Movie> = index
            .top_rated_by_genres(genres, limit, self.min_votes)
            .into_iter()
            .map(to_quiz_movie)
            .collect();

        debug!("Found {} movies for genres {:?}", movies.len(), genres);
        Ok(movies)
    }
}
