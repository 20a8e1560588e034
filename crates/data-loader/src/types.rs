//! Records parsed from MovieLens and the index that holds them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type UserId = u32;
pub type MovieId = u32;

/// Genre label exactly as written in movies.dat ("Children's", "Sci-Fi", ...)
///
/// Labels are never normalized; two genres are the same genre only when
/// their strings are equal.
pub type GenreLabel = String;

/// One line of movies.dat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Cleaned title: "(1995)" removed, trailing article moved to the
    /// front ("Matrix, The" -> "The Matrix")
    pub title: String,
    pub year: Option<u16>,
    /// In movies.dat order
    pub genres: Vec<GenreLabel>,
}

impl Movie {
    /// Exact label match
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// One line of ratings.dat; `rating` is 1.0 to 5.0
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
    pub timestamp: i64,
}

/// Per-movie aggregates, computed once after loading
///
/// The weighted rating is not stored: its prior depends on the `min_votes`
/// of each query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovieStats {
    pub avg_rating: f32,
    pub rating_count: u32,
}

/// In-memory MovieLens catalog
///
/// Lookups hand out references; the index owns every record.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) movies: HashMap<MovieId, Movie>,
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,
    /// Label -> ids of the movies carrying it, ascending
    pub(crate) genre_index: HashMap<GenreLabel, Vec<MovieId>>,
    pub(crate) movie_stats: HashMap<MovieId, MovieStats>,
    /// Mean of every rating in the index
    pub(crate) global_mean: f32,
}

impl DataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Ids of the movies labelled `genre`
    pub fn get_movies_by_genre(&self, genre: &str) -> &[MovieId] {
        self.genre_index.get(genre).map_or(&[], Vec::as_slice)
    }

    pub fn get_movie_stats(&self, movie_id: MovieId) -> Option<&MovieStats> {
        self.movie_stats.get(&movie_id)
    }

    /// 0.0 until stats are computed or when nothing is rated
    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    pub fn insert_rating(&mut self, rating: Rating) {
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);
    }

    /// (movies, ratings)
    pub fn counts(&self) -> (usize, usize) {
        let ratings = self.movie_ratings.values().map(Vec::len).sum();
        (self.movies.len(), ratings)
    }
}
