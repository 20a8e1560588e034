//! DataIndex building, statistics and ranked queries.
//!
//! This module builds the DataIndex from parsed data:
//! - Primary indices (movies, per-movie ratings)
//! - Secondary genre index
//! - Aggregate statistics (average, count, global mean)
//! - "Top" listings the catalog serves from

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

impl DataIndex {
    /// Parse `movies.dat` and `ratings.dat` under `data_dir` into a ready index
    ///
    /// The two files are parsed concurrently; stats and the genre index are
    /// built before the index is handed out, and dangling or out-of-range
    /// ratings fail the whole load.
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!(dir = %data_dir.display(), "Opening MovieLens dataset");

        let movies_path = data_dir.join("movies.dat");
        let ratings_path = data_dir.join("ratings.dat");

        let (movies, ratings) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        debug!(movies = movies.len(), ratings = ratings.len(), "Parsed dataset files");

        let mut index = DataIndex::new();
        for movie in movies {
            index.insert_movie(movie);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }

        index.build_secondary_indices();
        index.compute_movie_stats();
        index.validate()?;

        info!(movies = index.movies.len(), rated = index.movie_stats.len(), "Dataset ready");
        Ok(index)
    }

    /// Build the genre index after primary data is loaded
    ///
    /// Lists are sorted by movie id so lookups are reproducible regardless
    /// of HashMap iteration order.
    pub fn build_secondary_indices(&mut self) {
        self.genre_index.clear();
        for (movie_id, movie) in &self.movies {
            for genre in &movie.genres {
                self.genre_index
                    .entry(genre.clone())
                    .or_default()
                    .push(*movie_id);
            }
        }
        for ids in self.genre_index.values_mut() {
            ids.sort_unstable();
        }
    }

    /// Compute the global mean and the average and count of every rated movie
    pub fn compute_movie_stats(&mut self) {
        let (sum, count) = self
            .movie_ratings
            .par_iter()
            .map(|(_, ratings)| {
                let total: f64 = ratings.iter().map(|r| r.rating as f64).sum();
                (total, ratings.len() as u64)
            })
            .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        self.global_mean = if count > 0 {
            (sum / count as f64) as f32
        } else {
            0.0
        };

        self.movie_stats = self
            .movie_ratings
            .par_iter()
            .map(|(&movie_id, ratings)| {
                let rating_count = ratings.len() as u32;
                let avg_rating = if rating_count > 0 {
                    let total: f32 = ratings.iter().map(|r| r.rating).sum();
                    total / rating_count as f32
                } else {
                    0.0
                };

                (
                    movie_id,
                    MovieStats {
                        avg_rating,
                        rating_count,
                    },
                )
            })
            .collect();
    }

    /// Bayesian rating `v/(v+m)*R + m/(v+m)*C` with `m = min_votes`
    ///
    /// `v` and `R` are the movie's count and average, `C` the global mean.
    pub fn weighted_rating(&self, stats: &MovieStats, min_votes: u32) -> f32 {
        compute_weighted_rating(
            stats.avg_rating,
            stats.rating_count,
            self.global_mean,
            min_votes as f32,
        )
    }

    /// Every rating must point at a known movie and lie within 1.0..=5.0
    pub fn validate(&self) -> Result<()> {
        for ratings in self.movie_ratings.values() {
            for rating in ratings {
                if !self.movies.contains_key(&rating.movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: rating.movie_id,
                    });
                }
                if !(1.0..=5.0).contains(&rating.rating) {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.rating.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Highest weighted-rating movies with at least `min_votes` ratings
    ///
    /// Ties on the weighted rating fall back to ascending movie id.
    pub fn top_rated(&self, limit: usize, min_votes: u32) -> Vec<&Movie> {
        let mut ranked: Vec<(&Movie, f32)> = self
            .movies
            .values()
            .filter_map(|movie| {
                let stats = self.movie_stats.get(&movie.id)?;
                (stats.rating_count >= min_votes)
                    .then(|| (movie, self.weighted_rating(stats, min_votes)))
            })
            .collect();

        ranked.sort_by(|a, b| by_weighted_rating(a.0, a.1, b.0, b.1));
        ranked.truncate(limit);
        ranked.into_iter().map(|(movie, _)| movie).collect()
    }

    /// Highest-rated movies for a set of genres
    ///
    /// Movies carrying more of the requested genres come first; within the
    /// same overlap the weighted rating decides, then the movie id.
    pub fn top_rated_by_genres<S: AsRef<str>>(
        &self,
        genres: &[S],
        limit: usize,
        min_votes: u32,
    ) -> Vec<&Movie> {
        let mut overlap: HashMap<MovieId, usize> = HashMap::new();
        for genre in genres {
            for &movie_id in self.get_movies_by_genre(genre.as_ref()) {
                *overlap.entry(movie_id).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&Movie, usize, f32)> = overlap
            .into_iter()
            .filter_map(|(movie_id, matched)| {
                let movie = self.movies.get(&movie_id)?;
                let stats = self.movie_stats.get(&movie_id)?;
                (stats.rating_count >= min_votes)
                    .then(|| (movie, matched, self.weighted_rating(stats, min_votes)))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| by_weighted_rating(a.0, a.2, b.0, b.2))
        });
        ranked.truncate(limit);
        ranked.into_iter().map(|(movie, _, _)| movie).collect()
    }
}

/// Descending weighted rating, ascending id on ties
fn by_weighted_rating(a: &Movie, a_score: f32, b: &Movie, b_score: f32) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a.id.cmp(&b.id))
}

fn compute_weighted_rating(
    avg_rating: f32,
    rating_count: u32,
    global_mean: f32,
    prior: f32,
) -> f32 {
    let votes = rating_count as f32;
    let total = votes + prior;
    if total == 0.0 {
        return global_mean;
    }
    (votes / total) * avg_rating + (prior / total) * global_mean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year: Some(1990),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn rate(index: &mut DataIndex, movie_id: MovieId, value: f32, times: u32) {
        for user_id in 0..times {
            index.insert_rating(Rating {
                user_id,
                movie_id,
                rating: value,
                timestamp: 1_000_000,
            });
        }
    }

    fn build_index() -> DataIndex {
        let mut index = DataIndex::new();
        index.insert_movie(movie(1, "Heat", &["Action", "Crime", "Thriller"]));
        index.insert_movie(movie(2, "Casablanca", &["Drama", "Romance", "War"]));
        index.insert_movie(movie(3, "Speed", &["Action", "Romance", "Thriller"]));
        index.insert_movie(movie(4, "Obscure", &["Action"]));
        rate(&mut index, 1, 4.5, 40);
        rate(&mut index, 2, 4.8, 60);
        rate(&mut index, 3, 3.5, 40);
        rate(&mut index, 4, 5.0, 2);
        index.build_secondary_indices();
        index.compute_movie_stats();
        index
    }

    #[test]
    fn test_weighted_rating_pulls_toward_mean() {
        let sparse = compute_weighted_rating(5.0, 2, 3.0, 250.0);
        let dense = compute_weighted_rating(4.5, 10_000, 3.0, 250.0);
        assert!(sparse < 3.1);
        assert!(dense > 4.4);
        // No prior leaves the movie's own average
        assert_eq!(compute_weighted_rating(5.0, 2, 3.0, 0.0), 5.0);
    }

    #[test]
    fn test_prior_follows_min_votes() {
        let mut index = DataIndex::new();
        index.insert_movie(movie(1, "Acclaimed", &["Drama"]));
        index.insert_movie(movie(2, "Beloved", &["Drama"]));
        index.insert_movie(movie(3, "Flop", &["Drama"]));
        rate(&mut index, 1, 5.0, 500);
        rate(&mut index, 2, 4.25, 5000);
        rate(&mut index, 3, 1.0, 3625);
        index.build_secondary_indices();
        index.compute_movie_stats();
        assert_eq!(index.global_mean(), 3.0);

        // m = 500: Acclaimed sits halfway to the mean at 4.0, Beloved at 4.14
        let top: Vec<MovieId> = index.top_rated(10, 500).iter().map(|m| m.id).collect();
        assert_eq!(top, vec![2, 1, 3]);
        let by_genre: Vec<MovieId> = index
            .top_rated_by_genres(&["Drama"], 10, 500)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(by_genre, vec![2, 1, 3]);

        // m = 100: Acclaimed climbs to 4.67
        let top: Vec<MovieId> = index.top_rated(10, 100).iter().map(|m| m.id).collect();
        assert_eq!(top, vec![1, 2, 3]);
    }

    #[test]
    fn test_top_rated_respects_min_votes() {
        let index = build_index();
        let top: Vec<MovieId> = index.top_rated(10, 10).iter().map(|m| m.id).collect();
        assert_eq!(top, vec![2, 1, 3]);
    }

    #[test]
    fn test_top_rated_by_genres_prefers_full_overlap() {
        let index = build_index();
        let genres = ["Action", "Thriller", "Romance"];
        let top: Vec<MovieId> = index
            .top_rated_by_genres(&genres, 10, 10)
            .iter()
            .map(|m| m.id)
            .collect();
        // Speed matches all three, Heat two, Casablanca one
        assert_eq!(top, vec![3, 1, 2]);
    }

    #[test]
    fn test_top_rated_by_genres_limit() {
        let index = build_index();
        let top = index.top_rated_by_genres(&["Action"], 1, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, 1);
    }

    #[test]
    fn test_validate_rejects_dangling_rating() {
        let mut index = build_index();
        rate(&mut index, 99, 4.0, 1);
        assert!(matches!(
            index.validate(),
            Err(DataLoadError::MissingReference { id: 99, .. })
        ));
    }

    #[test]
    fn test_load_dataset() {
        // Requires the MovieLens 1M files under data/ml-1m at the workspace root
        let data_dir = Path::new("../../data/ml-1m");

        if data_dir.exists() {
            let index = DataIndex::load_from_files(data_dir).unwrap();
            let (movies, ratings) = index.counts();

            assert_eq!(movies, 3883);
            assert_eq!(ratings, 1000209);
        }
    }
}
