//! # Data Loader Crate
//!
//! Loads and indexes the MovieLens 1M movie catalog that backs the taste
//! quiz.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, MovieStats, DataIndex)
//! - **parser**: Parse .dat files into Rust structs
//! - **index**: Build indices, statistics and ranked "top" listings
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-1m"))?;
//!
//! // The 250 best-rated movies with at least 500 ratings
//! let top = index.top_rated(250, 500);
//! let dramas = index.top_rated_by_genres(&["Drama", "War"], 50, 500);
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{DataIndex, GenreLabel, Movie, MovieId, MovieStats, Rating, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_story() -> Movie {
        Movie {
            id: 1,
            title: "Toy Story".to_string(),
            year: Some(1995),
            genres: vec![
                "Animation".to_string(),
                "Children's".to_string(),
                "Comedy".to_string(),
            ],
        }
    }

    #[test]
    fn test_new_index_is_empty() {
        let index = DataIndex::new();
        assert_eq!(index.counts(), (0, 0));
        assert!(index.get_movie(999).is_none());
        assert!(index.get_movies_by_genre("Action").is_empty());
        assert!(index.get_movie_stats(999).is_none());
        assert!(index.top_rated(10, 0).is_empty());
    }

    #[test]
    fn test_genre_labels_match_exactly() {
        let mut index = DataIndex::new();
        index.insert_movie(toy_story());
        index.build_secondary_indices();

        let movie = index.get_movie(1).unwrap();
        assert!(movie.has_genre("Children's"));
        assert!(!movie.has_genre("children's"));
        assert_eq!(index.get_movies_by_genre("Children's"), &[1]);
        assert!(index.get_movies_by_genre("Childrens").is_empty());
    }

    #[test]
    fn test_ratings_and_stats() {
        let mut index = DataIndex::new();
        index.insert_movie(toy_story());
        for (user_id, rating) in [(1, 5.0), (2, 3.0)] {
            index.insert_rating(Rating {
                user_id,
                movie_id: 1,
                rating,
                timestamp: 978300760,
            });
        }
        index.compute_movie_stats();

        assert_eq!(index.counts(), (1, 2));
        let stats = index.get_movie_stats(1).unwrap();
        assert_eq!(stats.rating_count, 2);
        assert_eq!(stats.avg_rating, 4.0);
        // Only movie in the index, so it is its own global mean
        assert_eq!(index.global_mean(), 4.0);
        assert!((index.weighted_rating(stats, 500) - 4.0).abs() < 1e-5);
    }
}
