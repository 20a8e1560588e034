//! Preference elicitation and recommendation pipeline.
//!
//! This crate provides:
//! - Sampler for drawing the quiz sample from a catalog
//! - QuizSession / QuizEngine for the like/dislike loop
//! - GenreAggregator for turning liked movies into a genre tally
//! - Recommender for ranking genres and fetching suggestions
//!
//! ## Architecture
//! Data flows strictly one way:
//! 1. Sampler draws `sample_size` distinct movies from the top catalog
//! 2. QuizEngine asks about each until `required_likes` is met
//! 3. GenreAggregator counts genres across the liked movies
//! 4. Recommender picks the top genres and fetches candidates
//!
//! The catalog and the person answering are reached only through the
//! [`MovieCatalogClient`] and [`InteractionChannel`] traits.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{GenreAggregator, PipelineConfig, QuizEngine, Recommender, Sampler};
//!
//! let config = PipelineConfig::default();
//! let catalog_movies = catalog.fetch_top_catalog()?;
//! let sample = Sampler::new().sample(&catalog_movies, config.sample_size);
//!
//! let outcome = QuizEngine::new(config.required_likes).run(sample, &mut channel)?;
//! if outcome.quota_reached() {
//!     let tally = GenreAggregator::new(&catalog).aggregate(&outcome.liked);
//!     let result = Recommender::new(&catalog, &config).recommend(&tally, config.top_genres);
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod quiz;
pub mod recommender;
pub mod sampler;
pub mod traits;
pub mod types;

// Re-export main types
pub use aggregator::{GenreAggregation, GenreAggregator, GenreCount, GenreTally};
pub use config::{ConfigError, PipelineConfig};
pub use quiz::{QuizEngine, QuizError, QuizOutcome, QuizSession, QuizState};
pub use recommender::{CandidateStatus, Recommender, SuggestionResult};
pub use sampler::Sampler;
pub use traits::{InteractionChannel, MovieCatalogClient};
pub use types::{FetchError, GenreLabel, Movie};
