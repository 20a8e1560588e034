//! Seams between the pipeline and the outside world.
//!
//! The pipeline never talks to a dataset, a network or a terminal directly;
//! it consumes these two traits. Both are mocked with `mockall` in tests.

use crate::quiz::QuizError;
use crate::types::{FetchError, GenreLabel, Movie};

/// Source of "top" movies and their genre metadata.
///
/// Every call may fail. Callers convert failures into degraded results at
/// the call site; nothing is retried.
#[cfg_attr(test, mockall::automock)]
pub trait MovieCatalogClient: Send + Sync {
    /// The catalog's list of top movies
    fn fetch_top_catalog(&self) -> Result<Vec<Movie>, FetchError>;

    /// Genre labels of one movie, without duplicates, in catalog order
    fn fetch_genres(&self, movie: &Movie) -> Result<Vec<GenreLabel>, FetchError>;

    /// Top movies for a genre selection, at most `limit` of them
    fn fetch_top_by_genres(
        &self,
        genres: &[GenreLabel],
        limit: usize,
    ) -> Result<Vec<Movie>, FetchError>;
}

/// Prompt/response channel to the person taking the quiz.
#[cfg_attr(test, mockall::automock)]
pub trait InteractionChannel {
    /// Ask a yes/no question.
    ///
    /// Returns only once a valid answer arrives; anything else is
    /// re-prompted by the channel itself. Fails only when the channel is
    /// closed or broken.
    fn prompt_yes_no(&mut self, text: &str) -> Result<bool, QuizError>;

    /// Ask for a line of free-form text
    fn prompt_text(&mut self, text: &str) -> Result<String, QuizError>;

    /// Show a progress or status line; no answer expected
    fn notify(&mut self, _message: &str) {}
}
