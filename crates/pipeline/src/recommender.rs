//! Turns a genre tally into a concrete suggestion list.

use crate::aggregator::GenreTally;
use crate::config::PipelineConfig;
use crate::traits::MovieCatalogClient;
use crate::types::{GenreLabel, Movie};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What happened when candidates were requested for the selected genres
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CandidateStatus {
    /// The tally was empty, so there was nothing to ask the catalog for
    NoGenres,
    /// The catalog returned at least one movie
    Found,
    /// The catalog answered with an empty list
    NoneFound,
    /// The catalog call failed; the message is for display only
    FetchFailed(String),
}

/// Selected genres and the movies suggested for them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionResult {
    /// Top genres, most frequent first
    pub genres: Vec<GenreLabel>,
    /// Candidates in the order the catalog returned them
    pub candidates: Vec<Movie>,
    pub status: CandidateStatus,
}

impl SuggestionResult {
    /// Whether any genre could be computed from the tally
    pub fn has_genres(&self) -> bool {
        !self.genres.is_empty()
    }

    /// Genres were selected but the catalog call itself failed
    pub fn candidates_unavailable(&self) -> bool {
        matches!(self.status, CandidateStatus::FetchFailed(_))
    }
}

/// Picks the top genres and asks the catalog for matching movies
pub struct Recommender<'a> {
    catalog: &'a dyn MovieCatalogClient,
    display_limit: usize,
    fetch_limit: usize,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a dyn MovieCatalogClient, config: &PipelineConfig) -> Self {
        Self {
            catalog,
            display_limit: config.candidate_display_limit,
            fetch_limit: config.candidate_fetch_limit.max(config.candidate_display_limit),
        }
    }

    /// The `top_n` most frequent genres
    ///
    /// Equal counts keep the order in which the genres were first
    /// discovered. Fewer than `top_n` distinct genres means all of them.
    pub fn select_genres(tally: &GenreTally, top_n: usize) -> Vec<GenreLabel> {
        tally
            .ranked()
            .into_iter()
            .take(top_n)
            .map(|entry| entry.genre.clone())
            .collect()
    }

    /// Rank the tally, query candidates and truncate them for display
    ///
    /// Never fails: an empty tally yields no genres and no catalog call,
    /// and a failed candidate fetch keeps the genres with no candidates.
    pub fn recommend(&self, tally: &GenreTally, top_n: usize) -> SuggestionResult {
        let genres = Self::select_genres(tally, top_n);
        if genres.is_empty() {
            debug!("Empty tally, skipping candidate fetch");
            return SuggestionResult {
                genres,
                candidates: Vec::new(),
                status: CandidateStatus::NoGenres,
            };
        }

        info!(genres = ?genres, "Selected top genres");

        match self.catalog.fetch_top_by_genres(&genres, self.fetch_limit) {
            Ok(mut candidates) => {
                candidates.truncate(self.display_limit);
                let status = if candidates.is_empty() {
                    CandidateStatus::NoneFound
                } else {
                    CandidateStatus::Found
                };
                info!(count = candidates.len(), "Fetched candidate movies");
                SuggestionResult {
                    genres,
                    candidates,
                    status,
                }
            }
            Err(err) => {
                warn!(error = %err, "Candidate fetch failed");
                SuggestionResult {
                    genres,
                    candidates: Vec::new(),
                    status: CandidateStatus::FetchFailed(err.to_string()),
                }
            }
        }
    }
}
