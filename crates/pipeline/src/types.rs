//! Value records handed across the catalog boundary.
//!
//! Movies are immutable once fetched and carry no back-references into the
//! catalog that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Genre identifier exactly as the catalog supplies it
pub type GenreLabel = String;

/// A movie as seen by the quiz
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Movie {
    /// Opaque catalog identifier, only meaningful to the catalog
    pub id: String,
    pub title: String,
    /// Release year; catalogs may not know it
    pub year: Option<u16>,
}

impl Movie {
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year,
        }
    }
}

impl fmt::Display for Movie {
    /// `[1994] The Shawshank Redemption`, or just the title without a year
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "[{}] {}", year, self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Errors reported by a movie catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The catalog could not be reached or loaded
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog has no record for the requested movie
    #[error("movie not found in catalog: {0}")]
    NotFound(String),

    /// The request itself was malformed (e.g. an empty genre set)
    #[error("invalid catalog query: {0}")]
    InvalidQuery(String),
}
