//! Genre frequency tally over the liked movies.

use crate::traits::MovieCatalogClient;
use crate::types::{FetchError, GenreLabel, Movie};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One genre and how many liked movies carried it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: GenreLabel,
    pub count: u32,
}

/// Genre -> frequency mapping that remembers discovery order
///
/// Iteration and ranking are deterministic: genres appear in the order
/// they were first counted, and [`GenreTally::ranked`] keeps that order
/// among equal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreTally {
    entries: Vec<GenreCount>,
    #[serde(skip)]
    positions: HashMap<GenreLabel, usize>,
}

impl GenreTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `genre`
    pub fn increment(&mut self, genre: &str) {
        self.add(genre, 1);
    }

    /// Add `count` occurrences of `genre`
    pub fn add(&mut self, genre: &str, count: u32) {
        match self.positions.get(genre) {
            Some(&pos) => self.entries[pos].count += count,
            None => {
                self.positions.insert(genre.to_string(), self.entries.len());
                self.entries.push(GenreCount {
                    genre: genre.to_string(),
                    count,
                });
            }
        }
    }

    /// Count for a genre, 0 if never seen
    pub fn get(&self, genre: &str) -> u32 {
        self.positions
            .get(genre)
            .map(|&pos| self.entries[pos].count)
            .unwrap_or(0)
    }

    /// Number of distinct genres
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of (movie, genre) pairs seen
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Genres in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &GenreCount> {
        self.entries.iter()
    }

    /// Genres by descending count; ties keep discovery order
    pub fn ranked(&self) -> Vec<&GenreCount> {
        let mut ranked: Vec<&GenreCount> = self.entries.iter().collect();
        // sort_by is stable, which is what makes the tie-break hold
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for GenreTally {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut tally = GenreTally::new();
        for (genre, count) in iter {
            tally.add(genre.as_ref(), count);
        }
        tally
    }
}

/// Tally plus the bookkeeping of which genre fetches failed
#[derive(Debug, Clone, Default)]
pub struct GenreAggregation {
    pub tally: GenreTally,
    /// Liked movies that were looked up
    pub movies_considered: usize,
    /// Liked movies whose genres could not be fetched
    pub failed: Vec<(Movie, FetchError)>,
}

impl GenreAggregation {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Builds a [`GenreTally`] by asking the catalog for each liked movie's genres
pub struct GenreAggregator<'a> {
    catalog: &'a dyn MovieCatalogClient,
}

impl<'a> GenreAggregator<'a> {
    pub fn new(catalog: &'a dyn MovieCatalogClient) -> Self {
        Self { catalog }
    }

    /// Tally genres across `liked`
    ///
    /// A movie whose lookup fails contributes nothing; the others are
    /// still counted.
    pub fn aggregate(&self, liked: &[Movie]) -> GenreTally {
        self.aggregate_with(liked, |_, _| {}).tally
    }

    /// Like [`aggregate`](Self::aggregate), reporting each lookup as it completes
    pub fn aggregate_with<F>(&self, liked: &[Movie], mut on_fetch: F) -> GenreAggregation
    where
        F: FnMut(&Movie, Result<&[GenreLabel], &FetchError>),
    {
        let mut aggregation = GenreAggregation {
            movies_considered: liked.len(),
            ..Default::default()
        };

        for movie in liked {
            match self.catalog.fetch_genres(movie) {
                Ok(genres) => {
                    // A genre counts once per movie even if the catalog repeats it
                    let mut seen: HashSet<&str> = HashSet::new();
                    for genre in &genres {
                        if seen.insert(genre.as_str()) {
                            aggregation.tally.increment(genre);
                        }
                    }
                    debug!(movie = %movie, genres = ?genres, "Fetched genres");
                    on_fetch(movie, Ok(genres.as_slice()));
                }
                Err(err) => {
                    warn!(movie = %movie, error = %err, "Genre fetch failed, skipping movie");
                    on_fetch(movie, Err(&err));
                    aggregation.failed.push((movie.clone(), err));
                }
            }
        }

        aggregation
    }
}
