//! Random draw of the movies a quiz is run on.

use crate::types::Movie;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use tracing::{debug, warn};

/// Draws duplicate-free random subsets of a catalog
///
/// Owns its RNG so a seeded sampler replays the same sequence of quizzes.
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Sampler seeded from the thread-local generator
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic sampler for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick `k` distinct movies from `catalog` in uniformly random order
    ///
    /// The catalog is left untouched. An empty catalog yields an empty
    /// sample. Asking for more movies than the catalog holds returns the
    /// whole catalog shuffled.
    pub fn sample(&mut self, catalog: &[Movie], k: usize) -> Vec<Movie> {
        if catalog.is_empty() {
            debug!("Empty catalog, nothing to sample");
            return Vec::new();
        }

        let amount = if k > catalog.len() {
            warn!(
                requested = k,
                available = catalog.len(),
                "Sample size exceeds catalog, using the whole catalog"
            );
            catalog.len()
        } else {
            k
        };

        // index::sample returns fully shuffled, distinct positions
        index::sample(&mut self.rng, catalog.len(), amount)
            .into_iter()
            .map(|i| catalog[i].clone())
            .collect()
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn catalog(size: usize) -> Vec<Movie> {
        (0..size)
            .map(|i| Movie::new(i.to_string(), format!("Movie {i}"), Some(1990)))
            .collect()
    }

    #[test]
    fn test_sample_is_distinct_and_from_catalog() {
        let catalog = catalog(250);
        let mut sampler = Sampler::seeded(7);

        for _ in 0..20 {
            let sample = sampler.sample(&catalog, 30);
            assert_eq!(sample.len(), 30);

            let ids: HashSet<&str> = sample.iter().map(|m| m.id.as_str()).collect();
            assert_eq!(ids.len(), 30);
            assert!(sample.iter().all(|m| catalog.contains(m)));
        }
    }

    #[test]
    fn test_empty_catalog() {
        let mut sampler = Sampler::seeded(1);
        assert!(sampler.sample(&[], 30).is_empty());
    }

    #[test]
    fn test_oversized_request_returns_whole_catalog() {
        let catalog = catalog(5);
        let mut sampler = Sampler::seeded(3);

        let sample = sampler.sample(&catalog, 30);
        assert_eq!(sample.len(), 5);
        let ids: HashSet<&str> = sample.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_seeded_samplers_agree() {
        let catalog = catalog(100);
        let a = Sampler::seeded(42).sample(&catalog, 10);
        let b = Sampler::seeded(42).sample(&catalog, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_does_not_mutate_catalog() {
        let catalog = catalog(50);
        let before = catalog.clone();
        Sampler::seeded(9).sample(&catalog, 50);
        assert_eq!(catalog, before);
    }
}
