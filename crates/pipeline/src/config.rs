//! Tunable parameters of the quiz and recommendation pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems detected before a session starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },

    #[error("required_likes ({required_likes}) cannot exceed sample_size ({sample_size})")]
    UnreachableQuota {
        required_likes: usize,
        sample_size: usize,
    },

    #[error(
        "candidate_fetch_limit ({fetch_limit}) must be at least candidate_display_limit ({display_limit})"
    )]
    FetchBelowDisplay {
        fetch_limit: usize,
        display_limit: usize,
    },
}

/// Pipeline parameters
///
/// Defaults: 30 sampled movies, 5 required likes, 3 top genres and 10
/// displayed suggestions picked from a page of 50 catalog results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Movies drawn from the catalog for one quiz (`SAMPLE_SIZE`)
    pub sample_size: usize,
    /// Likes needed before a taste is computed (`REQUIRED_LIKES`)
    pub required_likes: usize,
    /// Genres used to query suggestions (`TOP_GENRES`)
    pub top_genres: usize,
    /// Suggestions shown to the user (`CANDIDATE_DISPLAY_LIMIT`)
    pub candidate_display_limit: usize,
    /// Page size requested from the catalog before truncation
    pub candidate_fetch_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: 30,
            required_likes: 5,
            top_genres: 3,
            candidate_display_limit: 10,
            candidate_fetch_limit: 50,
        }
    }
}

impl PipelineConfig {
    /// Check the parameters describe a quiz that can actually succeed
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("sample_size", self.sample_size),
            ("required_likes", self.required_likes),
            ("top_genres", self.top_genres),
            ("candidate_display_limit", self.candidate_display_limit),
        ] {
            if value < 1 {
                return Err(ConfigError::TooSmall {
                    field,
                    min: 1,
                    value,
                });
            }
        }

        if self.required_likes > self.sample_size {
            return Err(ConfigError::UnreachableQuota {
                required_likes: self.required_likes,
                sample_size: self.sample_size,
            });
        }

        if self.candidate_fetch_limit < self.candidate_display_limit {
            return Err(ConfigError::FetchBelowDisplay {
                fetch_limit: self.candidate_fetch_limit,
                display_limit: self.candidate_display_limit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.sample_size, 30);
        assert_eq!(config.required_likes, 5);
        assert_eq!(config.top_genres, 3);
        assert_eq!(config.candidate_display_limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_likes_rejected() {
        let config = PipelineConfig {
            required_likes: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooSmall {
                field: "required_likes",
                min: 1,
                value: 0
            })
        );
    }

    #[test]
    fn test_quota_above_sample_rejected() {
        let config = PipelineConfig {
            sample_size: 4,
            required_likes: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnreachableQuota { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"required_likes": 3}"#).unwrap();
        assert_eq!(config.required_likes, 3);
        assert_eq!(config.sample_size, 30);
    }
}
