//! The like/dislike quiz.
//!
//! `QuizSession` is a value-level state machine: every answer consumes the
//! session and returns the next one, so the transitions can be tested
//! without any I/O. `QuizEngine` drives a session against an
//! [`InteractionChannel`].
//!
//! ```text
//! AwaitingInput --y--> Liked ----+--> QuotaReached   (likes == quota)
//!       |                        |
//!       +------n--> Skipped -----+--> Exhausted      (no movies left)
//!                                |
//!                                +--> next movie
//! ```

use crate::traits::InteractionChannel;
use crate::types::Movie;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// The interaction channel stopped delivering answers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// End of input before the quiz finished
    #[error("input closed before the quiz finished")]
    ChannelClosed,

    #[error("interaction channel failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => QuizError::ChannelClosed,
            _ => QuizError::Io(err.to_string()),
        }
    }
}

/// Where a quiz session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizState {
    /// No answer recorded yet
    AwaitingInput,
    /// Last answer was a like; more movies to go
    Liked,
    /// Last answer was a pass; more movies to go
    Skipped,
    /// The like quota was met; remaining movies are never shown
    QuotaReached,
    /// Every sampled movie was shown and the quota was not met
    Exhausted,
}

impl QuizState {
    pub fn is_terminal(self) -> bool {
        matches!(self, QuizState::QuotaReached | QuizState::Exhausted)
    }
}

/// Run-scoped quiz state: the sample, the cursor and the likes so far
#[derive(Debug, Clone)]
pub struct QuizSession {
    movies: Vec<Movie>,
    cursor: usize,
    liked: Vec<Movie>,
    required_likes: usize,
    state: QuizState,
}

impl QuizSession {
    pub fn new(movies: Vec<Movie>, required_likes: usize) -> Self {
        let state = if required_likes == 0 {
            QuizState::QuotaReached
        } else if movies.is_empty() {
            QuizState::Exhausted
        } else {
            QuizState::AwaitingInput
        };

        Self {
            movies,
            cursor: 0,
            liked: Vec::new(),
            required_likes,
            state,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn liked(&self) -> &[Movie] {
        &self.liked
    }

    /// Number of movies answered so far
    pub fn presented(&self) -> usize {
        self.cursor
    }

    /// The movie awaiting an answer, or `None` once the session is terminal
    pub fn current(&self) -> Option<&Movie> {
        if self.state.is_terminal() {
            return None;
        }
        self.movies.get(self.cursor)
    }

    /// Record the answer for the current movie and move on
    ///
    /// Recording on a terminal session is a no-op.
    pub fn record(mut self, liked: bool) -> Self {
        if self.current().is_none() {
            return self;
        }

        let movie = self.movies[self.cursor].clone();
        self.cursor += 1;

        if liked {
            self.liked.push(movie);
            self.state = if self.liked.len() == self.required_likes {
                QuizState::QuotaReached
            } else {
                QuizState::Liked
            };
        } else {
            self.state = QuizState::Skipped;
        }

        if !self.state.is_terminal() && self.cursor == self.movies.len() {
            self.state = QuizState::Exhausted;
        }
        self
    }

    /// Close the session into its outcome
    pub fn into_outcome(self) -> QuizOutcome {
        QuizOutcome {
            state: self.state,
            presented: self.cursor,
            sampled: self.movies.len(),
            liked: self.liked,
        }
    }
}

/// What a finished quiz produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOutcome {
    pub state: QuizState,
    /// Liked movies in the order they were liked
    pub liked: Vec<Movie>,
    /// Movies actually shown
    pub presented: usize,
    /// Movies in the sample
    pub sampled: usize,
}

impl QuizOutcome {
    pub fn quota_reached(&self) -> bool {
        self.state == QuizState::QuotaReached
    }
}

/// Drives a quiz over a channel until the quota is met or the sample runs out
pub struct QuizEngine {
    required_likes: usize,
}

impl QuizEngine {
    pub fn new(required_likes: usize) -> Self {
        Self { required_likes }
    }

    /// Ask about each sampled movie in turn
    ///
    /// Stops the moment the quota is reached. Fails only if the channel
    /// closes mid-quiz.
    pub fn run<C>(&self, movies: Vec<Movie>, channel: &mut C) -> Result<QuizOutcome, QuizError>
    where
        C: InteractionChannel + ?Sized,
    {
        let mut session = QuizSession::new(movies, self.required_likes);

        while let Some(movie) = session.current() {
            let question = format!("Do you like {}?", movie);
            let liked = channel.prompt_yes_no(&question)?;
            debug!(liked, position = session.presented(), "Quiz answer");
            session = session.record(liked);
        }

        let outcome = session.into_outcome();
        debug!(
            state = ?outcome.state,
            liked = outcome.liked.len(),
            presented = outcome.presented,
            "Quiz finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockInteractionChannel;
    use std::collections::HashSet;

    fn movies(count: usize) -> Vec<Movie> {
        (1..=count)
            .map(|i| Movie::new(i.to_string(), format!("Movie {i}"), Some(2000)))
            .collect()
    }

    /// Channel answering "yes" exactly at the given 1-based positions
    fn channel_liking(positions: &[usize]) -> MockInteractionChannel {
        let likes: HashSet<usize> = positions.iter().copied().collect();
        let mut asked = 0;
        let mut channel = MockInteractionChannel::new();
        channel.expect_prompt_yes_no().returning(move |_| {
            asked += 1;
            Ok(likes.contains(&asked))
        });
        channel
    }

    #[test]
    fn test_session_transitions() {
        let session = QuizSession::new(movies(3), 2);
        assert_eq!(session.state(), QuizState::AwaitingInput);

        let session = session.record(true);
        assert_eq!(session.state(), QuizState::Liked);
        let session = session.record(false);
        assert_eq!(session.state(), QuizState::Skipped);
        let session = session.record(true);
        assert_eq!(session.state(), QuizState::QuotaReached);
        assert_eq!(session.liked().len(), 2);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_last_like_meeting_quota_is_not_exhausted() {
        let session = QuizSession::new(movies(2), 2).record(true).record(true);
        assert_eq!(session.state(), QuizState::QuotaReached);
    }

    #[test]
    fn test_record_after_terminal_is_noop() {
        let session = QuizSession::new(movies(1), 1).record(true);
        let again = session.clone().record(true);
        assert_eq!(again.liked().len(), 1);
        assert_eq!(again.presented(), 1);
    }

    #[test]
    fn test_empty_sample_is_exhausted() {
        let session = QuizSession::new(Vec::new(), 5);
        assert_eq!(session.state(), QuizState::Exhausted);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_quota_reached_stops_prompting() {
        // Likes at positions 2, 5, 9, 14, 20 of a 30-movie sample
        let mut channel = channel_liking(&[2, 5, 9, 14, 20]);
        let outcome = QuizEngine::new(5).run(movies(30), &mut channel).unwrap();

        assert_eq!(outcome.state, QuizState::QuotaReached);
        assert_eq!(outcome.liked.len(), 5);
        assert_eq!(outcome.presented, 20);
        assert_eq!(outcome.sampled - outcome.presented, 10);
        let ids: Vec<&str> = outcome.liked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "5", "9", "14", "20"]);
    }

    #[test]
    fn test_exhausted_with_too_few_likes() {
        let mut channel = channel_liking(&[3, 17, 29]);
        let outcome = QuizEngine::new(5).run(movies(30), &mut channel).unwrap();

        assert_eq!(outcome.state, QuizState::Exhausted);
        assert_eq!(outcome.liked.len(), 3);
        assert_eq!(outcome.presented, 30);
        assert!(!outcome.quota_reached());
    }

    #[test]
    fn test_prompt_names_the_movie() {
        let mut channel = MockInteractionChannel::new();
        channel
            .expect_prompt_yes_no()
            .withf(|text| text == "Do you like [2000] Movie 1?")
            .times(1)
            .returning(|_| Ok(true));

        let outcome = QuizEngine::new(1).run(movies(3), &mut channel).unwrap();
        assert!(outcome.quota_reached());
    }

    #[test]
    fn test_closed_channel_aborts() {
        let mut channel = MockInteractionChannel::new();
        channel
            .expect_prompt_yes_no()
            .returning(|_| Err(QuizError::ChannelClosed));

        let result = QuizEngine::new(5).run(movies(30), &mut channel);
        assert_eq!(result, Err(QuizError::ChannelClosed));
    }

    #[test]
    fn test_liked_never_exceeds_quota() {
        let mut channel = channel_liking(&(1..=30).collect::<Vec<_>>());
        let outcome = QuizEngine::new(5).run(movies(30), &mut channel).unwrap();
        assert_eq!(outcome.liked.len(), 5);
        assert_eq!(outcome.presented, 5);
    }
}
