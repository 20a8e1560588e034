//! # Session Orchestrator
//!
//! Runs one complete quiz session, start to finish:
//! 1. Fetch the top catalog
//! 2. Sample the quiz movies
//! 3. Run the like/dislike quiz
//! 4. Tally the genres of the liked movies
//! 5. Pick the top genres and fetch suggestions
//! 6. Publish the certificate, if a publisher is configured
//!
//! Every failure along the way ends in a [`SessionOutcome`]; nothing here
//! returns an error to the caller. Progress is shown through the
//! interaction channel as it happens.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use pipeline::{
    ConfigError, FetchError, GenreAggregator, GenreLabel, InteractionChannel, Movie,
    MovieCatalogClient, PipelineConfig, QuizEngine, QuizError, Recommender, Sampler,
    SuggestionResult,
};
use publisher::{render_suggestion_message, Locator, ResultPublisher};

pub const TRY_AGAIN_LATER: &str = "Please try again later.";
pub const NOT_ENOUGH_LIKES: &str =
    "You didn't have enough likes for your movie taste to be calculated";
pub const FETCHING_GENRES: &str =
    "Please wait while we are fetching the genres of your favorite movies";
pub const PLAY_AGAIN: &str = "Do you want to try again? (y/n)";

/// What happened to the certificate of a completed session
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published(Locator),
    /// No publisher configured
    Skipped,
    /// Publishing failed; the suggestions are still valid
    Failed(String),
}

/// A session that got all the way to suggestions
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSession {
    pub suggestions: SuggestionResult,
    /// Rendered suggestion block, as shown and as published
    pub message: String,
    pub liked_count: usize,
    /// Liked movies whose genres could not be fetched
    pub genre_failures: usize,
    pub publish: PublishOutcome,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The top catalog could not be fetched, or was empty
    CatalogUnavailable { reason: String },
    /// The sample ran out before enough movies were liked
    InsufficientLikes { liked: usize, required: usize },
    Completed(CompletedSession),
    /// Input closed before the quiz finished
    Aborted,
}

impl SessionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SessionOutcome::Completed(_))
    }
}

/// Owns everything a session needs and runs sessions one after another
pub struct SessionOrchestrator {
    catalog: Arc<dyn MovieCatalogClient>,
    config: PipelineConfig,
    sampler: Sampler,
    publisher: Option<Box<dyn ResultPublisher>>,
}

impl SessionOrchestrator {
    /// Create an orchestrator with an entropy-seeded sampler and no publisher
    ///
    /// Fails if the configuration can never produce a result.
    pub fn new(
        catalog: Arc<dyn MovieCatalogClient>,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            sampler: Sampler::new(),
            publisher: None,
        })
    }

    /// Use a specific sampler (seeded runs)
    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Publish certificates of completed sessions through `publisher`
    pub fn with_publisher(mut self, publisher: Box<dyn ResultPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one session for `username`, talking to the user through `channel`
    #[instrument(skip(self, channel))]
    pub async fn run_session<C>(&mut self, username: &str, channel: &mut C) -> SessionOutcome
    where
        C: InteractionChannel + ?Sized,
    {
        let start_time = Instant::now();

        let top = match self.catalog.fetch_top_catalog() {
            Ok(movies) if !movies.is_empty() => movies,
            Ok(_) => return catalog_unavailable(channel, "catalog is empty".to_string()),
            Err(err) => return catalog_unavailable(channel, err.to_string()),
        };
        info!("Fetched top catalog with {} movies", top.len());

        let sample = self.sampler.sample(&top, self.config.sample_size);
        info!("Sampled {} movies for the quiz", sample.len());

        let quiz = match QuizEngine::new(self.config.required_likes).run(sample, channel) {
            Ok(outcome) => outcome,
            Err(QuizError::ChannelClosed) => {
                info!("Input closed during the quiz");
                return SessionOutcome::Aborted;
            }
            Err(err) => {
                warn!(error = %err, "Quiz interrupted");
                return SessionOutcome::Aborted;
            }
        };

        if !quiz.quota_reached() {
            info!(
                "Quiz exhausted with {} of {} likes",
                quiz.liked.len(),
                self.config.required_likes
            );
            channel.notify(NOT_ENOUGH_LIKES);
            return SessionOutcome::InsufficientLikes {
                liked: quiz.liked.len(),
                required: self.config.required_likes,
            };
        }
        info!("Quiz finished after {} movies", quiz.presented);

        channel.notify(FETCHING_GENRES);
        let aggregation = GenreAggregator::new(self.catalog.as_ref()).aggregate_with(
            &quiz.liked,
            |movie, genres| channel.notify(&fetch_progress_line(movie, genres)),
        );
        if aggregation.has_failures() {
            let notice = format!(
                "{} of {} liked movies had unavailable genre data",
                aggregation.failed.len(),
                aggregation.movies_considered
            );
            warn!("{}", notice);
            channel.notify(&notice);
        }

        let suggestions = Recommender::new(self.catalog.as_ref(), &self.config)
            .recommend(&aggregation.tally, self.config.top_genres);
        let message = render_suggestion_message(&suggestions);
        channel.notify(&message);

        let publish = self.publish(username, &message, channel).await;

        info!(
            "Session for {} completed in {:.2?}",
            username,
            start_time.elapsed()
        );

        SessionOutcome::Completed(CompletedSession {
            suggestions,
            message,
            liked_count: quiz.liked.len(),
            genre_failures: aggregation.failed.len(),
            publish,
        })
    }

    /// Run sessions until the user stops, returning how many were run
    ///
    /// After each session `on_outcome` sees the result and the user is asked
    /// to play again. "n", closed input at that prompt, or an aborted session
    /// end the loop.
    pub async fn run_until_done<C, F>(
        &mut self,
        username: &str,
        channel: &mut C,
        mut on_outcome: F,
    ) -> usize
    where
        C: InteractionChannel + ?Sized,
        F: FnMut(&SessionOutcome),
    {
        let mut sessions = 0;
        loop {
            let outcome = self.run_session(username, channel).await;
            sessions += 1;
            on_outcome(&outcome);

            if outcome == SessionOutcome::Aborted {
                break;
            }
            match channel.prompt_yes_no(PLAY_AGAIN) {
                Ok(true) => debug!("Starting another session"),
                Ok(false) => break,
                Err(err) => {
                    debug!(error = %err, "No answer to the play-again prompt");
                    break;
                }
            }
        }
        info!("{} finished after {} session(s)", username, sessions);
        sessions
    }

    async fn publish<C>(&self, username: &str, message: &str, channel: &mut C) -> PublishOutcome
    where
        C: InteractionChannel + ?Sized,
    {
        let Some(publisher) = self.publisher.as_ref() else {
            debug!("No publisher configured, skipping certificate");
            channel.notify("No certificate publisher configured, skipping the certificate");
            return PublishOutcome::Skipped;
        };

        channel.notify("Creating your certificate");
        match publisher.publish(username, message).await {
            Ok(locator) => {
                info!(publisher = publisher.name(), "Certificate published");
                channel.notify(&format!("You can download your certificate from: {locator}"));
                PublishOutcome::Published(locator)
            }
            Err(err) => {
                warn!(publisher = publisher.name(), error = %err, "Certificate publishing failed");
                channel.notify(&format!("Couldn't create your certificate: {err}"));
                PublishOutcome::Failed(err.to_string())
            }
        }
    }
}

fn catalog_unavailable<C>(channel: &mut C, reason: String) -> SessionOutcome
where
    C: InteractionChannel + ?Sized,
{
    warn!(reason = %reason, "Top catalog unavailable");
    channel.notify(TRY_AGAIN_LATER);
    SessionOutcome::CatalogUnavailable { reason }
}

/// "> Fetching genres of [1942] Casablanca: Drama, Romance, War"
fn fetch_progress_line(movie: &Movie, genres: Result<&[GenreLabel], &FetchError>) -> String {
    match genres {
        Ok(genres) if genres.is_empty() => format!("> Fetching genres of {movie}: none listed"),
        Ok(genres) => format!("> Fetching genres of {movie}: {}", genres.join(", ")),
        Err(err) => format!("> Fetching genres of {movie}: unavailable ({err})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_progress_line() {
        let movie = Movie::new("2", "Casablanca", Some(1942));
        let genres = vec!["Drama".to_string(), "War".to_string()];

        assert_eq!(
            fetch_progress_line(&movie, Ok(genres.as_slice())),
            "> Fetching genres of [1942] Casablanca: Drama, War"
        );
        assert_eq!(
            fetch_progress_line(&movie, Err(&FetchError::NotFound("2".into()))),
            "> Fetching genres of [1942] Casablanca: unavailable (movie not found in catalog: 2)"
        );
    }
}
