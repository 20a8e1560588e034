use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pipeline::{InteractionChannel, MovieCatalogClient, PipelineConfig, Sampler};
use publisher::gist::DEFAULT_API_URL;
use publisher::{FilePublisher, GistPublisher, ResultPublisher};
use session::{ConsoleChannel, PublishOutcome, SessionOrchestrator, SessionOutcome};
use sources::MovieLensCatalog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_USERNAME: &str = "friend";

/// ReelTaste - find your favorite movie genres with a quick quiz
#[derive(Parser, Debug)]
#[command(name = "reel-taste")]
#[command(about = "Like or skip a few classics and get movie suggestions for your taste", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, env = "DATA_DIR", default_value = "data/ml-1m")]
    data_dir: PathBuf,

    /// Number of top-rated movies offered as the catalog
    #[arg(long, env = "CATALOG_SIZE", default_value_t = 250)]
    catalog_size: usize,

    /// Minimum number of ratings for a movie to be listed
    #[arg(long, env = "MIN_VOTES", default_value_t = 500)]
    min_votes: u32,

    #[command(flatten)]
    quiz: QuizArgs,

    #[command(flatten)]
    certificate: CertificateArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct QuizArgs {
    /// Movies asked about in one quiz
    #[arg(long, env = "SAMPLE_SIZE", default_value_t = 30)]
    sample_size: usize,

    /// Likes needed before suggestions are computed
    #[arg(long, env = "REQUIRED_LIKES", default_value_t = 5)]
    required_likes: usize,

    /// Favorite genres used for suggestions
    #[arg(long, env = "TOP_GENRES", default_value_t = 3)]
    top_genres: usize,

    /// Suggestions shown at the end
    #[arg(long, env = "CANDIDATE_DISPLAY_LIMIT", default_value_t = 10)]
    candidate_display_limit: usize,

    /// Suggestions requested from the catalog before truncation
    #[arg(long, env = "CANDIDATE_FETCH_LIMIT", default_value_t = 50)]
    candidate_fetch_limit: usize,

    /// Seed for the quiz sample (random when unset)
    #[arg(long, env = "QUIZ_SEED")]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct CertificateArgs {
    /// GitHub token used to publish certificates as gists
    #[arg(long, env = "GIST_TOKEN", hide_env_values = true)]
    gist_token: Option<String>,

    /// GitHub API root
    #[arg(long, env = "GIST_API_URL", default_value = DEFAULT_API_URL)]
    gist_api_url: String,

    /// Publish gists as public instead of secret
    #[arg(long, env = "GIST_PUBLIC")]
    gist_public: bool,

    /// Write certificates into this directory when no gist token is set
    #[arg(long, env = "CERTIFICATE_DIR")]
    certificate_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Take the quiz (default)
    Quiz,

    /// List the top of the catalog the quiz samples from
    Top {
        /// Number of movies to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

impl QuizArgs {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sample_size: self.sample_size,
            required_likes: self.required_likes,
            top_genres: self.top_genres,
            candidate_display_limit: self.candidate_display_limit,
            candidate_fetch_limit: self.candidate_fetch_limit,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they never interleave with quiz prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = MovieLensCatalog::from_dir(&cli.data_dir)
        .with_catalog_size(cli.catalog_size)
        .with_min_votes(cli.min_votes);

    match cli.command.as_ref().unwrap_or(&Commands::Quiz) {
        Commands::Quiz => handle_quiz(&cli, catalog).await,
        Commands::Top { limit } => handle_top(&catalog, *limit),
    }
}

/// Handle the default 'quiz' command: sessions until the user stops
async fn handle_quiz(cli: &Cli, catalog: MovieLensCatalog) -> Result<()> {
    let mut orchestrator = SessionOrchestrator::new(Arc::new(catalog), cli.quiz.pipeline_config())
        .context("Invalid quiz configuration")?;
    if let Some(seed) = cli.quiz.seed {
        orchestrator = orchestrator.with_sampler(Sampler::seeded(seed));
    }
    if let Some(publisher) = build_publisher(&cli.certificate)? {
        orchestrator = orchestrator.with_publisher(publisher);
    }

    let mut console = ConsoleChannel::stdio();
    print_welcome(orchestrator.config());

    let username = match console.prompt_text("Enter a username/nickname to continue: ") {
        Ok(name) if !name.is_empty() => name,
        Ok(_) => DEFAULT_USERNAME.to_string(),
        Err(_) => return Ok(()),
    };
    println!("Hello, {}! Answer with y or n.", username.bold());

    orchestrator
        .run_until_done(&username, &mut console, print_outcome)
        .await;

    println!("{}", "Goodbye!".bold());
    Ok(())
}

/// Handle the 'top' command
fn handle_top(catalog: &MovieLensCatalog, limit: usize) -> Result<()> {
    println!("Loading catalog...");
    let start = Instant::now();
    let movies = catalog
        .fetch_top_catalog()
        .context("Failed to load the top catalog")?;
    println!(
        "{} Loaded {} movies in {:.2?}",
        "✓".green(),
        movies.len(),
        start.elapsed()
    );

    for (rank, movie) in movies.iter().take(limit).enumerate() {
        println!("{:>4}. {}", (rank + 1).to_string().green(), movie);
    }
    Ok(())
}

/// Gist token first, then a certificate directory, otherwise nothing
fn build_publisher(args: &CertificateArgs) -> Result<Option<Box<dyn ResultPublisher>>> {
    if let Some(token) = args.gist_token.as_deref().filter(|t| !t.trim().is_empty()) {
        let gist = GistPublisher::new(&args.gist_api_url, Some(token.to_string()))
            .context("Failed to create gist client")?
            .with_public(args.gist_public);
        info!(public = args.gist_public, "Publishing certificates as gists");
        return Ok(Some(Box::new(gist)));
    }

    if let Some(dir) = &args.certificate_dir {
        info!("Writing certificates to {}", dir.display());
        return Ok(Some(Box::new(FilePublisher::new(dir))));
    }

    info!("No certificate publisher configured");
    Ok(None)
}

fn print_welcome(config: &PipelineConfig) {
    println!("{}", "Welcome to ReelTaste!".bold().blue());
    println!(
        "You'll see up to {} classic movies. Like at least {} and we'll work out your favorite genres.",
        config.sample_size, config.required_likes
    );
}

fn print_outcome(outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::CatalogUnavailable { reason } => {
            println!("{} Movie catalog unavailable: {}", "✗".red(), reason);
        }
        SessionOutcome::InsufficientLikes { liked, required } => {
            println!("{} You liked {} of the {} movies needed", "•".yellow(), liked, required);
        }
        SessionOutcome::Completed(session) => {
            if session.genre_failures > 0 {
                println!(
                    "{} Suggestions are based on {} of your {} liked movies",
                    "•".yellow(),
                    session.liked_count - session.genre_failures,
                    session.liked_count
                );
            }
            match &session.publish {
                PublishOutcome::Published(_) => println!("{} Certificate ready", "✓".green()),
                PublishOutcome::Failed(_) => println!("{} Certificate not created", "•".yellow()),
                PublishOutcome::Skipped => {}
            }
        }
        SessionOutcome::Aborted => {
            println!("{} Input closed", "•".yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "reel-taste",
            "--sample-size",
            "12",
            "--required-likes",
            "3",
            "--seed",
            "42",
            "top",
            "--limit",
            "5",
        ])
        .unwrap();

        let config = cli.quiz.pipeline_config();
        assert_eq!(config.sample_size, 12);
        assert_eq!(config.required_likes, 3);
        assert_eq!(cli.quiz.seed, Some(42));
        assert_eq!(cli.command, Some(Commands::Top { limit: 5 }));
    }

    #[test]
    fn test_gist_public_flag() {
        let cli = Cli::try_parse_from(["reel-taste", "--gist-token", "secret", "--gist-public"])
            .unwrap();
        assert!(cli.certificate.gist_public);
        let publisher = build_publisher(&cli.certificate).unwrap().unwrap();
        assert_eq!(publisher.name(), "gist");

        let cli = Cli::try_parse_from(["reel-taste"]).unwrap();
        assert!(!cli.certificate.gist_public);
    }

    #[test]
    fn test_certificate_dir_publisher() {
        let args = CertificateArgs {
            gist_token: None,
            gist_api_url: DEFAULT_API_URL.to_string(),
            gist_public: false,
            certificate_dir: Some(PathBuf::from("certificates")),
        };
        let publisher = build_publisher(&args).unwrap().unwrap();
        assert_eq!(publisher.name(), "file");
    }

    #[test]
    fn test_gist_token_takes_precedence() {
        let args = CertificateArgs {
            gist_token: Some("secret".to_string()),
            gist_api_url: DEFAULT_API_URL.to_string(),
            gist_public: false,
            certificate_dir: Some(PathBuf::from("certificates")),
        };
        let publisher = build_publisher(&args).unwrap().unwrap();
        assert_eq!(publisher.name(), "gist");
    }

    #[test]
    fn test_blank_token_without_dir_publishes_nothing() {
        let args = CertificateArgs {
            gist_token: Some("  ".to_string()),
            gist_api_url: DEFAULT_API_URL.to_string(),
            gist_public: false,
            certificate_dir: None,
        };
        assert!(build_publisher(&args).unwrap().is_none());
    }
}
