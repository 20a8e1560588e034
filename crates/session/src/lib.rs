//! Session crate for the reel-taste quiz.
//!
//! This crate contains the orchestrator that runs one complete quiz
//! session and the console implementation of the interaction channel.

pub mod console;
pub mod orchestrator;

pub use console::ConsoleChannel;
pub use orchestrator::{CompletedSession, PublishOutcome, SessionOrchestrator, SessionOutcome};
