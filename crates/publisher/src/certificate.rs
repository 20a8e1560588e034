//! Text rendering shared by the console and the publishers.

use pipeline::{CandidateStatus, SuggestionResult};

const RULE: &str = "----------------------------------------------------------------------";

/// The suggestion block shown after a successful quiz
///
/// ```text
/// ----------------------------------------------------------------------
/// Your favorite genres are: Drama, War, Crime
/// Here are some suggestions for you:
/// ----------------------------------------------------------------------
/// [1942] Casablanca
/// ```
pub fn render_suggestion_message(result: &SuggestionResult) -> String {
    let mut lines = vec![
        String::new(),
        RULE.to_string(),
        format!("Your favorite genres are: {}", result.genres.join(", ")),
        "Here are some suggestions for you:".to_string(),
        RULE.to_string(),
    ];

    match &result.status {
        CandidateStatus::Found => {
            lines.extend(result.candidates.iter().map(|movie| movie.to_string()));
        }
        CandidateStatus::NoneFound => {
            lines.push("No movies matched your favorite genres.".to_string());
        }
        CandidateStatus::FetchFailed(_) => {
            lines.push("Suggestions are unavailable right now.".to_string());
        }
        CandidateStatus::NoGenres => {
            lines.push("We couldn't work out your favorite genres.".to_string());
        }
    }

    let mut message = lines.join("\n");
    message.push('\n');
    message
}

/// Certificate body: a greeting followed by the suggestion message
pub fn render_certificate(username: &str, message: &str) -> String {
    format!("\nHello, {}!\n{}", username, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::Movie;

    fn result(status: CandidateStatus, candidates: Vec<Movie>) -> SuggestionResult {
        SuggestionResult {
            genres: vec!["Drama".to_string(), "War".to_string()],
            candidates,
            status,
        }
    }

    #[test]
    fn test_message_lists_candidates() {
        let message = render_suggestion_message(&result(
            CandidateStatus::Found,
            vec![
                Movie::new("2", "Casablanca", Some(1942)),
                Movie::new("9", "Untitled", None),
            ],
        ));

        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[1], RULE);
        assert_eq!(lines[2], "Your favorite genres are: Drama, War");
        assert_eq!(lines[3], "Here are some suggestions for you:");
        assert_eq!(lines[5], "[1942] Casablanca");
        assert_eq!(lines[6], "Untitled");
    }

    #[test]
    fn test_message_for_failed_fetch_keeps_genres() {
        let message = render_suggestion_message(&result(
            CandidateStatus::FetchFailed("down".into()),
            Vec::new(),
        ));
        assert!(message.contains("Your favorite genres are: Drama, War"));
        assert!(message.contains("unavailable right now"));
    }

    #[test]
    fn test_certificate_greets_user() {
        let certificate = render_certificate("ada", "body\n");
        assert_eq!(certificate, "\nHello, ada!\nbody\n");
    }
}
