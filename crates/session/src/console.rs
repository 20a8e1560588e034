//! Line-based interaction channel over any reader/writer pair.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use pipeline::{InteractionChannel, QuizError};
use tracing::warn;

/// Prompts on `output`, reads answers line by line from `input`
///
/// End of input is reported as [`QuizError::ChannelClosed`].
pub struct ConsoleChannel<R, W> {
    input: R,
    output: W,
}

impl ConsoleChannel<StdinLock<'static>, Stdout> {
    /// Channel over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleChannel<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer (tests inspect what was printed)
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> Result<String, QuizError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(QuizError::ChannelClosed);
        }
        Ok(line.trim().to_string())
    }

    fn show(&mut self, text: &str) -> Result<(), QuizError> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> InteractionChannel for ConsoleChannel<R, W> {
    fn prompt_yes_no(&mut self, text: &str) -> Result<bool, QuizError> {
        self.show(&format!("> {text}"))?;
        loop {
            match self.read_answer()?.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.show(&format!("Please answer with y or n. {text}"))?,
            }
        }
    }

    fn prompt_text(&mut self, text: &str) -> Result<String, QuizError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_answer()
    }

    fn notify(&mut self, message: &str) {
        if let Err(err) = self.show(message) {
            warn!(error = %err, "Failed to write to console");
        }
    }
}
