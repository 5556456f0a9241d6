use std::io::{BufRead, IsTerminal, Lines, StdinLock};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::InquireError;
use terminal_size::{Width, Height, terminal_size};

use crate::agent::Round;
use crate::Result;

/// Where questions come from: an interactive prompt, or lines of piped input
pub enum Input<R: BufRead> {
    Terminal,
    Piped(Lines<R>),
}

impl Input<StdinLock<'static>> {
    /// Prompt on a terminal, read lines otherwise
    pub fn stdin() -> Self {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            Input::Terminal
        } else {
            Input::Piped(stdin.lock().lines())
        }
    }
}

impl<R: BufRead> Input<R> {
    pub fn from_reader(reader: R) -> Self {
        Input::Piped(reader.lines())
    }

    /// Next line of input, or `None` at end of input or when the user cancels
    pub fn next_line(&mut self, label: &str) -> Result<Option<String>> {
        match self {
            Input::Terminal => match inquire::Text::new(label).prompt() {
                Ok(line) => Ok(Some(line)),
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
                Err(e) => Err(e.into()),
            },
            Input::Piped(lines) => Ok(lines.next().transpose()?),
        }
    }

    /// First non-blank line, trimmed
    pub fn next_question(&mut self, label: &str) -> Result<Option<String>> {
        while let Some(line) = self.next_line(label)? {
            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
        Ok(None)
    }
}

fn rule() -> String {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    "─".repeat(width.0 as usize)
}

pub fn print_header(model: &str, endpoint: &str) {
    let line = rule();
    println!("{}", line.black().bold());

    let name = "toolchat".yellow().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  {} {}", name, version);

    let info = format!("  {}  •  {}", model, endpoint).cyan();
    println!("{}", info);

    println!("{}", line.black().bold());
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠️ ".yellow().bold(), msg.yellow());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "❌".red().bold(), msg.red());
}

pub fn print_thinking(msg: &str) {
    println!("  {} {}...", "∴".magenta(), msg);
}

/// Spinner shown while a request is in flight
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.magenta} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print one model round: what it said and which tools ran
pub fn print_round(round: &Round) {
    println!(
        "{} {}",
        format!("Round {}", round.number).cyan().bold(),
        format!("({}, {} tokens)", round.finish_reason, round.usage.total_tokens).black().bold()
    );
    if !round.content.is_empty() {
        println!("  {}", round.content);
    }
    for call in &round.tool_calls {
        println!("  {} {}({})", "→".yellow(), call.name.yellow(), call.arguments);
        println!("    {}", call.result);
    }
    println!("{}", rule().black().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_piped_question_skips_blank_lines() {
        let mut input = Input::from_reader(Cursor::new("\n   \nWhat time is it?\n"));
        assert_eq!(
            input.next_question("Enter your question:").unwrap().as_deref(),
            Some("What time is it?")
        );
        assert!(input.next_question("Enter your question:").unwrap().is_none());
    }

    #[test]
    fn test_piped_lines_in_order() {
        let mut input = Input::from_reader(Cursor::new("Weather in Beijing?\nexit\n"));
        assert_eq!(input.next_line("You:").unwrap().as_deref(), Some("Weather in Beijing?"));
        assert_eq!(input.next_line("You:").unwrap().as_deref(), Some("exit"));
        assert!(input.next_line("You:").unwrap().is_none());
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut input = Input::from_reader(Cursor::new("hello"));
        assert_eq!(input.next_question("?").unwrap().as_deref(), Some("hello"));
    }
}
