use anyhow::Result;
use colored::Colorize;
use quizclock::common::Rank;
use quizclock::leaderboard::MAX_NAME_CHARS;
use quizclock::prelude::*;
use quizclock::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG_FILE: &str = "quizshell.toml";

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

/// Draws the quiz straight to the terminal.
struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render_question(&mut self, prompt: &str, choices: &[String]) {
        println!("\n{}", prompt.bold());
        for (i, choice) in choices.iter().enumerate() {
            println!("  {} {}", format!("{}.", i + 1).cyan(), choice);
        }
    }

    fn render_feedback(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::Correct => println!("{}", "Correct!".green().bold()),
            Feedback::Incorrect => println!("{}", "Incorrect!".red().bold()),
            Feedback::None => {}
        }
    }

    fn render_remaining_seconds(&mut self, seconds: u32) {
        if seconds <= 5 || seconds % 10 == 0 {
            println!("{}", format!("<-- {}s left", seconds).dimmed());
        }
    }

    fn render_leaderboard(&mut self, entries: &[LeaderboardEntry], highlight: Option<Rank>) {
        println!("\n{}", "High Scores".bold().underline());
        if entries.is_empty() {
            println!("  {}", "(no scores yet)".dimmed());
        }
        for (rank, entry) in entries.iter().enumerate() {
            let line = format!("{:>3}. {}: {}", rank + 1, entry.name, entry.score);
            if highlight == Some(rank) {
                println!("{}", line.yellow().bold());
            } else {
                println!("{}", line);
            }
        }
        println!("{}", "Type 'start' to play.".dimmed());
    }

    fn render_results(&mut self, score: u32, submission_open: bool) {
        println!("\n{} {}", "Time's up! Final score:".bold(), score.to_string().cyan().bold());
        if submission_open {
            println!(
                "You made the high scores! Enter 'name <NAME>' (1-{} characters).",
                MAX_NAME_CHARS
            );
        } else {
            println!("{}", "Not a high score this time. Type 'start' or 'scores'.".dimmed());
        }
    }

    fn render_notice(&mut self, message: &str) {
        println!("{} {}", "Error:".red(), message);
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", "=== QUIZCLOCK ===".cyan().bold());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );

    println!("{}", "-----------------------------------------------------------------------------------------------".dimmed());

    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";

    println!("{}", version_string);
    println!("{}", license_blurb.dimmed());

    println!("{}", "-----------------------------------------------------------------------------------------------".dimmed());
}

/// Maps an answer token (`1`-`4` or `a`-`d`) to a 0-based choice index.
fn parse_choice(token: &str) -> Option<usize> {
    match token {
        "a" | "A" => Some(0),
        "b" | "B" => Some(1),
        "c" | "C" => Some(2),
        "d" | "D" => Some(3),
        _ => token.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1),
    }
}

/// Translates one line of shell input into engine input.
fn parse_command(line: &str) -> Option<UserInput> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "start" => Some(UserInput::StartRequested),
        "scores" => Some(UserInput::NavigateHighScores),
        "clear" => Some(UserInput::ClearRequested),
        "name" => Some(UserInput::NameSubmitted(rest.to_string())),
        other => parse_choice(other).map(UserInput::AnswerSelected),
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  start                 - Starts a new quiz.");
    println!("  1..4 | a..d           - Answers the current question.");
    println!("  name <NAME>           - Submits a qualifying score under NAME.");
    println!("  scores                - Shows the high scores.");
    println!("  clear                 - Clears the high scores.");
    println!("  exit                  - Quits the shell.");
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = QuizConfig::load(Some(config_path.as_path()))?;
    let engine = QuizEngine::from_config(&config, ConsoleRenderer)?;

    let (input_tx, input_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    info!("Spawning {} in the background...", ENGINE_NAME.cyan());
    let engine_handle = tokio::spawn(engine.run(input_rx, shutdown_rx));

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;
                match line {
                    "help" => print_help(),
                    "exit" => break,
                    _ => match parse_command(line) {
                        Some(input) => {
                            if input_tx.send(input).await.is_err() {
                                println!("{}", "The engine has stopped.".red());
                                break;
                            }
                        }
                        None => println!("Unknown command: '{}'. Type 'help'.", line),
                    },
                }
            }
            Err(_) => {
                println!("Exiting quizshell...");
                break;
            }
        }
    }

    shutdown_tx.send(()).ok();
    engine_handle.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_accept_numbers_and_letters() {
        assert_eq!(parse_choice("1"), Some(0));
        assert_eq!(parse_choice("4"), Some(3));
        assert_eq!(parse_choice("c"), Some(2));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("x"), None);
    }

    #[test]
    fn commands_map_to_engine_input() {
        assert_eq!(parse_command("start"), Some(UserInput::StartRequested));
        assert_eq!(
            parse_command("name Zo"),
            Some(UserInput::NameSubmitted("Zo".to_string()))
        );
        assert_eq!(parse_command("name"), Some(UserInput::NameSubmitted(String::new())));
        assert_eq!(parse_command("2"), Some(UserInput::AnswerSelected(1)));
        assert_eq!(parse_command("7"), Some(UserInput::AnswerSelected(6)));
        assert_eq!(parse_command("bogus"), None);
    }
}
