//! The presentation seam.
//!
//! The engine never touches presentation state directly; it tells a
//! `Renderer` what to show. User input travels the other way as
//! `UserInput` values handed to `QuizEngine::handle_input`.

use crate::common::{Feedback, Rank};
use crate::leaderboard::LeaderboardEntry;

pub trait Renderer {
    fn render_question(&mut self, prompt: &str, choices: &[String]);

    fn render_feedback(&mut self, feedback: Feedback);

    /// Seconds left on the clock, never below zero.
    fn render_remaining_seconds(&mut self, seconds: u32);

    fn render_leaderboard(&mut self, entries: &[LeaderboardEntry], highlight: Option<Rank>);

    /// Shows the final score. `submission_open` is `true` when the score
    /// qualifies and the name entry form should be offered.
    fn render_results(&mut self, score: u32, submission_open: bool);

    /// Reports input the engine refused, such as an invalid name. Optional.
    fn render_notice(&mut self, _message: &str) {}
}

/// Input delivered from the presentation layer to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    AnswerSelected(usize),
    StartRequested,
    NameSubmitted(String),
    ClearRequested,
    NavigateHighScores,
}

/// A renderer that draws nothing. Useful for headless drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_question(&mut self, _prompt: &str, _choices: &[String]) {}
    fn render_feedback(&mut self, _feedback: Feedback) {}
    fn render_remaining_seconds(&mut self, _seconds: u32) {}
    fn render_leaderboard(&mut self, _entries: &[LeaderboardEntry], _highlight: Option<Rank>) {}
    fn render_results(&mut self, _score: u32, _submission_open: bool) {}
}
