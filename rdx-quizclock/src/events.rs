//! Defines the event stream broadcast by the Quizclock engine.
//!
//! Events are informational: they mirror what the engine told the renderer
//! and why. Subscribers such as loggers, shells, or tests observe the quiz
//! without being able to change it.

use crate::common::{Feedback, Rank};
use crate::navigator::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    /// The navigator moved to a new page.
    PageChanged { page: Page },
    /// A new session started with this many seconds on the clock.
    QuizStarted { duration_secs: i64 },
    /// The question at `index` in the bank is now awaiting an answer.
    QuestionShown { index: usize },
    /// An answer was scored.
    AnswerJudged { feedback: Feedback, score: u32 },
    /// A wrong answer took time off the clock.
    PenaltyApplied { amount: i64, remaining: i64 },
    /// The countdown ticked.
    TimeRemaining { seconds: i64 },
    /// The clock ran out; `score` is final.
    QuizFinished { score: u32 },
    /// A submitted score was inserted into the leaderboard.
    ScoreRecorded { name: String, score: u32, rank: Rank },
    LeaderboardCleared,
    /// Input was refused at the boundary; nothing changed.
    InputRejected { reason: String },
}
