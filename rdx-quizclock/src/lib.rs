//! # Quizclock
//!
//! A tick-driven timed quiz engine with a ranked, persistent leaderboard.
//!
//! Quizclock runs one multiple-choice quiz at a time against a countdown. A
//! correct answer scores a point; a wrong one costs seconds off the clock,
//! which can end the quiz on the spot. When time runs out the final score is
//! placed on a capped leaderboard that survives restarts.
//!
//! ## Core Concepts
//!
//! - **Scheduler**: A logical-time owner of every cancellable timer. Timer
//!   handles are generational keys, so a cancelled handle can never address a
//!   newer timer.
//! - **QuizSession**: Cycles through an immutable `QuestionBank`, scores
//!   answers, and drives the `CountdownTimer`.
//! - **Leaderboard**: At most ten entries in descending order; among equal
//!   scores the earlier entry ranks higher.
//! - **Navigator**: Decides which of the high score, quiz, and results pages
//!   is showing.
//! - **Renderer**: The presentation seam. The engine tells it what to show and
//!   receives `UserInput` back.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use quizclock::prelude::*;
//! use tokio::sync::{broadcast, mpsc};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Load configuration from a file and the environment.
//!     let config = QuizConfig::load(Some(std::path::Path::new("quiz.toml")))?;
//!
//!     // 2. Create the engine with a renderer.
//!     let engine = QuizEngine::from_config(&config, NullRenderer)?;
//!
//!     // 3. Subscribe to the event stream before starting the engine.
//!     let mut events = engine.subscribe_events();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Received Quiz Event: {:?}", event);
//!         }
//!     });
//!
//!     // 4. Drive it with user input until shutdown.
//!     let (input_tx, input_rx) = mpsc::channel(16);
//!     let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!     let handle = tokio::spawn(engine.run(input_rx, shutdown_rx));
//!     input_tx.send(UserInput::StartRequested).await?;
//!     input_tx.send(UserInput::AnswerSelected(0)).await?;
//!
//!     shutdown_tx.send(()).ok();
//!     handle.await?;
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Quiz Engine";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod navigator;
pub mod question;
pub mod renderer;
pub mod session;
pub mod store;

/// A prelude module for easy importing of the most common Quizclock types.
pub mod prelude {
    pub use crate::common::{Feedback, Rank, TimerId};
    pub use crate::config::{ClockResolution, QuizConfig};
    pub use crate::engine::QuizEngine;
    pub use crate::error::QuizError;
    pub use crate::events::QuizEvent;
    pub use crate::leaderboard::{Leaderboard, LeaderboardEntry, Placement, PlayerName};
    pub use crate::navigator::Page;
    pub use crate::question::{Question, QuestionBank, QuestionRecord};
    pub use crate::renderer::{NullRenderer, Renderer, UserInput};
    pub use crate::store::{FileStore, MemoryStore, ScoreStore};
}
