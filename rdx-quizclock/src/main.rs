use anyhow::Result;
use quizclock::common::Rank;
use quizclock::config::ClockResolution;
use quizclock::prelude::*;
use quizclock::{ENGINE_NAME, VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

/// A renderer that writes everything it is asked to show to the log.
struct LogRenderer;

impl Renderer for LogRenderer {
    fn render_question(&mut self, prompt: &str, choices: &[String]) {
        info!("[QUESTION] {} {:?}", prompt, choices);
    }

    fn render_feedback(&mut self, feedback: Feedback) {
        if feedback.is_visible() {
            info!("[FEEDBACK] {:?}", feedback);
        }
    }

    fn render_remaining_seconds(&mut self, seconds: u32) {
        info!("[CLOCK] {}s left", seconds);
    }

    fn render_leaderboard(&mut self, entries: &[LeaderboardEntry], highlight: Option<Rank>) {
        info!("[HIGH SCORES] {} entries", entries.len());
        for (rank, entry) in entries.iter().enumerate() {
            let marker = if highlight == Some(rank) { "*" } else { " " };
            info!("  {}{:>2}. {:<8} {}", marker, rank + 1, entry.name, entry.score);
        }
    }

    fn render_results(&mut self, score: u32, submission_open: bool) {
        info!(
            "[RESULTS] final score {} ({})",
            score,
            if submission_open { "qualifies" } else { "does not qualify" }
        );
    }

    fn render_notice(&mut self, message: &str) {
        info!("[NOTICE] {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 2. Load the configuration, speeding the clock up for a quick demo run.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = QuizConfig::load(config_path.as_deref())?;
    config.resolution = ClockResolution::High;
    config.timing.quiz_duration_secs = 10;
    config.timing.tick_interval_ms = 200;
    config.timing.feedback_ms = 300;

    // 3. Create the engine over an in-memory leaderboard so the demo leaves no files behind.
    let bank = Arc::new(config.question_bank()?);
    let store = MemoryStore::new();
    let leaderboard = Leaderboard::load(Box::new(store.clone()), config.storage.key.clone());
    let engine = QuizEngine::new(&config, bank, leaderboard, LogRenderer)?;

    // 4. Spawn a listener on the event stream.
    let mut events = engine.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!("[EVENT] => {:?}", event);
        }
    });

    // 5. Run the engine and play a scripted quiz against it.
    let (input_tx, input_rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = tokio::spawn(engine.run(input_rx, shutdown_rx));

    play_scripted_quiz(&input_tx).await?;

    shutdown_tx.send(()).ok();
    let engine = handle.await?;
    info!(
        "{} v{} finished on page '{}' with {} leaderboard entries; stored: {}",
        ENGINE_NAME,
        VERSION,
        engine.page().name(),
        engine.leaderboard().len(),
        store.get_raw(&config.storage.key).unwrap_or_default()
    );
    Ok(())
}

/// Answers a few questions, some wrong, waits out the clock, and submits a name.
async fn play_scripted_quiz(input_tx: &mpsc::Sender<UserInput>) -> Result<()> {
    input_tx.send(UserInput::StartRequested).await?;
    for choice in [0, 1, 3, 3, 0] {
        tokio::time::sleep(Duration::from_millis(250)).await;
        input_tx.send(UserInput::AnswerSelected(choice)).await?;
    }

    // Let the remaining seconds tick away.
    tokio::time::sleep(Duration::from_secs(3)).await;

    input_tx
        .send(UserInput::NameSubmitted("a-very-long-name".to_string()))
        .await?;
    input_tx
        .send(UserInput::NameSubmitted("Dev".to_string()))
        .await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
