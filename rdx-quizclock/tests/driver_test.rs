use quizclock::config::{ClockResolution, TimingConfig};
use quizclock::prelude::*;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

fn fast_config(dir: &std::path::Path) -> QuizConfig {
    let mut config = QuizConfig {
        resolution: ClockResolution::Custom {
            ticks_per_second: 20,
        },
        timing: TimingConfig {
            quiz_duration_secs: 5,
            ..TimingConfig::default()
        },
        ..QuizConfig::default()
    };
    config.storage.dir = dir.to_path_buf();
    config
}

#[tokio::test(start_paused = true)]
async fn driver_runs_a_quiz_to_the_leaderboard_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let engine = QuizEngine::from_config(&config, NullRenderer).unwrap();
    let mut events = engine.subscribe_events();

    let (input_tx, input_rx) = mpsc::channel(8);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = tokio::spawn(engine.run(input_rx, shutdown_rx));

    input_tx.send(UserInput::StartRequested).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    input_tx.send(UserInput::AnswerSelected(0)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    input_tx.send(UserInput::AnswerSelected(1)).await.unwrap();

    // Five seconds on the clock; well past it now.
    tokio::time::sleep(Duration::from_secs(6)).await;
    input_tx
        .send(UserInput::NameSubmitted("Zo".to_string()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    shutdown_tx.send(()).unwrap();
    let engine = handle.await.unwrap();

    assert_eq!(engine.page(), Page::HighScores { highlight: Some(0) });
    assert_eq!(engine.leaderboard().entries()[0].score, 2);

    let mut ticks = Vec::new();
    let mut finished = None;
    while let Ok(event) = events.try_recv() {
        match event {
            QuizEvent::TimeRemaining { seconds } => ticks.push(seconds),
            QuizEvent::QuizFinished { score } => finished = Some(score),
            _ => {}
        }
    }
    assert_eq!(ticks, vec![4, 3, 2, 1, 0]);
    assert_eq!(finished, Some(2));

    let stored = std::fs::read_to_string(dir.path().join("quiz-game-high-scores.json")).unwrap();
    assert_eq!(stored, r#"[{"name":"Zo","score":2}]"#);

    let reloaded = QuizEngine::from_config(&config, NullRenderer).unwrap();
    assert_eq!(reloaded.leaderboard().entries(), engine.leaderboard().entries());
}

#[tokio::test(start_paused = true)]
async fn driver_stops_when_input_channel_closes() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let engine = QuizEngine::from_config(&config, NullRenderer).unwrap();

    let (input_tx, input_rx) = mpsc::channel(8);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = tokio::spawn(engine.run(input_rx, shutdown_rx));

    input_tx.send(UserInput::StartRequested).await.unwrap();
    drop(input_tx);

    let engine = handle.await.unwrap();
    assert_eq!(engine.page(), Page::Quiz);
    assert!(!engine.session().is_finished());
}
