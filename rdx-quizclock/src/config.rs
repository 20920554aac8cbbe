//! Defines all configuration structures for the Quizclock engine.
//!
//! These structs are deserialized with `serde` from layered sources: an
//! optional TOML file, overridden by `QUIZ__`-prefixed environment variables
//! (for example `QUIZ__TIMING__QUIZ_DURATION_SECS=90`). Every field has a
//! default, so an empty configuration is a valid one.

use crate::error::{QuizError, Result};
use crate::question::{sample_records, QuestionBank, QuestionRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The key under which the leaderboard is persisted.
pub const DEFAULT_STORE_KEY: &str = "quiz-game-high-scores";

/// The top-level configuration for the `QuizEngine`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizConfig {
    /// How often the async driver polls the scheduler.
    #[serde(default = "default_resolution")]
    pub resolution: ClockResolution,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// The question source. When the key is absent the built-in sample bank is used.
    #[serde(default = "sample_records")]
    pub questions: Vec<QuestionRecord>,
}

/// Defines how often the driver loop wakes up to advance the scheduler.
///
/// This is independent of the countdown tick, which is always one per
/// `TimingConfig::tick_interval_ms`. A finer resolution only makes ticks and
/// feedback expiry land closer to their nominal times.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// ~60 polls per second.
    High,
    /// ~30 polls per second.
    Medium,
    /// ~1 poll per second.
    Low,
    /// A user-defined speed in polls per second.
    Custom { ticks_per_second: u64 },
}

impl ClockResolution {
    pub fn poll_interval(&self) -> Duration {
        let per_second = match self {
            ClockResolution::High => 60,
            ClockResolution::Medium => 30,
            ClockResolution::Low => 1,
            ClockResolution::Custom { ticks_per_second } => (*ticks_per_second).max(1),
        };
        // Anything faster than one poll per microsecond is clamped to it.
        Duration::from_micros((1_000_000 / per_second).max(1))
    }
}

/// Durations that shape a quiz session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds on the clock when a quiz starts.
    pub quiz_duration_secs: u32,
    /// Seconds removed from the clock by a wrong answer.
    pub penalty_secs: u32,
    /// Wall time between countdown ticks.
    pub tick_interval_ms: u64,
    /// How long answer feedback stays visible unless superseded.
    pub feedback_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            quiz_duration_secs: 60,
            penalty_secs: 2,
            tick_interval_ms: 1000,
            feedback_ms: 1500,
        }
    }
}

impl TimingConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

/// Where the leaderboard is persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            key: DEFAULT_STORE_KEY.to_string(),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            timing: TimingConfig::default(),
            storage: StorageConfig::default(),
            questions: sample_records(),
        }
    }
}

impl QuizConfig {
    /// Loads configuration from an optional TOML file and the environment.
    ///
    /// A missing file is not an error; the defaults and environment apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config = builder
            .add_source(
                config::Environment::with_prefix("QUIZ")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<QuizConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects timing values that would stall or spin the engine.
    pub fn validate(&self) -> Result<()> {
        if self.timing.quiz_duration_secs == 0 {
            return Err(QuizError::InvalidDuration {
                field: "timing.quiz_duration_secs",
            });
        }
        if self.timing.penalty_secs == 0 {
            return Err(QuizError::InvalidDuration {
                field: "timing.penalty_secs",
            });
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(QuizError::InvalidDuration {
                field: "timing.tick_interval_ms",
            });
        }
        if self.timing.feedback_ms == 0 {
            return Err(QuizError::InvalidDuration {
                field: "timing.feedback_ms",
            });
        }
        Ok(())
    }

    /// Validates the configured question records and builds the bank.
    pub fn question_bank(&self) -> Result<QuestionBank> {
        QuestionBank::from_records(self.questions.clone())
    }
}

// --- Default value functions for serde ---

fn default_resolution() -> ClockResolution {
    ClockResolution::Medium
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = QuizConfig::default();
        config.validate().unwrap();
        assert_eq!(config.timing.penalty_secs, 2);
        assert_eq!(config.storage.key, "quiz-game-high-scores");
        assert_eq!(config.question_bank().unwrap().len(), 4);
    }

    #[test]
    fn resolution_poll_intervals() {
        assert_eq!(ClockResolution::Low.poll_interval(), Duration::from_secs(1));
        assert_eq!(
            ClockResolution::Custom { ticks_per_second: 10 }.poll_interval(),
            Duration::from_millis(100)
        );
        assert_eq!(
            ClockResolution::Custom { ticks_per_second: 0 }.poll_interval(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn very_fast_custom_resolution_never_yields_a_zero_period() {
        let mut config = QuizConfig::default();
        config.resolution = ClockResolution::Custom {
            ticks_per_second: 2_000_000,
        };
        config.validate().unwrap();
        assert_eq!(config.resolution.poll_interval(), Duration::from_micros(1));
        assert_eq!(
            ClockResolution::Custom {
                ticks_per_second: u64::MAX
            }
            .poll_interval(),
            Duration::from_micros(1)
        );
    }

    #[test]
    fn loads_questions_and_timing_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
resolution = "high"

[timing]
quiz_duration_secs = 30

[[questions]]
prompt = "2 + 2?"
choices = ["3", "4", "5", "22"]
answer = "4"
"#
        )
        .unwrap();

        let config = QuizConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.resolution, ClockResolution::High);
        assert_eq!(config.timing.quiz_duration_secs, 30);
        assert_eq!(config.timing.feedback_ms, 1500);
        let bank = config.question_bank().unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(0).correct_index(), 1);
    }

    #[test]
    fn explicitly_empty_question_list_fails_fast() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "questions = []").unwrap();

        let config = QuizConfig::load(Some(file.path())).unwrap();
        assert!(matches!(
            config.question_bank(),
            Err(QuizError::EmptyQuestionBank)
        ));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut config = QuizConfig::default();
        config.timing.quiz_duration_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(QuizError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn zero_penalty_is_rejected() {
        let mut config = QuizConfig::default();
        config.timing.penalty_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(QuizError::InvalidDuration {
                field: "timing.penalty_secs"
            })
        ));
    }

    #[test]
    fn environment_overrides_the_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[timing]
penalty_secs = 3

[storage]
key = "from-file"
"#
        )
        .unwrap();

        // Other tests in this module never assert on these two fields.
        std::env::set_var("QUIZ__TIMING__PENALTY_SECS", "5");
        std::env::set_var("QUIZ__STORAGE__KEY", "from-env");
        let loaded = QuizConfig::load(Some(file.path()));
        std::env::remove_var("QUIZ__TIMING__PENALTY_SECS");
        std::env::remove_var("QUIZ__STORAGE__KEY");

        let config = loaded.unwrap();
        assert_eq!(config.timing.penalty_secs, 5);
        assert_eq!(config.storage.key, "from-env");
    }
}
