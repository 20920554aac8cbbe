//! The core engine that orchestrates a quiz from start to leaderboard.

use crate::common::{Feedback, CHOICE_COUNT};
use crate::components::feedback::FeedbackSlot;
use crate::components::scheduler::{Scheduler, TimerPurpose};
use crate::config::{ClockResolution, QuizConfig};
use crate::error::Result;
use crate::events::QuizEvent;
use crate::leaderboard::{Leaderboard, Placement, PlayerName};
use crate::navigator::{Navigator, Page};
use crate::question::QuestionBank;
use crate::renderer::{Renderer, UserInput};
use crate::session::{AnswerOutcome, QuizSession, TickOutcome};
use crate::store::FileStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// The main Quizclock engine.
///
/// This struct is the single point of control. It owns the scheduler, the
/// session, the feedback slot, the leaderboard, and the navigator, and it is
/// the only thing that calls the `Renderer`. Everything runs on one task:
/// input and elapsed time are applied one at a time, in order.
pub struct QuizEngine<R: Renderer> {
    scheduler: Scheduler,
    session: QuizSession,
    feedback: FeedbackSlot,
    leaderboard: Leaderboard,
    navigator: Navigator,
    renderer: R,
    resolution: ClockResolution,
    event_sender: broadcast::Sender<QuizEvent>,
}

// Core implementation block for internal logic.
impl<R: Renderer> QuizEngine<R> {
    /// Creates an engine over an existing question bank and leaderboard and
    /// renders the initial high score page.
    pub fn new(
        config: &QuizConfig,
        bank: Arc<QuestionBank>,
        leaderboard: Leaderboard,
        renderer: R,
    ) -> Result<Self> {
        const CHANNEL_CAPACITY: usize = 256;
        config.validate()?;
        let (event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);

        let mut engine = Self {
            scheduler: Scheduler::new(),
            session: QuizSession::new(bank, &config.timing),
            feedback: FeedbackSlot::new(config.timing.feedback_duration()),
            leaderboard,
            navigator: Navigator::new(),
            renderer,
            resolution: config.resolution.clone(),
            event_sender,
        };
        engine.render_high_scores(None);
        Ok(engine)
    }

    /// Builds the question bank from `config` and loads the leaderboard from
    /// the configured storage directory.
    pub fn from_config(config: &QuizConfig, renderer: R) -> Result<Self> {
        let bank = Arc::new(config.question_bank()?);
        let store = FileStore::new(&config.storage.dir);
        let leaderboard = Leaderboard::load(Box::new(store), config.storage.key.clone());
        Self::new(config, bank, leaderboard, renderer)
    }

    #[doc(hidden)]
    fn emit(&self, event: QuizEvent) {
        self.event_sender.send(event).ok();
    }

    #[doc(hidden)]
    fn reject(&mut self, reason: String) {
        debug!(%reason, "input rejected");
        self.renderer.render_notice(&reason);
        self.emit(QuizEvent::InputRejected { reason });
    }

    #[doc(hidden)]
    fn render_high_scores(&mut self, highlight: Option<usize>) {
        self.renderer
            .render_leaderboard(self.leaderboard.entries(), highlight);
    }

    #[doc(hidden)]
    fn render_current_question(&mut self) {
        if let Some(question) = self.session.current_question() {
            self.renderer
                .render_question(question.prompt(), question.choices());
            if let Some(index) = self.session.current_index() {
                self.emit(QuizEvent::QuestionShown { index });
            }
        }
    }

    #[doc(hidden)]
    fn render_remaining(&mut self, seconds: i64) {
        let clamped = u32::try_from(seconds.max(0)).unwrap_or(u32::MAX);
        self.renderer.render_remaining_seconds(clamped);
    }

    #[doc(hidden)]
    fn start_quiz(&mut self) -> Result<()> {
        if !self.navigator.can_start_quiz() {
            trace!(page = self.navigator.page().name(), "start request ignored");
            return Ok(());
        }
        self.feedback.reset(&mut self.scheduler);
        self.session.start(&mut self.scheduler)?;
        self.navigator.start_quiz();

        let remaining = self.session.remaining();
        self.emit(QuizEvent::PageChanged {
            page: self.navigator.page(),
        });
        self.emit(QuizEvent::QuizStarted {
            duration_secs: remaining,
        });
        self.renderer.render_feedback(Feedback::None);
        self.render_remaining(remaining);
        self.render_current_question();
        Ok(())
    }

    #[doc(hidden)]
    fn answer(&mut self, choice_index: usize) {
        if self.navigator.page() != Page::Quiz {
            trace!(choice_index, "answer outside the quiz page ignored");
            return;
        }
        if choice_index >= CHOICE_COUNT {
            self.reject(format!(
                "choice {} does not exist; pick 1 to {}",
                choice_index + 1,
                CHOICE_COUNT
            ));
            return;
        }
        let AnswerOutcome::Judged {
            feedback,
            score,
            remaining,
            finished,
        } = self.session.answer(choice_index, &mut self.scheduler)
        else {
            return;
        };

        self.feedback.show(feedback, &mut self.scheduler);
        self.renderer.render_feedback(feedback);
        self.emit(QuizEvent::AnswerJudged { feedback, score });
        if feedback == Feedback::Incorrect {
            self.emit(QuizEvent::PenaltyApplied {
                amount: self.session.penalty_secs(),
                remaining,
            });
            self.render_remaining(remaining);
        }

        if finished {
            self.finish_quiz(score);
        } else {
            self.render_current_question();
        }
    }

    #[doc(hidden)]
    fn finish_quiz(&mut self, score: u32) {
        let placement = self.leaderboard.find_placement(score);
        info!(score, ?placement, "quiz finished");
        if !self.navigator.quiz_finished(score, placement) {
            return;
        }
        self.emit(QuizEvent::QuizFinished { score });
        self.emit(QuizEvent::PageChanged {
            page: self.navigator.page(),
        });
        self.render_remaining(0);
        self.renderer.render_results(score, placement.qualifies());
    }

    #[doc(hidden)]
    fn submit_name(&mut self, raw: &str) -> Result<()> {
        let Page::Results { score, placement } = self.navigator.page() else {
            trace!("name submitted outside the results page ignored");
            return Ok(());
        };
        if !placement.qualifies() {
            trace!(score, "name submitted for a non-qualifying score ignored");
            return Ok(());
        }
        let name = match PlayerName::parse(raw) {
            Ok(name) => name,
            Err(err) => {
                self.reject(err.to_string());
                return Err(err);
            }
        };

        let Placement::Ranked(rank) = self.leaderboard.add_score(&name, score) else {
            warn!(%name, score, "score no longer qualifies; submission dropped");
            return Ok(());
        };
        self.navigator.score_submitted(rank);
        self.emit(QuizEvent::ScoreRecorded {
            name: name.to_string(),
            score,
            rank,
        });
        self.emit(QuizEvent::PageChanged {
            page: self.navigator.page(),
        });
        self.render_high_scores(Some(rank));
        Ok(())
    }

    #[doc(hidden)]
    fn clear_leaderboard(&mut self) {
        if !matches!(self.navigator.page(), Page::HighScores { .. }) {
            trace!("clear request outside the high score page ignored");
            return;
        }
        self.leaderboard.clear();
        self.emit(QuizEvent::LeaderboardCleared);
        self.render_high_scores(None);
    }

    #[doc(hidden)]
    fn show_high_scores(&mut self) {
        if !self.navigator.show_high_scores() {
            return;
        }
        self.emit(QuizEvent::PageChanged {
            page: self.navigator.page(),
        });
        self.render_high_scores(None);
    }

    #[doc(hidden)]
    fn catch_up(&mut self, last: &mut Instant) {
        let now = Instant::now();
        self.advance(now.duration_since(*last));
        *last = now;
    }
}

// Public API implementation block.
impl<R: Renderer> QuizEngine<R> {
    /// Applies one piece of user input.
    ///
    /// Input that makes no sense on the current page is ignored. An invalid
    /// player name is rejected with `QuizError::InvalidName`; the results page
    /// stays open so the player can retry.
    pub fn handle_input(&mut self, input: UserInput) -> Result<()> {
        trace!(?input, "input received");
        match input {
            UserInput::StartRequested => self.start_quiz()?,
            UserInput::AnswerSelected(index) => self.answer(index),
            UserInput::NameSubmitted(name) => self.submit_name(&name)?,
            UserInput::ClearRequested => self.clear_leaderboard(),
            UserInput::NavigateHighScores => self.show_high_scores(),
        }
        Ok(())
    }

    /// Moves logical time forward and handles every timer that came due.
    pub fn advance(&mut self, elapsed: Duration) {
        for fired in self.scheduler.advance(elapsed) {
            match fired.purpose {
                TimerPurpose::CountdownTick => {
                    match self.session.on_timer(fired.id, &mut self.scheduler) {
                        TickOutcome::Remaining(seconds) => {
                            self.emit(QuizEvent::TimeRemaining { seconds });
                            self.render_remaining(seconds);
                        }
                        TickOutcome::Finished { score } => {
                            self.emit(QuizEvent::TimeRemaining { seconds: 0 });
                            self.finish_quiz(score);
                        }
                        TickOutcome::Stale => {}
                    }
                }
                TimerPurpose::FeedbackHide => {
                    if self.feedback.expire(fired.id) {
                        self.renderer.render_feedback(Feedback::None);
                    }
                }
            }
        }
    }

    /// Runs the engine until `shutdown` fires or the input channel closes.
    ///
    /// The loop wakes at the configured `ClockResolution`, feeds the elapsed
    /// wall time to the scheduler, and applies inputs in arrival order. Time
    /// is always caught up before an input is handled. Dropping the shutdown
    /// sender also stops the loop. The engine is handed back on exit.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<UserInput>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Self {
        let period = self.resolution.poll_interval();
        info!(?period, "QuizEngine starting up...");
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                input = inputs.recv() => {
                    let Some(input) = input else { break };
                    self.catch_up(&mut last);
                    if let Err(err) = self.handle_input(input) {
                        debug!(error = %err, "input refused");
                    }
                }
                _ = ticker.tick() => self.catch_up(&mut last),
            }
        }

        info!("QuizEngine has shut down.");
        self
    }

    /// Subscribes to the `QuizEvent` stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<QuizEvent> {
        self.event_sender.subscribe()
    }

    pub fn page(&self) -> Page {
        self.navigator.page()
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback.current()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
