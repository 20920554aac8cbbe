//! A single timed run through the question bank.

use crate::common::{Feedback, TimerId, CHOICE_COUNT};
use crate::components::countdown::{CountdownStatus, CountdownTimer};
use crate::components::scheduler::Scheduler;
use crate::config::TimingConfig;
use crate::error::Result;
use crate::question::{Question, QuestionBank};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No quiz has been started yet.
    Idle,
    /// A question is showing and the clock is running.
    AwaitingAnswer,
    /// The clock ran out; the score is final.
    Finished,
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The session was not accepting answers, or the choice does not exist.
    Ignored,
    Judged {
        feedback: Feedback,
        score: u32,
        /// Seconds left after any penalty, possibly negative.
        remaining: i64,
        /// `true` if a penalty just ran the clock out.
        finished: bool,
    },
}

/// What happened when the countdown timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The fired handle was not this session's clock, or the session is over.
    Stale,
    Remaining(i64),
    Finished { score: u32 },
}

pub struct QuizSession {
    bank: Arc<QuestionBank>,
    current_index: Option<usize>,
    score: u32,
    timer: CountdownTimer,
    state: SessionState,
    duration_secs: i64,
    penalty_secs: i64,
}

impl QuizSession {
    pub fn new(bank: Arc<QuestionBank>, timing: &TimingConfig) -> Self {
        Self {
            bank,
            current_index: None,
            score: 0,
            timer: CountdownTimer::new(timing.tick_interval()),
            state: SessionState::Idle,
            duration_secs: i64::from(timing.quiz_duration_secs),
            penalty_secs: i64::from(timing.penalty_secs),
        }
    }

    /// Resets the score, shows the first question, and starts the clock.
    ///
    /// Any clock left over from a previous run is stopped first, so restarting
    /// never leaves two tick timers running.
    pub fn start(&mut self, scheduler: &mut Scheduler) -> Result<&Question> {
        self.timer.stop(scheduler);
        self.score = 0;
        self.current_index = None;
        self.advance();
        self.timer.start(self.duration_secs, scheduler)?;
        self.state = SessionState::AwaitingAnswer;
        info!(
            questions = self.bank.len(),
            duration_secs = self.duration_secs,
            "quiz session started"
        );
        Ok(self.bank.get(self.current_index.unwrap_or(0)))
    }

    /// Scores `choice_index` against the current question and moves to the next one.
    ///
    /// A wrong answer costs `penalty_secs` immediately and may finish the
    /// session on the spot. The next question is exposed either way.
    pub fn answer(&mut self, choice_index: usize, scheduler: &mut Scheduler) -> AnswerOutcome {
        if self.state != SessionState::AwaitingAnswer {
            trace!(choice_index, state = ?self.state, "answer ignored");
            return AnswerOutcome::Ignored;
        }
        if choice_index >= CHOICE_COUNT {
            debug!(choice_index, "answer outside the offered choices rejected");
            return AnswerOutcome::Ignored;
        }
        let Some(index) = self.current_index else {
            return AnswerOutcome::Ignored;
        };

        let (feedback, status) = if self.bank.get(index).is_correct(choice_index) {
            self.score += 1;
            (Feedback::Correct, CountdownStatus::Running { remaining: self.timer.remaining() })
        } else {
            let status = self.timer.apply_penalty(self.penalty_secs, scheduler);
            (Feedback::Incorrect, status)
        };
        debug!(question = index, choice_index, ?feedback, score = self.score, "answer judged");

        self.advance();
        let finished = status == CountdownStatus::Expired;
        if finished {
            self.finish();
        }
        AnswerOutcome::Judged {
            feedback,
            score: self.score,
            remaining: self.timer.remaining(),
            finished,
        }
    }

    /// Handles a fired countdown timer.
    pub fn on_timer(&mut self, id: TimerId, scheduler: &mut Scheduler) -> TickOutcome {
        if self.state != SessionState::AwaitingAnswer {
            return TickOutcome::Stale;
        }
        match self.timer.on_timer(id, scheduler) {
            CountdownStatus::Running { remaining } => TickOutcome::Remaining(remaining),
            CountdownStatus::Expired => {
                self.finish();
                TickOutcome::Finished { score: self.score }
            }
            CountdownStatus::Idle => TickOutcome::Stale,
        }
    }

    /// The question currently awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::AwaitingAnswer => self.current_index.map(|i| self.bank.get(i)),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self) -> i64 {
        self.timer.remaining()
    }

    /// Seconds a wrong answer costs.
    pub fn penalty_secs(&self) -> i64 {
        self.penalty_secs
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    fn advance(&mut self) {
        self.current_index = Some(match self.current_index {
            Some(i) => self.bank.next_index(i),
            None => 0,
        });
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        info!(score = self.score, "quiz session finished");
    }
}
