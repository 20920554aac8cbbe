//! The quiz countdown: a tick-driven clock with out-of-band penalties.

use crate::common::TimerId;
use crate::components::scheduler::{Scheduler, TimerPurpose};
use crate::error::{QuizError, Result};
use std::time::Duration;
use tracing::{debug, trace};

/// The default number of seconds a wrong answer costs.
pub const DEFAULT_PENALTY_SECS: i64 = 2;

/// The result of moving the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    /// The clock is still running with this many seconds left.
    Running { remaining: i64 },
    /// The clock just reached zero. Reported exactly once per run.
    Expired,
    /// The clock was not running; nothing changed.
    Idle,
}

/// A decrementing clock owning at most one tick timer at a time.
///
/// `remaining` drops by one per tick and by the penalty amount on a wrong
/// answer. Whichever drives it to zero or below stops the clock and reports
/// `Expired`; a penalty does so synchronously without waiting for the next tick.
#[derive(Debug)]
pub struct CountdownTimer {
    remaining: i64,
    running: bool,
    tick_id: Option<TimerId>,
    tick_interval: Duration,
}

impl CountdownTimer {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            remaining: 0,
            running: false,
            tick_id: None,
            tick_interval,
        }
    }

    /// Starts the clock at `initial_seconds` and schedules its tick.
    ///
    /// Fails with `TimerAlreadyRunning` if the clock was not stopped first, so
    /// two tick timers can never be live for one countdown.
    pub fn start(&mut self, initial_seconds: i64, scheduler: &mut Scheduler) -> Result<()> {
        if self.running {
            return Err(QuizError::TimerAlreadyRunning);
        }
        if initial_seconds <= 0 {
            return Err(QuizError::InvalidDuration {
                field: "initial_seconds",
            });
        }
        self.remaining = initial_seconds;
        self.running = true;
        self.tick_id = Some(scheduler.schedule_interval(TimerPurpose::CountdownTick, self.tick_interval));
        debug!(initial_seconds, "countdown started");
        Ok(())
    }

    /// Decrements the clock by one second.
    pub fn tick(&mut self, scheduler: &mut Scheduler) -> CountdownStatus {
        self.decrement(1, scheduler)
    }

    /// Handles a fired scheduler timer, ticking only if it is this clock's current timer.
    pub fn on_timer(&mut self, id: TimerId, scheduler: &mut Scheduler) -> CountdownStatus {
        if self.tick_id != Some(id) {
            trace!(?id, "stale countdown tick ignored");
            return CountdownStatus::Idle;
        }
        self.tick(scheduler)
    }

    /// Removes `amount` seconds immediately, independent of the tick schedule.
    pub fn apply_penalty(&mut self, amount: i64, scheduler: &mut Scheduler) -> CountdownStatus {
        let status = self.decrement(amount, scheduler);
        if status != CountdownStatus::Idle {
            debug!(amount, remaining = self.remaining, "penalty applied");
        }
        status
    }

    /// Stops the clock and cancels its tick timer. Safe to call repeatedly.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.tick_id.take() {
            scheduler.cancel(id);
        }
        self.running = false;
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn decrement(&mut self, amount: i64, scheduler: &mut Scheduler) -> CountdownStatus {
        if !self.running {
            return CountdownStatus::Idle;
        }
        self.remaining -= amount;
        if self.remaining <= 0 {
            self.stop(scheduler);
            debug!(remaining = self.remaining, "countdown expired");
            CountdownStatus::Expired
        } else {
            CountdownStatus::Running {
                remaining: self.remaining,
            }
        }
    }
}
