//! The single-slot transient feedback overlay.
//!
//! Showing new feedback overwrites the slot and cancels the previous hide
//! timer. The hide handler also compares the fired handle against the current
//! token, so a hide that was already in flight can never clear feedback that
//! belongs to a later answer.

use crate::common::{Feedback, TimerId};
use crate::components::scheduler::{Scheduler, TimerPurpose};
use std::time::Duration;
use tracing::trace;

#[derive(Debug)]
pub struct FeedbackSlot {
    current: Feedback,
    token: Option<TimerId>,
    display_for: Duration,
}

impl FeedbackSlot {
    pub fn new(display_for: Duration) -> Self {
        Self {
            current: Feedback::None,
            token: None,
            display_for,
        }
    }

    /// Shows `feedback`, superseding whatever was visible, and returns its hide token.
    pub fn show(&mut self, feedback: Feedback, scheduler: &mut Scheduler) -> TimerId {
        if let Some(previous) = self.token.take() {
            scheduler.cancel(previous);
        }
        let token = scheduler.schedule_once(TimerPurpose::FeedbackHide, self.display_for);
        self.current = feedback;
        self.token = Some(token);
        token
    }

    /// Handles a fired hide timer.
    ///
    /// Returns `true` if the feedback was hidden; a stale token is ignored.
    pub fn expire(&mut self, token: TimerId) -> bool {
        if self.token != Some(token) {
            trace!(?token, "stale feedback hide ignored");
            return false;
        }
        self.token = None;
        self.current = Feedback::None;
        true
    }

    /// Hides feedback immediately and cancels its pending hide timer.
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        if let Some(token) = self.token.take() {
            scheduler.cancel(token);
        }
        self.current = Feedback::None;
    }

    pub fn current(&self) -> Feedback {
        self.current
    }
}
