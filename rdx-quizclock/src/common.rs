//! Contains common, primitive types shared across the Quizclock engine.
//!
//! Timer handles are generational `slotmap` keys. A key that has been
//! cancelled is never handed out again, so a stale handle can never address
//! a timer that was scheduled later for the same purpose.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Uniquely and safely identifies a timer registered with the `Scheduler`.
    ///
    /// This key is returned when a timer is scheduled and must be presented
    /// again to cancel it. Fired timers report their key so that handlers can
    /// check it against the handle they currently own.
    pub struct TimerId;
}

/// The 0-based position of an entry on the leaderboard, 0 being the highest score.
pub type Rank = usize;

/// The number of choices every question offers.
pub const CHOICE_COUNT: usize = 4;

/// The transient indicator shown after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    Correct,
    Incorrect,
    /// No feedback is visible.
    None,
}

impl Feedback {
    pub fn is_visible(self) -> bool {
        self != Feedback::None
    }
}
