//! A logical-time scheduler owning every cancellable timer in the engine.
//!
//! The scheduler never looks at the wall clock. The driver feeds it elapsed
//! time through `advance`, which makes every timing path deterministic and
//! testable without sleeping.

use crate::common::TimerId;
use slotmap::SlotMap;
use std::time::Duration;
use tracing::trace;

/// What a timer is for. Handlers dispatch on this when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// The periodic countdown tick of the active quiz.
    CountdownTick,
    /// The one-shot timeout that hides answer feedback.
    FeedbackHide,
}

/// Whether a timer re-arms after it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(Duration),
}

#[doc(hidden)]
struct ScheduledTimer {
    purpose: TimerPurpose,
    repeat: Repeat,
    due_in: Duration,
}

/// A timer that came due during an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub purpose: TimerPurpose,
}

#[derive(Default)]
pub struct Scheduler {
    timers: SlotMap<TimerId, ScheduledTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a timer that fires every `period`, first after one full period.
    ///
    /// A zero period is clamped to one millisecond so `advance` always terminates.
    pub fn schedule_interval(&mut self, purpose: TimerPurpose, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = self.timers.insert(ScheduledTimer {
            purpose,
            repeat: Repeat::Every(period),
            due_in: period,
        });
        trace!(?id, ?purpose, ?period, "interval timer scheduled");
        id
    }

    /// Registers a timer that fires once after `delay`.
    pub fn schedule_once(&mut self, purpose: TimerPurpose, delay: Duration) -> TimerId {
        let id = self.timers.insert(ScheduledTimer {
            purpose,
            repeat: Repeat::Once,
            due_in: delay,
        });
        trace!(?id, ?purpose, ?delay, "one-shot timer scheduled");
        id
    }

    /// Cancels a timer.
    ///
    /// Returns `true` if the timer was still pending. Cancelling an unknown or
    /// already-fired handle is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let was_removed = self.timers.remove(id).is_some();
        if was_removed {
            trace!(?id, "timer cancelled");
        }
        was_removed
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// The number of pending timers with the given purpose.
    pub fn active_count(&self, purpose: TimerPurpose) -> usize {
        self.timers.values().filter(|t| t.purpose == purpose).count()
    }

    /// Moves logical time forward by `elapsed` and returns every firing, ordered by due time.
    ///
    /// An interval timer that was due several times within `elapsed` is
    /// reported once per period. One-shot timers are removed as they fire.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FiredTimer> {
        // (offset into `elapsed` at which it fired, insertion order, firing)
        let mut fired: Vec<(Duration, usize, FiredTimer)> = Vec::new();
        let mut expired_once = Vec::new();

        for (id, timer) in self.timers.iter_mut() {
            let mut offset = Duration::ZERO;
            let mut remaining = elapsed;
            let mut done = false;
            while timer.due_in <= remaining {
                remaining -= timer.due_in;
                offset += timer.due_in;
                fired.push((
                    offset,
                    fired.len(),
                    FiredTimer {
                        id,
                        purpose: timer.purpose,
                    },
                ));
                match timer.repeat {
                    Repeat::Every(period) => timer.due_in = period,
                    Repeat::Once => {
                        expired_once.push(id);
                        done = true;
                        break;
                    }
                }
            }
            if !done {
                timer.due_in -= remaining;
            }
        }

        for id in expired_once {
            self.timers.remove(id);
        }

        fired.sort_by_key(|(offset, seq, _)| (*offset, *seq));
        fired.into_iter().map(|(_, _, f)| f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_once_per_period() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_interval(TimerPurpose::CountdownTick, Duration::from_secs(1));

        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        let fired = scheduler.advance(Duration::from_millis(1));
        assert_eq!(fired, vec![FiredTimer { id, purpose: TimerPurpose::CountdownTick }]);

        let fired = scheduler.advance(Duration::from_millis(3500));
        assert_eq!(fired.len(), 3);
        assert!(scheduler.is_active(id));
    }

    #[test]
    fn one_shot_fires_once_and_is_removed() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_once(TimerPurpose::FeedbackHide, Duration::from_millis(1500));

        assert!(scheduler.advance(Duration::from_millis(1000)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(2000)).len(), 1);
        assert!(!scheduler.is_active(id));
        assert!(scheduler.advance(Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule_interval(TimerPurpose::CountdownTick, Duration::from_secs(1));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn stale_handle_does_not_address_a_newer_timer() {
        let mut scheduler = Scheduler::new();
        let old = scheduler.schedule_once(TimerPurpose::FeedbackHide, Duration::from_secs(1));
        scheduler.cancel(old);
        let new = scheduler.schedule_once(TimerPurpose::FeedbackHide, Duration::from_secs(1));

        assert_ne!(old, new);
        assert!(!scheduler.cancel(old));
        assert!(scheduler.is_active(new));
    }

    #[test]
    fn firings_are_ordered_by_due_time() {
        let mut scheduler = Scheduler::new();
        let tick = scheduler.schedule_interval(TimerPurpose::CountdownTick, Duration::from_secs(1));
        let hide = scheduler.schedule_once(TimerPurpose::FeedbackHide, Duration::from_millis(1500));

        let order: Vec<TimerId> = scheduler
            .advance(Duration::from_secs(2))
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(order, vec![tick, hide, tick]);
    }
}
