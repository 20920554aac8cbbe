//! Contains the timing building blocks of a quiz.
//!
//! The `Scheduler` owns every cancellable timer; the `CountdownTimer` and the
//! `FeedbackSlot` each hold the handle of the one timer they are responsible
//! for and check it whenever a timer fires. The `QuizEngine` routes fired
//! timers to them.

pub mod countdown;
pub mod feedback;
pub mod scheduler;
