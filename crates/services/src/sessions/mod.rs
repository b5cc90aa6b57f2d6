mod activity;
mod progress;
mod service;

// Public API of the lesson session subsystem.
pub use crate::error::SessionError;
pub use activity::{LessonActivity, LessonService, LoadState};
pub use progress::SessionProgress;
pub use service::{LessonSession, SessionEvent, SessionMessage, SubmitOutcome};
