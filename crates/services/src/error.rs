//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::TimeParseError;
use lingo_core::exercise::ExerciseError;
use lingo_core::model::{DraftError, LessonError, SummaryError};
use lingo_core::progression::ProgressionError;
use storage::repository::StorageError;

/// Errors emitted while reading player configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown stop strategy `{raw}` (expected poll or timer)")]
    UnknownStrategy { raw: String },
    #[error("invalid {var} value: {raw}")]
    InvalidNumber { var: &'static str, raw: String },
}

/// Errors emitted by `LessonSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no line is active")]
    NoActiveLine,
    #[error("lesson already completed")]
    Completed,
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Time(#[from] TimeParseError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error("no lesson id given")]
    MissingId,
    #[error("invalid lesson base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("lesson request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors surfaced by speech recognizers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech recognition is not supported")]
    Unsupported,
    #[error("microphone permission denied")]
    Denied,
    #[error("speech recognition failed: {0}")]
    Failed(String),
}

/// Errors emitted by the annotation editor.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthoringError {
    #[error("url has no `v` parameter: {raw}")]
    MissingVideoParam { raw: String },
    #[error("invalid video url: {0}")]
    InvalidVideoUrl(#[from] url::ParseError),
    #[error("no video selected")]
    NoVideo,
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("player is not ready")]
    PlayerNotReady,
    #[error("no line at index {0}")]
    NoSuchLine(usize),
    #[error("line {index} is incomplete: {source}")]
    IncompleteLine {
        index: usize,
        #[source]
        source: DraftError,
    },
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
