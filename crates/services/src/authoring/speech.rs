use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::error::SpeechError;

/// Message from a running recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// One-shot result: the recognized text.
    Transcript(String),
    Error(SpeechError),
    /// Recognition stopped without a result.
    Ended,
}

/// Speech-to-text capability for recording a line's native text.
pub trait SpeechRecognizer: Send + Sync {
    /// Begin listening in `locale`; results arrive on `events`.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if recognition cannot start.
    fn start(
        &self,
        locale: &str,
        events: mpsc::UnboundedSender<SpeechEvent>,
    ) -> Result<(), SpeechError>;

    /// # Errors
    ///
    /// Returns `SpeechError` if the recognizer cannot be stopped.
    fn stop(&self) -> Result<(), SpeechError>;
}

/// Replies to each `start` with the next queued transcript.
#[derive(Debug, Default)]
pub struct ScriptedRecognizer {
    transcripts: Mutex<VecDeque<String>>,
    locales: Mutex<Vec<String>>,
}

impl ScriptedRecognizer {
    #[must_use]
    pub fn new(transcripts: impl IntoIterator<Item = String>) -> Self {
        Self {
            transcripts: Mutex::new(transcripts.into_iter().collect()),
            locales: Mutex::new(Vec::new()),
        }
    }

    /// Locales requested so far.
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        self.locales
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(
        &self,
        locale: &str,
        events: mpsc::UnboundedSender<SpeechEvent>,
    ) -> Result<(), SpeechError> {
        self.locales
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(locale.to_owned());
        let next = self
            .transcripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let event = next.map_or(SpeechEvent::Ended, SpeechEvent::Transcript);
        events
            .send(event)
            .map_err(|err| SpeechError::Failed(err.to_string()))
    }

    fn stop(&self) -> Result<(), SpeechError> {
        Ok(())
    }
}
