use std::path::{Path, PathBuf};
use std::sync::Arc;

use lingo_core::model::{
    DraftError, Language, Lesson, LineDraft, check_overlap, sort_drafts,
};
use storage::DirectoryRepository;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use url::Url;

use super::speech::{SpeechEvent, SpeechRecognizer};
use super::transliterate::{Transliterator, clean_transliteration};
use crate::error::{AuthoringError, SpeechError};
use crate::player::VideoHost;

const UNTITLED: &str = "Untitled";

/// Read the video id from a YouTube watch URL's `v` parameter.
///
/// # Errors
///
/// Returns `AuthoringError::InvalidVideoUrl` when `raw` is not a URL and
/// `AuthoringError::MissingVideoParam` when it has no non-empty `v`.
pub fn video_id_from_url(raw: &str) -> Result<String, AuthoringError> {
    let url = Url::parse(raw.trim())?;
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AuthoringError::MissingVideoParam { raw: raw.to_owned() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Started,
    Stopped,
    /// No recognizer; the warning has already been shown.
    Unavailable,
}

/// Annotation page state: the lesson being authored plus the line draft.
pub struct AnnotationEditor {
    video_id: Option<String>,
    name: String,
    introduction: String,
    language: Language,
    lines: Vec<LineDraft>,
    draft: LineDraft,
    editing: Option<usize>,
    host: Option<Arc<dyn VideoHost>>,
    transliterator: Arc<dyn Transliterator>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    speech_tx: mpsc::UnboundedSender<SpeechEvent>,
    speech_rx: mpsc::UnboundedReceiver<SpeechEvent>,
    recording: bool,
    warned_unsupported: bool,
}

impl AnnotationEditor {
    #[must_use]
    pub fn new(transliterator: Arc<dyn Transliterator>) -> Self {
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        Self {
            video_id: None,
            name: String::new(),
            introduction: String::new(),
            language: Language::default(),
            lines: Vec::new(),
            draft: LineDraft::default(),
            editing: None,
            host: None,
            transliterator,
            recognizer: None,
            speech_tx,
            speech_rx,
            recording: false,
            warned_unsupported: false,
        }
    }

    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    #[must_use]
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn lines(&self) -> &[LineDraft] {
        &self.lines
    }

    #[must_use]
    pub fn draft(&self) -> &LineDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut LineDraft {
        &mut self.draft
    }

    /// Index of the line loaded into the draft, if any.
    #[must_use]
    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// # Errors
    ///
    /// See [`video_id_from_url`].
    pub fn set_video_url(&mut self, raw: &str) -> Result<&str, AuthoringError> {
        let id = video_id_from_url(raw)?;
        Ok(self.video_id.insert(id).as_str())
    }

    pub fn set_video_id(&mut self, id: impl Into<String>) {
        self.video_id = Some(id.into());
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_introduction(&mut self, introduction: impl Into<String>) {
        self.introduction = introduction.into();
    }

    /// Select the recording and transliteration language by locale code or name.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::UnknownLanguage` if no language matches.
    pub fn set_language(&mut self, code_or_name: &str) -> Result<Language, AuthoringError> {
        let language = Language::by_code(code_or_name)
            .or_else(|| Language::by_name(code_or_name))
            .ok_or_else(|| AuthoringError::UnknownLanguage(code_or_name.to_owned()))?;
        self.language = language;
        Ok(language)
    }

    pub fn on_player_ready(&mut self, host: Arc<dyn VideoHost>) {
        self.host = Some(host);
    }

    //
    // ─── LINES ─────────────────────────────────────────────────────────────────
    //

    /// Validate the draft and insert it, or replace the line being edited.
    ///
    /// Lines are kept sorted by start. On success the draft resets to an
    /// empty line at the last line's end.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Draft` for missing fields, foreign alternative
    /// words or an overlap with a neighbouring line. Nothing changes on error.
    pub fn submit_draft(&mut self) -> Result<(), AuthoringError> {
        let line = self.draft.validate().inspect_err(|err| {
            warn!(error = %err, "line rejected");
        })?;
        let accepted = LineDraft::from_line(&line).map_err(DraftError::from)?;

        let mut candidate = self.lines.clone();
        match self.editing {
            Some(index) if index < candidate.len() => candidate[index] = accepted,
            _ => candidate.push(accepted),
        }
        sort_drafts(&mut candidate);
        check_overlap(&candidate).inspect_err(|err| {
            warn!(error = %err, "line rejected");
        })?;

        self.lines = candidate;
        self.editing = None;
        self.reset_draft();
        info!(lines = self.lines.len(), "line saved");
        Ok(())
    }

    /// Insert an empty one-second line right after `index` and edit it.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NoSuchLine` for a bad index and
    /// `AuthoringError::Draft` if the new line would overlap the next one.
    pub fn insert_after(&mut self, index: usize) -> Result<usize, AuthoringError> {
        let anchor_end = self
            .lines
            .get(index)
            .map(|line| line.end)
            .ok_or(AuthoringError::NoSuchLine(index))?;
        let blank = LineDraft::blank_at(anchor_end, anchor_end + 1.0);

        let mut candidate = self.lines.clone();
        candidate.insert(index + 1, blank.clone());
        check_overlap(&candidate).inspect_err(|err| {
            warn!(error = %err, "insert rejected");
        })?;

        self.lines = candidate;
        self.editing = Some(index + 1);
        self.draft = blank;
        Ok(index + 1)
    }

    /// Remove a line. Editing a deleted line discards the draft.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NoSuchLine` for a bad index.
    pub fn delete_line(&mut self, index: usize) -> Result<LineDraft, AuthoringError> {
        if index >= self.lines.len() {
            return Err(AuthoringError::NoSuchLine(index));
        }
        let removed = self.lines.remove(index);
        match self.editing {
            Some(editing) if editing == index => {
                self.editing = None;
                self.reset_draft();
            }
            Some(editing) if editing > index => self.editing = Some(editing - 1),
            _ => {}
        }
        Ok(removed)
    }

    /// Load a line into the draft for editing.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NoSuchLine` for a bad index.
    pub fn select_line(&mut self, index: usize) -> Result<&LineDraft, AuthoringError> {
        let line = self
            .lines
            .get(index)
            .cloned()
            .ok_or(AuthoringError::NoSuchLine(index))?;
        self.editing = Some(index);
        self.draft = line;
        Ok(&self.draft)
    }

    //
    // ─── PLAYER ────────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `AuthoringError::PlayerNotReady` before the host is ready.
    pub fn set_start_from_player(&mut self) -> Result<f64, AuthoringError> {
        let now = self.host()?.current_time();
        self.draft.start = now;
        Ok(now)
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::PlayerNotReady` before the host is ready.
    pub fn set_end_from_player(&mut self) -> Result<f64, AuthoringError> {
        let now = self.host()?.current_time();
        self.draft.end = now;
        Ok(now)
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::PlayerNotReady` before the host is ready.
    pub fn seek_to_start(&self) -> Result<(), AuthoringError> {
        self.host()?.seek_to(self.draft.start, true);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuthoringError::PlayerNotReady` before the host is ready.
    pub fn seek_to_end(&self) -> Result<(), AuthoringError> {
        self.host()?.seek_to(self.draft.end, true);
        Ok(())
    }

    //
    // ─── TEXT INPUT ────────────────────────────────────────────────────────────
    //

    /// Fill the transliteration from the draft's native text.
    pub fn transliterate_draft(&mut self) -> &str {
        self.draft.transliteration = self.transliterate(&self.draft.native);
        &self.draft.transliteration
    }

    /// Start or stop recording the native text.
    ///
    /// Stopping also takes the draft's end time from the player when it is ready.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Speech` the first time recording is attempted
    /// without a recognizer, or when the recognizer fails to start or stop.
    pub fn toggle_recording(&mut self) -> Result<RecordingState, AuthoringError> {
        let Some(recognizer) = self.recognizer.clone() else {
            if self.warned_unsupported {
                return Ok(RecordingState::Unavailable);
            }
            self.warned_unsupported = true;
            warn!("speech recognition is not supported");
            return Err(SpeechError::Unsupported.into());
        };

        if self.recording {
            self.recording = false;
            recognizer.stop()?;
            if self.host.is_some() {
                self.set_end_from_player()?;
            }
            return Ok(RecordingState::Stopped);
        }

        recognizer
            .start(self.language.code, self.speech_tx.clone())
            .inspect_err(|err| warn!(error = %err, "speech recognition failed to start"))?;
        self.recording = true;
        info!(locale = self.language.code, "recording started");
        Ok(RecordingState::Started)
    }

    /// Wait for the next message from the recognizer.
    pub async fn next_speech_event(&mut self) -> Option<SpeechEvent> {
        self.speech_rx.recv().await
    }

    /// Take a pending recognizer message without waiting.
    pub fn try_speech_event(&mut self) -> Option<SpeechEvent> {
        self.speech_rx.try_recv().ok()
    }

    /// Apply a recognizer message to the draft.
    pub fn apply_speech_event(&mut self, event: SpeechEvent) {
        self.recording = false;
        match event {
            SpeechEvent::Transcript(text) => {
                self.draft.transliteration = self.transliterate(&text);
                self.draft.native = text;
            }
            SpeechEvent::Error(err) => error!(error = %err, "speech recognition error"),
            SpeechEvent::Ended => {}
        }
    }

    //
    // ─── IMPORT / EXPORT ───────────────────────────────────────────────────────
    //

    /// Replace the editor contents with an uploaded lesson.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Draft` if a line's times cannot be read.
    pub fn restore(&mut self, lesson: &Lesson) -> Result<(), AuthoringError> {
        let mut lines = lesson
            .lines()
            .iter()
            .map(LineDraft::from_line)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DraftError::from)?;
        sort_drafts(&mut lines);

        self.language = match lesson.language() {
            Some(name) => Language::by_name(name).unwrap_or_else(|| {
                warn!(language = name, "unknown lesson language; using default");
                Language::default()
            }),
            None => Language::default(),
        };
        self.video_id = Some(lesson.video_id().to_owned());
        self.name = lesson.name().to_owned();
        self.introduction = lesson.introduction().unwrap_or_default().to_owned();
        self.lines = lines;
        self.editing = None;
        self.reset_draft();
        info!(lines = self.lines.len(), "lesson restored");
        Ok(())
    }

    /// Assemble the lesson file contents.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::NoVideo` without a video,
    /// `AuthoringError::IncompleteLine` for a line that fails validation and
    /// `AuthoringError::Lesson` when there are no lines.
    pub fn build_lesson(&self) -> Result<Lesson, AuthoringError> {
        let video_id = self.video_id.clone().ok_or(AuthoringError::NoVideo)?;
        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                line.validate()
                    .map_err(|source| AuthoringError::IncompleteLine { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let name = match self.name.trim() {
            "" => UNTITLED,
            name => name,
        };
        let mut lesson =
            Lesson::new(name, video_id, lines)?.with_language(self.language.name.to_lowercase());
        if !self.introduction.trim().is_empty() {
            lesson = lesson.with_introduction(self.introduction.trim());
        }
        Ok(lesson)
    }

    /// Write the lesson into `dir`, named after its first line.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`AnnotationEditor::build_lesson`] and
    /// `AuthoringError::Storage` if the file cannot be written.
    pub async fn export(&self, dir: &Path) -> Result<PathBuf, AuthoringError> {
        let lesson = self.build_lesson()?;
        let path = DirectoryRepository::write_export(dir, &lesson).await?;
        info!(path = %path.display(), "lesson exported");
        Ok(path)
    }

    fn host(&self) -> Result<&Arc<dyn VideoHost>, AuthoringError> {
        self.host.as_ref().ok_or(AuthoringError::PlayerNotReady)
    }

    fn transliterate(&self, text: &str) -> String {
        clean_transliteration(&self.transliterator.transliterate(text, &self.language))
    }

    fn reset_draft(&mut self) {
        let end = self.lines.last().map_or(0.0, |line| line.end);
        self.draft = LineDraft::blank_at(end, end);
    }
}
