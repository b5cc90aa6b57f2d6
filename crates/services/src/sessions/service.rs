use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lingo_core::Clock;
use lingo_core::exercise::{Exercise, Feedback, Verdict};
use lingo_core::model::{Lesson, LessonSummary, Line, OptionId, Segment};
use lingo_core::progression::{AdvanceTicket, Effect, LessonPhase, Progression};
use lingo_core::shuffle::ShuffleSeed;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::progress::SessionProgress;
use crate::config::PlayerConfig;
use crate::error::SessionError;
use crate::player::{SegmentPlayer, VideoHost};

//
// ─── MESSAGES ──────────────────────────────────────────────────────────────────
//

/// Raised by the session's own timers; feed back through [`LessonSession::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    AdvanceDue(AdvanceTicket),
}

/// Front-end input, one per user action or widget callback.
#[derive(Clone)]
pub enum SessionMessage {
    VideoReady(Arc<dyn VideoHost>),
    Begin,
    Select(OptionId),
    SelectWord(String),
    RemoveLast,
    RemoveAt(usize),
    Submit,
    AcknowledgeTrivia,
    Previous,
    Next,
    PlaySection,
}

impl fmt::Debug for SessionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VideoReady(_) => f.write_str("VideoReady"),
            Self::Begin => f.write_str("Begin"),
            Self::Select(id) => write!(f, "Select({id})"),
            Self::SelectWord(word) => write!(f, "SelectWord({word:?})"),
            Self::RemoveLast => f.write_str("RemoveLast"),
            Self::RemoveAt(position) => write!(f, "RemoveAt({position})"),
            Self::Submit => f.write_str("Submit"),
            Self::AcknowledgeTrivia => f.write_str("AcknowledgeTrivia"),
            Self::Previous => f.write_str("Previous"),
            Self::Next => f.write_str("Next"),
            Self::PlaySection => f.write_str("PlaySection"),
        }
    }
}

/// Result of a submit, for the feedback cue and trivia popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub line: usize,
    pub verdict: Verdict,
}

impl SubmitOutcome {
    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.verdict.feedback()
    }

    #[must_use]
    pub fn trivia(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Correct { trivia } => trivia.as_deref(),
            Verdict::Incorrect => None,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a lesson.
///
/// Binds the progression state machine to the segment player and the
/// per-line exercise, and owns the delayed advance timer. Dropping the
/// session cancels every pending timer.
pub struct LessonSession {
    lesson: Lesson,
    segments: Vec<Segment>,
    progression: Progression,
    exercise: Option<Exercise>,
    player: SegmentPlayer,
    advance_delay: Duration,
    advance_task: Option<JoinHandle<()>>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    seed: ShuffleSeed,
    clock: Clock,
    started_at: DateTime<Utc>,
    summary: Option<LessonSummary>,
}

impl LessonSession {
    /// Start a session on `lesson`.
    ///
    /// Shows the introduction first when the lesson has one; otherwise the
    /// first line is ready for play.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Time` if a line's time fails to parse and
    /// `SessionError::Progression` for a lesson without lines.
    pub fn new(
        lesson: Lesson,
        config: &PlayerConfig,
        seed: ShuffleSeed,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        let segments = lesson
            .lines()
            .iter()
            .map(Line::segment)
            .collect::<Result<Vec<_>, _>>()?;
        let progression = Progression::for_lesson(&lesson)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut session = Self {
            lesson,
            segments,
            progression,
            exercise: None,
            player: SegmentPlayer::from_config(config),
            advance_delay: config.advance_delay,
            advance_task: None,
            events_tx,
            events_rx,
            seed,
            clock,
            started_at: clock.now(),
            summary: None,
        };
        if let Some(line) = session.progression.current_line() {
            session.load_line(line);
        }
        info!(
            lesson = session.lesson.name(),
            lines = session.lesson.line_count(),
            "lesson session started"
        );
        Ok(session)
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn phase(&self) -> LessonPhase {
        self.progression.phase()
    }

    #[must_use]
    pub fn introduction(&self) -> Option<&str> {
        match self.progression.phase() {
            LessonPhase::Introduction => self.lesson.introduction(),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.progression.current_line()
    }

    #[must_use]
    pub fn current_line(&self) -> Option<&Line> {
        self.current_index().and_then(|index| self.lesson.line(index))
    }

    #[must_use]
    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    #[must_use]
    pub fn player(&self) -> &SegmentPlayer {
        &self.player
    }

    #[must_use]
    pub fn summary(&self) -> Option<&LessonSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progression.is_finished()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            phase: self.progression.phase(),
            line_index: self.progression.current_line(),
            total_lines: self.progression.line_count(),
            completed: self.progression.completed().to_vec(),
            completed_count: self.progression.completed_count(),
            percent: self.progression.progress_percent(),
            score: self.progression.score(),
            can_go_previous: self.progression.can_go_previous(),
            can_go_next: self.progression.can_go_next(),
            can_submit: self.exercise.as_ref().is_some_and(Exercise::can_submit),
            advancing_to: self.progression.pending_advance(),
            is_complete: self.progression.is_finished(),
        }
    }

    /// Apply one front-end message.
    ///
    /// Selection and navigation messages that do not apply in the current
    /// state are ignored, matching disabled controls.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`LessonSession::submit`].
    pub fn handle(&mut self, message: SessionMessage) -> Result<Option<SubmitOutcome>, SessionError> {
        debug!(?message, "session message");
        match message {
            SessionMessage::VideoReady(host) => self.video_ready(host),
            SessionMessage::Begin => self.begin()?,
            SessionMessage::Select(id) => {
                self.select(id);
            }
            SessionMessage::SelectWord(word) => {
                self.select_word(&word);
            }
            SessionMessage::RemoveLast => {
                self.remove_last();
            }
            SessionMessage::RemoveAt(position) => {
                self.remove_at(position);
            }
            SessionMessage::Submit => return self.submit().map(Some),
            SessionMessage::AcknowledgeTrivia => self.acknowledge_trivia()?,
            SessionMessage::Previous => self.previous()?,
            SessionMessage::Next => self.next()?,
            SessionMessage::PlaySection => self.play_section(),
        }
        Ok(None)
    }

    /// The host video widget is ready; queue the current line's segment.
    pub fn video_ready(&mut self, host: Arc<dyn VideoHost>) {
        self.player.on_ready(host);
        if let Some(segment) = self.current_index().and_then(|i| self.segments.get(i)) {
            self.player.set_segment(*segment);
        }
    }

    /// Replay the current line's segment.
    pub fn play_section(&mut self) {
        self.player.play_section();
    }

    /// Leave the introduction and play the first line.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` only if finishing fails, which cannot
    /// happen from the introduction.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        let effects = self.progression.begin();
        self.apply(effects)
    }

    pub fn select(&mut self, id: OptionId) -> bool {
        self.exercise.as_mut().is_some_and(|exercise| exercise.select(id))
    }

    pub fn select_word(&mut self, word: &str) -> bool {
        self.exercise
            .as_mut()
            .is_some_and(|exercise| exercise.select_word(word))
    }

    pub fn remove_last(&mut self) -> Option<OptionId> {
        self.exercise.as_mut().and_then(Exercise::remove_last)
    }

    pub fn remove_at(&mut self, position: usize) -> Option<OptionId> {
        self.exercise
            .as_mut()
            .and_then(|exercise| exercise.remove_at(position))
    }

    /// Judge the current selection and count the attempt.
    ///
    /// A correct answer without trivia completes the line at once; with
    /// trivia the line completes on [`LessonSession::acknowledge_trivia`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the last line,
    /// `SessionError::NoActiveLine` during the introduction, and
    /// `SessionError::Exercise` for an incomplete or repeated submit.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        let line = self.active_line()?;
        let exercise = self.exercise.as_mut().ok_or(SessionError::NoActiveLine)?;
        let verdict = exercise.submit()?;
        let solved = exercise.is_solved();

        self.progression.record_submit(verdict.is_correct());
        info!(line, correct = verdict.is_correct(), "line submitted");

        if solved {
            self.complete_line(line)?;
        }
        Ok(SubmitOutcome { line, verdict })
    }

    /// Dismiss the trivia shown after a correct submit, completing the line.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the lesson summary cannot be built.
    pub fn acknowledge_trivia(&mut self) -> Result<(), SessionError> {
        let Ok(line) = self.active_line() else {
            return Ok(());
        };
        let acknowledged = self
            .exercise
            .as_mut()
            .is_some_and(Exercise::acknowledge_trivia);
        if acknowledged {
            self.complete_line(line)?;
        }
        Ok(())
    }

    /// Step back one line and replay it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` only if finishing fails, which cannot
    /// happen when stepping back.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        let effects = self.progression.previous();
        self.apply(effects)
    }

    /// Step forward past a completed line, or begin from the introduction.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` only if finishing fails, which cannot
    /// happen when stepping forward.
    pub fn next(&mut self) -> Result<(), SessionError> {
        let effects = self.progression.next();
        self.apply(effects)
    }

    /// Wait for the next timer event raised by this session.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Apply a timer event previously returned by [`LessonSession::next_event`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the lesson summary cannot be built.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::AdvanceDue(ticket) => {
                let effects = self.progression.advance_due(ticket);
                if effects.is_empty() {
                    debug!(ticket = ticket.value(), "stale advance ignored");
                }
                self.apply(effects)
            }
        }
    }

    /// Wait for and apply the next timer event.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Summary` if the lesson summary cannot be built.
    pub async fn pump(&mut self) -> Result<Option<SessionEvent>, SessionError> {
        let Some(event) = self.next_event().await else {
            return Ok(None);
        };
        self.handle_event(event)?;
        Ok(Some(event))
    }

    /// Cancel the pending advance and any segment stop trigger.
    pub fn teardown(&mut self) {
        self.cancel_advance();
        self.player.teardown();
    }

    fn active_line(&self) -> Result<usize, SessionError> {
        match self.progression.phase() {
            LessonPhase::AtLine(line) => Ok(line),
            LessonPhase::Introduction => Err(SessionError::NoActiveLine),
            LessonPhase::Completed => Err(SessionError::Completed),
        }
    }

    fn complete_line(&mut self, line: usize) -> Result<(), SessionError> {
        let effects = self.progression.complete_line(line);
        info!(
            line,
            progress = self.progression.progress_percent(),
            "line completed"
        );
        self.apply(effects)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Result<(), SessionError> {
        for effect in effects {
            match effect {
                Effect::PlaySegment { line } => {
                    self.load_line(line);
                    self.player.play_section();
                }
                Effect::ScheduleAdvance { ticket, to } => {
                    debug!(ticket = ticket.value(), to, "advance scheduled");
                    self.schedule_advance(ticket);
                }
                Effect::CancelAdvance { ticket } => {
                    debug!(ticket = ticket.value(), "advance cancelled");
                    self.cancel_advance();
                }
                Effect::Finished => self.finish()?,
            }
        }
        Ok(())
    }

    fn load_line(&mut self, line: usize) {
        let Some(source) = self.lesson.line(line) else {
            return;
        };
        self.exercise = Some(Exercise::new(source, self.seed, line as u64));
        if let Some(segment) = self.segments.get(line) {
            self.player.set_segment(*segment);
        }
    }

    fn schedule_advance(&mut self, ticket: AdvanceTicket) {
        self.cancel_advance();
        let delay = self.advance_delay;
        let tx = self.events_tx.clone();
        self.advance_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionEvent::AdvanceDue(ticket));
        }));
    }

    fn cancel_advance(&mut self) {
        if let Some(task) = self.advance_task.take() {
            task.abort();
        }
    }

    fn finish(&mut self) -> Result<(), SessionError> {
        self.cancel_advance();
        let summary = LessonSummary::new(
            self.lesson.name(),
            self.lesson.video_id(),
            self.lesson.line_count(),
            self.progression.score(),
            self.started_at,
            self.clock.now(),
        )?;
        info!(
            lesson = summary.lesson_name(),
            score = summary.score_percent(),
            "lesson completed"
        );
        self.summary = Some(summary);
        Ok(())
    }
}

impl Drop for LessonSession {
    fn drop(&mut self) {
        self.cancel_advance();
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson", &self.lesson.name())
            .field("phase", &self.progression.phase())
            .field("completed", &self.progression.completed_count())
            .field("score", &self.progression.score())
            .field("player", &self.player)
            .field("advance_pending", &self.advance_task.is_some())
            .finish_non_exhaustive()
    }
}
