//! Lesson progression state machine.
//!
//! Pure and synchronous: every input returns the effects the caller must
//! perform (play a segment, arm or cancel the delayed advance, finish). Timers
//! live in the services layer and report back through [`Progression::advance_due`].

use thiserror::Error;

use crate::model::{Lesson, Score, round2};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("lesson has no lines")]
    EmptyLesson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonPhase {
    Introduction,
    AtLine(usize),
    Completed,
}

/// Identifies one armed delayed advance; stale tickets are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceTicket(u64);

impl AdvanceTicket {
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Work the caller performs after a transition, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Play the given line's video segment now.
    PlaySegment { line: usize },
    /// Arm the delayed move to line `to`; report back with `ticket`.
    ScheduleAdvance { ticket: AdvanceTicket, to: usize },
    /// Disarm a previously scheduled advance.
    CancelAdvance { ticket: AdvanceTicket },
    /// Every line is complete.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAdvance {
    ticket: AdvanceTicket,
    to: usize,
}

/// Current line, completion flags and score for one lesson run.
#[derive(Debug, Clone)]
pub struct Progression {
    phase: LessonPhase,
    completed: Vec<bool>,
    score: Score,
    pending: Option<PendingAdvance>,
    next_ticket: u64,
}

impl Progression {
    /// # Errors
    ///
    /// Returns `ProgressionError::EmptyLesson` when `line_count` is zero.
    pub fn new(line_count: usize, has_introduction: bool) -> Result<Self, ProgressionError> {
        if line_count == 0 {
            return Err(ProgressionError::EmptyLesson);
        }
        Ok(Self {
            phase: if has_introduction {
                LessonPhase::Introduction
            } else {
                LessonPhase::AtLine(0)
            },
            completed: vec![false; line_count],
            score: Score::default(),
            pending: None,
            next_ticket: 0,
        })
    }

    /// # Errors
    ///
    /// Returns `ProgressionError::EmptyLesson` for a lesson without lines.
    pub fn for_lesson(lesson: &Lesson) -> Result<Self, ProgressionError> {
        Self::new(lesson.line_count(), lesson.introduction().is_some())
    }

    #[must_use]
    pub fn phase(&self) -> LessonPhase {
        self.phase
    }

    /// Index of the line on screen; the last line once completed.
    #[must_use]
    pub fn current_line(&self) -> Option<usize> {
        match self.phase {
            LessonPhase::Introduction => None,
            LessonPhase::AtLine(index) => Some(index),
            LessonPhase::Completed => Some(self.line_count() - 1),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn completed(&self) -> &[bool] {
        &self.completed
    }

    #[must_use]
    pub fn is_line_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == LessonPhase::Completed
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    /// Share of completed lines as a percentage, rounded to two decimals.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.completed_count() as f64 / self.line_count() as f64;
        round2(ratio * 100.0)
    }

    /// Line the armed advance will move to, if one is pending.
    #[must_use]
    pub fn pending_advance(&self) -> Option<usize> {
        self.pending.map(|pending| pending.to)
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        matches!(self.phase, LessonPhase::AtLine(index) if index > 0)
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        match self.phase {
            LessonPhase::Introduction => true,
            LessonPhase::AtLine(index) => {
                index + 1 < self.line_count() && self.is_line_completed(index)
            }
            LessonPhase::Completed => false,
        }
    }

    /// Leave the introduction for the first line.
    pub fn begin(&mut self) -> Vec<Effect> {
        if self.phase != LessonPhase::Introduction {
            return Vec::new();
        }
        self.phase = LessonPhase::AtLine(0);
        vec![Effect::PlaySegment { line: 0 }]
    }

    /// Count a submitted attempt on the current line.
    pub fn record_submit(&mut self, correct: bool) {
        if matches!(self.phase, LessonPhase::AtLine(_)) {
            self.score.record(correct);
        }
    }

    /// Mark `line` complete after its exercise was solved.
    ///
    /// Arms the delayed advance to the next line, or finishes the lesson on
    /// the last line. Ignored unless `line` is the current line.
    pub fn complete_line(&mut self, line: usize) -> Vec<Effect> {
        if self.phase != LessonPhase::AtLine(line) {
            return Vec::new();
        }
        self.completed[line] = true;

        let mut effects = self.cancel_pending();
        if line + 1 < self.line_count() {
            let ticket = AdvanceTicket(self.next_ticket);
            self.next_ticket += 1;
            self.pending = Some(PendingAdvance {
                ticket,
                to: line + 1,
            });
            effects.push(Effect::ScheduleAdvance {
                ticket,
                to: line + 1,
            });
        } else {
            self.phase = LessonPhase::Completed;
            effects.push(Effect::Finished);
        }
        effects
    }

    /// The delay armed by [`Progression::complete_line`] has elapsed.
    pub fn advance_due(&mut self, ticket: AdvanceTicket) -> Vec<Effect> {
        match self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                self.phase = LessonPhase::AtLine(pending.to);
                vec![Effect::PlaySegment { line: pending.to }]
            }
            _ => Vec::new(),
        }
    }

    /// Step back one line; the current line need not be complete.
    pub fn previous(&mut self) -> Vec<Effect> {
        let LessonPhase::AtLine(index) = self.phase else {
            return Vec::new();
        };
        if index == 0 {
            return Vec::new();
        }
        let mut effects = self.cancel_pending();
        self.phase = LessonPhase::AtLine(index - 1);
        effects.push(Effect::PlaySegment { line: index - 1 });
        effects
    }

    /// Step forward one line, only past a completed line.
    ///
    /// From the introduction this is the same as [`Progression::begin`].
    pub fn next(&mut self) -> Vec<Effect> {
        if self.phase == LessonPhase::Introduction {
            return self.begin();
        }
        if !self.can_go_next() {
            return Vec::new();
        }
        let LessonPhase::AtLine(index) = self.phase else {
            return Vec::new();
        };
        let mut effects = self.cancel_pending();
        self.phase = LessonPhase::AtLine(index + 1);
        effects.push(Effect::PlaySegment { line: index + 1 });
        effects
    }

    fn cancel_pending(&mut self) -> Vec<Effect> {
        self.pending
            .take()
            .map(|pending| Effect::CancelAdvance {
                ticket: pending.ticket,
            })
            .into_iter()
            .collect()
    }
}
