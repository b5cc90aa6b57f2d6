use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,
}

/// Running tally of submitted attempts, retries included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    correct: u32,
    incorrect: u32,
}

impl Score {
    #[must_use]
    pub fn new(correct: u32, incorrect: u32) -> Self {
        Self { correct, incorrect }
    }

    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.correct.saturating_add(self.incorrect)
    }

    /// Final score as `100 × (1 − incorrect / correct)`, rounded to two decimals.
    ///
    /// Clamped to `[0, 100]`; zero when nothing was answered correctly.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.correct == 0 {
            return 0.0;
        }
        let raw = 100.0 * (1.0 - f64::from(self.incorrect) / f64::from(self.correct));
        round2(raw.clamp(0.0, 100.0))
    }
}

/// Rounds to two decimal places, matching how percentages are displayed.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// End-of-lesson summary shown when every line has been completed.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonSummary {
    lesson_name: String,
    video_id: String,
    total_lines: usize,
    score: Score,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl LessonSummary {
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn new(
        lesson_name: impl Into<String>,
        video_id: impl Into<String>,
        total_lines: usize,
        score: Score,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        Ok(Self {
            lesson_name: lesson_name.into(),
            video_id: video_id.into(),
            total_lines,
            score,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn lesson_name(&self) -> &str {
        &self.lesson_name
    }

    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn score_percent(&self) -> f64 {
        self.score.percent()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
