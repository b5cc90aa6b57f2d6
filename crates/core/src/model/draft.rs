use thiserror::Error;

use crate::model::{Alternative, Line};
use crate::time::{TimeParseError, TimeValue};

/// Consecutive lines may overlap by at most this many seconds.
pub const OVERLAP_THRESHOLD_SECS: f64 = 3.0;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DraftError {
    #[error("please fill in all required fields")]
    MissingFields,

    #[error("alternative order can only contain words from the correct order (found `{word}`)")]
    ForeignAlternativeWord { word: String },

    #[error("lines at index {index} and {next} overlap by more than {threshold} seconds")]
    Overlap {
        index: usize,
        next: usize,
        threshold: f64,
    },

    #[error(transparent)]
    Time(#[from] TimeParseError),
}

/// Editable form of a line, as the authoring tool holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    pub native: String,
    pub transliteration: String,
    pub correct_order: Vec<String>,
    pub alternatives: Vec<Vec<String>>,
    pub trivia: String,
    pub start: f64,
    pub end: f64,
}

impl Default for LineDraft {
    fn default() -> Self {
        Self::blank_at(0.0, 0.0)
    }
}

impl LineDraft {
    /// An empty draft with one empty alternative slot.
    #[must_use]
    pub fn blank_at(start: f64, end: f64) -> Self {
        Self {
            native: String::new(),
            transliteration: String::new(),
            correct_order: Vec::new(),
            alternatives: vec![Vec::new()],
            trivia: String::new(),
            start,
            end,
        }
    }

    /// Load an existing line for editing.
    ///
    /// # Errors
    ///
    /// Returns `TimeParseError` if the line's times cannot be normalized.
    pub fn from_line(line: &Line) -> Result<Self, TimeParseError> {
        let segment = line.segment()?;
        let mut alternatives: Vec<Vec<String>> = line
            .alternative()
            .map(|alt| alt.orderings().into_iter().map(<[String]>::to_vec).collect())
            .unwrap_or_default();
        if alternatives.is_empty() {
            alternatives.push(Vec::new());
        }
        Ok(Self {
            native: line.native().to_owned(),
            transliteration: line.transliteration().to_owned(),
            correct_order: line.correct_order().to_vec(),
            alternatives,
            trivia: line.trivia().unwrap_or_default().to_owned(),
            start: segment.start,
            end: segment.end,
        })
    }

    /// Replace the correct order from space-separated text.
    pub fn set_correct_order_text(&mut self, text: &str) {
        self.correct_order = split_words(text);
    }

    /// Replace one alternative from space-separated text, growing the list if needed.
    pub fn set_alternative_text(&mut self, index: usize, text: &str) {
        if self.alternatives.len() <= index {
            self.alternatives.resize_with(index + 1, Vec::new);
        }
        self.alternatives[index] = split_words(text);
    }

    pub fn add_alternative(&mut self) {
        self.alternatives.push(Vec::new());
    }

    /// Check required fields and alternatives, and produce a lesson line.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::MissingFields` when the native text, transliteration
    /// or correct order is empty, `ForeignAlternativeWord` when an alternative
    /// uses a word outside the correct order, and `Time` for invalid times.
    pub fn validate(&self) -> Result<Line, DraftError> {
        if self.native.trim().is_empty()
            || self.transliteration.trim().is_empty()
            || self.correct_order.is_empty()
        {
            return Err(DraftError::MissingFields);
        }
        check_alternatives(&self.correct_order, &self.alternatives)?;

        let start = TimeValue::Seconds(self.start);
        let end = TimeValue::Seconds(self.end);
        start.to_seconds()?;
        end.to_seconds()?;

        let mut line = Line::new(
            self.native.trim(),
            self.transliteration.trim(),
            self.correct_order.clone(),
            start,
            end,
        );
        let alternatives: Vec<Vec<String>> = self
            .alternatives
            .iter()
            .filter(|alt| !alt.is_empty())
            .cloned()
            .collect();
        if !alternatives.is_empty() {
            line = line.with_alternative(Alternative::Many(alternatives));
        }
        if !self.trivia.trim().is_empty() {
            line = line.with_trivia(self.trivia.trim());
        }
        Ok(line)
    }
}

/// Every word of every alternative must appear in the correct order.
///
/// # Errors
///
/// Returns `DraftError::ForeignAlternativeWord` naming the first offending word.
pub fn check_alternatives(
    correct_order: &[String],
    alternatives: &[Vec<String>],
) -> Result<(), DraftError> {
    for word in alternatives.iter().flatten() {
        if !correct_order.contains(word) {
            return Err(DraftError::ForeignAlternativeWord { word: word.clone() });
        }
    }
    Ok(())
}

/// Order drafts by start time.
pub fn sort_drafts(drafts: &mut [LineDraft]) {
    drafts.sort_by(|left, right| left.start.total_cmp(&right.start));
}

/// Index of the first pair of sorted drafts overlapping beyond the threshold.
#[must_use]
pub fn find_overlap(drafts: &[LineDraft]) -> Option<usize> {
    drafts
        .windows(2)
        .position(|pair| pair[1].start - pair[0].end < -OVERLAP_THRESHOLD_SECS)
}

/// Fails with `DraftError::Overlap` when [`find_overlap`] finds a pair.
///
/// # Errors
///
/// Returns `DraftError::Overlap` for the first overlapping pair.
pub fn check_overlap(drafts: &[LineDraft]) -> Result<(), DraftError> {
    match find_overlap(drafts) {
        Some(index) => Err(DraftError::Overlap {
            index,
            next: index + 1,
            threshold: OVERLAP_THRESHOLD_SECS,
        }),
        None => Ok(()),
    }
}

fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}
