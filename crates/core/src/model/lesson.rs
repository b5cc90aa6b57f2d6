use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::{TimeParseError, TimeValue};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson has no lines")]
    NoLines,

    #[error("lesson video id cannot be empty")]
    EmptyVideoId,

    #[error("line {line} has no words to arrange")]
    EmptyCorrectOrder { line: usize },

    #[error("line {line} has an invalid {field} time: {source}")]
    InvalidTime {
        line: usize,
        field: &'static str,
        #[source]
        source: TimeParseError,
    },
}

//
// ─── SEGMENT ───────────────────────────────────────────────────────────────────
//

/// The `[start, end)` window of the video that belongs to one line, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the window; zero when `end` precedes `start`.
    #[must_use]
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

//
// ─── ALTERNATIVE ORDERINGS ─────────────────────────────────────────────────────
//

/// Additional word orders accepted besides the primary one.
///
/// Lesson files carry either one flat list of tokens or a list of lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alternative {
    Single(Vec<String>),
    Many(Vec<Vec<String>>),
}

impl Alternative {
    /// All accepted orderings as slices.
    #[must_use]
    pub fn orderings(&self) -> Vec<&[String]> {
        match self {
            Self::Single(order) => vec![order.as_slice()],
            Self::Many(orders) => orders.iter().map(Vec::as_slice).collect(),
        }
    }

    /// True when `submitted` equals one of the orderings exactly.
    #[must_use]
    pub fn accepts(&self, submitted: &[&str]) -> bool {
        self.orderings()
            .into_iter()
            .any(|order| sequence_eq(order, submitted))
    }
}

/// Ordered, exact-length, byte-exact comparison.
pub(crate) fn sequence_eq(expected: &[String], submitted: &[&str]) -> bool {
    expected.len() == submitted.len()
        && expected
            .iter()
            .zip(submitted)
            .all(|(left, right)| left == right)
}

//
// ─── LINE ──────────────────────────────────────────────────────────────────────
//

/// One lyric line: its texts, the words to arrange and its video window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(rename = "BN")]
    native: String,
    #[serde(rename = "EN")]
    transliteration: String,
    #[serde(rename = "HI", default, skip_serializing_if = "Option::is_none")]
    devanagari: Option<String>,
    #[serde(rename = "correctOrder")]
    correct_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternative: Option<Alternative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trivia: Option<String>,
    start: TimeValue,
    end: TimeValue,
}

impl Line {
    #[must_use]
    pub fn new(
        native: impl Into<String>,
        transliteration: impl Into<String>,
        correct_order: Vec<String>,
        start: impl Into<TimeValue>,
        end: impl Into<TimeValue>,
    ) -> Self {
        Self {
            native: native.into(),
            transliteration: transliteration.into(),
            devanagari: None,
            correct_order,
            alternative: None,
            trivia: None,
            start: start.into(),
            end: end.into(),
        }
    }

    #[must_use]
    pub fn with_devanagari(mut self, text: impl Into<String>) -> Self {
        self.devanagari = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = Some(alternative);
        self
    }

    #[must_use]
    pub fn with_trivia(mut self, trivia: impl Into<String>) -> Self {
        self.trivia = Some(trivia.into());
        self
    }

    /// Text in the song's own script (`BN` in lesson files).
    #[must_use]
    pub fn native(&self) -> &str {
        &self.native
    }

    /// Latin transliteration (`EN` in lesson files).
    #[must_use]
    pub fn transliteration(&self) -> &str {
        &self.transliteration
    }

    /// Devanagari rendering (`HI` in lesson files), when present.
    #[must_use]
    pub fn devanagari(&self) -> Option<&str> {
        self.devanagari.as_deref()
    }

    #[must_use]
    pub fn correct_order(&self) -> &[String] {
        &self.correct_order
    }

    #[must_use]
    pub fn alternative(&self) -> Option<&Alternative> {
        self.alternative.as_ref()
    }

    /// Trivia text; blank trivia counts as none.
    #[must_use]
    pub fn trivia(&self) -> Option<&str> {
        self.trivia
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn start(&self) -> &TimeValue {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &TimeValue {
        &self.end
    }

    /// True when `submitted` matches the correct order or any alternative.
    #[must_use]
    pub fn accepts(&self, submitted: &[&str]) -> bool {
        sequence_eq(&self.correct_order, submitted)
            || self
                .alternative
                .as_ref()
                .is_some_and(|alternative| alternative.accepts(submitted))
    }

    /// The line's video window in seconds.
    ///
    /// # Errors
    ///
    /// Returns `TimeParseError` if either bound cannot be parsed.
    pub fn segment(&self) -> Result<Segment, TimeParseError> {
        Ok(Segment::new(self.start.to_seconds()?, self.end.to_seconds()?))
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A song lesson: a video and the ordered lines taught from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    name: String,
    video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(rename = "song")]
    lines: Vec<Line>,
}

impl Lesson {
    /// Build and validate a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the lesson fails [`Lesson::validate`].
    pub fn new(
        name: impl Into<String>,
        video_id: impl Into<String>,
        lines: Vec<Line>,
    ) -> Result<Self, LessonError> {
        let lesson = Self {
            name: name.into(),
            video_id: video_id.into(),
            introduction: None,
            language: None,
            lines,
        };
        lesson.validate()?;
        Ok(lesson)
    }

    #[must_use]
    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = Some(introduction.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Check the invariants playback relies on.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoLines`, `EmptyVideoId`, `EmptyCorrectOrder` or
    /// `InvalidTime` for the first violation found.
    pub fn validate(&self) -> Result<(), LessonError> {
        if self.video_id.trim().is_empty() {
            return Err(LessonError::EmptyVideoId);
        }
        if self.lines.is_empty() {
            return Err(LessonError::NoLines);
        }
        for (index, line) in self.lines.iter().enumerate() {
            if line.correct_order.is_empty() {
                return Err(LessonError::EmptyCorrectOrder { line: index });
            }
            line.start
                .to_seconds()
                .map_err(|source| LessonError::InvalidTime {
                    line: index,
                    field: "start",
                    source,
                })?;
            line.end
                .to_seconds()
                .map_err(|source| LessonError::InvalidTime {
                    line: index,
                    field: "end",
                    source,
                })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Introduction text; blank text counts as none.
    #[must_use]
    pub fn introduction(&self) -> Option<&str> {
        self.introduction
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Link to the full video on YouTube.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split(' ').map(str::to_owned).collect()
    }

    #[test]
    fn line_accepts_primary_order_only_exactly() {
        let line = Line::new("বসন্ত", "boshonto", words("like spring reigning"), 0.0, 4.0);
        assert!(line.accepts(&["like", "spring", "reigning"]));
        assert!(!line.accepts(&["reigning", "like", "spring"]));
        assert!(!line.accepts(&["Like", "spring", "reigning"]));
        assert!(!line.accepts(&["like", "spring"]));
    }

    #[test]
    fn flat_alternative_is_accepted() {
        let line = Line::new("বসন্ত", "boshonto", words("like spring reigning"), 0.0, 4.0)
            .with_alternative(Alternative::Single(words("reigning like spring")));
        assert!(line.accepts(&["reigning", "like", "spring"]));
        assert!(!line.accepts(&["spring", "like", "reigning"]));
    }

    #[test]
    fn nested_alternatives_accept_any_member() {
        let line = Line::new("x", "x", words("x y"), 0.0, 1.0)
            .with_alternative(Alternative::Many(vec![words("x y"), words("y x")]));
        assert!(line.accepts(&["x", "y"]));
        assert!(line.accepts(&["y", "x"]));
    }

    #[test]
    fn alternative_shapes_deserialize() {
        let flat: Alternative = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(flat, Alternative::Single(words("a b")));
        let nested: Alternative = serde_json::from_str(r#"[["a","b"],["b","a"]]"#).unwrap();
        assert_eq!(nested, Alternative::Many(vec![words("a b"), words("b a")]));
    }

    #[test]
    fn validate_rejects_empty_and_bad_times() {
        assert_eq!(
            Lesson::new("n", "vid", Vec::new()).unwrap_err(),
            LessonError::NoLines
        );
        let empty_words = Line::new("a", "a", Vec::new(), 0.0, 1.0);
        assert_eq!(
            Lesson::new("n", "vid", vec![empty_words]).unwrap_err(),
            LessonError::EmptyCorrectOrder { line: 0 }
        );
        let bad_time = Line::new("a", "a", words("a"), "oops", 1.0);
        assert!(matches!(
            Lesson::new("n", "vid", vec![bad_time]).unwrap_err(),
            LessonError::InvalidTime { line: 0, field: "start", .. }
        ));
    }

    #[test]
    fn blank_introduction_and_trivia_count_as_missing() {
        let lesson = Lesson::new("n", "vid", vec![Line::new("a", "a", words("a"), 0.0, 1.0).with_trivia("  ")])
            .unwrap()
            .with_introduction("");
        assert!(lesson.introduction().is_none());
        assert!(lesson.lines()[0].trivia().is_none());
    }

    #[test]
    fn segment_duration_never_negative() {
        assert_eq!(Segment::new(10.0, 12.5).duration(), 2.5);
        assert_eq!(Segment::new(10.0, 8.0).duration(), 0.0);
    }
}
