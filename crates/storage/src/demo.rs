//! Bundled demo lesson used by the seed binary and tests.

use lingo_core::model::{Lesson, LessonKey};

use crate::lesson_file;
use crate::repository::StorageError;

const JAMINI_JSON: &str = include_str!("../assets/jamini.json");

/// Catalog key of the bundled lesson.
#[must_use]
pub fn demo_key() -> LessonKey {
    LessonKey::new("jamini")
}

/// "Aami Jamini", sixteen lines with mixed numeric and `M:SS` times.
///
/// # Errors
///
/// Returns `StorageError` if the bundled file fails to decode.
pub fn demo_lesson() -> Result<Lesson, StorageError> {
    lesson_file::decode(JAMINI_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_lesson_is_valid() {
        let lesson = demo_lesson().unwrap();
        assert_eq!(lesson.video_id(), "NUu7xUxYnn0");
        assert_eq!(lesson.line_count(), 16);
        assert!(lesson.lines()[0].trivia().is_some());
        let segment = lesson.lines()[4].segment().unwrap();
        assert_eq!(segment.start, 68.0);
        assert_eq!(segment.end, 73.5);
    }
}
