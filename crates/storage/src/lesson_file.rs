//! JSON codec for lesson files (`songs/<key>.json`).

use lingo_core::model::Lesson;

use crate::repository::StorageError;

/// File name used when the authoring tool has no line to name the export after.
pub const UNTITLED_FILE_NAME: &str = "untitled.json";

/// Parse and validate a lesson file.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidLesson` when the lesson breaks a playback invariant.
pub fn decode(json: &str) -> Result<Lesson, StorageError> {
    let lesson: Lesson =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    lesson.validate()?;
    Ok(lesson)
}

/// Render a lesson as pretty-printed JSON.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the lesson cannot be encoded.
pub fn encode(lesson: &Lesson) -> Result<String, StorageError> {
    serde_json::to_string_pretty(lesson).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Download name derived from the first line's transliteration.
///
/// The result is a single path component: separators and leading dots
/// become `_`, control characters are dropped.
#[must_use]
pub fn export_file_name(lesson: &Lesson) -> String {
    let stem = lesson
        .lines()
        .first()
        .map(|line| file_stem(line.transliteration()))
        .filter(|stem| !stem.is_empty());

    match stem {
        Some(stem) => format!("{stem}.json"),
        None => UNTITLED_FILE_NAME.to_owned(),
    }
}

fn file_stem(text: &str) -> String {
    let joined = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let mut leading = true;
    joined
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            let unsafe_char = matches!(c, '/' | '\\') || (leading && c == '.');
            leading = leading && c == '.';
            if unsafe_char { '_' } else { c }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::{Alternative, LessonError, Line};
    use lingo_core::TimeValue;

    #[test]
    fn decodes_mixed_time_shapes_and_alternatives() {
        let json = r#"{
            "name": "Demo",
            "videoId": "abc",
            "introduction": "About this song",
            "song": [
                { "BN": "a", "EN": "a", "correctOrder": ["x", "y"], "alternative": ["y", "x"], "start": 1, "end": "0:04.5" },
                { "BN": "b", "EN": "b", "HI": "ब", "correctOrder": ["z"], "alternative": [["z"]], "trivia": "t", "start": "0:05", "end": 9 }
            ]
        }"#;
        let lesson = decode(json).unwrap();
        assert_eq!(lesson.line_count(), 2);
        assert_eq!(lesson.introduction(), Some("About this song"));
        let first = &lesson.lines()[0];
        assert_eq!(first.end(), &TimeValue::Clock("0:04.5".into()));
        assert_eq!(
            first.alternative(),
            Some(&Alternative::Single(vec!["y".into(), "x".into()]))
        );
        assert_eq!(lesson.lines()[1].devanagari(), Some("ब"));
        assert_eq!(lesson.lines()[1].segment().unwrap().start, 5.0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(decode("{"), Err(StorageError::Serialization(_))));
    }

    #[test]
    fn rejects_unparsable_times() {
        let json = r#"{ "name": "n", "videoId": "v", "song": [
            { "BN": "a", "EN": "a", "correctOrder": ["x"], "start": "soon", "end": 2 } ] }"#;
        assert!(matches!(
            decode(json),
            Err(StorageError::InvalidLesson(LessonError::InvalidTime { line: 0, .. }))
        ));
    }

    #[test]
    fn encode_uses_lesson_file_field_names() {
        let lesson = Lesson::new(
            "Demo",
            "abc",
            vec![Line::new("a", "Ekla Cholo Re", vec!["x".into()], 1.0, "0:02")],
        )
        .unwrap();
        let json = encode(&lesson).unwrap();
        assert!(json.contains("\"videoId\": \"abc\""));
        assert!(json.contains("\"correctOrder\""));
        assert!(json.contains("\"song\""));
        assert!(!json.contains("alternative"));
        assert_eq!(decode(&json).unwrap(), lesson);
    }

    #[test]
    fn export_name_follows_first_line() {
        let lesson = Lesson::new(
            "Demo",
            "abc",
            vec![Line::new("a", "Ekla Cholo Re", vec!["x".into()], 0.0, 1.0)],
        )
        .unwrap();
        assert_eq!(export_file_name(&lesson), "ekla_cholo_re.json");
    }

    fn first_line(transliteration: &str) -> Lesson {
        Lesson::new(
            "Demo",
            "abc",
            vec![Line::new("a", transliteration, vec!["x".into()], 0.0, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn export_name_stays_a_single_path_component() {
        assert_eq!(export_file_name(&first_line("../escaped")), "___escaped.json");
        assert_eq!(export_file_name(&first_line("AC/DC live")), "ac_dc_live.json");
        assert_eq!(export_file_name(&first_line(r"a\b")), "a_b.json");
        assert_eq!(export_file_name(&first_line(".hidden")), "_hidden.json");
        assert_eq!(export_file_name(&first_line("mr. blue")), "mr._blue.json");
        assert_eq!(export_file_name(&first_line("   ")), UNTITLED_FILE_NAME);
    }
}
