use std::path::PathBuf;
use std::sync::Arc;

use lingo_core::model::{DraftError, Language};
use services::authoring::{
    AnnotationEditor, PassthroughTransliterator, RecordingState, ScriptedRecognizer, SpeechEvent,
    Transliterator, video_id_from_url,
};
use services::{AuthoringError, SimulatedVideo, SpeechError, VideoHost};
use storage::lesson_file;

struct UpperTransliterator;

impl Transliterator for UpperTransliterator {
    fn transliterate(&self, text: &str, language: &Language) -> String {
        format!("{}.{}", language.script.to_uppercase(), text.to_uppercase())
    }
}

fn editor() -> AnnotationEditor {
    let mut editor = AnnotationEditor::new(Arc::new(PassthroughTransliterator));
    editor
        .set_video_url("https://www.youtube.com/watch?v=NUu7xUxYnn0&t=42s")
        .unwrap();
    editor
}

fn fill(editor: &mut AnnotationEditor, native: &str, order: &str, start: f64, end: f64) {
    let draft = editor.draft_mut();
    draft.native = native.into();
    draft.transliteration = native.into();
    draft.set_correct_order_text(order);
    draft.start = start;
    draft.end = end;
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lingo-editor-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn video_id_comes_from_the_v_parameter() {
    assert_eq!(
        video_id_from_url("https://www.youtube.com/watch?v=abc123&list=x").unwrap(),
        "abc123"
    );
    assert!(matches!(
        video_id_from_url("https://youtu.be/abc123"),
        Err(AuthoringError::MissingVideoParam { .. })
    ));
    assert!(matches!(
        video_id_from_url("not a url"),
        Err(AuthoringError::InvalidVideoUrl(_))
    ));
}

#[tokio::test]
async fn authoring_flow_submit_edit_delete_export() {
    let mut editor = editor();
    assert_eq!(editor.video_id(), Some("NUu7xUxYnn0"));

    assert!(matches!(
        editor.submit_draft(),
        Err(AuthoringError::Draft(DraftError::MissingFields))
    ));

    fill(&mut editor, "second", "c d", 10.0, 14.0);
    editor.submit_draft().unwrap();
    assert_eq!(editor.draft().start, 14.0);
    assert_eq!(editor.draft().end, 14.0);

    fill(&mut editor, "first", "a b", 2.0, 9.0);
    editor.draft_mut().set_alternative_text(0, "b a");
    editor.submit_draft().unwrap();
    let starts: Vec<f64> = editor.lines().iter().map(|line| line.start).collect();
    assert_eq!(starts, vec![2.0, 10.0]);

    editor.select_line(1).unwrap();
    editor.draft_mut().native = "second, edited".into();
    editor.submit_draft().unwrap();
    assert_eq!(editor.lines().len(), 2);
    assert_eq!(editor.lines()[1].native, "second, edited");
    assert_eq!(editor.editing(), None);

    let inserted = editor.insert_after(0).unwrap();
    assert_eq!(inserted, 1);
    assert_eq!(editor.editing(), Some(1));
    assert_eq!((editor.draft().start, editor.draft().end), (9.0, 10.0));
    assert!(matches!(
        editor.build_lesson(),
        Err(AuthoringError::IncompleteLine { index: 1, .. })
    ));

    editor.delete_line(1).unwrap();
    assert_eq!(editor.editing(), None);
    assert_eq!(editor.draft().start, 14.0);

    let dir = scratch_dir("export");
    let path = editor.export(&dir).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "first.json");

    let lesson = lesson_file::decode(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(lesson.name(), "Untitled");
    assert_eq!(lesson.language(), Some("bengali"));
    assert_eq!(lesson.video_id(), "NUu7xUxYnn0");
    assert!(lesson.lines()[0].accepts(&["b", "a"]));
}

#[test]
fn rejects_foreign_alternatives_and_overlaps() {
    let mut editor = editor();
    fill(&mut editor, "one", "a b", 0.0, 10.0);
    editor.draft_mut().set_alternative_text(0, "a z");
    assert!(matches!(
        editor.submit_draft(),
        Err(AuthoringError::Draft(DraftError::ForeignAlternativeWord { .. }))
    ));
    assert!(editor.lines().is_empty());

    editor.draft_mut().set_alternative_text(0, "");
    editor.submit_draft().unwrap();

    fill(&mut editor, "two", "c", 6.5, 12.0);
    assert!(matches!(
        editor.submit_draft(),
        Err(AuthoringError::Draft(DraftError::Overlap { index: 0, next: 1, .. }))
    ));
    assert_eq!(editor.lines().len(), 1);

    editor.draft_mut().start = 7.0;
    editor.submit_draft().unwrap();
    assert_eq!(editor.lines().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn times_come_from_the_player() {
    let mut editor = editor();
    assert!(matches!(
        editor.set_start_from_player(),
        Err(AuthoringError::PlayerNotReady)
    ));

    let video = Arc::new(SimulatedVideo::new());
    editor.on_player_ready(video.clone());
    video.seek_to(30.0, true);
    video.play_video();
    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

    assert_eq!(editor.set_start_from_player().unwrap(), 32.5);
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert_eq!(editor.set_end_from_player().unwrap(), 35.5);

    editor.seek_to_start().unwrap();
    assert!((video.current_time() - 32.5).abs() < 1e-9);
}

#[tokio::test]
async fn speech_fills_native_and_transliteration() {
    let recognizer = Arc::new(ScriptedRecognizer::new(["আমি যামিনী".to_owned()]));
    let mut editor = AnnotationEditor::new(Arc::new(UpperTransliterator))
        .with_recognizer(recognizer.clone());
    editor.set_language("ta-IN").unwrap();

    assert_eq!(editor.toggle_recording().unwrap(), RecordingState::Started);
    assert!(editor.is_recording());
    let event = editor.next_speech_event().await.unwrap();
    assert_eq!(event, SpeechEvent::Transcript("আমি যামিনী".into()));
    editor.apply_speech_event(event);

    assert!(!editor.is_recording());
    assert_eq!(editor.draft().native, "আমি যামিনী");
    assert_eq!(editor.draft().transliteration, "tamilআমি যামিনী");
    assert_eq!(recognizer.locales(), vec!["ta-IN"]);

    editor.toggle_recording().unwrap();
    let ended = editor.next_speech_event().await.unwrap();
    assert_eq!(ended, SpeechEvent::Ended);
}

#[test]
fn missing_recognizer_warns_once() {
    let mut editor = editor();
    assert!(matches!(
        editor.toggle_recording(),
        Err(AuthoringError::Speech(SpeechError::Unsupported))
    ));
    assert_eq!(editor.toggle_recording().unwrap(), RecordingState::Unavailable);
}

#[test]
fn transliterate_button_uses_the_selected_language() {
    let mut editor = AnnotationEditor::new(Arc::new(UpperTransliterator));
    editor.set_language("Hindi").unwrap();
    editor.draft_mut().native = "mera".into();
    assert_eq!(editor.transliterate_draft(), "devanagarimera");
    assert!(editor.set_language("Klingon").is_err());
}

#[test]
fn restore_sorts_lines_and_resets_the_draft() {
    let lesson = storage::demo::demo_lesson().unwrap();
    let mut editor = AnnotationEditor::new(Arc::new(PassthroughTransliterator));
    editor.restore(&lesson).unwrap();

    assert_eq!(editor.lines().len(), lesson.line_count());
    assert_eq!(editor.video_id(), Some(lesson.video_id()));
    assert_eq!(editor.language().name, "Bengali");
    let last_end = editor.lines().last().unwrap().end;
    assert_eq!(editor.draft().start, last_end);
    assert!(editor.lines().windows(2).all(|pair| pair[0].start <= pair[1].start));

    let rebuilt = editor.build_lesson().unwrap();
    assert_eq!(rebuilt.name(), lesson.name());
    assert_eq!(rebuilt.line_count(), lesson.line_count());
}
