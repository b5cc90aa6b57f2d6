use std::sync::Arc;
use std::time::Duration;

use lingo_core::exercise::{Feedback, Verdict};
use lingo_core::model::{Alternative, Lesson, Line};
use lingo_core::progression::LessonPhase;
use lingo_core::shuffle::ShuffleSeed;
use lingo_core::time::fixed_clock;
use services::player::HostCall;
use services::{
    LessonSession, PlayerConfig, SessionError, SessionMessage, SimulatedVideo, StopStrategyKind,
    VideoHost,
};

fn words(text: &str) -> Vec<String> {
    text.split(' ').map(str::to_owned).collect()
}

fn lesson(lines: Vec<Line>) -> Lesson {
    Lesson::new("Test Song", "vid123", lines).unwrap()
}

fn two_lines() -> Lesson {
    lesson(vec![
        Line::new("ক খ", "ko kho", words("a b"), 0.0, 2.0),
        Line::new("গ ঘ", "go gho", words("c d"), "0:03", "0:05.5"),
    ])
}

fn start(lesson: Lesson) -> (LessonSession, Arc<SimulatedVideo>) {
    let config = PlayerConfig::default().with_stop_strategy(StopStrategyKind::Timer);
    let mut session = LessonSession::new(lesson, &config, ShuffleSeed::Fixed(7), fixed_clock())
        .expect("session starts");
    let video = Arc::new(SimulatedVideo::new());
    session
        .handle(SessionMessage::VideoReady(video.clone()))
        .unwrap();
    (session, video)
}

fn answer(session: &mut LessonSession, order: &str) -> Verdict {
    for word in order.split(' ') {
        assert!(session.select_word(word), "{word} unavailable");
    }
    session.submit().unwrap().verdict
}

fn last_seek(video: &SimulatedVideo) -> Option<f64> {
    video.calls().iter().rev().find_map(|call| match call {
        HostCall::Seek { seconds, .. } => Some(*seconds),
        _ => None,
    })
}

#[tokio::test(start_paused = true)]
async fn two_line_lesson_runs_to_completion() {
    let (mut session, video) = start(two_lines());

    let wrong = answer(&mut session, "b a");
    assert_eq!(wrong, Verdict::Incorrect);
    assert_eq!(wrong.feedback(), Feedback::Incorrect);
    let progress = session.progress();
    assert_eq!(progress.line_index, Some(0));
    assert_eq!(progress.completed, vec![false, false]);
    assert_eq!(progress.score.incorrect(), 1);
    assert_eq!(session.exercise().unwrap().selected_words(), vec!["b", "a"]);

    session.remove_last();
    session.remove_last();
    assert_eq!(answer(&mut session, "a b"), Verdict::Correct { trivia: None });
    let progress = session.progress();
    assert_eq!(progress.completed, vec![true, false]);
    assert_eq!(progress.percent, 50.0);
    assert_eq!(progress.line_index, Some(0));
    assert_eq!(progress.advancing_to, Some(1));

    session.pump().await.unwrap();
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(last_seek(&video), Some(3.0));
    assert!(video.is_playing());

    assert!(answer(&mut session, "c d").is_correct());
    let progress = session.progress();
    assert!(progress.is_complete);
    assert_eq!(progress.percent, 100.0);
    assert_eq!(session.phase(), LessonPhase::Completed);

    let summary = session.summary().expect("summary built");
    assert_eq!(summary.total_lines(), 2);
    assert_eq!(summary.score().correct(), 2);
    assert_eq!(summary.score_percent(), 50.0);
    assert!(matches!(session.submit(), Err(SessionError::Completed)));
}

#[tokio::test(start_paused = true)]
async fn advance_waits_for_the_configured_delay() {
    let (mut session, video) = start(two_lines());
    answer(&mut session, "a b");

    let pending = tokio::time::timeout(Duration::from_millis(900), session.next_event()).await;
    assert!(pending.is_err(), "advance fired early");
    assert_eq!(session.current_index(), Some(0));

    let event = session.next_event().await.expect("advance event");
    session.handle_event(event).unwrap();
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(last_seek(&video), Some(3.0));
}

#[tokio::test(start_paused = true)]
async fn next_is_gated_on_completion() {
    let (mut session, _video) = start(two_lines());
    assert!(!session.progress().can_go_next);
    session.next().unwrap();
    assert_eq!(session.current_index(), Some(0));

    answer(&mut session, "a b");
    session.next().unwrap();
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.progress().advancing_to, None);

    assert!(!session.progress().can_go_next);
    session.previous().unwrap();
    assert_eq!(session.current_index(), Some(0));
    assert!(session.progress().completed[0]);
}

#[tokio::test(start_paused = true)]
async fn navigating_away_cancels_the_pending_advance() {
    let three = lesson(vec![
        Line::new("১", "ek", words("a b"), 0.0, 2.0),
        Line::new("২", "dui", words("c d"), 3.0, 5.0),
        Line::new("৩", "tin", words("e f"), 6.0, 8.0),
    ]);
    let (mut session, video) = start(three);
    answer(&mut session, "a b");
    session.pump().await.unwrap();
    answer(&mut session, "c d");
    assert_eq!(session.progress().advancing_to, Some(2));

    session.previous().unwrap();
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(last_seek(&video), Some(0.0));

    let stale = tokio::time::timeout(Duration::from_secs(5), session.next_event()).await;
    assert!(stale.is_err(), "cancelled advance still fired");
    assert_eq!(session.current_index(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn introduction_comes_before_the_first_line() {
    let with_intro = two_lines().with_introduction("A song about the night.");
    let (mut session, video) = start(with_intro);

    assert_eq!(session.phase(), LessonPhase::Introduction);
    assert_eq!(session.introduction(), Some("A song about the night."));
    assert!(matches!(session.submit(), Err(SessionError::NoActiveLine)));
    assert!(video.calls().is_empty());

    session.handle(SessionMessage::Begin).unwrap();
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(last_seek(&video), Some(0.0));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(video.pause_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn trivia_holds_the_line_until_acknowledged() {
    let line = Line::new("আমি যামিনী", "aami jamini", words("I am the night"), 0.0, 4.0)
        .with_trivia("Jamini means night");
    let (mut session, _video) = start(lesson(vec![
        line,
        Line::new("তুমি শশী হে", "tumi shoshi he", words("you are the moon"), 4.0, 8.0),
    ]));

    let outcome = session.handle(SessionMessage::SelectWord("I".into())).unwrap();
    assert!(outcome.is_none());
    for word in ["am", "the", "night"] {
        session.handle(SessionMessage::SelectWord(word.into())).unwrap();
    }
    let outcome = session.handle(SessionMessage::Submit).unwrap().unwrap();
    assert_eq!(outcome.trivia(), Some("Jamini means night"));
    assert_eq!(outcome.feedback(), Feedback::Correct);
    assert!(!session.progress().completed[0]);
    assert_eq!(session.progress().advancing_to, None);

    session.handle(SessionMessage::AcknowledgeTrivia).unwrap();
    assert!(session.progress().completed[0]);
    assert_eq!(session.progress().advancing_to, Some(1));
}

#[tokio::test(start_paused = true)]
async fn nested_alternatives_are_accepted() {
    let line = Line::new("x y", "x y", words("x y"), 0.0, 1.0).with_alternative(
        Alternative::Many(vec![words("x y"), words("y x")]),
    );
    let (mut session, _video) = start(lesson(vec![line.clone(), line]));
    assert!(answer(&mut session, "y x").is_correct());
    session.pump().await.unwrap();
    assert!(answer(&mut session, "x y").is_correct());
    assert!(session.is_complete());
}

#[tokio::test(start_paused = true)]
async fn replaying_a_section_rearms_a_single_stop() {
    let (mut session, video) = start(two_lines());
    session.handle(SessionMessage::PlaySection).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    session.play_section();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(video.pause_count(), 1);
    assert!((video.current_time() - 2.0).abs() < 1e-6);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_session_stops_pending_work() {
    let (mut session, video) = start(two_lines());
    session.play_section();
    answer(&mut session, "a b");
    drop(session);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(video.pause_count(), 0);
}
