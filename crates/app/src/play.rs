//! Terminal run-through of one lesson against a simulated video.

use std::sync::Arc;

use lingo_core::model::{TriviaSegment, split_trivia};
use lingo_core::progression::LessonPhase;
use services::session::{LessonSession, SessionEvent, SessionMessage, SubmitOutcome};
use services::{AppServices, LoadState, SimulatedVideo};
use tracing::debug;

use crate::console::{spawn_stdin_lines, split_command};

enum Step {
    Event(Option<SessionEvent>),
    Input(Option<String>),
}

enum Input {
    Message(SessionMessage),
    Status,
    Help,
    Quit,
}

pub async fn run(services: &AppServices, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut activity = services.lesson_activity();
    match activity.open(Some(id)).await {
        LoadState::Ready(_) => {}
        LoadState::Idle | LoadState::Loading => {
            println!("Loading...");
            return Err(format!("lesson `{id}` could not be loaded").into());
        }
    }

    let mut session =
        activity.start_session(services.config(), services.seed(), services.clock())?;
    session.handle(SessionMessage::VideoReady(Arc::new(SimulatedVideo::new())))?;

    println!("{}", session.lesson().name());
    print_help();
    render(&session);

    let mut input = spawn_stdin_lines();
    loop {
        let step = tokio::select! {
            event = session.next_event() => Step::Event(event),
            line = input.recv() => Step::Input(line),
        };

        match step {
            Step::Event(Some(event)) => {
                session.handle_event(event)?;
                render(&session);
            }
            Step::Event(None) | Step::Input(None) => break,
            Step::Input(Some(line)) => match parse_input(&session, &line) {
                Some(Input::Quit) => break,
                Some(Input::Help) => print_help(),
                Some(Input::Status) => render(&session),
                Some(Input::Message(message)) => match session.handle(message) {
                    Ok(Some(outcome)) => print_outcome(&outcome),
                    Ok(None) => render(&session),
                    Err(err) => println!("{err}"),
                },
                None => println!("unknown command; type `help`"),
            },
        }

        if session.is_complete() {
            break;
        }
    }

    if let Some(summary) = session.summary() {
        let elapsed = summary.completed_at() - summary.started_at();
        println!();
        println!("Finished {}!", summary.lesson_name());
        println!(
            "Score: {:.2}% ({} correct, {} retries) in {}s",
            summary.score_percent(),
            summary.score().correct(),
            summary.score().incorrect(),
            elapsed.num_seconds()
        );
    }
    session.teardown();
    Ok(())
}

fn parse_input(session: &LessonSession, line: &str) -> Option<Input> {
    let (verb, rest) = split_command(line);
    let message = match verb {
        "" | "status" => return Some(Input::Status),
        "help" | "?" => return Some(Input::Help),
        "quit" | "q" | "exit" => return Some(Input::Quit),
        "begin" => SessionMessage::Begin,
        "play" | "p" => SessionMessage::PlaySection,
        "undo" | "u" => SessionMessage::RemoveLast,
        "submit" | "s" => SessionMessage::Submit,
        "ok" => SessionMessage::AcknowledgeTrivia,
        "prev" => SessionMessage::Previous,
        "next" => SessionMessage::Next,
        "remove" | "r" => {
            let position: usize = rest.parse().ok()?;
            SessionMessage::RemoveAt(position.checked_sub(1)?)
        }
        "word" | "w" if !rest.is_empty() => SessionMessage::SelectWord(rest.to_owned()),
        _ => {
            // A bare number picks that entry from the word pool.
            let index: usize = verb.parse().ok()?;
            let exercise = session.exercise()?;
            let option = exercise.available().get(index.checked_sub(1)?).copied()?;
            SessionMessage::Select(option.id())
        }
    };
    debug!(?message, "parsed input");
    Some(Input::Message(message))
}

fn render(session: &LessonSession) {
    let progress = session.progress();
    println!();
    match progress.phase {
        LessonPhase::Introduction => {
            println!("{}", session.introduction().unwrap_or_default());
            println!("(type `begin` to start)");
            return;
        }
        LessonPhase::Completed => return,
        LessonPhase::AtLine(index) => {
            println!(
                "Line {}/{}  [{:.2}% done]",
                index + 1,
                progress.total_lines,
                progress.percent
            );
        }
    }

    if let Some(line) = session.current_line() {
        println!("  {}", line.native());
        println!("  {}", line.transliteration());
    }
    if let Some(exercise) = session.exercise() {
        if exercise.is_solved() {
            match progress.advancing_to {
                Some(next) => println!("  solved, moving to line {}...", next + 1),
                None => println!("  solved"),
            }
        } else {
            println!("  your answer: {}", exercise.selected_words().join(" "));
            let pool: Vec<String> = exercise
                .available()
                .iter()
                .enumerate()
                .map(|(i, option)| format!("{}:{}", i + 1, option.text()))
                .collect();
            println!("  words: {}", pool.join("  "));
        }
    }

    let mut nav = Vec::new();
    if progress.can_go_previous {
        nav.push("prev");
    }
    if progress.can_go_next {
        nav.push("next");
    }
    if progress.can_submit {
        nav.push("submit");
    }
    if !nav.is_empty() {
        println!("  ({})", nav.join(", "));
    }
}

fn print_outcome(outcome: &SubmitOutcome) {
    println!("{}", outcome.feedback().message());
    if let Some(trivia) = outcome.trivia() {
        println!();
        let rendered: String = split_trivia(trivia)
            .into_iter()
            .map(|segment| match segment {
                TriviaSegment::Text(text) => text,
                TriviaSegment::Link(url) => format!("<{url}>"),
            })
            .collect();
        println!("Did you know? {rendered}");
        println!("(type `ok` to continue)");
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <n>            pick the n-th word from the pool");
    println!("  word <text>    pick a word by its text");
    println!("  undo           put back the last word");
    println!("  remove <n>     put back the n-th word of your answer");
    println!("  submit         check your answer");
    println!("  ok             dismiss trivia");
    println!("  play           replay this line");
    println!("  prev / next    move between lines");
    println!("  begin          start after the introduction");
    println!("  status, help, quit");
}
