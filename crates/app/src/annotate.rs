//! Line-by-line lesson authoring at the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use lingo_core::TimeValue;
use lingo_core::model::DraftError;
use services::authoring::AnnotationEditor;
use services::{AppServices, AuthoringError, SimulatedVideo, VideoHost};

use crate::console::{spawn_stdin_lines, split_command};

pub async fn run(
    services: &AppServices,
    url: Option<String>,
    restore: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = services.annotation_editor();
    let video = Arc::new(SimulatedVideo::new());
    editor.on_player_ready(video.clone());

    if let Some(path) = restore {
        let json = tokio::fs::read_to_string(&path).await?;
        let lesson = storage::lesson_file::decode(&json)?;
        editor.restore(&lesson)?;
        println!("restored {} lines from {}", editor.lines().len(), path.display());
    }
    if let Some(url) = url {
        let id = editor.set_video_url(&url)?;
        println!("video {id}");
    }
    let out = out.unwrap_or_else(|| PathBuf::from("."));

    print_help();
    let mut input = spawn_stdin_lines();
    while let Some(line) = input.recv().await {
        let (verb, rest) = split_command(&line);
        match verb {
            "quit" | "q" | "exit" => break,
            "help" | "?" => print_help(),
            "export" => {
                let dir = if rest.is_empty() { out.clone() } else { PathBuf::from(rest) };
                match editor.export(&dir).await {
                    Ok(path) => println!("saved {}", path.display()),
                    Err(err) => println!("{err}"),
                }
            }
            _ => {
                if let Err(err) = apply(&mut editor, video.as_ref(), verb, rest) {
                    println!("{err}");
                }
            }
        }
        while let Some(event) = editor.try_speech_event() {
            editor.apply_speech_event(event);
        }
    }
    Ok(())
}

fn apply(
    editor: &mut AnnotationEditor,
    video: &SimulatedVideo,
    verb: &str,
    rest: &str,
) -> Result<(), AuthoringError> {
    match verb {
        "" => {}
        "url" => {
            let id = editor.set_video_url(rest)?;
            println!("video {id}");
        }
        "name" => editor.set_name(rest),
        "intro" => editor.set_introduction(rest),
        "lang" => {
            let language = editor.set_language(rest)?;
            println!("language {} ({})", language.name, language.code);
        }
        "native" => editor.draft_mut().native = rest.to_owned(),
        "translit" if rest.is_empty() => println!("{}", editor.transliterate_draft()),
        "translit" => editor.draft_mut().transliteration = rest.to_owned(),
        "order" => editor.draft_mut().set_correct_order_text(rest),
        "alt" => {
            let (index, words) = match split_command(rest) {
                (n, words) if n.parse::<usize>().is_ok_and(|n| n > 0) => {
                    (n.parse::<usize>().unwrap_or(1) - 1, words)
                }
                _ => (0, rest),
            };
            editor.draft_mut().set_alternative_text(index, words);
        }
        "trivia" => editor.draft_mut().trivia = rest.to_owned(),
        "start" => editor.draft_mut().start = parse_seconds(rest)?,
        "end" => editor.draft_mut().end = parse_seconds(rest)?,
        "mark-start" => println!("start {:.2}", editor.set_start_from_player()?),
        "mark-end" => println!("end {:.2}", editor.set_end_from_player()?),
        "goto-start" => editor.seek_to_start()?,
        "goto-end" => editor.seek_to_end()?,
        "seek" => video.seek_to(parse_seconds(rest)?, true),
        "play" => video.play_video(),
        "pause" => video.pause_video(),
        "time" => println!("{:.2}", video.current_time()),
        "record" => println!("{:?}", editor.toggle_recording()?),
        "save" => {
            editor.submit_draft()?;
            list(editor);
        }
        "edit" => {
            editor.select_line(parse_index(rest)?)?;
            show(editor);
        }
        "insert" => {
            let index = editor.insert_after(parse_index(rest)?)?;
            println!("editing new line {}", index + 1);
        }
        "delete" => {
            editor.delete_line(parse_index(rest)?)?;
            list(editor);
        }
        "list" => list(editor),
        "show" => show(editor),
        _ => println!("unknown command; type `help`"),
    }
    Ok(())
}

fn parse_seconds(raw: &str) -> Result<f64, AuthoringError> {
    let seconds = TimeValue::from_input(raw)
        .to_seconds()
        .map_err(DraftError::from)?;
    Ok(seconds)
}

fn parse_index(raw: &str) -> Result<usize, AuthoringError> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or(AuthoringError::NoSuchLine(0))
}

fn list(editor: &AnnotationEditor) {
    for (index, line) in editor.lines().iter().enumerate() {
        let marker = if editor.editing() == Some(index) { '*' } else { ' ' };
        println!(
            "{marker}{:>3}  {:>7.2}-{:<7.2} {}",
            index + 1,
            line.start,
            line.end,
            line.transliteration
        );
    }
}

fn show(editor: &AnnotationEditor) {
    let draft = editor.draft();
    println!("native:   {}", draft.native);
    println!("translit: {}", draft.transliteration);
    println!("order:    {}", draft.correct_order.join(" "));
    for (index, alternative) in draft.alternatives.iter().enumerate() {
        println!("alt {}:    {}", index + 1, alternative.join(" "));
    }
    println!("trivia:   {}", draft.trivia);
    println!("time:     {:.2} - {:.2}", draft.start, draft.end);
}

fn print_help() {
    println!("Lesson: url <youtube url>, name <text>, intro <text>, lang <code|name>");
    println!("Draft:  native, translit [text], order <words>, alt <n> <words>, trivia, start <t>, end <t>");
    println!("Player: seek <t>, play, pause, time, mark-start, mark-end, goto-start, goto-end");
    println!("Lines:  save, list, show, edit <n>, insert <n>, delete <n>, record");
    println!("File:   export [dir], quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_are_typed_as_seconds_or_minutes() {
        assert_eq!(parse_seconds("12").unwrap(), 12.0);
        assert_eq!(parse_seconds("7.25").unwrap(), 7.25);
        assert_eq!(parse_seconds("1:13.5").unwrap(), 73.5);
        assert!(matches!(parse_seconds("-1"), Err(AuthoringError::Draft(_))));
        assert!(parse_seconds("later").is_err());
    }

    #[tokio::test]
    async fn start_and_end_commands_fill_the_draft() {
        let mut editor = AnnotationEditor::new(Arc::new(services::authoring::PassthroughTransliterator));
        let video = SimulatedVideo::new();
        apply(&mut editor, &video, "start", "12").unwrap();
        apply(&mut editor, &video, "end", "0:15.5").unwrap();
        assert_eq!(editor.draft().start, 12.0);
        assert_eq!(editor.draft().end, 15.5);
    }
}
