use std::fmt;
use std::path::PathBuf;

use lingo_core::model::{CATALOG, find_entry};
use lingo_core::shuffle::ShuffleSeed;
use services::{AppServices, Clock, LessonSource, PlayerConfig, StopStrategyKind};
use tracing_subscriber::EnvFilter;

mod annotate;
mod console;
mod play;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingId,
    InvalidStrategy { raw: String },
    InvalidSeed { raw: String },
    InvalidSongsDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingId => write!(f, "song requires --id <key>"),
            ArgsError::InvalidStrategy { raw } => {
                write!(f, "invalid --strategy value (expected poll or timer): {raw}")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidSongsDir { raw } => write!(f, "invalid --songs-dir value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- catalog");
    eprintln!("  cargo run -p app -- song --id <key> [options]");
    eprintln!("  cargo run -p app -- annotate [--url <youtube_url>] [--restore <file>] [--out <dir>]");
    eprintln!("  cargo run -p app -- validate <file>");
    eprintln!("  cargo run -p app -- about");
    eprintln!();
    eprintln!("Options for song:");
    eprintln!("  --songs-dir <path>        Directory holding songs/ (default: ./public)");
    eprintln!("  --base-url <url>          Fetch songs/<key>.json over HTTP instead");
    eprintln!("  --strategy <poll|timer>   How segment ends are enforced (default: poll)");
    eprintln!("  --seed <n>                Fixed shuffle seed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LINGO_SONGS_DIR, LINGO_STOP_STRATEGY, LINGO_POLL_INTERVAL_MS, LINGO_ADVANCE_DELAY_MS");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Catalog,
    Song,
    Annotate,
    Validate,
    About,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "catalog" => Some(Self::Catalog),
            "song" => Some(Self::Song),
            "annotate" => Some(Self::Annotate),
            "validate" => Some(Self::Validate),
            "about" => Some(Self::About),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct SongArgs {
    id: String,
    source: LessonSource,
    strategy: Option<StopStrategyKind>,
    seed: ShuffleSeed,
}

impl SongArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut id = None;
        let mut source = LessonSource::Directory(songs_dir_from_env());
        let mut strategy = None;
        let mut seed = ShuffleSeed::Random;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--id" => id = Some(require_value(args, "--id")?),
                "--songs-dir" => {
                    let value = require_value(args, "--songs-dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidSongsDir { raw: value });
                    }
                    source = LessonSource::Directory(PathBuf::from(value));
                }
                "--base-url" => source = LessonSource::Http(require_value(args, "--base-url")?),
                "--strategy" => {
                    let value = require_value(args, "--strategy")?;
                    let parsed = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidStrategy { raw: value.clone() })?;
                    strategy = Some(parsed);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = ShuffleSeed::Fixed(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let id = id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ArgsError::MissingId)?;
        Ok(Self {
            id,
            source,
            strategy,
            seed,
        })
    }
}

#[derive(Debug, Default)]
struct AnnotateArgs {
    url: Option<String>,
    restore: Option<PathBuf>,
    out: Option<PathBuf>,
}

impl AnnotateArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--url" => parsed.url = Some(require_value(args, "--url")?),
                "--restore" => {
                    parsed.restore = Some(PathBuf::from(require_value(args, "--restore")?));
                }
                "--out" => parsed.out = Some(PathBuf::from(require_value(args, "--out")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

fn songs_dir_from_env() -> PathBuf {
    PathBuf::from(std::env::var("LINGO_SONGS_DIR").unwrap_or_else(|_| "./public".into()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_catalog() {
    println!("Songs:");
    for entry in CATALOG {
        let language = entry.language.map(|l| format!(" [{l}]")).unwrap_or_default();
        println!(
            "  {:<10} {:<40} {:<12}{language}",
            entry.key,
            entry.title,
            entry.difficulty.label()
        );
        println!("             {}  {}", entry.route(), entry.thumbnail_url());
    }
    println!();
    println!("Play one with: cargo run -p app -- song --id <key>");
}

fn print_about() {
    println!("Learn songs line by line.");
    println!();
    println!("Each line of a song plays from its music video, then its words are shuffled.");
    println!("Put them back in order to move on; the next line plays after a short pause.");
    println!("New lessons are authored with the annotate command and saved as JSON files.");
}

fn validate_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let lesson = storage::lesson_file::decode(&json)?;
    println!(
        "{}: ok ({} lines, video {})",
        lesson.name(),
        lesson.line_count(),
        lesson.watch_url()
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);

    let cmd = match argv.next() {
        None => Command::Catalog,
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            print_usage();
            ArgsError::UnknownArg(first.clone())
        })?,
    };

    // Stdout stays free for the interactive commands; logs go to stderr.
    init_tracing();

    match cmd {
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
        Command::About => {
            print_about();
            Ok(())
        }
        Command::Validate => {
            let path = require_value(&mut argv, "validate").inspect_err(|_| print_usage())?;
            validate_file(&path)
        }
        Command::Song => {
            let args = SongArgs::parse(&mut argv).inspect_err(|_| print_usage())?;
            let mut config = PlayerConfig::from_env()?;
            if let Some(strategy) = args.strategy {
                config = config.with_stop_strategy(strategy);
            }
            if let Some(entry) = find_entry(&args.id) {
                println!("{} ({})", entry.title, entry.difficulty.label());
            }
            let services = AppServices::new(&args.source, config, Clock::default_clock())?
                .with_seed(args.seed);
            play::run(&services, &args.id).await
        }
        Command::Annotate => {
            let args = AnnotateArgs::parse(&mut argv).inspect_err(|_| print_usage())?;
            let services = AppServices::new(
                &LessonSource::Directory(songs_dir_from_env()),
                PlayerConfig::default(),
                Clock::default_clock(),
            )?;
            annotate::run(&services, args.url, args.restore, args.out).await
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
