use std::fmt;
use std::path::PathBuf;

use storage::demo::{demo_key, demo_lesson};
use storage::Storage;

#[derive(Debug, Clone)]
struct Args {
    songs_dir: PathBuf,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSongsDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let songs_dir =
            PathBuf::from(std::env::var("LINGO_SONGS_DIR").unwrap_or_else(|_| "./public".into()));
        Self::parse_from(std::env::args().skip(1), songs_dir)
    }

    /// Errors are returned unprinted; `main` reports them.
    fn parse_from(
        mut args: impl Iterator<Item = String>,
        mut songs_dir: PathBuf,
    ) -> Result<Self, ArgsError> {
        let mut force = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--songs-dir" => {
                    let value = require_value(&mut args, "--songs-dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidSongsDir { raw: value });
                    }
                    songs_dir = PathBuf::from(value);
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { songs_dir, force })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --songs-dir <path>        Directory holding songs/ (default: ./public)");
    eprintln!("  --force                   Overwrite an existing demo lesson");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  LINGO_SONGS_DIR");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().inspect_err(|_| print_usage())?;

    let storage = Storage::directory(&args.songs_dir);
    let key = demo_key();

    if !args.force && storage.lessons.get_lesson(&key).await.is_ok() {
        println!(
            "Demo lesson {key} already present in {}; pass --force to overwrite",
            args.songs_dir.display()
        );
        return Ok(());
    }

    let lesson = demo_lesson()?;
    storage.lessons.save_lesson(&key, &lesson).await?;

    println!(
        "Seeded {} ({} lines) into {}",
        key.file_path(),
        lesson.line_count(),
        args.songs_dir.display()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse_from(args.iter().map(|a| (*a).to_owned()), PathBuf::from("./public"))
    }

    #[test]
    fn flags_override_the_default_dir() {
        let args = parse(&["--songs-dir", "/srv/site", "--force"]).unwrap();
        assert_eq!(args.songs_dir, PathBuf::from("/srv/site"));
        assert!(args.force);
        assert_eq!(parse(&[]).unwrap().songs_dir, PathBuf::from("./public"));
    }

    #[test]
    fn bad_arguments_come_back_as_errors() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown argument: --bogus");
        assert!(matches!(
            parse(&["--songs-dir"]),
            Err(ArgsError::MissingValue { flag: "--songs-dir" })
        ));
        assert!(matches!(
            parse(&["--songs-dir", " "]),
            Err(ArgsError::InvalidSongsDir { .. })
        ));
    }
}
