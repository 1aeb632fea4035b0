use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use deckster_core::model::{Deck, DisplayField};
use deckster_core::normalize::{DeckSource, normalize};
use services::player::AudioPlayer;
use services::{NoopPlayer, SessionController};
use storage::JsonFileStore;

mod audio;

use audio::RodioPlayer;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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

struct Args {
    deck_path: PathBuf,
    data_dir: PathBuf,
    media_dir: Option<PathBuf>,
    mute: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--deck <deck.json>] [--data-dir <dir>] [--media-dir <dir>] [--mute]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --deck deck.json");
    eprintln!("  --data-dir <platform data dir>/deckster");
    eprintln!("  --media-dir the deck file's directory");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DECKSTER_DECK, DECKSTER_DATA_DIR");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut deck_path = std::env::var("DECKSTER_DECK")
            .map_or_else(|_| PathBuf::from("deck.json"), PathBuf::from);
        let mut data_dir = std::env::var("DECKSTER_DATA_DIR")
            .map_or_else(|_| default_data_dir(), PathBuf::from);
        let mut media_dir = None;
        let mut mute = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--deck" => deck_path = PathBuf::from(require_value(args, "--deck")?),
                "--data-dir" => data_dir = PathBuf::from(require_value(args, "--data-dir")?),
                "--media-dir" => {
                    media_dir = Some(PathBuf::from(require_value(args, "--media-dir")?));
                }
                "--mute" => mute = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            deck_path,
            data_dir,
            media_dir,
            mute,
        })
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deckster")
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn load_deck(path: &Path) -> Result<Deck, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read deck file {}: {err}", path.display()))?;
    let source: DeckSource = serde_json::from_str(&raw)
        .map_err(|err| format!("deck file {} is not valid JSON: {err}", path.display()))?;
    Ok(normalize(source))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let deck = load_deck(&args.deck_path)?;
    let store = JsonFileStore::open(&args.data_dir)?;

    // Converter-extracted audio lives next to the deck file unless pointed
    // elsewhere.
    let media_root = args.media_dir.unwrap_or_else(|| {
        args.deck_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    });
    let player: Arc<dyn AudioPlayer> = if args.mute {
        Arc::new(NoopPlayer)
    } else {
        Arc::new(RodioPlayer::new(media_root))
    };

    let mut controller = SessionController::new(deck, Arc::new(store), player);
    if let Some(at) = controller.last_studied() {
        info!(%at, "resuming earlier progress");
    }

    study_loop(&mut controller)
}

fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn study_loop(controller: &mut SessionController) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{}: {} cards. Type 'help' for commands.",
        controller.deck().title(),
        controller.deck().len()
    );
    render(controller);

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = read_line()? else {
            break;
        };

        match line.as_str() {
            "" | "n" | "next" => controller.advance(),
            "f" | "flip" => controller.flip(),
            "k" | "known" => controller.answer(true),
            "u" | "unknown" => controller.answer(false),
            "p" | "play" => {
                controller.play_sound();
                continue;
            }
            "r" | "review" => controller.start_review(),
            "x" | "done" => controller.exit_review(),
            "front" => {
                let shown = controller.display().show_front_example();
                controller.set_display(DisplayField::FrontExample, !shown);
            }
            "back" => {
                let shown = controller.display().show_back_example();
                controller.set_display(DisplayField::BackExample, !shown);
            }
            "reset" => {
                if confirm_reset()? {
                    controller.reset_progress();
                    println!("Progress cleared.");
                } else {
                    println!("Reset cancelled.");
                    continue;
                }
            }
            "h" | "help" => {
                print_commands();
                continue;
            }
            "q" | "quit" => break,
            other => {
                println!("unknown command: {other} (try 'help')");
                continue;
            }
        }

        render(controller);
    }

    Ok(())
}

/// Reset is irreversible, so it takes a typed confirmation rather than a
/// single keypress.
fn confirm_reset() -> io::Result<bool> {
    println!("This permanently clears your progress. Type 'yes' to confirm:");
    print!("> ");
    io::stdout().flush()?;
    Ok(read_line()?.is_some_and(|line| line == "yes"))
}

fn print_commands() {
    println!("  enter/n  next card          f      flip");
    println!("  k        mark known         u      mark unknown");
    println!("  p        play audio         r      review missed cards");
    println!("  x        leave review       front  toggle front example");
    println!("  back     toggle back example");
    println!("  reset    clear all progress");
    println!("  q        quit");
}

fn render(controller: &SessionController) {
    let Some(card) = controller.current_card() else {
        if controller.deck().is_empty() {
            println!("This deck has no cards yet. Convert one and pass it with --deck.");
        } else {
            println!("Nothing to show right now.");
        }
        return;
    };

    let progress = controller.progress();
    let mode = if progress.reviewing { " [review]" } else { "" };

    println!();
    println!("[{}/{}]{mode} {}", progress.current, progress.total, card.front);
    if controller.display().show_front_example() && !card.front_example.is_empty() {
        println!("    {}", card.front_example);
    }
    if controller.state().flipped() {
        println!("  = {}", card.back);
        if controller.display().show_back_example() && !card.back_example.is_empty() {
            println!("    {}", card.back_example);
        }
    }
    if card.has_audio() {
        println!("  (audio: 'p' to play)");
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
