use std::io;

use chrono::Utc;

use daily_wordle::cli::{CliInterface, parse_cli};
use daily_wordle::game::play;
use daily_wordle::storage::{FileStore, KeyValueStore, MemoryStore};
use daily_wordle::streak::{HttpStreakService, StreakService, StreakTracker};
use daily_wordle::tui::TuiInterface;
use daily_wordle::wordbank::{EMBEDDED_WORDBANK, WordBank, fetch_words, load_words_from_file, load_words_from_str};

fn main() {
    env_logger::init();
    let cli = parse_cli();

    let answers = match (&cli.wordlist_path, &cli.words_url) {
        (Some(path), _) => match load_words_from_file(path) {
            Ok(words) => words,
            Err(e) => {
                // Soft failure: an empty list renders as "game unavailable".
                eprintln!("Failed to load word list from '{path}': {e}");
                Vec::new()
            }
        },
        (None, Some(url)) => fetch_words(url),
        (None, None) => load_words_from_str(EMBEDDED_WORDBANK),
    };
    let mut bank = WordBank::new(answers);

    if let Some(path) = &cli.accept_list {
        match load_words_from_file(path) {
            Ok(extra) => bank.extend_acceptance(extra),
            Err(e) => eprintln!("Failed to load acceptance list from '{path}': {e}"),
        }
    }

    let mut store: Box<dyn KeyValueStore> = match FileStore::open() {
        Some(file_store) => Box::new(file_store),
        None => {
            log::warn!("no data directory available; progress will not survive restarts");
            Box::new(MemoryStore::new())
        }
    };

    let service: Option<Box<dyn StreakService>> = if cli.offline {
        None
    } else {
        cli.streak_url.as_deref().and_then(|url| {
            match HttpStreakService::new(url) {
                Ok(service) => Some(Box::new(service) as Box<dyn StreakService>),
                Err(e) => {
                    log::warn!("streak service client unavailable: {e}");
                    None
                }
            }
        })
    };
    let mut tracker = StreakTracker::new(service, cli.player.as_deref());

    let today = Utc::now().date_naive();

    if cli.tui {
        match TuiInterface::new() {
            Ok(mut ui) => play(
                &bank,
                today,
                store.as_mut(),
                &mut tracker,
                cli.player.as_deref(),
                &mut ui,
            ),
            Err(e) => eprintln!("Failed to start terminal interface: {e}"),
        }
    } else {
        let stdin = io::stdin();
        let mut ui = CliInterface::new(stdin.lock());
        play(
            &bank,
            today,
            store.as_mut(),
            &mut tracker,
            cli.player.as_deref(),
            &mut ui,
        );
    }
}
