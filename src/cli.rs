use std::io::BufRead;

use clap::Parser;

use crate::game::{GameUi, UserAction};
use crate::session::{GameSession, GuessError, GuessOutcome, feedback_for, pattern};
use crate::wordbank::MAX_ATTEMPTS;

/// Daily word game CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word list file
    #[arg(short = 'i', long = "input")]
    pub wordlist_path: Option<String>,

    /// URL returning a JSON array of candidate words
    #[arg(long = "words-url")]
    pub words_url: Option<String>,

    /// Extra newline-delimited dictionary of valid guesses that are never answers
    #[arg(long = "accept-list")]
    pub accept_list: Option<String>,

    /// Base URL of the streak service
    #[arg(long = "streak-url")]
    pub streak_url: Option<String>,

    /// Player identifier for session and streak scoping (guest if omitted)
    #[arg(long = "player")]
    pub player: Option<String>,

    /// Skip all network calls and play against the local cache only
    #[arg(long = "offline")]
    pub offline: bool,

    /// Run the full-screen terminal interface
    #[arg(long = "tui")]
    pub tui: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub fn read_guess<R: BufRead>(reader: &mut R) -> UserAction {
    println!("\nEnter your guess (5 letters, or 'exit' to quit):");
    let mut input = String::new();
    match reader.read_line(&mut input) {
        // EOF or a broken pipe ends the sitting, same as 'exit'.
        Ok(0) | Err(_) => return UserAction::Exit,
        Ok(_) => {}
    }
    let input = input.trim().to_uppercase();

    match input.as_str() {
        "EXIT" => UserAction::Exit,
        _ => UserAction::Guess(input),
    }
}

fn display_board(session: &GameSession) {
    for guess in &session.guesses {
        println!("  {guess}  {}", pattern(&feedback_for(guess, &session.word)));
    }
}

fn display_used_letters(session: &GameSession) {
    if !session.used_letters.is_empty() {
        let letters: String = session
            .used_letters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("Used letters: {letters}");
    }
}

/// Stdin/stdout frontend; generic over `BufRead` so tests can drive it with
/// a `Cursor`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameUi for CliInterface<R> {
    fn show_session(&mut self, session: &GameSession, streak: u32) {
        println!("Word of the day — {}", session.date);
        println!("Current streak: {streak}");
        if !session.guesses.is_empty() {
            println!("Restored board:");
            display_board(session);
        }
        if !session.game_over {
            println!(
                "{} of {MAX_ATTEMPTS} attempts left. G = right spot, Y = in the word, X = not in the word.",
                session.attempts_left()
            );
        }
    }

    fn read_action(&mut self) -> UserAction {
        read_guess(&mut self.reader)
    }

    fn show_guess_error(&mut self, error: &GuessError) {
        println!("{error}");
    }

    fn show_outcome(&mut self, session: &GameSession, outcome: &GuessOutcome, _streak: u32) {
        println!("  {}  {}", outcome.guess, pattern(&outcome.feedback));
        display_used_letters(session);
        println!("{} attempts left.", session.attempts_left());
    }

    fn show_win(&mut self, session: &GameSession, streak: u32) {
        display_board(session);
        println!(
            "You got it in {}/{MAX_ATTEMPTS}! Current streak: {streak}",
            session.guesses.len()
        );
    }

    fn show_loss(&mut self, session: &GameSession, streak: u32) {
        display_board(session);
        println!("Out of attempts. The word was {}.", session.word);
        println!("Current streak: {streak}");
    }

    fn show_unavailable(&mut self) {
        println!("The word list is unavailable. Try again later.");
    }
}
