// Library interface for daily-wordle
// This allows integration tests to access internal modules

pub mod cli;
pub mod daily;
pub mod game;
pub mod session;
pub mod storage;
pub mod streak;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use daily::{daily_permutation, day_of_year0, word_of_the_day};
pub use game::{GameUi, UserAction, play};
pub use session::{GameSession, GuessError, LetterFeedback, SessionStatus, feedback_for, pattern};
pub use streak::{StreakRecord, StreakService, StreakTracker};
pub use wordbank::{WordBank, load_words_from_file, load_words_from_str, normalize_words};
