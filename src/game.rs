use chrono::NaiveDate;

use crate::daily::word_of_the_day;
use crate::session::{GameSession, GuessError, GuessOutcome, SessionStatus};
use crate::storage::{KeyValueStore, SESSION_STATE_KEY, scoped_key};
use crate::streak::StreakTracker;
use crate::wordbank::WordBank;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Exit,
}

/// Everything a frontend must render or collect. The game loop drives this
/// trait; the CLI and the TUI implement it.
pub trait GameUi {
    /// Show the (possibly restored) board and the current streak.
    fn show_session(&mut self, session: &GameSession, streak: u32);
    fn read_action(&mut self) -> UserAction;
    fn show_guess_error(&mut self, error: &GuessError);
    fn show_outcome(&mut self, session: &GameSession, outcome: &GuessOutcome, streak: u32);
    fn show_win(&mut self, session: &GameSession, streak: u32);
    fn show_loss(&mut self, session: &GameSession, streak: u32);
    /// The word list failed to load; there is no game today.
    fn show_unavailable(&mut self);
}

fn save_session(store: &mut dyn KeyValueStore, key: &str, session: &GameSession) {
    match serde_json::to_string(session) {
        Ok(raw) => store.set(key, &raw),
        Err(e) => log::warn!("failed to encode session snapshot: {e}"),
    }
}

/// One full sitting of the daily game: restore or create today's session,
/// reconcile the streak once, then take guesses until the session is
/// terminal or the player leaves. Every mutation is persisted before it is
/// shown, so a reload lands exactly where the player left off.
pub fn play(
    bank: &WordBank,
    today: NaiveDate,
    store: &mut dyn KeyValueStore,
    tracker: &mut StreakTracker,
    player: Option<&str>,
    ui: &mut dyn GameUi,
) {
    let Some(target) = word_of_the_day(bank.answers(), today) else {
        ui.show_unavailable();
        return;
    };
    let target = target.to_string();

    let session_key = scoped_key(player, SESSION_STATE_KEY);
    let persisted = store
        .get(&session_key)
        .and_then(|raw| serde_json::from_str(&raw).ok());
    let mut session = GameSession::for_today(today, &target, persisted);
    save_session(store, &session_key, &session);

    tracker.reconcile(store);
    ui.show_session(&session, tracker.effective_streak());

    // Already finished today's game in an earlier sitting: show the result
    // screen without re-reporting anything.
    match session.status() {
        SessionStatus::Won => {
            ui.show_win(&session, tracker.effective_streak());
            return;
        }
        SessionStatus::Lost => {
            ui.show_loss(&session, tracker.effective_streak());
            return;
        }
        SessionStatus::InProgress => {}
    }

    loop {
        let guess = match ui.read_action() {
            UserAction::Exit => return,
            UserAction::Guess(guess) => guess,
        };

        match session.submit_guess(&guess, bank.accepted()) {
            Err(error) => ui.show_guess_error(&error),
            Ok(outcome) => {
                save_session(store, &session_key, &session);
                match outcome.status {
                    SessionStatus::InProgress => {
                        ui.show_outcome(&session, &outcome, tracker.effective_streak());
                    }
                    SessionStatus::Won => {
                        tracker.record_win(store, today);
                        ui.show_win(&session, tracker.effective_streak());
                        return;
                    }
                    SessionStatus::Lost => {
                        tracker.record_loss(store);
                        ui.show_loss(&session, tracker.effective_streak());
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::wordbank::normalize_words;
    use std::collections::VecDeque;

    /// Headless frontend: feeds a scripted list of actions and records what
    /// the game loop asked it to display.
    #[derive(Default)]
    struct ScriptedUi {
        actions: VecDeque<UserAction>,
        events: Vec<String>,
    }

    impl ScriptedUi {
        fn with_guesses(guesses: &[&str]) -> Self {
            Self {
                actions: guesses
                    .iter()
                    .map(|g| UserAction::Guess(g.to_string()))
                    .collect(),
                events: Vec::new(),
            }
        }
    }

    impl GameUi for ScriptedUi {
        fn show_session(&mut self, session: &GameSession, streak: u32) {
            self.events
                .push(format!("session:{}:{streak}", session.guesses.len()));
        }

        fn read_action(&mut self) -> UserAction {
            self.actions.pop_front().unwrap_or(UserAction::Exit)
        }

        fn show_guess_error(&mut self, error: &GuessError) {
            self.events.push(format!("error:{error}"));
        }

        fn show_outcome(&mut self, session: &GameSession, _outcome: &GuessOutcome, _streak: u32) {
            self.events
                .push(format!("progress:{}", session.guesses.len()));
        }

        fn show_win(&mut self, session: &GameSession, streak: u32) {
            self.events
                .push(format!("won:{}:{streak}", session.guesses.len()));
        }

        fn show_loss(&mut self, _session: &GameSession, streak: u32) {
            self.events.push(format!("lost:{streak}"));
        }

        fn show_unavailable(&mut self) {
            self.events.push("unavailable".to_string());
        }
    }

    fn bank() -> WordBank {
        WordBank::new(normalize_words([
            "APPLE", "GHOST", "SMILE", "BEACH", "PIZZA", "CRANE", "SLATE",
        ]))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    fn target_for_today(bank: &WordBank) -> String {
        word_of_the_day(bank.answers(), today()).unwrap().to_string()
    }

    #[test]
    fn test_empty_bank_is_unavailable() {
        let bank = WordBank::new(Vec::new());
        let mut store = MemoryStore::new();
        let mut tracker = StreakTracker::new(None, None);
        let mut ui = ScriptedUi::default();

        play(&bank, today(), &mut store, &mut tracker, None, &mut ui);
        assert_eq!(ui.events, vec!["unavailable"]);
        assert_eq!(store.get("guest/session-state"), None);
    }

    #[test]
    fn test_win_on_first_guess_bumps_streak() {
        let bank = bank();
        let target = target_for_today(&bank);
        let mut store = MemoryStore::new();
        let mut tracker = StreakTracker::new(None, None);
        let mut ui = ScriptedUi::with_guesses(&[&target]);

        play(&bank, today(), &mut store, &mut tracker, None, &mut ui);
        assert_eq!(ui.events.last().unwrap(), "won:1:1");

        let saved: GameSession =
            serde_json::from_str(&store.get("guest/session-state").unwrap()).unwrap();
        assert!(saved.won && saved.game_over);
        assert_eq!(saved.guesses, vec![target]);
    }

    #[test]
    fn test_invalid_guesses_do_not_consume_attempts() {
        let bank = bank();
        let target = target_for_today(&bank);
        let mut store = MemoryStore::new();
        let mut tracker = StreakTracker::new(None, None);
        let mut ui = ScriptedUi::with_guesses(&["AB", "ZZZZZ", &target]);

        play(&bank, today(), &mut store, &mut tracker, None, &mut ui);
        // Two rejections, then the win on what is still the first attempt.
        assert_eq!(ui.events.last().unwrap(), "won:1:1");
        assert!(ui.events.iter().filter(|e| e.starts_with("error:")).count() == 2);
    }

    #[test]
    fn test_five_misses_lose_and_zero_the_streak() {
        let bank = bank();
        let target = target_for_today(&bank);
        let misses: Vec<&str> = ["APPLE", "GHOST", "SMILE", "BEACH", "PIZZA", "CRANE"]
            .into_iter()
            .filter(|w| *w != target)
            .take(5)
            .collect();
        let mut store = MemoryStore::new();
        let mut tracker = StreakTracker::new(None, None);
        let mut ui = ScriptedUi::with_guesses(&misses);

        play(&bank, today(), &mut store, &mut tracker, None, &mut ui);
        assert_eq!(ui.events.last().unwrap(), "lost:0");
        assert_eq!(tracker.effective_streak(), 0);

        let saved: GameSession =
            serde_json::from_str(&store.get("guest/session-state").unwrap()).unwrap();
        assert!(saved.game_over && !saved.won);
        assert_eq!(saved.guesses.len(), 5);
    }

    #[test]
    fn test_reload_restores_midgame_progress() {
        let bank = bank();
        let target = target_for_today(&bank);
        let miss = ["APPLE", "GHOST"]
            .into_iter()
            .find(|w| *w != target)
            .unwrap();
        let mut store = MemoryStore::new();

        let mut tracker = StreakTracker::new(None, None);
        let mut first = ScriptedUi::with_guesses(&[miss]);
        play(&bank, today(), &mut store, &mut tracker, None, &mut first);

        // Second sitting, same day: one guess already on the board.
        let mut tracker = StreakTracker::new(None, None);
        let mut second = ScriptedUi::with_guesses(&[&target]);
        play(&bank, today(), &mut store, &mut tracker, None, &mut second);
        assert_eq!(second.events.first().unwrap(), "session:1:0");
        assert_eq!(second.events.last().unwrap(), "won:2:1");
    }

    #[test]
    fn test_stale_snapshot_from_yesterday_is_discarded() {
        let bank = bank();
        let yesterday = today().pred_opt().unwrap();
        let stale_target = word_of_the_day(bank.answers(), yesterday)
            .unwrap()
            .to_string();
        let mut stale = GameSession::new(yesterday, &stale_target);
        stale.submit_guess(&stale_target, bank.accepted()).unwrap();

        let mut store = MemoryStore::new();
        store.set(
            "guest/session-state",
            &serde_json::to_string(&stale).unwrap(),
        );

        let mut tracker = StreakTracker::new(None, None);
        let mut ui = ScriptedUi::default();
        play(&bank, today(), &mut store, &mut tracker, None, &mut ui);

        // Fresh board, no carried-over win screen.
        assert_eq!(ui.events.first().unwrap(), "session:0:0");
        let saved: GameSession =
            serde_json::from_str(&store.get("guest/session-state").unwrap()).unwrap();
        assert!(saved.guesses.is_empty());
        assert_eq!(saved.date, today());
    }

    #[test]
    fn test_finished_session_shows_result_without_taking_guesses() {
        let bank = bank();
        let target = target_for_today(&bank);
        let mut store = MemoryStore::new();
        let mut tracker = StreakTracker::new(None, None);
        let mut first = ScriptedUi::with_guesses(&[&target]);
        play(&bank, today(), &mut store, &mut tracker, None, &mut first);

        let mut tracker = StreakTracker::new(None, None);
        // Guesses queued up, but none should be consumed.
        let mut second = ScriptedUi::with_guesses(&["APPLE", "GHOST"]);
        play(&bank, today(), &mut store, &mut tracker, None, &mut second);
        assert_eq!(second.actions.len(), 2);
        assert!(second.events.last().unwrap().starts_with("won:1:"));
    }

    #[test]
    fn test_sessions_are_scoped_per_player() {
        let bank = bank();
        let target = target_for_today(&bank);
        let miss = ["APPLE", "GHOST"]
            .into_iter()
            .find(|w| *w != target)
            .unwrap();
        let mut store = MemoryStore::new();

        let mut tracker = StreakTracker::new(None, Some("alice"));
        let mut ui = ScriptedUi::with_guesses(&[miss]);
        play(&bank, today(), &mut store, &mut tracker, Some("alice"), &mut ui);

        assert!(store.get("alice/session-state").is_some());
        assert_eq!(store.get("bob/session-state"), None);
    }
}
