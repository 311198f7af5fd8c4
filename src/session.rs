use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wordbank::{MAX_ATTEMPTS, WORD_LENGTH};

/// Per-position verdict for one guessed letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterFeedback {
    /// Right letter, right position (green).
    Exact,
    /// Letter occurs elsewhere in the target (yellow).
    Present,
    /// Letter does not occur, or all its occurrences are spoken for (gray).
    Absent,
}

impl LetterFeedback {
    pub fn to_char(self) -> char {
        match self {
            Self::Exact => 'G',
            Self::Present => 'Y',
            Self::Absent => 'X',
        }
    }

    fn strength(self) -> u8 {
        match self {
            Self::Exact => 2,
            Self::Present => 1,
            Self::Absent => 0,
        }
    }
}

/// Score a guess against the target. Two passes: exact matches consume their
/// target letter first, then each remaining guess letter may consume one
/// unclaimed occurrence, so duplicated letters are never over-reported.
/// Pure, recomputable at any time from the guess and the target.
pub fn feedback_for(guess: &str, target: &str) -> Vec<LetterFeedback> {
    let guess_chars: Vec<char> = guess.chars().collect();
    let mut pool: Vec<Option<char>> = target.chars().map(Some).collect();
    let mut feedback = vec![LetterFeedback::Absent; guess_chars.len()];

    for (i, &g) in guess_chars.iter().enumerate().take(pool.len()) {
        if pool[i] == Some(g) {
            feedback[i] = LetterFeedback::Exact;
            pool[i] = None;
        }
    }
    for (i, &g) in guess_chars.iter().enumerate() {
        if feedback[i] == LetterFeedback::Exact {
            continue;
        }
        if let Some(pos) = pool.iter().position(|&c| c == Some(g)) {
            feedback[i] = LetterFeedback::Present;
            pool[pos] = None;
        }
    }
    feedback
}

/// Render feedback in the compact G/Y/X notation, e.g. "GYXXG".
pub fn pattern(feedback: &[LetterFeedback]) -> String {
    feedback.iter().map(|f| f.to_char()).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("the game is already over")]
    Finished,
    #[error("guesses must be exactly 5 letters (A-Z)")]
    NotFiveLetters,
    #[error("'{0}' is not in the word list")]
    NotInWordList(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GuessOutcome {
    pub guess: String,
    pub feedback: Vec<LetterFeedback>,
    pub status: SessionStatus,
}

/// One player's progress against one day's target word. This struct is the
/// persisted snapshot: it is saved after every mutation and restored at
/// startup, but only when the saved date and word still match today's
/// selection. Terminal sessions never accept further guesses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub date: NaiveDate,
    pub word: String,
    pub guesses: Vec<String>,
    pub won: bool,
    pub game_over: bool,
    pub used_letters: BTreeSet<char>,
}

impl GameSession {
    pub fn new(today: NaiveDate, target: &str) -> Self {
        Self {
            date: today,
            word: target.to_string(),
            guesses: Vec::new(),
            won: false,
            game_over: false,
            used_letters: BTreeSet::new(),
        }
    }

    /// Restore a persisted session only when it is bound to today's date and
    /// today's word and its shape holds up; anything stale, tampered or
    /// malformed is dropped on the floor and a fresh session starts.
    /// `used_letters` is always recomputed from the guesses, never trusted.
    pub fn for_today(today: NaiveDate, target: &str, persisted: Option<GameSession>) -> Self {
        match persisted {
            Some(saved) if saved.date == today && saved.word == target && saved.is_well_formed() => {
                let mut session = saved;
                session.used_letters = session
                    .guesses
                    .iter()
                    .flat_map(|g| g.chars())
                    .collect();
                session
            }
            Some(_) => {
                log::info!("discarding persisted session that does not match today's game");
                Self::new(today, target)
            }
            None => Self::new(today, target),
        }
    }

    fn is_well_formed(&self) -> bool {
        let guesses_ok = self.guesses.len() <= MAX_ATTEMPTS
            && self.guesses.iter().all(|g| {
                g.len() == WORD_LENGTH && g.chars().all(|c| c.is_ascii_uppercase())
            });
        let won_ok = self.won == self.guesses.last().is_some_and(|g| *g == self.word);
        let over_ok = self.game_over == (self.won || self.guesses.len() == MAX_ATTEMPTS);
        guesses_ok && won_ok && over_ok
    }

    pub fn status(&self) -> SessionStatus {
        if self.won {
            SessionStatus::Won
        } else if self.game_over {
            SessionStatus::Lost
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn attempts_left(&self) -> usize {
        MAX_ATTEMPTS - self.guesses.len()
    }

    /// Submit a guess. Rejections (terminal session, wrong shape, not in the
    /// acceptance set) leave the session untouched and consume no attempt.
    /// An accepted guess is appended and moves the session to Won on an
    /// exact match or to Lost when it was the last attempt.
    pub fn submit_guess(
        &mut self,
        candidate: &str,
        accepted: &HashSet<String>,
    ) -> Result<GuessOutcome, GuessError> {
        if self.game_over {
            return Err(GuessError::Finished);
        }
        let candidate = candidate.trim().to_uppercase();
        if candidate.len() != WORD_LENGTH || !candidate.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GuessError::NotFiveLetters);
        }
        if !accepted.contains(&candidate) {
            return Err(GuessError::NotInWordList(candidate));
        }

        let feedback = feedback_for(&candidate, &self.word);
        self.used_letters.extend(candidate.chars());
        let is_win = candidate == self.word;
        self.guesses.push(candidate.clone());
        if is_win {
            self.won = true;
            self.game_over = true;
        } else if self.guesses.len() == MAX_ATTEMPTS {
            self.game_over = true;
        }

        Ok(GuessOutcome {
            guess: candidate,
            feedback,
            status: self.status(),
        })
    }

    /// Best-known verdict per used letter, for keyboard coloring. Exact
    /// beats Present beats Absent; derived from the guesses, display only.
    pub fn keyboard_hints(&self) -> BTreeMap<char, LetterFeedback> {
        let mut hints = BTreeMap::new();
        for guess in &self.guesses {
            for (ch, verdict) in guess.chars().zip(feedback_for(guess, &self.word)) {
                let entry = hints.entry(ch).or_insert(verdict);
                if verdict.strength() > entry.strength() {
                    *entry = verdict;
                }
            }
        }
        hints
    }
}
