use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

pub const WORD_LENGTH: usize = 5;
pub const MAX_ATTEMPTS: usize = 5;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

const FETCH_TIMEOUT_SECS: u64 = 10;

fn is_playable(word: &str) -> bool {
    word.len() == WORD_LENGTH && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Normalize raw entries into the candidate word list: trimmed, uppercased,
/// exactly five A-Z letters, deduplicated. First occurrence wins, so the
/// input order is preserved; the daily shuffle is keyed off this order.
pub fn normalize_words<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for entry in raw {
        let word = entry.as_ref().trim().to_uppercase();
        if is_playable(&word) && seen.insert(word.clone()) {
            words.push(word);
        }
    }
    words
}

pub fn load_words_from_str(data: &str) -> Vec<String> {
    normalize_words(data.lines())
}

pub fn load_words_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    Ok(normalize_words(lines))
}

/// Fetch a word list from a URL returning a JSON array of strings.
/// Any failure (network, status, malformed body) yields an empty list;
/// the caller surfaces that as "word list unavailable" instead of crashing.
pub fn fetch_words(url: &str) -> Vec<String> {
    match try_fetch_words(url) {
        Ok(words) => words,
        Err(e) => {
            log::warn!("word list fetch from '{url}' failed: {e}");
            Vec::new()
        }
    }
}

fn try_fetch_words(url: &str) -> Result<Vec<String>, reqwest::Error> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;
    let raw: Vec<String> = client.get(url).send()?.error_for_status()?.json()?;
    Ok(normalize_words(raw))
}

/// The immutable word bank: `answers` is the daily-selection pool and
/// `accepted` the guess-acceptance set. The acceptance set always contains
/// the answers and may be widened with a larger guess dictionary.
#[derive(Debug, Clone)]
pub struct WordBank {
    answers: Vec<String>,
    accepted: HashSet<String>,
}

impl WordBank {
    pub fn new(answers: Vec<String>) -> Self {
        let accepted = answers.iter().cloned().collect();
        Self { answers, accepted }
    }

    /// Widen the acceptance set with extra valid guesses (normalized the
    /// same way as answers). The answer pool is untouched.
    pub fn extend_acceptance<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepted.extend(normalize_words(extra));
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn accepted(&self) -> &HashSet<String> {
        &self.accepted
    }

    pub fn accepts(&self, word: &str) -> bool {
        self.accepted.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uppercases_and_trims() {
        let words = normalize_words(["  crane ", "SLATE", "raise"]);
        assert_eq!(words, vec!["CRANE", "SLATE", "RAISE"]);
    }

    #[test]
    fn test_normalize_filters_length_and_charset() {
        let words = normalize_words(["CRANE", "CRAN", "CRANES", "CR4NE", "CR NE", ""]);
        assert_eq!(words, vec!["CRANE"]);
    }

    #[test]
    fn test_normalize_dedup_keeps_first_occurrence_order() {
        let words = normalize_words(["SLATE", "crane", "CRANE", "slate", "RAISE"]);
        assert_eq!(words, vec!["SLATE", "CRANE", "RAISE"]);
    }

    #[test]
    fn test_load_words_from_str() {
        let words = load_words_from_str("crane\nslate\nnot-a-word\nraise\n");
        assert_eq!(words, vec!["CRANE", "SLATE", "RAISE"]);
    }

    #[test]
    fn test_embedded_wordbank_is_large_enough_for_a_full_year() {
        let words = load_words_from_str(EMBEDDED_WORDBANK);
        assert!(words.len() >= 366, "embedded list has {} words", words.len());
    }

    #[test]
    fn test_wordbank_accepts_answers() {
        let bank = WordBank::new(normalize_words(["CRANE", "SLATE"]));
        assert!(bank.accepts("CRANE"));
        assert!(bank.accepts("SLATE"));
        assert!(!bank.accepts("RAISE"));
    }

    #[test]
    fn test_extend_acceptance_does_not_touch_answers() {
        let mut bank = WordBank::new(normalize_words(["CRANE"]));
        bank.extend_acceptance(["raise", "stare"]);
        assert!(bank.accepts("RAISE"));
        assert!(bank.accepts("STARE"));
        assert_eq!(bank.answers(), ["CRANE"]);
    }

    #[test]
    fn test_empty_bank() {
        let bank = WordBank::new(Vec::new());
        assert!(bank.is_empty());
        assert_eq!(bank.len(), 0);
        assert!(!bank.accepts("CRANE"));
    }
}
