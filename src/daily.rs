use chrono::{Datelike, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

// Committed for good: changing the generator or either constant reshuffles
// every historical word-of-the-day assignment and invalidates saved sessions.
const SEED_MULTIPLIER: u64 = 2_654_435_761;
const SEED_OFFSET: u64 = 0x9E37_79B9;

pub fn year_seed(year: i32) -> u64 {
    (year as u64)
        .wrapping_mul(SEED_MULTIPLIER)
        .wrapping_add(SEED_OFFSET)
}

/// Fisher-Yates permutation of `0..len`, driven by a ChaCha20 stream seeded
/// from the calendar year. Pure: same (len, year) always yields the same
/// permutation, across calls and across restarts.
pub fn daily_permutation(len: usize, year: i32) -> Vec<usize> {
    let mut rng = ChaCha20Rng::seed_from_u64(year_seed(year));
    let mut indices: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = rng.random_range(0..=i);
        indices.swap(i, j);
    }
    indices
}

/// Zero-based day of year: January 1 is 0.
pub fn day_of_year0(date: NaiveDate) -> u32 {
    date.ordinal0()
}

/// The word of the day: index the year's permutation by day-of-year, modulo
/// the list length. Lists shorter than a year wrap around and reuse words;
/// lists of 366+ words never repeat within a calendar year. An empty list
/// has no word ("game unavailable" to the caller).
pub fn word_of_the_day(answers: &[String], date: NaiveDate) -> Option<&str> {
    if answers.is_empty() {
        return None;
    }
    let permutation = daily_permutation(answers.len(), date.year());
    let slot = day_of_year0(date) as usize % answers.len();
    Some(answers[permutation[slot]].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn synthetic_answers(count: usize) -> Vec<String> {
        // Distinct five-letter words: two varying positions over a fixed tail.
        let mut words = Vec::with_capacity(count);
        'outer: for a in b'A'..=b'Z' {
            for b in b'A'..=b'Z' {
                words.push(format!("{}{}XYZ", a as char, b as char));
                if words.len() == count {
                    break 'outer;
                }
            }
        }
        words
    }

    #[test]
    fn test_permutation_contains_every_index_once() {
        let permutation = daily_permutation(100, 2026);
        let unique: HashSet<usize> = permutation.iter().copied().collect();
        assert_eq!(permutation.len(), 100);
        assert_eq!(unique.len(), 100);
        assert!(permutation.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_permutation_is_deterministic() {
        assert_eq!(daily_permutation(500, 2025), daily_permutation(500, 2025));
    }

    #[test]
    fn test_distinct_years_shuffle_differently() {
        // Not guaranteed in principle, but a collision over 500 elements
        // would mean the seeding is broken.
        assert_ne!(daily_permutation(500, 2025), daily_permutation(500, 2026));
    }

    #[test]
    fn test_day_of_year_is_zero_based() {
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let dec31 = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(day_of_year0(jan1), 0);
        assert_eq!(day_of_year0(dec31), 364);
    }

    #[test]
    fn test_word_of_the_day_is_stable() {
        let answers = synthetic_answers(400);
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        let first = word_of_the_day(&answers, date).unwrap().to_string();
        let second = word_of_the_day(&answers, date).unwrap().to_string();
        assert_eq!(first, second);
        assert!(answers.contains(&first));
    }

    #[test]
    fn test_no_repeat_within_a_leap_year_for_large_lists() {
        let answers = synthetic_answers(400);
        let mut selected = HashSet::new();
        // 2024 has 366 days.
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for offset in 0..366 {
            let date = jan1 + chrono::Days::new(offset);
            let word = word_of_the_day(&answers, date).unwrap();
            assert!(selected.insert(word.to_string()), "{word} repeated");
        }
        assert_eq!(selected.len(), 366);
    }

    #[test]
    fn test_short_lists_wrap_around() {
        let answers = synthetic_answers(3);
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let jan4 = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        assert_eq!(
            word_of_the_day(&answers, jan1),
            word_of_the_day(&answers, jan4)
        );
    }

    #[test]
    fn test_empty_list_has_no_word() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        assert_eq!(word_of_the_day(&[], date), None);
    }
}
