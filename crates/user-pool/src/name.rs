//! Name synthesis from a word pool.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::GenerationError;

/// Default minimum number of words in a generated name.
pub const DEFAULT_MIN_NAME_WORDS: usize = 2;

/// Default maximum number of words in a generated name.
pub const DEFAULT_MAX_NAME_WORDS: usize = 5;

/// Inclusive bounds on the number of words in a generated name.
///
/// The word count is drawn uniformly from `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameLength {
    min: usize,
    max: usize,
}

impl NameLength {
    /// Creates bounds of `min..=max` words.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] when `min` is zero or
    /// greater than `max`.
    pub fn new(min: usize, max: usize) -> Result<Self, GenerationError> {
        if min == 0 || min > max {
            return Err(GenerationError::InvalidConfiguration {
                field: "name_length",
                message: format!("expected 1 <= min <= max, got {min}..={max}"),
            });
        }
        Ok(Self { min, max })
    }

    /// Returns the minimum word count.
    #[must_use]
    pub const fn min(self) -> usize {
        self.min
    }

    /// Returns the maximum word count.
    #[must_use]
    pub const fn max(self) -> usize {
        self.max
    }
}

impl Default for NameLength {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_NAME_WORDS,
            max: DEFAULT_MAX_NAME_WORDS,
        }
    }
}

/// Generates a name by sampling words with replacement from `words`.
///
/// Words are joined with single spaces. Duplicate names across calls are
/// expected.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyWordPool`] when `words` is empty.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use user_pool::{NameLength, generate_name};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(2026);
/// let words = vec!["Ana".to_owned()];
/// let name = generate_name(&mut rng, &words, NameLength::default()).expect("name");
///
/// assert!(name.split(' ').all(|word| word == "Ana"));
/// ```
pub fn generate_name<R>(
    rng: &mut R,
    words: &[String],
    length: NameLength,
) -> Result<String, GenerationError>
where
    R: Rng + ?Sized,
{
    if words.is_empty() {
        return Err(GenerationError::EmptyWordPool);
    }

    let count = rng.random_range(length.min..=length.max);
    let mut name = String::new();
    for _ in 0..count {
        let word = words.choose(rng).ok_or(GenerationError::EmptyWordPool)?;
        name.push_str(word);
        name.push(' ');
    }
    name.truncate(name.trim_end().len());

    Ok(name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|word| (*word).to_owned()).collect()
    }

    #[rstest]
    fn single_word_pool_repeats_that_word(mut rng: ChaCha8Rng) {
        let pool = words(&["Ana"]);

        for _ in 0..50 {
            let name = generate_name(&mut rng, &pool, NameLength::default()).expect("name");
            assert!(name.split(' ').all(|part| part == "Ana"), "got {name}");
        }
    }

    #[rstest]
    fn word_count_stays_within_bounds(mut rng: ChaCha8Rng) {
        let pool = words(&["Ann", "Lee", "Bo", "Kim"]);
        let length = NameLength::new(2, 4).expect("bounds");
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let name = generate_name(&mut rng, &pool, length).expect("name");
            let count = name.split(' ').count();
            assert!((2..=4).contains(&count), "{count} words in {name}");
            seen.insert(count);
        }

        assert_eq!(seen.len(), 3, "expected every count in range to appear");
    }

    #[rstest]
    fn names_use_only_pool_words(mut rng: ChaCha8Rng) {
        let pool = words(&["Ann", "Lee", "Bo"]);

        for _ in 0..100 {
            let name = generate_name(&mut rng, &pool, NameLength::default()).expect("name");
            assert!(!name.is_empty());
            assert!(!name.ends_with(' '));
            assert!(name.split(' ').all(|part| pool.iter().any(|w| w == part)));
        }
    }

    #[rstest]
    fn empty_pool_is_rejected(mut rng: ChaCha8Rng) {
        let result = generate_name(&mut rng, &[], NameLength::default());

        assert_eq!(result, Err(GenerationError::EmptyWordPool));
    }

    #[rstest]
    #[case::zero_min(0, 3)]
    #[case::inverted(4, 2)]
    fn rejects_invalid_bounds(#[case] min: usize, #[case] max: usize) {
        assert!(matches!(
            NameLength::new(min, max),
            Err(GenerationError::InvalidConfiguration {
                field: "name_length",
                ..
            })
        ));
    }

    #[test]
    fn default_bounds_are_two_to_five() {
        let length = NameLength::default();

        assert_eq!((length.min(), length.max()), (2, 5));
    }
}
