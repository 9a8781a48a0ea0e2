//! Collision-free email synthesis.
//!
//! Emails take the form `{first}{last}@{domain}`, built from the first and
//! last words of a name. Used addresses live in a [`UsedEmails`] set so each
//! collision check is a hash lookup rather than a scan of the pool.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::error::GenerationError;

/// Default cap on email candidates tried for a single name.
pub const DEFAULT_MAX_EMAIL_ATTEMPTS: usize = 64;

/// Index of email addresses already assigned in a pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedEmails {
    emails: HashSet<String>,
}

impl UsedEmails {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `email` has already been assigned.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    /// Records `email` as assigned. Returns `false` if it was already present.
    pub fn insert(&mut self, email: String) -> bool {
        self.emails.insert(email)
    }

    /// Returns the number of assigned emails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Returns `true` when no email has been assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl FromIterator<String> for UsedEmails {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            emails: iter.into_iter().collect(),
        }
    }
}

/// Derives an unused email address for `name`.
///
/// Each attempt draws a fresh random domain; the local part stays the same.
/// The returned address is never present in `used`.
///
/// # Errors
///
/// Returns [`GenerationError::EmptyDomainPool`] when `domains` is empty and
/// [`GenerationError::EmailSpaceExhausted`] when `max_attempts` candidates
/// all collide.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use user_pool::{UsedEmails, generate_email};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let domains = vec!["example.com".to_owned()];
/// let email = generate_email(&mut rng, "Ada King Lovelace", &UsedEmails::new(), &domains, 8)
///     .expect("email");
///
/// assert_eq!(email, "adalovelace@example.com");
/// ```
pub fn generate_email<R>(
    rng: &mut R,
    name: &str,
    used: &UsedEmails,
    domains: &[String],
    max_attempts: usize,
) -> Result<String, GenerationError>
where
    R: Rng + ?Sized,
{
    if domains.is_empty() {
        return Err(GenerationError::EmptyDomainPool);
    }

    let local_part = local_part_for(name);
    for _ in 0..max_attempts {
        let domain = domains.choose(rng).ok_or(GenerationError::EmptyDomainPool)?;
        let candidate = format!("{local_part}@{domain}");
        if !used.contains(&candidate) {
            return Ok(candidate);
        }
    }

    debug!(user_name = name, attempts = max_attempts, "email candidates exhausted");
    Err(GenerationError::EmailSpaceExhausted {
        name: name.to_owned(),
        attempts: max_attempts,
    })
}

/// Concatenates the lowercased first and last words of `name`.
fn local_part_for(name: &str) -> String {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default();
    let last = parts.next_back().unwrap_or(first);
    format!("{}{}", first.to_lowercase(), last.to_lowercase())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::user::{User, UserPool};

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|domain| (*domain).to_owned()).collect()
    }

    #[rstest]
    #[case::two_words("Ann Lee", "annlee")]
    #[case::middle_words_ignored("Ann Marie Jo Lee", "annlee")]
    #[case::single_word("Ana", "anaana")]
    #[case::mixed_case("McKAY o'Neil", "mckayo'neil")]
    #[case::extra_whitespace("  Ann   Lee ", "annlee")]
    fn local_part_uses_first_and_last_words(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(local_part_for(name), expected);
    }

    #[rstest]
    fn returns_candidate_when_unused(mut rng: ChaCha8Rng) {
        let email = generate_email(
            &mut rng,
            "Ann Lee",
            &UsedEmails::new(),
            &domains(&["example.com"]),
            4,
        )
        .expect("email");

        assert_eq!(email, "annlee@example.com");
    }

    #[rstest]
    fn retries_with_other_domains_on_collision(mut rng: ChaCha8Rng) {
        let pool = UserPool::from(vec![User::new("01", "Ann Lee", "annlee@example.com")]);
        let used = pool.used_emails();

        for _ in 0..20 {
            let email = generate_email(
                &mut rng,
                "Ann Lee",
                &used,
                &domains(&["example.com", "example.org"]),
                DEFAULT_MAX_EMAIL_ATTEMPTS,
            )
            .expect("email");
            assert_eq!(email, "annlee@example.org");
        }
    }

    #[rstest]
    fn single_domain_collision_exhausts_retries(mut rng: ChaCha8Rng) {
        let pool = UserPool::from(vec![User::new("01", "Ann Lee", "annlee@example.com")]);

        let result = generate_email(
            &mut rng,
            "Ann Lee",
            &pool.used_emails(),
            &domains(&["example.com"]),
            16,
        );

        assert_eq!(
            result,
            Err(GenerationError::EmailSpaceExhausted {
                name: "Ann Lee".to_owned(),
                attempts: 16,
            })
        );
    }

    #[rstest]
    fn empty_domain_pool_is_rejected(mut rng: ChaCha8Rng) {
        let result = generate_email(&mut rng, "Ann Lee", &UsedEmails::new(), &[], 4);

        assert_eq!(result, Err(GenerationError::EmptyDomainPool));
    }

    #[test]
    fn used_emails_insert_reports_duplicates() {
        let mut used = UsedEmails::new();

        assert!(used.insert("annlee@example.com".to_owned()));
        assert!(!used.insert("annlee@example.com".to_owned()));
        assert_eq!(used.len(), 1);
    }
}
