//! User pool construction.
//!
//! The builder runs a single sequential loop: identifier, then name, then
//! email, then hand-off. Records are either collected into a [`UserPool`] or
//! passed one at a time to a caller-supplied callback for streaming.

use rand::{Rng, TryRngCore};

use crate::config::PoolConfig;
use crate::email::{UsedEmails, generate_email};
use crate::error::GenerationError;
use crate::identifier::{check_id_byte_length, generate_identifier};
use crate::name::generate_name;
use crate::reference::ReferenceData;
use crate::user::{User, UserPool};

/// Most records reserved up front for a buffered pool; larger pools grow.
const PREALLOCATED_RECORDS: usize = 65_536;

/// Builds pools of users from a configuration and shared reference data.
#[derive(Debug, Clone, Copy)]
pub struct UserPoolBuilder<'a> {
    config: PoolConfig,
    reference: &'a ReferenceData,
}

impl<'a> UserPoolBuilder<'a> {
    /// Creates a builder over `reference` using `config`.
    #[must_use]
    pub const fn new(config: PoolConfig, reference: &'a ReferenceData) -> Self {
        Self { config, reference }
    }

    /// Returns the configuration this builder runs with.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Checks reference data and configuration before any randomness is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyWordPool`] or
    /// [`GenerationError::EmptyDomainPool`] for empty reference lists, and
    /// [`GenerationError::InvalidConfiguration`] for an identifier length
    /// outside `1..=MAX_ID_BYTE_LENGTH` or a zero retry cap.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.reference.words().is_empty() {
            return Err(GenerationError::EmptyWordPool);
        }
        if self.reference.domains().is_empty() {
            return Err(GenerationError::EmptyDomainPool);
        }
        check_id_byte_length(self.config.id_byte_length())?;
        if self.config.max_email_attempts() == 0 {
            return Err(GenerationError::InvalidConfiguration {
                field: "max_email_attempts",
                message: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Builds the complete pool in memory.
    ///
    /// Exactly [`PoolConfig::pool_size`] users are generated. Names and
    /// domains are drawn from `rng`; identifiers from `ids`.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerationError`] raised by validation or by any
    /// generator. The pool is discarded on failure.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::OsRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use user_pool::{PoolConfig, ReferenceData, UserPoolBuilder};
    ///
    /// let reference = ReferenceData::builtin().expect("built-in lists");
    /// let builder = UserPoolBuilder::new(PoolConfig::new(3), &reference);
    /// let mut rng = ChaCha8Rng::seed_from_u64(2026);
    ///
    /// let pool = builder.build(&mut rng, &mut OsRng).expect("pool");
    ///
    /// assert_eq!(pool.len(), 3);
    /// ```
    pub fn build<R, S>(&self, rng: &mut R, ids: &mut S) -> Result<UserPool, GenerationError>
    where
        R: Rng + ?Sized,
        S: TryRngCore + ?Sized,
    {
        self.validate()?;
        let requested = self.config.pool_size();
        let limit = self.config.max_buffered_records();
        if requested > limit {
            return Err(GenerationError::PoolSizeExceedsBufferLimit { requested, limit });
        }

        let mut pool = UserPool::with_capacity(requested.min(PREALLOCATED_RECORDS));
        self.for_each_user(rng, ids, |user| {
            pool.push(user);
            Ok::<(), GenerationError>(())
        })?;
        Ok(pool)
    }

    /// Generates users one at a time, handing each to `on_user`.
    ///
    /// Only the used-email index is retained between records, so memory grows
    /// with the number of distinct emails rather than full records. Returns
    /// the number of users produced.
    ///
    /// # Errors
    ///
    /// Returns the first error from validation, a generator, or `on_user`.
    /// Records handed over before the failure are not recalled.
    pub fn for_each_user<R, S, F, E>(
        &self,
        rng: &mut R,
        ids: &mut S,
        mut on_user: F,
    ) -> Result<usize, E>
    where
        R: Rng + ?Sized,
        S: TryRngCore + ?Sized,
        F: FnMut(User) -> Result<(), E>,
        E: From<GenerationError>,
    {
        self.validate()?;

        let mut used = UsedEmails::new();
        for _ in 0..self.config.pool_size() {
            let user = self.next_user(rng, ids, &used)?;
            used.insert(user.email().to_owned());
            on_user(user)?;
        }

        Ok(self.config.pool_size())
    }

    fn next_user<R, S>(
        &self,
        rng: &mut R,
        ids: &mut S,
        used: &UsedEmails,
    ) -> Result<User, GenerationError>
    where
        R: Rng + ?Sized,
        S: TryRngCore + ?Sized,
    {
        let id = generate_identifier(ids, self.config.id_byte_length())?;
        let name = generate_name(rng, self.reference.words(), self.config.name_length())?;
        let email = generate_email(
            rng,
            &name,
            used,
            self.reference.domains(),
            self.config.max_email_attempts(),
        )?;

        Ok(User::new(id, name, email))
    }
}
