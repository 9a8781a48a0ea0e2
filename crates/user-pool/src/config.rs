//! Explicit configuration for a pool build.

use crate::email::DEFAULT_MAX_EMAIL_ATTEMPTS;
use crate::name::NameLength;

/// Default number of users generated per run.
pub const DEFAULT_POOL_SIZE: usize = 10_000;

/// Default identifier length in bytes (40 hex characters).
pub const DEFAULT_ID_BYTE_LENGTH: usize = 20;

/// Largest accepted identifier length in bytes (2048 hex characters).
pub const MAX_ID_BYTE_LENGTH: usize = 1024;

/// Default upper bound on records held in memory by buffered output.
pub const DEFAULT_MAX_BUFFERED_RECORDS: usize = 10_000_000;

/// Settings for one pool build.
///
/// The builder receives this value at call time; nothing is read from
/// process-wide state.
///
/// # Example
///
/// ```
/// use user_pool::PoolConfig;
///
/// let config = PoolConfig::new(3).with_id_byte_length(8);
///
/// assert_eq!(config.pool_size(), 3);
/// assert_eq!(config.id_byte_length(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pool_size: usize,
    id_byte_length: usize,
    name_length: NameLength,
    max_email_attempts: usize,
    max_buffered_records: usize,
}

impl PoolConfig {
    /// Creates a configuration for `pool_size` users with default settings.
    #[must_use]
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            ..Self::default()
        }
    }

    /// Sets the identifier length in bytes.
    #[must_use]
    pub const fn with_id_byte_length(mut self, id_byte_length: usize) -> Self {
        self.id_byte_length = id_byte_length;
        self
    }

    /// Sets the bounds on words per name.
    #[must_use]
    pub const fn with_name_length(mut self, name_length: NameLength) -> Self {
        self.name_length = name_length;
        self
    }

    /// Sets the cap on email candidates tried per user.
    #[must_use]
    pub const fn with_max_email_attempts(mut self, max_email_attempts: usize) -> Self {
        self.max_email_attempts = max_email_attempts;
        self
    }

    /// Sets the largest pool buffered output will hold in memory.
    #[must_use]
    pub const fn with_max_buffered_records(mut self, max_buffered_records: usize) -> Self {
        self.max_buffered_records = max_buffered_records;
        self
    }

    /// Returns the number of users to generate.
    #[must_use]
    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Returns the identifier length in bytes.
    #[must_use]
    pub const fn id_byte_length(&self) -> usize {
        self.id_byte_length
    }

    /// Returns the bounds on words per name.
    #[must_use]
    pub const fn name_length(&self) -> NameLength {
        self.name_length
    }

    /// Returns the cap on email candidates tried per user.
    #[must_use]
    pub const fn max_email_attempts(&self) -> usize {
        self.max_email_attempts
    }

    /// Returns the largest pool buffered output will hold in memory.
    #[must_use]
    pub const fn max_buffered_records(&self) -> usize {
        self.max_buffered_records
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            id_byte_length: DEFAULT_ID_BYTE_LENGTH,
            name_length: NameLength::default(),
            max_email_attempts: DEFAULT_MAX_EMAIL_ATTEMPTS,
            max_buffered_records: DEFAULT_MAX_BUFFERED_RECORDS,
        }
    }
}
