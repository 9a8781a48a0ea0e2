//! Generator settings loaded via OrthoConfig.
//!
//! Values layer in the usual OrthoConfig order: defaults, configuration
//! file, `USER_POOL_*` environment variables, then command-line flags.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::config::PoolConfig;
use crate::error::GenerationError;
use crate::name::{DEFAULT_MAX_NAME_WORDS, DEFAULT_MIN_NAME_WORDS, NameLength};
use crate::output::{OutputMode, ParseOutputModeError};

const DEFAULT_OUTPUT_PATH: &str = "users.json";

/// Configuration values controlling a generation run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_POOL")]
pub struct GeneratorSettings {
    /// Number of users to generate.
    pub pool_size: Option<usize>,
    /// Identifier length in bytes.
    pub id_byte_length: Option<usize>,
    /// Output mode: `buffered` or `streaming`.
    pub mode: Option<String>,
    /// Destination file path.
    pub output: Option<PathBuf>,
    /// JSON word list replacing the built-in names.
    pub words_path: Option<PathBuf>,
    /// JSON domain list replacing the built-in domains.
    pub domains_path: Option<PathBuf>,
    /// Minimum words per generated name.
    pub min_name_words: Option<usize>,
    /// Maximum words per generated name.
    pub max_name_words: Option<usize>,
    /// Cap on email candidates tried per user.
    pub max_email_attempts: Option<usize>,
    /// Largest pool buffered mode will hold in memory.
    pub max_buffered_records: Option<usize>,
    /// Seed for the name and domain stream; identifiers stay OS-random.
    pub seed: Option<u64>,
}

/// Errors raised while loading or interpreting settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// Configuration sources could not be read or merged.
    #[error("failed to load settings: {message}")]
    Load {
        /// Loader error message.
        message: String,
    },
    /// The output mode is not recognised.
    #[error(transparent)]
    InvalidMode(#[from] ParseOutputModeError),
    /// A configured path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },
    /// A generation setting is out of range.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Loads settings from `args` plus the environment and configuration files.
///
/// The first item of `args` is the program name.
///
/// # Errors
///
/// Returns [`SettingsError::Load`] if any source fails to parse.
pub fn load_settings<I>(args: I) -> Result<GeneratorSettings, SettingsError>
where
    I: IntoIterator<Item = OsString>,
{
    GeneratorSettings::load_from_iter(args).map_err(|err| SettingsError::Load {
        message: err.to_string(),
    })
}

impl GeneratorSettings {
    /// Resolves the explicit pool configuration, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Generation`] if the name length bounds are
    /// invalid.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let defaults = PoolConfig::default();
        let name_length = NameLength::new(
            self.min_name_words.unwrap_or(DEFAULT_MIN_NAME_WORDS),
            self.max_name_words.unwrap_or(DEFAULT_MAX_NAME_WORDS),
        )?;

        Ok(PoolConfig::new(self.pool_size.unwrap_or(defaults.pool_size()))
            .with_id_byte_length(self.id_byte_length.unwrap_or(defaults.id_byte_length()))
            .with_name_length(name_length)
            .with_max_email_attempts(
                self.max_email_attempts
                    .unwrap_or(defaults.max_email_attempts()),
            )
            .with_max_buffered_records(
                self.max_buffered_records
                    .unwrap_or(defaults.max_buffered_records()),
            ))
    }

    /// Returns the configured output mode, defaulting to buffered.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidMode`] for unrecognised values.
    pub fn output_mode(&self) -> Result<OutputMode, SettingsError> {
        self.mode
            .as_deref()
            .map_or(Ok(OutputMode::default()), str::parse)
            .map_err(SettingsError::from)
    }

    /// Returns the destination path, defaulting to `users.json`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NonUtf8Path`] for non-UTF-8 paths.
    pub fn output_path(&self) -> Result<Utf8PathBuf, SettingsError> {
        self.output
            .clone()
            .map_or_else(|| Ok(Utf8PathBuf::from(DEFAULT_OUTPUT_PATH)), to_utf8)
    }

    /// Returns the word list override, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NonUtf8Path`] for non-UTF-8 paths.
    pub fn words_path(&self) -> Result<Option<Utf8PathBuf>, SettingsError> {
        self.words_path.clone().map(to_utf8).transpose()
    }

    /// Returns the domain list override, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NonUtf8Path`] for non-UTF-8 paths.
    pub fn domains_path(&self) -> Result<Option<Utf8PathBuf>, SettingsError> {
        self.domains_path.clone().map(to_utf8).transpose()
    }
}

fn to_utf8(path: PathBuf) -> Result<Utf8PathBuf, SettingsError> {
    Utf8PathBuf::try_from(path).map_err(|err| SettingsError::NonUtf8Path {
        path: err.into_path_buf(),
    })
}
