//! Word and domain reference lists.
//!
//! Both lists are JSON arrays of strings. Built-in lists are compiled into
//! the crate; either may be replaced by a file at load time. Entries are
//! trimmed and blank entries dropped. Each remaining entry must be a single
//! token: a name word or a domain with no inner whitespace. An empty list is
//! accepted here and rejected by the builder's validation so the error names
//! the right pool.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::error::ReferenceDataError;

const BUILTIN_WORDS: &str = include_str!("../data/names.json");
const BUILTIN_DOMAINS: &str = include_str!("../data/domains.json");

/// Read-only word and domain pools shared by the generators.
///
/// # Example
///
/// ```
/// use user_pool::ReferenceData;
///
/// let reference = ReferenceData::from_json(r#"["Ann", " Lee ", ""]"#, r#"["example.com"]"#)
///     .expect("valid lists");
///
/// assert_eq!(reference.words(), ["Ann", "Lee"]);
/// assert_eq!(reference.domains(), ["example.com"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    words: Vec<String>,
    domains: Vec<String>,
}

impl ReferenceData {
    /// Creates reference data from in-memory lists.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::ParseFailure`] if an entry contains
    /// inner whitespace.
    pub fn new(words: Vec<String>, domains: Vec<String>) -> Result<Self, ReferenceDataError> {
        Ok(Self {
            words: normalise(words, "words")?,
            domains: normalise(domains, "domains")?,
        })
    }

    /// Returns the lists compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::ParseFailure`] if a built-in list is not
    /// a JSON array of strings.
    pub fn builtin() -> Result<Self, ReferenceDataError> {
        Ok(Self {
            words: parse_list(BUILTIN_WORDS, "built-in names")?,
            domains: parse_list(BUILTIN_DOMAINS, "built-in domains")?,
        })
    }

    /// Parses both lists from JSON strings.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::ParseFailure`] if either input is not a
    /// JSON array of single-token strings.
    pub fn from_json(words_json: &str, domains_json: &str) -> Result<Self, ReferenceDataError> {
        Ok(Self {
            words: parse_list(words_json, "words")?,
            domains: parse_list(domains_json, "domains")?,
        })
    }

    /// Loads the lists, reading each from a file when a path is supplied and
    /// falling back to the built-in list otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError`] if a file cannot be read or parsed.
    pub fn load(
        words_path: Option<&Utf8Path>,
        domains_path: Option<&Utf8Path>,
    ) -> Result<Self, ReferenceDataError> {
        let words = match words_path {
            Some(path) => read_list(path)?,
            None => parse_list(BUILTIN_WORDS, "built-in names")?,
        };
        let domains = match domains_path {
            Some(path) => read_list(path)?,
            None => parse_list(BUILTIN_DOMAINS, "built-in domains")?,
        };
        let reference = Self { words, domains };
        debug!(
            words = reference.words.len(),
            domains = reference.domains.len(),
            "reference data loaded"
        );
        Ok(reference)
    }

    /// Returns the word pool used for names.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the domain pool used for emails.
    #[must_use]
    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}

fn normalise(entries: Vec<String>, source_name: &str) -> Result<Vec<String>, ReferenceDataError> {
    let mut kept = Vec::with_capacity(entries.len());
    for entry in &entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(ReferenceDataError::ParseFailure {
                source_name: source_name.to_owned(),
                message: format!("entry '{trimmed}' contains whitespace"),
            });
        }
        kept.push(trimmed.to_owned());
    }
    Ok(kept)
}

fn parse_list(json: &str, source_name: &str) -> Result<Vec<String>, ReferenceDataError> {
    let entries = serde_json::from_str(json).map_err(|err| ReferenceDataError::ParseFailure {
        source_name: source_name.to_owned(),
        message: err.to_string(),
    })?;
    normalise(entries, source_name)
}

fn read_list(path: &Utf8Path) -> Result<Vec<String>, ReferenceDataError> {
    let read_failure = |message: String| ReferenceDataError::ReadFailure {
        path: path.to_path_buf(),
        message,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| read_failure("reference path must be a file".to_owned()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| read_failure(err.to_string()))?;
    let contents = dir
        .read_to_string(file_name)
        .map_err(|err| read_failure(err.to_string()))?;

    parse_list(&contents, path.as_str())
}
