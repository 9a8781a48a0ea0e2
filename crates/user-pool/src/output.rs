//! Output sinks for generated pools.
//!
//! Two modes are supported:
//!
//! - **Buffered**: the finished pool is serialized as one JSON array and
//!   written atomically.
//! - **Streaming**: each user is serialized and written as soon as it is
//!   generated. The file is a bare concatenation of JSON objects with no
//!   enclosing array and no separators, so it is not itself a JSON document.
//!   Use [`reassemble_stream`] to recover the records.
//!
//! In both modes the destination is only replaced once the run completes; a
//! failed run leaves any earlier file at that path untouched.

use std::fmt;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, File};

use crate::atomic_io::{StagedTarget, write_atomic};
use crate::error::OutputError;
use crate::user::{User, UserPool};

/// How generated users reach the destination file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Build the whole pool, then write one JSON array.
    #[default]
    Buffered,
    /// Write each user as a JSON object as it is generated.
    Streaming,
}

impl OutputMode {
    /// Returns the lowercase name used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buffered => "buffered",
            Self::Streaming => "streaming",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown output mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output mode '{value}': expected 'buffered' or 'streaming'")]
pub struct ParseOutputModeError {
    value: String,
}

impl FromStr for OutputMode {
    type Err = ParseOutputModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buffered" => Ok(Self::Buffered),
            "streaming" => Ok(Self::Streaming),
            _ => Err(ParseOutputModeError {
                value: value.to_owned(),
            }),
        }
    }
}

/// An output file together with a capability handle on its directory.
#[derive(Debug)]
pub struct Destination {
    dir: Dir,
    path: Utf8PathBuf,
    file_name: Utf8PathBuf,
}

impl Destination {
    /// Opens the directory that will contain `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::WriteFailure`] if `path` has no file name or
    /// its parent directory cannot be opened.
    pub fn open(path: &Utf8Path) -> Result<Self, OutputError> {
        let write_failure = |message: String| OutputError::WriteFailure {
            path: path.to_path_buf(),
            message,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| write_failure("output path must be a file".to_owned()))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| write_failure(err.to_string()))?;

        Ok(Self {
            dir,
            path: path.to_path_buf(),
            file_name: Utf8PathBuf::from(file_name),
        })
    }

    /// Returns the full destination path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn write_failure(&self, err: &io::Error) -> OutputError {
        OutputError::WriteFailure {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

/// Serializes `pool` as a JSON array and writes it atomically.
///
/// # Errors
///
/// Returns [`OutputError::Serialization`] if the pool cannot be encoded and
/// [`OutputError::WriteFailure`] if the file cannot be written.
pub fn write_buffered(destination: &Destination, pool: &UserPool) -> Result<(), OutputError> {
    let payload = serde_json::to_vec(pool).map_err(|err| OutputError::Serialization {
        message: err.to_string(),
    })?;
    write_atomic(&destination.dir, &destination.file_name, &payload)
}

/// Writes users one at a time as concatenated JSON objects.
///
/// # Example
///
/// ```
/// use user_pool::{StreamWriter, User};
///
/// let mut stream = StreamWriter::new(Vec::new(), "memory");
/// stream.write_user(&User::new("01", "Ana", "anaana@example.com")).expect("write");
/// stream.write_user(&User::new("02", "Bo", "bobo@example.com")).expect("write");
/// let bytes = stream.finish().expect("flush");
///
/// assert_eq!(
///     String::from_utf8(bytes).expect("utf-8"),
///     concat!(
///         r#"{"id":"01","name":"Ana","email":"anaana@example.com"}"#,
///         r#"{"id":"02","name":"Bo","email":"bobo@example.com"}"#,
///     )
/// );
/// ```
#[derive(Debug)]
pub struct StreamWriter<W: Write> {
    writer: W,
    path: Utf8PathBuf,
    written: usize,
}

impl<W: Write> StreamWriter<W> {
    /// Wraps `writer`; `path` labels write errors.
    #[must_use]
    pub fn new(writer: W, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            writer,
            path: path.into(),
            written: 0,
        }
    }

    /// Serializes `user` and appends it to the stream.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::WriteFailure`] on I/O errors and
    /// [`OutputError::Serialization`] if the user cannot be encoded.
    pub fn write_user(&mut self, user: &User) -> Result<(), OutputError> {
        serde_json::to_writer(&mut self.writer, user).map_err(|err| {
            if err.is_io() {
                OutputError::WriteFailure {
                    path: self.path.clone(),
                    message: err.to_string(),
                }
            } else {
                OutputError::Serialization {
                    message: err.to_string(),
                }
            }
        })?;
        self.written += 1;
        Ok(())
    }

    /// Returns the number of users written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes the stream and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::WriteFailure`] if flushing fails.
    pub fn finish(mut self) -> Result<W, OutputError> {
        self.writer
            .flush()
            .map_err(|err| OutputError::WriteFailure {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        Ok(self.writer)
    }
}

/// A buffered writer over a hidden file staged beside the destination.
#[derive(Debug)]
pub struct StagedFile {
    writer: BufWriter<File>,
    staged: StagedTarget,
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl StreamWriter<StagedFile> {
    /// Starts a stream into a hidden file beside the destination.
    ///
    /// The destination itself is not touched until [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::WriteFailure`] if the staging file cannot be
    /// created.
    pub fn create(destination: &Destination) -> Result<Self, OutputError> {
        let (staged, file) = StagedTarget::create(&destination.dir, &destination.file_name)?;
        let writer = StagedFile {
            writer: BufWriter::new(file),
            staged,
        };
        Ok(Self::new(writer, destination.path.clone()))
    }

    /// Flushes and syncs the staged file, then renames it over the
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::WriteFailure`] if flushing, syncing, or the
    /// rename fails. The staged file is removed and the destination keeps its
    /// previous contents.
    pub fn close(self, destination: &Destination) -> Result<usize, OutputError> {
        let written = self.written;
        let StagedFile { writer, staged } = self.writer;
        let synced = writer
            .into_inner()
            .map_err(io::IntoInnerError::into_error)
            .and_then(|file| file.sync_all());
        if let Err(err) = synced {
            drop(staged.discard(&destination.dir));
            return Err(destination.write_failure(&err));
        }
        staged.commit(&destination.dir)?;
        Ok(written)
    }

    /// Abandons the stream, removing the staged file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the staged file cannot be removed.
    pub fn discard(self, destination: &Destination) -> io::Result<()> {
        let StagedFile { writer, staged } = self.writer;
        drop(writer);
        staged.discard(&destination.dir)
    }
}

/// Parses concatenated streaming output back into users, in file order.
///
/// # Errors
///
/// Returns [`OutputError::MalformedStream`] if the input is not a sequence
/// of user objects.
///
/// # Example
///
/// ```
/// use user_pool::reassemble_stream;
///
/// let stream = r#"{"id":"01","name":"Ana","email":"anaana@example.com"}{"id":"02","name":"Bo","email":"bobo@example.com"}"#;
/// let users = reassemble_stream(stream).expect("valid stream");
///
/// assert_eq!(users.len(), 2);
/// assert_eq!(users[1].email(), "bobo@example.com");
/// ```
pub fn reassemble_stream(contents: &str) -> Result<Vec<User>, OutputError> {
    serde_json::Deserializer::from_str(contents)
        .into_iter::<User>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| OutputError::MalformedStream {
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[rstest]
    #[case("buffered", OutputMode::Buffered)]
    #[case("streaming", OutputMode::Streaming)]
    #[case(" Streaming ", OutputMode::Streaming)]
    fn parses_output_modes(#[case] raw: &str, #[case] expected: OutputMode) {
        assert_eq!(raw.parse::<OutputMode>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_output_mode() {
        let err = "ndjson".parse::<OutputMode>().expect_err("unknown mode");

        assert_eq!(
            err.to_string(),
            "unknown output mode 'ndjson': expected 'buffered' or 'streaming'"
        );
    }

    #[test]
    fn display_matches_configuration_name() {
        assert_eq!(OutputMode::Streaming.to_string(), "streaming");
        assert_eq!(OutputMode::default(), OutputMode::Buffered);
    }

    #[test]
    fn stream_has_no_separators_or_brackets() {
        let first = User::new("01", "Ann Lee", "annlee@example.com");
        let second = User::new("02", "Bo Kim", "bokim@example.org");
        let mut stream = StreamWriter::new(Vec::new(), "memory");

        stream.write_user(&first).expect("write");
        stream.write_user(&second).expect("write");
        assert_eq!(stream.written(), 2);
        let bytes = stream.finish().expect("flush");

        let expected = format!(
            "{}{}",
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
        assert_eq!(String::from_utf8(bytes).expect("utf-8"), expected);
    }

    #[test]
    fn stream_output_is_not_a_json_document() {
        let mut stream = StreamWriter::new(Vec::new(), "memory");
        stream
            .write_user(&User::new("01", "Ana", "anaana@example.com"))
            .expect("write");
        stream
            .write_user(&User::new("02", "Bo", "bobo@example.com"))
            .expect("write");
        let bytes = stream.finish().expect("flush");

        assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
    }

    #[test]
    fn stream_write_errors_name_the_path() {
        let mut stream = StreamWriter::new(BrokenPipe, "out/users.json");

        let err = stream
            .write_user(&User::new("01", "Ana", "anaana@example.com"))
            .expect_err("write should fail");

        assert!(matches!(
            err,
            OutputError::WriteFailure { ref path, .. } if path.as_str() == "out/users.json"
        ));
    }

    #[test]
    fn reassembles_streamed_users_in_order() {
        let users = vec![
            User::new("01", "Ann Lee", "annlee@example.com"),
            User::new("02", "Bo Kim", "bokim@example.org"),
        ];
        let mut stream = StreamWriter::new(Vec::new(), "memory");
        for user in &users {
            stream.write_user(user).expect("write");
        }
        let bytes = stream.finish().expect("flush");
        let contents = String::from_utf8(bytes).expect("utf-8");

        assert_eq!(reassemble_stream(&contents).expect("reassemble"), users);
    }

    #[rstest]
    #[case::truncated(r#"{"id":"01","name":"Ana""#)]
    #[case::wrong_shape(r#"{"id":1}"#)]
    fn rejects_malformed_streams(#[case] contents: &str) {
        assert!(matches!(
            reassemble_stream(contents),
            Err(OutputError::MalformedStream { .. })
        ));
    }

    #[test]
    fn empty_stream_reassembles_to_no_users() {
        assert_eq!(reassemble_stream("").expect("empty"), Vec::<User>::new());
    }
}
