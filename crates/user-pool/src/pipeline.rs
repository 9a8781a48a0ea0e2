//! End-to-end generation runs.
//!
//! A run wires the builder to an output sink: buffered runs build the pool
//! and write it once, streaming runs hand each user straight to the file.

use std::time::Instant;

use camino::Utf8PathBuf;
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng, TryRngCore};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::builder::UserPoolBuilder;
use crate::error::{GenerationError, OutputError, ReferenceDataError};
use crate::output::{Destination, OutputMode, StreamWriter, write_buffered};
use crate::reference::ReferenceData;
use crate::settings::{GeneratorSettings, SettingsError};

/// Errors that abort a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Settings could not be resolved.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    /// Word or domain lists could not be loaded.
    #[error("reference data error: {0}")]
    ReferenceData(#[from] ReferenceDataError),
    /// Pool generation failed.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Output could not be written.
    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of users written.
    pub records: usize,
    /// Output mode used.
    pub mode: OutputMode,
    /// Destination file.
    pub path: Utf8PathBuf,
}

/// Generates a pool with `builder` and writes it to `destination`.
///
/// Names and domains are drawn from `rng`; identifiers from `ids`. Neither
/// mode replaces the destination until every record has been written, so a
/// failed run keeps whatever file was there before.
///
/// # Errors
///
/// Returns [`PipelineError::Generation`] or [`PipelineError::Output`] with the
/// first failure encountered.
pub fn write_pool<R, S>(
    builder: &UserPoolBuilder<'_>,
    mode: OutputMode,
    destination: &Destination,
    rng: &mut R,
    ids: &mut S,
) -> Result<RunSummary, PipelineError>
where
    R: Rng + ?Sized,
    S: TryRngCore + ?Sized,
{
    let records = match mode {
        OutputMode::Buffered => {
            let pool = builder.build(rng, ids)?;
            write_buffered(destination, &pool)?;
            pool.len()
        }
        OutputMode::Streaming => {
            builder.validate()?;
            stream_to_file(builder, destination, rng, ids)?
        }
    };

    Ok(RunSummary {
        records,
        mode,
        path: destination.path().to_path_buf(),
    })
}

fn stream_to_file<R, S>(
    builder: &UserPoolBuilder<'_>,
    destination: &Destination,
    rng: &mut R,
    ids: &mut S,
) -> Result<usize, PipelineError>
where
    R: Rng + ?Sized,
    S: TryRngCore + ?Sized,
{
    let mut stream = StreamWriter::create(destination)?;
    let streamed = builder.for_each_user(rng, ids, |user| {
        stream.write_user(&user).map_err(PipelineError::from)
    });
    if let Err(err) = streamed {
        if let Err(cleanup) = stream.discard(destination) {
            warn!(path = %destination.path(), error = %cleanup, "staged output not removed");
        }
        return Err(err);
    }
    Ok(stream.close(destination)?)
}

/// Runs one generation from resolved settings.
///
/// Identifiers always come from the operating system's secure source. The
/// name and domain stream is seeded from `seed` when set, otherwise from the
/// same OS source.
///
/// # Errors
///
/// Returns the first [`PipelineError`] raised while resolving settings,
/// loading reference data, generating, or writing.
pub fn run(settings: &GeneratorSettings) -> Result<RunSummary, PipelineError> {
    let config = settings.pool_config()?;
    let mode = settings.output_mode()?;
    let output_path = settings.output_path()?;
    let words_path = settings.words_path()?;
    let domains_path = settings.domains_path()?;

    let reference = ReferenceData::load(words_path.as_deref(), domains_path.as_deref())?;
    let builder = UserPoolBuilder::new(config, &reference);
    builder.validate()?;

    let destination = Destination::open(&output_path)?;
    let mut rng = name_rng(settings.seed)?;

    info!(
        pool_size = config.pool_size(),
        id_byte_length = config.id_byte_length(),
        mode = %mode,
        path = %output_path,
        "generating user pool"
    );
    let started = Instant::now();
    let summary = write_pool(&builder, mode, &destination, &mut rng, &mut OsRng)?;
    info!(
        records = summary.records,
        mode = %summary.mode,
        path = %summary.path,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "user pool written"
    );

    Ok(summary)
}

fn name_rng(seed_opt: Option<u64>) -> Result<ChaCha8Rng, GenerationError> {
    match seed_opt {
        Some(seed) => Ok(ChaCha8Rng::seed_from_u64(seed)),
        None => ChaCha8Rng::try_from_rng(&mut OsRng).map_err(|err| {
            GenerationError::EntropySourceUnavailable {
                message: err.to_string(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use camino::Utf8Path;
    use cap_std::{ambient_authority, fs::Dir};
    use rstest::rstest;

    use super::*;
    use crate::config::PoolConfig;
    use crate::identifier::test_sources::DrainedEntropy;
    use crate::user::User;

    fn scratch_dir(name: &str) -> Utf8PathBuf {
        let dir = Utf8PathBuf::from(format!(
            "target/user-pool-tests/pipeline-{name}-{}",
            std::process::id()
        ));
        Dir::open_ambient_dir(".", ambient_authority())
            .and_then(|root| root.create_dir_all(&dir))
            .expect("create scratch dir");
        dir
    }

    fn entries(dir: &Utf8Path) -> usize {
        Dir::open_ambient_dir(dir, ambient_authority())
            .and_then(|handle| handle.entries())
            .expect("list scratch dir")
            .count()
    }

    fn settings_for(output: &Utf8Path) -> GeneratorSettings {
        GeneratorSettings {
            pool_size: Some(5),
            id_byte_length: None,
            mode: None,
            output: Some(PathBuf::from(output.as_str())),
            words_path: None,
            domains_path: None,
            min_name_words: None,
            max_name_words: None,
            max_email_attempts: None,
            max_buffered_records: None,
            seed: None,
        }
    }

    fn read_users(path: &Utf8Path) -> Vec<User> {
        let dir = path.parent().expect("parent");
        let contents = Dir::open_ambient_dir(dir, ambient_authority())
            .and_then(|handle| handle.read_to_string(path.file_name().expect("file name")))
            .expect("read output");
        serde_json::from_str(&contents).expect("users")
    }

    #[rstest]
    #[case(OutputMode::Buffered)]
    #[case(OutputMode::Streaming)]
    fn failed_runs_leave_no_output(#[case] mode: OutputMode) {
        let dir = scratch_dir(&format!("failed-{mode}"));
        let path = dir.join("users.json");
        let reference = ReferenceData::builtin().expect("built-in lists");
        let builder = UserPoolBuilder::new(PoolConfig::new(3), &reference);
        let destination = Destination::open(&path).expect("destination");
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = write_pool(&builder, mode, &destination, &mut rng, &mut DrainedEntropy);

        assert!(matches!(
            result,
            Err(PipelineError::Generation(
                GenerationError::EntropySourceUnavailable { .. }
            ))
        ));
        assert!(!path.exists(), "{path} should not exist");
        assert_eq!(entries(&dir), 0, "staged files left in {dir}");
    }

    #[test]
    fn run_rejects_empty_word_list_before_creating_output() {
        let dir = scratch_dir("empty-words");
        let words = dir.join("words.json");
        Dir::open_ambient_dir(&dir, ambient_authority())
            .and_then(|handle| handle.write("words.json", "[]"))
            .expect("write word list");
        let output = dir.join("users.json");
        let settings = GeneratorSettings {
            mode: Some("streaming".to_owned()),
            words_path: Some(PathBuf::from(words.as_str())),
            ..settings_for(&output)
        };

        let result = run(&settings);

        assert_eq!(
            result,
            Err(PipelineError::Generation(GenerationError::EmptyWordPool))
        );
        assert!(!output.exists(), "{output} should not exist");
    }

    #[test]
    fn seeded_runs_repeat_names_and_emails() {
        let dir = scratch_dir("seeded");
        let paths = [dir.join("first.json"), dir.join("second.json")];
        for path in &paths {
            let settings = GeneratorSettings {
                seed: Some(2026),
                ..settings_for(path)
            };
            let summary = run(&settings).expect("run");
            assert_eq!(summary.records, 5);
            assert_eq!(&summary.path, path);
        }

        let [first, second] = paths.map(|path| read_users(&path));
        let contact = |user: &User| (user.name().to_owned(), user.email().to_owned());
        assert_eq!(
            first.iter().map(contact).collect::<Vec<_>>(),
            second.iter().map(contact).collect::<Vec<_>>()
        );
        assert_ne!(first, second, "identifiers should stay OS-random");
    }

    #[test]
    fn seeded_name_rng_is_reproducible() {
        let first = name_rng(Some(2026)).expect("rng");
        let second = name_rng(Some(2026)).expect("rng");

        assert_eq!(first, second);
    }
}
