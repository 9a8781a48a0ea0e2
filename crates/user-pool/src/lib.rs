//! Synthetic user pool generation.
//!
//! This crate generates pools of fake user records, each with a random
//! hexadecimal identifier, a name composed from a word pool, and an email
//! address derived from that name that is unique within the pool. Pools are
//! written either as one JSON array (buffered) or as a stream of concatenated
//! JSON objects (streaming).
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Identifier generation from a secure, fallible randomness source
//! - Name synthesis from built-in or file-supplied word lists
//! - Email synthesis with a bounded, indexed collision retry
//! - Buffered and streaming output, plus reassembly of streamed files
//! - Layered settings through OrthoConfig
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::OsRng;
//! use rand_chacha::ChaCha8Rng;
//! use user_pool::{PoolConfig, ReferenceData, UserPoolBuilder};
//!
//! let reference = ReferenceData::from_json(
//!     r#"["Ann", "Lee", "Bo", "Kim"]"#,
//!     r#"["example.com", "example.org"]"#,
//! )
//! .expect("valid lists");
//! let builder = UserPoolBuilder::new(PoolConfig::new(3).with_id_byte_length(8), &reference);
//! let mut rng = ChaCha8Rng::seed_from_u64(2026);
//!
//! let pool = builder.build(&mut rng, &mut OsRng).expect("generation succeeds");
//!
//! assert_eq!(pool.len(), 3);
//! assert!(pool.users().iter().all(|user| user.id().len() == 16));
//! ```

mod atomic_io;
mod builder;
mod config;
mod email;
mod error;
mod identifier;
mod name;
mod output;
pub mod pipeline;
mod reference;
pub mod settings;
mod user;

pub use builder::UserPoolBuilder;
pub use config::{
    DEFAULT_ID_BYTE_LENGTH, DEFAULT_MAX_BUFFERED_RECORDS, DEFAULT_POOL_SIZE, MAX_ID_BYTE_LENGTH,
    PoolConfig,
};
pub use email::{DEFAULT_MAX_EMAIL_ATTEMPTS, UsedEmails, generate_email};
pub use error::{GenerationError, OutputError, ReferenceDataError};
pub use identifier::generate_identifier;
pub use name::{DEFAULT_MAX_NAME_WORDS, DEFAULT_MIN_NAME_WORDS, NameLength, generate_name};
pub use output::{
    Destination, OutputMode, ParseOutputModeError, StagedFile, StreamWriter, reassemble_stream,
    write_buffered,
};
pub use reference::ReferenceData;
pub use user::{User, UserPool};
