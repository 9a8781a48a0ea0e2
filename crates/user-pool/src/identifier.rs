//! Random identifier generation.
//!
//! Identifiers are drawn from a fallible randomness source and rendered as
//! lowercase hexadecimal. They are not checked against earlier output. With
//! the default 20-byte length a collision inside any pool this crate can hold
//! is negligible; callers that need strict uniqueness must deduplicate
//! themselves.

use rand::TryRngCore;

use crate::config::MAX_ID_BYTE_LENGTH;
use crate::error::GenerationError;

/// Generates a random identifier of `byte_length` bytes as lowercase hex.
///
/// The returned string is `2 * byte_length` characters long. Failures of the
/// source are reported rather than papered over with a weaker generator.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] when `byte_length` is
/// zero or above [`MAX_ID_BYTE_LENGTH`], and [`GenerationError::EntropySourceUnavailable`] when the source
/// cannot supply bytes.
///
/// # Example
///
/// ```
/// use rand::rngs::OsRng;
/// use user_pool::generate_identifier;
///
/// let id = generate_identifier(&mut OsRng, 20).expect("os entropy available");
///
/// assert_eq!(id.len(), 40);
/// assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
/// ```
pub fn generate_identifier<S>(source: &mut S, byte_length: usize) -> Result<String, GenerationError>
where
    S: TryRngCore + ?Sized,
{
    check_id_byte_length(byte_length)?;

    let mut bytes = vec![0_u8; byte_length];
    source
        .try_fill_bytes(&mut bytes)
        .map_err(|err| GenerationError::EntropySourceUnavailable {
            message: err.to_string(),
        })?;

    Ok(hex::encode(bytes))
}

pub(crate) fn check_id_byte_length(byte_length: usize) -> Result<(), GenerationError> {
    let message = if byte_length == 0 {
        "must be at least 1".to_owned()
    } else if byte_length > MAX_ID_BYTE_LENGTH {
        format!("must be at most {MAX_ID_BYTE_LENGTH}, got {byte_length}")
    } else {
        return Ok(());
    };
    Err(GenerationError::InvalidConfiguration {
        field: "id_byte_length",
        message,
    })
}
