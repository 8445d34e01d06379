//! Size limits for searchable fields
//!
//! Catalogue entries are supplied from outside, so a single entry can carry
//! text that is unreasonable to index (a pasted document in a chip label, a
//! stray NUL from a broken export). The index builder validates every
//! searchable field against these limits and skips the fields that fail,
//! keeping the rest of the record.

use thiserror::Error;

/// Default maximum length of a single searchable field, in bytes (16KB)
pub const MAX_FIELD_BYTES: usize = 16 * 1024;

/// Reasons a searchable field is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldLimitError {
    /// Field exceeds the configured byte limit
    #[error("Field too long: {actual} bytes exceeds maximum {max}")]
    TooLong {
        /// Actual field length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Field contains a NUL character
    #[error("Field contains NUL character at byte {position}")]
    ContainsNul {
        /// Byte offset of the first NUL
        position: usize,
    },
}

/// Validate a searchable field
///
/// Returns `Ok(())` when the field may be indexed.
pub fn validate_field(text: &str, max_bytes: usize) -> Result<(), FieldLimitError> {
    let len = text.len();
    if len > max_bytes {
        return Err(FieldLimitError::TooLong {
            actual: len,
            max: max_bytes,
        });
    }
    if let Some(position) = text.find('\0') {
        return Err(FieldLimitError::ContainsNul { position });
    }
    Ok(())
}
