//! Error types for the topkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a call carries an invalid bound
//!   (e.g. `maxsize == 0`) or the builder is misconfigured.
//! - [`DecodeError`]: Returned when a byte payload is not a valid encoding of
//!   a top-K table. Decoding never leaves a table partially populated.
//! - [`InvariantError`]: Returned by `check_invariants` when internal ordering
//!   or index bookkeeping is inconsistent.
//!
//! ## Example Usage
//!
//! ```
//! use topkit::error::ConfigError;
//! use topkit::store::array::ArrayTopK;
//! use topkit::traits::{ReadOnlyTopK, TopK};
//!
//! let mut table = ArrayTopK::with_seed(7);
//!
//! // A zero bound is rejected before the table is touched
//! let err: ConfigError = table.increment("a", 0).unwrap_err();
//! assert!(err.to_string().contains("maxsize"));
//! assert_eq!(table.len(), 0);
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal table invariants are violated.
///
/// Produced by `check_invariants` on
/// [`ArrayTopK`](crate::store::array::ArrayTopK) and
/// [`ListTopK`](crate::store::list::ListTopK).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when a size bound or builder parameter is invalid.
///
/// # Example
///
/// ```
/// use topkit::builder::{Representation, TopKBuilder};
///
/// let err = TopKBuilder::new()
///     .initial_capacity(usize::MAX)
///     .try_build(Representation::List)
///     .unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn zero_maxsize() -> Self {
        Self::new("maxsize must be a positive integer")
    }
}

/// Rejects a zero bound before any mutation happens.
#[inline]
pub(crate) fn check_maxsize(maxsize: usize) -> Result<(), ConfigError> {
    if maxsize == 0 {
        return Err(ConfigError::zero_maxsize());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Error returned when decoding a serialized table fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input ended while `needed` more bytes were expected.
    #[error("unexpected end of input at offset {offset}: needed {needed} more byte(s)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// A varint ran past 10 bytes or overflowed 64 bits.
    #[error("varint at offset {offset} overflows 64 bits")]
    VarintOverflow { offset: usize },

    /// A decoded length does not fit in `usize` on this platform.
    #[error("length {value} at offset {offset} does not fit in memory")]
    LengthOverflow { offset: usize, value: u64 },

    /// A key was not valid UTF-8.
    #[error("key at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// The same key appeared twice in the payload.
    #[error("duplicate key {key:?} in payload")]
    DuplicateKey { key: String },

    /// Bytes were left over after the last declared entry.
    #[error("{remaining} trailing byte(s) after last entry")]
    TrailingBytes { remaining: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("slot 3 out of order");
        assert_eq!(err.to_string(), "slot 3 out of order");
        assert_eq!(err.message(), "slot 3 out of order");
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }

    // -- ConfigError ------------------------------------------------------

    #[test]
    fn config_zero_maxsize_message() {
        let err = check_maxsize(0).unwrap_err();
        assert_eq!(err, ConfigError::zero_maxsize());
        assert!(err.message().contains("positive"));
        assert!(check_maxsize(1).is_ok());
    }

    #[test]
    fn config_clone_and_eq() {
        let a = ConfigError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    // -- DecodeError ------------------------------------------------------

    #[test]
    fn decode_display_includes_offsets() {
        let err = DecodeError::UnexpectedEof {
            offset: 4,
            needed: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 4"));
        assert!(msg.contains("2 more"));

        let err = DecodeError::DuplicateKey { key: "a".into() };
        assert!(err.to_string().contains("\"a\""));
    }

    #[test]
    fn decode_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<DecodeError>();
    }
}
