//! Crate-wide error type.
//!
//! Every failure falls into one of three kinds — value, type, runtime — so
//! callers can `match error.kind()` instead of string-matching.

use std::fmt;

/// The three failure classes a caller can distinguish without parsing the
/// message string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied a malformed or out-of-range input.
    Value,
    /// Caller supplied the wrong semantic type.
    Type,
    /// An internal invariant failed that cannot be attributed to one input.
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Value => "value error",
            ErrorKind::Type => "type error",
            ErrorKind::Runtime => "runtime error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn value(message: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::Value,
            message: message.into(),
        }
    }

    pub fn type_(message: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::Type,
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::Runtime,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_preserved_through_display() {
        let e = Error::value("bad length");
        assert_eq!(e.kind(), ErrorKind::Value);
        assert_eq!(e.to_string(), "value error: bad length");
    }
}
