use std::path::PathBuf;

/// Errors produced when converting untrusted text or bytes into values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input is not in the expected shape (non-digit, empty, bad UTF-8...).
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The input is well-formed but does not fit the target type.
    #[error("value out of range for {target}: {value}")]
    OutOfRange { target: &'static str, value: String },

    /// A length or fixed-width field claims more bytes than remain.
    #[error("truncated input (needed {needed} bytes, {available} available)")]
    TruncatedInput { needed: usize, available: usize },
}

impl ParseError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub fn out_of_range(target: &'static str, value: impl Into<String>) -> Self {
        Self::OutOfRange {
            target,
            value: value.into(),
        }
    }
}

/// A filesystem probe failed for a reason other than the entry being absent.
#[derive(Debug, thiserror::Error)]
#[error("cannot probe {}: {source}", path.display())]
pub struct AccessError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub type Result<T> = std::result::Result<T, ParseError>;
