use avwire_prims::ParseError;

/// Errors that can occur while building, encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame bytes are malformed, out of range or truncated.
    #[error("frame parse error: {0}")]
    Parse(#[from] ParseError),

    /// A message was requested with an unusable method or uuid.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The frame carries a body for a method the decoder table does not know.
    #[error("no body decoder registered for method {0:?}")]
    UnknownMethod(String),

    /// The body exceeds the configured maximum size.
    #[error("body too large ({size} bytes, max {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// True when the error came from the frame bytes themselves.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::UnknownMethod(_))
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
