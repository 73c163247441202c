use std::path::PathBuf;

/// Errors raised while building or validating payloads.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Payload bytes failed to parse.
    #[error("payload parse error: {0}")]
    Parse(#[from] avwire_prims::ParseError),

    /// Building or decoding the surrounding message failed.
    #[error("message error: {0}")]
    Frame(#[from] avwire_frame::FrameError),

    /// A scan target does not exist.
    #[error("scan target does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    /// A scan target could not be probed.
    #[error(transparent)]
    Access(#[from] avwire_prims::AccessError),

    /// A value does not fit its wire field.
    #[error("{field} too long ({len} bytes, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, PayloadError>;
