use std::fmt;
use std::io;

use avwire_frame::FrameError;
use avwire_payload::PayloadError;
use avwire_prims::{AccessError, ParseError};

// Exit codes follow sysexits-style buckets.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// A command-line value failed the integer parsers.
pub fn usage_error(context: &str, err: ParseError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

pub fn access_error(context: &str, err: AccessError) -> CliError {
    CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidArgument { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        FrameError::Parse(_)
        | FrameError::UnknownMethod(_)
        | FrameError::BodyTooLarge { .. }
        | FrameError::ConnectionClosed => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn payload_error(context: &str, err: PayloadError) -> CliError {
    match err {
        PayloadError::Frame(err) => frame_error(context, err),
        PayloadError::Access(err) => access_error(context, err),
        PayloadError::MissingFile(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        PayloadError::Parse(_) | PayloadError::TooLong { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}
