//! Status code conventions.
//!
//! The codec carries any `i8` verbatim. By convention negative codes are
//! errors, zero is success and positive codes are informational (pending,
//! in progress). Callers that need finer meanings layer them on top.

/// The request succeeded.
pub const OK: i8 = 0;

/// Generic failure.
pub const FAIL: i8 = -1;

/// The request was accepted and is still running.
pub const PENDING: i8 = 1;

/// Coarse class of a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Error,
    Success,
    Info,
}

impl StatusClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusClass::Error => "error",
            StatusClass::Success => "success",
            StatusClass::Info => "info",
        }
    }
}

/// Classify a status code by sign.
pub fn classify(status: i8) -> StatusClass {
    match status {
        i8::MIN..=-1 => StatusClass::Error,
        0 => StatusClass::Success,
        1..=i8::MAX => StatusClass::Info,
    }
}
