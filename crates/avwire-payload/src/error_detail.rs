use avwire_frame::{Body, Serializable};
use avwire_prims::{ByteReader, ParseError};
use bytes::{BufMut, BytesMut};
use serde::Serialize;

use crate::error::Result;
use crate::wire::{check_str, put_str};

/// The request frame could not be parsed.
pub const CODE_MALFORMED_FRAME: i32 = 1;
/// The method is not served.
pub const CODE_UNKNOWN_METHOD: i32 = 2;
/// The body did not fit the configured limit.
pub const CODE_BODY_TOO_LARGE: i32 = 3;
/// The service failed while handling a valid request.
pub const CODE_INTERNAL: i32 = 125;

/// Body of an `Error` message: numeric code plus human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    code: i32,
    description: String,
}

impl ErrorDetail {
    pub fn new(code: i32, description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        check_str("error description", &description)?;
        Ok(Self { code, description })
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Body for ErrorDetail {
    fn encode(&self, dst: &mut BytesMut) {
        dst.put_i32(self.code);
        put_str(dst, &self.description);
    }
}

impl Serializable for ErrorDetail {
    fn decode(src: &[u8]) -> std::result::Result<Self, ParseError> {
        let mut reader = ByteReader::new(src);
        let code = reader.read_i32()?;
        let description = reader.read_str_u16()?.to_string();
        reader.finish()?;
        Ok(Self { code, description })
    }
}
