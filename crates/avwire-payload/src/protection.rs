use avwire_frame::{Body, Serializable};
use avwire_prims::{ByteReader, ParseError};
use bytes::{BufMut, BytesMut};
use serde::Serialize;

/// Wire value for enabled protection.
pub const ENABLED: u8 = 1;
/// Wire value for disabled protection.
pub const DISABLED: u8 = 0;

/// Answer to `IsProtectionEnabled`: one byte, 1 or 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtectionStatus {
    pub enabled: bool,
}

impl ProtectionStatus {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Body for ProtectionStatus {
    fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(if self.enabled { ENABLED } else { DISABLED });
    }
}

impl Serializable for ProtectionStatus {
    fn decode(src: &[u8]) -> Result<Self, ParseError> {
        let mut reader = ByteReader::new(src);
        let enabled = match reader.read_u8()? {
            ENABLED => true,
            DISABLED => false,
            other => {
                return Err(ParseError::Malformed(format!(
                    "protection status must be 0 or 1, got {other}"
                )))
            }
        };
        reader.finish()?;
        Ok(Self { enabled })
    }
}
