//! The antivirus payload sum type and its method table.

use avwire_frame::{
    generate_message, recover_uuid, status, Body, DecoderTable, FrameError, Message,
};
use bytes::BytesMut;
use serde::Serialize;

use crate::cache::ScannerCache;
use crate::error::Result;
use crate::error_detail::{
    ErrorDetail, CODE_BODY_TOO_LARGE, CODE_INTERNAL, CODE_MALFORMED_FRAME, CODE_UNKNOWN_METHOD,
};
use crate::method;
use crate::protection::ProtectionStatus;
use crate::scan::ScanRequest;

/// Every body kind the antivirus service exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AntivirusBody {
    Protection(ProtectionStatus),
    Scan(ScanRequest),
    Cache(ScannerCache),
    Error(ErrorDetail),
}

/// A message carrying an antivirus body.
pub type AntivirusMessage = Message<AntivirusBody>;

impl Body for AntivirusBody {
    fn encode(&self, dst: &mut BytesMut) {
        match self {
            AntivirusBody::Protection(body) => body.encode(dst),
            AntivirusBody::Scan(body) => body.encode(dst),
            AntivirusBody::Cache(body) => body.encode(dst),
            AntivirusBody::Error(body) => body.encode(dst),
        }
    }
}

impl From<ProtectionStatus> for AntivirusBody {
    fn from(body: ProtectionStatus) -> Self {
        Self::Protection(body)
    }
}

impl From<ScanRequest> for AntivirusBody {
    fn from(body: ScanRequest) -> Self {
        Self::Scan(body)
    }
}

impl From<ScannerCache> for AntivirusBody {
    fn from(body: ScannerCache) -> Self {
        Self::Cache(body)
    }
}

impl From<ErrorDetail> for AntivirusBody {
    fn from(body: ErrorDetail) -> Self {
        Self::Error(body)
    }
}

/// The method → body kind table for the antivirus protocol.
pub fn antivirus_table() -> DecoderTable<AntivirusBody> {
    let mut table = DecoderTable::new();
    table
        .register(method::IS_PROTECTION_ENABLED, AntivirusBody::Protection)
        .register(method::START_SCAN, AntivirusBody::Scan)
        .register(method::GET_SCANNER_CACHE, AntivirusBody::Cache)
        .register(method::ERROR, AntivirusBody::Error);
    for name in method::BODYLESS {
        table.register_empty(name);
    }
    table
}

/// Build the negative-status reply for a frame that failed to decode.
///
/// Returns `None` when the frame header is too damaged to recover a uuid;
/// the caller should then drop the connection.
pub fn reject_frame(frame: &[u8], err: &FrameError) -> Result<Option<AntivirusMessage>> {
    let Some(uuid) = recover_uuid(frame) else {
        tracing::warn!(error = %err, "frame rejected without a recoverable uuid");
        return Ok(None);
    };

    let code = match err {
        FrameError::UnknownMethod(_) => CODE_UNKNOWN_METHOD,
        FrameError::BodyTooLarge { .. } => CODE_BODY_TOO_LARGE,
        err if err.is_parse() => CODE_MALFORMED_FRAME,
        FrameError::InvalidArgument { .. } => CODE_MALFORMED_FRAME,
        _ => CODE_INTERNAL,
    };
    let detail = ErrorDetail::new(code, err.to_string())?;
    let reply = generate_message(
        method::ERROR,
        &uuid.to_string(),
        status::FAIL,
        Some(AntivirusBody::Error(detail)),
    )?;
    Ok(Some(reply))
}
