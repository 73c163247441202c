//! The correlated message envelope.
//!
//! [`generate_message`] is the only way to build a [`Message`] from caller
//! input. It validates the method and uuid and stamps the timestamp from the
//! wall clock, so no caller can produce an unstamped or malformed envelope.
//! Messages are immutable once built.

use avwire_prims::time_since_epoch_millis;
use uuid::Uuid;

use crate::error::{FrameError, Result};
use crate::status::{classify, StatusClass};

/// Longest method name the 1-byte length prefix can carry.
pub const MAX_METHOD_LEN: usize = u8::MAX as usize;

/// Length of the canonical hyphenated uuid text form.
pub const UUID_TEXT_LEN: usize = 36;

/// One protocol exchange: metadata plus an optional owned body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<B> {
    method: String,
    uuid: Uuid,
    status: i8,
    timestamp: i64,
    body: Option<B>,
}

/// Build a message stamped with the current time.
///
/// `uuid` must be the canonical 36-character hyphenated form. Fails with
/// [`FrameError::InvalidArgument`] on an empty, oversized or non-printable
/// method, or on a uuid in any other shape.
pub fn generate_message<B>(
    method: &str,
    uuid: &str,
    status: i8,
    body: Option<B>,
) -> Result<Message<B>> {
    let uuid = parse_uuid(uuid)?;
    Message::stamp(method, uuid, status, body)
}

/// Parse a correlation id in canonical `8-4-4-4-12` hex form.
pub fn parse_uuid(text: &str) -> Result<Uuid> {
    if text.len() != UUID_TEXT_LEN {
        return Err(FrameError::invalid(
            "uuid",
            format!("expected {UUID_TEXT_LEN} characters, got {}", text.len()),
        ));
    }
    Uuid::try_parse(text).map_err(|err| FrameError::invalid("uuid", err.to_string()))
}

/// Check a method name against the envelope rules.
///
/// Methods are 1..=255 bytes of visible ASCII (no spaces or control bytes).
pub fn validate_method(method: &str) -> Result<()> {
    if method.is_empty() {
        return Err(FrameError::invalid("method", "method must not be empty"));
    }
    if method.len() > MAX_METHOD_LEN {
        return Err(FrameError::invalid(
            "method",
            format!("method is {} bytes, max {MAX_METHOD_LEN}", method.len()),
        ));
    }
    if let Some(bad) = method.bytes().find(|b| !b.is_ascii_graphic()) {
        return Err(FrameError::invalid(
            "method",
            format!("method contains byte 0x{bad:02x}"),
        ));
    }
    Ok(())
}

impl<B> Message<B> {
    /// Start a new exchange with a freshly generated correlation id.
    pub fn request(method: &str, status: i8, body: Option<B>) -> Result<Self> {
        Self::stamp(method, Uuid::new_v4(), status, body)
    }

    /// Build the answer to this message: same method, same uuid, new stamp.
    pub fn response<R>(&self, status: i8, body: Option<R>) -> Result<Message<R>> {
        Message::stamp(&self.method, self.uuid, status, body)
    }

    fn stamp(method: &str, uuid: Uuid, status: i8, body: Option<B>) -> Result<Self> {
        validate_method(method)?;
        Ok(Self {
            method: method.to_string(),
            uuid,
            status,
            timestamp: time_since_epoch_millis(),
            body,
        })
    }

    // Used by the decoder once every field has been range-checked.
    pub(crate) fn from_wire(
        method: String,
        uuid: Uuid,
        status: i8,
        timestamp: i64,
        body: Option<B>,
    ) -> Self {
        Self {
            method,
            uuid,
            status,
            timestamp,
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn status(&self) -> i8 {
        self.status
    }

    pub fn status_class(&self) -> StatusClass {
        classify(self.status)
    }

    /// Milliseconds since the Unix epoch at construction time.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<B> {
        self.body
    }

    /// Returns true if `other` answers this message (or vice versa).
    pub fn correlates_with<R>(&self, other: &Message<R>) -> bool {
        self.uuid == other.uuid
    }

    /// Swap the body for another representation, keeping every other field.
    pub fn map_body<R>(self, f: impl FnOnce(B) -> R) -> Message<R> {
        Message {
            method: self.method,
            uuid: self.uuid,
            status: self.status,
            timestamp: self.timestamp,
            body: self.body.map(f),
        }
    }
}
