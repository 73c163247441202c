use avwire_prims::{ByteReader, ParseError};
use bytes::{Buf, BufMut, BytesMut};
use uuid::Uuid;

use crate::body::{Body, BodyTable};
use crate::error::{FrameError, Result};
use crate::message::{validate_method, Message};

/// Bytes after the method: uuid (16) + status (1) + timestamp (8) + body length (4).
pub const FIXED_HEADER_SIZE: usize = 16 + 1 + 8 + 4;

/// Default maximum body size: 16 MiB.
pub const DEFAULT_MAX_BODY: usize = 16 * 1024 * 1024;

/// Configuration for the message codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum body size in bytes. Default: 16 MiB.
    pub max_body_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY,
        }
    }
}

/// Encode a message into the wire format.
///
/// Wire format (all integers big-endian):
/// ```text
/// ┌────────────┬─────────┬───────────┬────────┬───────────┬────────────┬──────────────┐
/// │ Method len │ Method  │ UUID      │ Status │ Timestamp │ Body len   │ Body         │
/// │ (1B)       │ (n B)   │ (16B)     │ (1B i8)│ (8B u64)  │ (4B u32)   │ (len bytes)  │
/// └────────────┴─────────┴───────────┴────────┴───────────┴────────────┴──────────────┘
/// ```
///
/// A body length of zero means "no body".
pub fn encode_message<B: Body>(message: &Message<B>, dst: &mut BytesMut) -> Result<()> {
    encode_message_bounded(message, u32::MAX as usize, dst)
}

/// Encode a message, rejecting bodies larger than `max_body`.
///
/// On error `dst` is left as it was.
pub fn encode_message_bounded<B: Body>(
    message: &Message<B>,
    max_body: usize,
    dst: &mut BytesMut,
) -> Result<()> {
    let max_body = max_body.min(u32::MAX as usize);
    let method = message.method().as_bytes();
    let timestamp = u64::try_from(message.timestamp())
        .map_err(|_| FrameError::invalid("timestamp", "negative timestamp"))?;
    let method_len = u8::try_from(method.len())
        .map_err(|_| FrameError::invalid("method", "method longer than 255 bytes"))?;

    let start = dst.len();
    dst.reserve(1 + method.len() + FIXED_HEADER_SIZE);
    dst.put_u8(method_len);
    dst.put_slice(method);
    dst.put_slice(message.uuid().as_bytes());
    dst.put_i8(message.status());
    dst.put_u64(timestamp);

    let len_at = dst.len();
    dst.put_u32(0);
    if let Some(body) = message.body() {
        body.encode(dst);
    }

    let body_len = dst.len() - len_at - 4;
    if body_len > max_body {
        dst.truncate(start);
        return Err(FrameError::BodyTooLarge {
            size: body_len,
            max: max_body,
        });
    }
    dst[len_at..len_at + 4].copy_from_slice(&(body_len as u32).to_be_bytes());

    tracing::trace!(
        method = message.method(),
        uuid = %message.uuid(),
        body_len,
        "encoded message"
    );
    Ok(())
}

/// Decode exactly one message from a complete frame.
///
/// Any strict prefix of a valid frame fails with
/// [`ParseError::TruncatedInput`]; bytes past the frame fail as malformed.
/// The body decoder runs only once the whole declared body is present.
pub fn decode_message<D: BodyTable>(src: &[u8], table: &D) -> Result<Message<D::Body>> {
    let mut reader = ByteReader::new(src);
    let message = read_message(&mut reader, table, u32::MAX as usize)?;
    reader.finish()?;
    Ok(message)
}

/// Total length of the frame at the start of `src`.
///
/// Returns `Ok(None)` if the header is not complete yet. Fails as soon as
/// the header is readable and declares a body above `max_body`, or carries
/// an invalid method.
pub fn frame_len(src: &[u8], max_body: usize) -> Result<Option<usize>> {
    let mut reader = ByteReader::new(src);
    match read_header(&mut reader, max_body) {
        Ok(header) => Ok(Some(reader.position() + header.body_len)),
        Err(FrameError::Parse(ParseError::TruncatedInput { .. })) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Decode a message from a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// Once the frame length is known its bytes are consumed even if the body
/// fails to decode, so the stream stays aligned on the next frame. A header
/// that cannot be read leaves the buffer untouched; the stream is then
/// unrecoverable.
pub fn decode_frame<D: BodyTable>(
    src: &mut BytesMut,
    table: &D,
    max_body: usize,
) -> Result<Option<Message<D::Body>>> {
    let len = match frame_len(src, max_body) {
        Ok(Some(len)) => len,
        Ok(None) => return Ok(None),
        Err(err) => {
            tracing::warn!(error = %err, "rejecting unreadable frame header");
            return Err(err);
        }
    };

    if src.len() < len {
        src.reserve(len - src.len());
        return Ok(None); // Need more data
    }

    let result = decode_message(&src[..len], table);
    src.advance(len);

    match result {
        Ok(message) => {
            tracing::debug!(
                method = message.method(),
                uuid = %message.uuid(),
                status = message.status(),
                frame_len = len,
                "decoded message"
            );
            Ok(Some(message))
        }
        Err(err) => {
            tracing::warn!(error = %err, frame_len = len, "dropping undecodable frame");
            Err(err)
        }
    }
}

/// Pull the correlation id out of a frame whose header is readable.
///
/// Used to address an error reply when the rest of the frame is bad.
/// Returns `None` unless the method in front of the uuid is valid; without
/// it the uuid bytes cannot be trusted to be a uuid at all.
pub fn recover_uuid(src: &[u8]) -> Option<Uuid> {
    let mut reader = ByteReader::new(src);
    read_method(&mut reader).ok()?;
    reader.read_array::<16>().ok().map(Uuid::from_bytes)
}

fn read_method<'a>(reader: &mut ByteReader<'a>) -> std::result::Result<&'a str, ParseError> {
    let method_len = usize::from(reader.read_u8()?);
    let method = reader.read_bytes(method_len)?;
    let method = std::str::from_utf8(method)
        .map_err(|err| ParseError::Malformed(format!("method is not UTF-8: {err}")))?;
    validate_method(method).map_err(|err| match err {
        FrameError::InvalidArgument { reason, .. } => ParseError::Malformed(reason),
        other => ParseError::Malformed(other.to_string()),
    })?;
    Ok(method)
}

struct Header<'a> {
    method: &'a str,
    uuid: Uuid,
    status: i8,
    timestamp: i64,
    body_len: usize,
}

fn read_header<'a>(reader: &mut ByteReader<'a>, max_body: usize) -> Result<Header<'a>> {
    let method = read_method(reader)?;

    let uuid = Uuid::from_bytes(reader.read_array::<16>()?);
    let status = reader.read_i8()?;

    let raw_timestamp = reader.read_u64()?;
    let timestamp = i64::try_from(raw_timestamp).map_err(|_| ParseError::OutOfRange {
        target: "timestamp",
        value: raw_timestamp.to_string(),
    })?;

    let body_len = reader.read_u32()? as usize;
    if body_len > max_body {
        return Err(FrameError::BodyTooLarge {
            size: body_len,
            max: max_body,
        });
    }

    Ok(Header {
        method,
        uuid,
        status,
        timestamp,
        body_len,
    })
}

fn read_message<D: BodyTable>(
    reader: &mut ByteReader<'_>,
    table: &D,
    max_body: usize,
) -> Result<Message<D::Body>> {
    let header = read_header(reader, max_body)?;
    let body_bytes = reader.read_bytes(header.body_len)?;
    let body = if body_bytes.is_empty() {
        None
    } else {
        Some(table.decode_body(header.method, body_bytes)?)
    };

    Ok(Message::from_wire(
        header.method.to_string(),
        header.uuid,
        header.status,
        header.timestamp,
        body,
    ))
}
