//! Correlated message envelope and wire codec for the avwire protocol.
//!
//! Every message on the wire is one self-delimiting frame:
//! - A 1-byte method length and the method name (visible ASCII)
//! - A 16-byte binary uuid used to correlate responses with requests
//! - A signed status byte and an 8-byte big-endian millisecond timestamp
//! - A 4-byte big-endian body length and the body bytes
//!
//! The envelope is generic over the body. Applications decide which payload
//! kind a method carries by handing the decoder a [`BodyTable`].

#[cfg(feature = "async")]
pub mod async_codec;
pub mod body;
pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod status;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::MessageCodec;
pub use body::{Body, BodyTable, DecoderTable, RawBody, RawTable, Serializable};
pub use codec::{
    decode_frame, decode_message, encode_message, encode_message_bounded, frame_len,
    recover_uuid, FrameConfig, DEFAULT_MAX_BODY, FIXED_HEADER_SIZE,
};
pub use error::{FrameError, Result};
pub use message::{generate_message, parse_uuid, validate_method, Message, MAX_METHOD_LEN};
pub use reader::MessageReader;
pub use status::{classify, StatusClass};
pub use uuid::Uuid;
pub use writer::MessageWriter;
