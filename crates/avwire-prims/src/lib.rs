//! Primitive building blocks for the avwire antivirus protocol.
//!
//! Everything that touches untrusted text or bytes before the envelope
//! codec sees it lives here:
//! - Checked decimal parsing into fixed-width integers ([`to_int8`], [`to_uint8`], [`to_uint32`])
//! - A bounded big-endian cursor ([`ByteReader`]) that fails instead of over-reading
//! - Length-bounded byte comparison and hex dumps
//! - The millisecond wall clock used to stamp messages
//! - A filesystem existence probe that separates "absent" from "inaccessible"

pub mod buffer;
pub mod clock;
pub mod error;
pub mod fs;
pub mod int;
pub mod reader;

pub use buffer::{cmp_bytes, hex_dump, print_bytes};
pub use clock::time_since_epoch_millis;
pub use error::{AccessError, ParseError, Result};
pub use fs::is_file_exist;
pub use int::{to_int8, to_uint32, to_uint8};
pub use reader::ByteReader;
