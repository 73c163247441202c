//! Message envelope and wire codec for an antivirus scanning service.
//!
//! avwire frames every client/server exchange as one correlated message:
//! method, uuid, status, timestamp and an optional typed body.
//!
//! # Crate Structure
//!
//! - [`prims`]: Checked integer parsing, bounded byte reads, clock, file probe
//! - [`frame`]: Message envelope, body capability and the wire codec
//! - [`payload`]: Antivirus payload kinds and method table (behind `payload` feature)

/// Re-export primitive types.
pub mod prims {
    pub use avwire_prims::*;
}

/// Re-export frame types.
pub mod frame {
    pub use avwire_frame::*;
}

/// Re-export payload types (requires `payload` feature).
#[cfg(feature = "payload")]
pub mod payload {
    pub use avwire_payload::*;
}
