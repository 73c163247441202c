//! Payload kinds for the antivirus service protocol.
//!
//! Each kind implements [`avwire_frame::Serializable`]; [`AntivirusBody`]
//! ties them together and [`antivirus_table`] tells the envelope decoder
//! which kind each method carries.

pub mod body;
pub mod cache;
pub mod error;
pub mod error_detail;
pub mod method;
pub mod protection;
pub mod scan;
pub mod wire;

pub use body::{antivirus_table, reject_frame, AntivirusBody, AntivirusMessage};
pub use cache::{CacheEntry, EntryStatus, ScannerCache, ScannerStatus};
pub use error::{PayloadError, Result};
pub use error_detail::ErrorDetail;
pub use protection::ProtectionStatus;
pub use scan::ScanRequest;
