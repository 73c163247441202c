use avwire_frame::{Body, Serializable};
use avwire_prims::{ByteReader, ParseError};
use bytes::{BufMut, BytesMut};
use serde::Serialize;

use crate::error::{PayloadError, Result};
use crate::wire::{check_str, put_str};

// Smallest encoded entry: empty path length (2) + status (1).
const MIN_ENTRY_SIZE: usize = 3;

/// State of the scanner as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ScannerStatus {
    Idle = 0,
    Scanning = 1,
    Paused = 2,
    Stopped = 3,
}

impl TryFrom<u8> for ScannerStatus {
    type Error = ParseError;

    fn try_from(value: u8) -> std::result::Result<Self, ParseError> {
        match value {
            0 => Ok(Self::Idle),
            1 => Ok(Self::Scanning),
            2 => Ok(Self::Paused),
            3 => Ok(Self::Stopped),
            other => Err(ParseError::Malformed(format!("unknown scanner status {other}"))),
        }
    }
}

/// Verdict state of one scanned path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EntryStatus {
    NotScanned = 0,
    Scanning = 1,
    ScannedClean = 2,
    ScannedInfected = 3,
}

impl TryFrom<u8> for EntryStatus {
    type Error = ParseError;

    fn try_from(value: u8) -> std::result::Result<Self, ParseError> {
        match value {
            0 => Ok(Self::NotScanned),
            1 => Ok(Self::Scanning),
            2 => Ok(Self::ScannedClean),
            3 => Ok(Self::ScannedInfected),
            other => Err(ParseError::Malformed(format!("unknown entry status {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub path: String,
    pub status: EntryStatus,
}

/// Body of a `GetScannerCache` response.
///
/// Layout: scanner status (1), entry count (u32), then per entry a
/// u16-length-prefixed UTF-8 path and a status byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannerCache {
    scanner_status: ScannerStatus,
    entries: Vec<CacheEntry>,
}

impl ScannerCache {
    pub fn new(scanner_status: ScannerStatus) -> Self {
        Self {
            scanner_status,
            entries: Vec::new(),
        }
    }

    /// Append an entry; paths longer than a u16 prefix allows are rejected.
    pub fn push(&mut self, path: impl Into<String>, status: EntryStatus) -> Result<()> {
        let path = path.into();
        check_str("cache entry path", &path)?;
        if self.entries.len() >= u32::MAX as usize {
            return Err(PayloadError::TooLong {
                field: "cache entries",
                len: self.entries.len() + 1,
                max: u32::MAX as usize,
            });
        }
        self.entries.push(CacheEntry { path, status });
        Ok(())
    }

    pub fn with_entry(mut self, path: impl Into<String>, status: EntryStatus) -> Result<Self> {
        self.push(path, status)?;
        Ok(self)
    }

    pub fn scanner_status(&self) -> ScannerStatus {
        self.scanner_status
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    /// A scan is in progress, possibly paused.
    pub fn is_running(&self) -> bool {
        matches!(
            self.scanner_status,
            ScannerStatus::Scanning | ScannerStatus::Paused
        )
    }

    /// Paths whose verdict is infected.
    pub fn infected(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.status == EntryStatus::ScannedInfected)
            .map(|entry| entry.path.as_str())
    }
}

impl Body for ScannerCache {
    fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(self.scanner_status as u8);
        dst.put_u32(self.entries.len() as u32);
        for entry in &self.entries {
            put_str(dst, &entry.path);
            dst.put_u8(entry.status as u8);
        }
    }
}

impl Serializable for ScannerCache {
    fn decode(src: &[u8]) -> std::result::Result<Self, ParseError> {
        let mut reader = ByteReader::new(src);
        let scanner_status = ScannerStatus::try_from(reader.read_u8()?)?;
        let count = reader.read_u32()? as usize;

        // Bound the allocation by what the input could possibly hold.
        let needed = count.saturating_mul(MIN_ENTRY_SIZE);
        if needed > reader.remaining() {
            return Err(ParseError::TruncatedInput {
                needed,
                available: reader.remaining(),
            });
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let path = reader.read_str_u16()?.to_string();
            let status = EntryStatus::try_from(reader.read_u8()?)?;
            entries.push(CacheEntry { path, status });
        }
        reader.finish()?;

        Ok(Self {
            scanner_status,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample() -> ScannerCache {
        ScannerCache::new(ScannerStatus::Paused)
            .with_entry("/bin/ls", EntryStatus::ScannedClean)
            .unwrap()
            .with_entry("/tmp/eicar.com", EntryStatus::ScannedInfected)
            .unwrap()
            .with_entry("/tmp/queued", EntryStatus::NotScanned)
            .unwrap()
    }

    #[test]
    fn roundtrip() {
        let cache = sample();
        assert_eq!(ScannerCache::decode(&cache.to_bytes()).unwrap(), cache);
    }

    #[test]
    fn empty_cache_layout() {
        let bytes = ScannerCache::new(ScannerStatus::Idle).to_bytes();
        assert_eq!(bytes.as_ref(), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn reports_infected_paths_and_running_state() {
        let cache = sample();
        assert!(cache.is_running());
        assert_eq!(cache.infected().collect::<Vec<_>>(), vec!["/tmp/eicar.com"]);
        assert!(!ScannerCache::new(ScannerStatus::Stopped).is_running());
    }

    #[test]
    fn rejects_unknown_status_bytes() {
        assert!(matches!(
            ScannerCache::decode(&[9, 0, 0, 0, 0]),
            Err(ParseError::Malformed(_))
        ));

        let mut bytes = ScannerCache::new(ScannerStatus::Scanning)
            .with_entry("/x", EntryStatus::Scanning)
            .unwrap()
            .to_bytes()
            .to_vec();
        *bytes.last_mut().unwrap() = 7;
        assert!(matches!(
            ScannerCache::decode(&bytes),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn huge_entry_count_fails_before_allocating() {
        let bytes = [1, 0xff, 0xff, 0xff, 0xff, 0, 0, 0];
        assert!(matches!(
            ScannerCache::decode(&bytes),
            Err(ParseError::TruncatedInput { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_prefixes_fail(cut in 0usize..64) {
            let bytes = sample().to_bytes();
            let cut = cut % bytes.len();
            prop_assert!(ScannerCache::decode(&bytes[..cut]).is_err());
        }
    }
}
