use std::path::{Path, PathBuf};

use avwire_frame::{Body, Serializable};
use avwire_prims::{is_file_exist, ByteReader, ParseError};
use bytes::BytesMut;
use serde::Serialize;

use crate::error::{PayloadError, Result};
use crate::wire::{check_str, put_str};

/// Body of `StartScan`: the path to scan, as a u16-length-prefixed UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    path: String,
}

impl ScanRequest {
    /// Build a request without touching the filesystem.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(ParseError::Malformed("scan path must not be empty".into()).into());
        }
        check_str("scan path", &path)?;
        Ok(Self { path })
    }

    /// Build a request for a path that must exist right now.
    pub fn for_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !is_file_exist(path)? {
            return Err(PayloadError::MissingFile(path.to_path_buf()));
        }
        let text = path.to_str().ok_or_else(|| {
            ParseError::Malformed(format!("scan path is not UTF-8: {}", path.display()))
        })?;
        Self::new(text)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

impl Body for ScanRequest {
    fn encode(&self, dst: &mut BytesMut) {
        put_str(dst, &self.path);
    }
}

impl Serializable for ScanRequest {
    fn decode(src: &[u8]) -> std::result::Result<Self, ParseError> {
        let mut reader = ByteReader::new(src);
        let path = reader.read_str_u16()?;
        reader.finish()?;
        if path.is_empty() {
            return Err(ParseError::Malformed("scan path must not be empty".into()));
        }
        Ok(Self {
            path: path.to_string(),
        })
    }
}
