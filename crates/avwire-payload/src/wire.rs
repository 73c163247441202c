use bytes::{BufMut, BytesMut};

use crate::error::{PayloadError, Result};

/// Longest string a u16 length prefix can carry.
pub const MAX_STR_LEN: usize = u16::MAX as usize;

pub(crate) fn check_str(field: &'static str, value: &str) -> Result<()> {
    if value.len() > MAX_STR_LEN {
        return Err(PayloadError::TooLong {
            field,
            len: value.len(),
            max: MAX_STR_LEN,
        });
    }
    Ok(())
}

// Callers validate with `check_str` at construction.
pub(crate) fn put_str(dst: &mut BytesMut, value: &str) {
    dst.put_u16(value.len() as u16);
    dst.put_slice(value.as_bytes());
}
