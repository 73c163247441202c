//! Fixed-width integer parsing from decimal text.
//!
//! Values reach these functions from the wire (status codes, lengths), so
//! every conversion either yields the exact value or fails. Nothing wraps,
//! truncates, or falls back to a default.

use crate::error::{ParseError, Result};

/// Parse a decimal string into an `i8`. A single leading `-` is allowed.
pub fn to_int8(text: &str) -> Result<i8> {
    let (negative, digits) = split_sign(text, true)?;
    let magnitude = accumulate(text, digits, "i8")?;
    let value = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    i8::try_from(value).map_err(|_| ParseError::out_of_range("i8", text))
}

/// Parse a decimal string into a `u8`.
pub fn to_uint8(text: &str) -> Result<u8> {
    let (_, digits) = split_sign(text, false)?;
    let magnitude = accumulate(text, digits, "u8")?;
    u8::try_from(magnitude).map_err(|_| ParseError::out_of_range("u8", text))
}

/// Parse a decimal string into a `u32`.
pub fn to_uint32(text: &str) -> Result<u32> {
    let (_, digits) = split_sign(text, false)?;
    let magnitude = accumulate(text, digits, "u32")?;
    u32::try_from(magnitude).map_err(|_| ParseError::out_of_range("u32", text))
}

fn split_sign(text: &str, signed: bool) -> Result<(bool, &[u8])> {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) if signed => (true, rest),
        Some(_) => (false, bytes),
        None => return Err(ParseError::malformed("empty input")),
    };

    if digits.is_empty() {
        return Err(ParseError::malformed(format!("no digits in {text:?}")));
    }
    if let Some(bad) = digits.iter().find(|b| !b.is_ascii_digit()) {
        return Err(ParseError::malformed(format!(
            "unexpected byte 0x{bad:02x} in {text:?}"
        )));
    }
    Ok((negative, digits))
}

// Digits are validated before this runs. Accumulation is checked in u64,
// which is wide enough to tell "fits in u32" from "does not".
fn accumulate(text: &str, digits: &[u8], target: &'static str) -> Result<u64> {
    digits.iter().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(u64::from(digit - b'0')))
            .filter(|acc| *acc <= u64::from(u32::MAX) + 1)
            .ok_or_else(|| ParseError::out_of_range(target, text))
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn uint8_boundaries() {
        assert_eq!(to_uint8("0").unwrap(), 0);
        assert_eq!(to_uint8("255").unwrap(), 255);
        assert!(matches!(to_uint8("256"), Err(ParseError::OutOfRange { .. })));
    }

    #[test]
    fn uint8_rejects_non_numeric() {
        assert!(matches!(to_uint8("abc"), Err(ParseError::Malformed(_))));
        assert!(matches!(to_uint8(""), Err(ParseError::Malformed(_))));
        assert!(matches!(to_uint8("-1"), Err(ParseError::Malformed(_))));
        assert!(matches!(to_uint8("+1"), Err(ParseError::Malformed(_))));
        assert!(matches!(to_uint8(" 1"), Err(ParseError::Malformed(_))));
        assert!(matches!(to_uint8("1 "), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn int8_boundaries() {
        assert_eq!(to_int8("-128").unwrap(), -128);
        assert_eq!(to_int8("127").unwrap(), 127);
        assert_eq!(to_int8("-0").unwrap(), 0);
        assert!(matches!(to_int8("-129"), Err(ParseError::OutOfRange { .. })));
        assert!(matches!(to_int8("128"), Err(ParseError::OutOfRange { .. })));
    }

    #[test]
    fn int8_rejects_bare_sign() {
        assert!(matches!(to_int8("-"), Err(ParseError::Malformed(_))));
        assert!(matches!(to_int8("--1"), Err(ParseError::Malformed(_))));
        assert!(matches!(to_int8("1-"), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn uint32_boundaries() {
        assert_eq!(to_uint32("4294967295").unwrap(), u32::MAX);
        assert_eq!(to_uint32("0004294967295").unwrap(), u32::MAX);
        assert!(matches!(
            to_uint32("4294967296"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn very_long_digit_strings_are_out_of_range() {
        let digits = "9".repeat(200);
        assert!(matches!(
            to_uint32(&digits),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_int8(&format!("-{digits}")),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn non_ascii_digits_are_malformed() {
        // Arabic-Indic digit one.
        assert!(matches!(to_uint8("\u{0661}"), Err(ParseError::Malformed(_))));
    }

    proptest! {
        #[test]
        fn uint32_agrees_with_display(value in any::<u32>()) {
            prop_assert_eq!(to_uint32(&value.to_string()).unwrap(), value);
        }

        #[test]
        fn int8_agrees_with_display(value in any::<i8>()) {
            prop_assert_eq!(to_int8(&value.to_string()).unwrap(), value);
        }

        #[test]
        fn uint8_never_wraps(value in 256u32..) {
            let is_out_of_range = matches!(
                to_uint8(&value.to_string()),
                Err(ParseError::OutOfRange { .. })
            );
            prop_assert!(is_out_of_range);
        }
    }
}
