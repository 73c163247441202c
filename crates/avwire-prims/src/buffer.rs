//! Length-bounded byte comparison and diagnostic dumps.

use std::fmt::Write as _;

const DUMP_ROW_WIDTH: usize = 16;

/// Returns true if the first `length` bytes of `current` equal the first
/// `length` bytes of `target`.
///
/// A buffer shorter than `length` never matches. Bytes past `length` are
/// never inspected.
pub fn cmp_bytes(target: &[u8], current: &[u8], length: usize) -> bool {
    match (target.get(..length), current.get(..length)) {
        (Some(target), Some(current)) => target == current,
        _ => false,
    }
}

/// Render bytes as offset-prefixed hex rows with a printable-ASCII gutter.
///
/// ```text
/// 00000000  49 73 50 72 6f 74 65 63  74 69 6f 6e 45 6e 61 62  |IsProtectionEnab|
/// ```
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(DUMP_ROW_WIDTH) * 80);

    for (row, chunk) in bytes.chunks(DUMP_ROW_WIDTH).enumerate() {
        let _ = write!(out, "{:08x} ", row * DUMP_ROW_WIDTH);
        for column in 0..DUMP_ROW_WIDTH {
            if column % 8 == 0 {
                out.push(' ');
            }
            match chunk.get(column) {
                Some(byte) => {
                    let _ = write!(out, "{byte:02x} ");
                }
                None => out.push_str("   "),
            }
        }
        out.push_str(" |");
        out.extend(chunk.iter().map(|&byte| printable(byte)));
        out.push_str("|\n");
    }

    out
}

/// Emit a hex dump of `bytes` to the diagnostic log.
pub fn print_bytes(bytes: &[u8]) {
    tracing::debug!(len = bytes.len(), "byte dump\n{}", hex_dump(bytes));
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_prefix_only() {
        assert!(cmp_bytes(b"abc", b"abcd", 3));
        assert!(!cmp_bytes(b"abc", b"abd", 3));
    }

    #[test]
    fn short_buffer_never_matches() {
        assert!(!cmp_bytes(b"ab", b"abc", 3));
        assert!(!cmp_bytes(b"abc", b"ab", 3));
    }

    #[test]
    fn zero_length_always_matches() {
        assert!(cmp_bytes(b"", b"", 0));
        assert!(cmp_bytes(b"x", b"y", 0));
    }

    #[test]
    fn comparison_ignores_bytes_past_length() {
        // Index 3 differs in both directions; only the first three count.
        assert!(cmp_bytes(b"abc\x00", b"abc\xff", 3));
    }

    #[test]
    fn hex_dump_single_row() {
        let dump = hex_dump(b"AB\x00\xff");
        assert!(dump.starts_with("00000000  41 42 00 ff "));
        assert!(dump.trim_end().ends_with("|AB..|"));
    }

    #[test]
    fn hex_dump_multiple_rows() {
        let bytes: Vec<u8> = (0u8..=40).collect();
        let dump = hex_dump(&bytes);
        let rows: Vec<&str> = dump.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].starts_with("00000010 "));
        assert!(rows[2].starts_with("00000020 "));
    }

    #[test]
    fn hex_dump_handles_every_byte_value() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let dump = hex_dump(&bytes);
        assert_eq!(dump.lines().count(), 16);
        print_bytes(&bytes);
    }

    #[test]
    fn hex_dump_empty_input() {
        assert!(hex_dump(&[]).is_empty());
    }
}
