//! # Shared Control Bytes
//!
//! Byte constants and helpers common to every supported escape-code
//! dialect. The family-specific command builders live in
//! [`imagewriter`](crate::protocol::imagewriter) and
//! [`escp`](crate::protocol::escp); this module only holds what they
//! share.
//!
//! ## Byte Order
//!
//! Where a dialect carries a binary 16-bit count (Epson bit image,
//! ESC/P2 raster), it is **little-endian**: value 0x0123 is sent as
//! `[0x23, 0x01]`. The ImageWriter dialect instead uses 4-digit ASCII
//! decimal counts and never needs this helper.

/// ESC (Escape) - Command prefix byte
///
/// Every multi-byte command in both dialects begins with ESC (0x1B).
pub const ESC: u8 = 0x1B;

/// CR (Carriage Return) - Return head to column 0 without advancing.
///
/// On color devices this is the whole "overprint" mechanism: a bare CR
/// after a non-final plane lets the next ribbon pass land on the same
/// band.
pub const CR: u8 = 0x0D;

/// LF (Line Feed) - Return head and advance by the current line height.
pub const LF: u8 = 0x0A;

/// FF (Form Feed) - Eject the page.
pub const FF: u8 = 0x0C;

/// HT (Horizontal Tab) - Advance to the next horizontal tab stop.
pub const HT: u8 = 0x09;

/// Split a count into little-endian `[lo, hi]` command bytes.
#[inline]
pub fn u16_le(n: u16) -> [u8; 2] {
    n.to_le_bytes()
}

/// Format a count as the 4-digit ASCII decimal field used by the
/// ImageWriter bitmap commands. Counts above 9999 never occur: the
/// widest supported line is 13.6" × 320 dpi = 4352 columns.
#[inline]
pub fn ascii4(n: u16) -> [u8; 4] {
    [
        b'0' + (n / 1000 % 10) as u8,
        b'0' + (n / 100 % 10) as u8,
        b'0' + (n / 10 % 10) as u8,
        b'0' + (n % 10) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0123), [0x23, 0x01]);
        assert_eq!(u16_le(1), [1, 0]);
    }

    #[test]
    fn test_ascii4() {
        assert_eq!(&ascii4(0), b"0000");
        assert_eq!(&ascii4(1), b"0001");
        assert_eq!(&ascii4(4352), b"4352");
        assert_eq!(&ascii4(9999), b"9999");
    }
}
