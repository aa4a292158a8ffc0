//! # Epson ESC/P and ESC/P2 Commands
//!
//! Command builders for the Epson 9-pin (FX) and 24-pin (LQ) bit-image
//! dialect and the ESC/P2-style raster dialect used by the CMYK inkjet
//! profile. Unlike the ImageWriter dialect, counts here are binary
//! little-endian.
//!
//! ## Command Summary
//!
//! | Command | Bytes | Purpose |
//! |---------|-------|---------|
//! | `ESC @` | 1B 40 | reset to power-on defaults |
//! | `ESC 3 n` | 1B 33 n | line height n/216" (n/180" on ESC/P2) |
//! | `ESC U n` | 1B 55 n | unidirectional on (1) / off (0) |
//! | `ESC J n` | 1B 4A n | fine feed n/216" without CR, n ≤ 255 |
//! | `ESC K/L/Y/Z` | 1B .. nL nH | 8-pin bit image, modes 0-3 |
//! | `ESC * m` | 1B 2A m nL nH | bit image, any mode (24-pin) |
//! | `ESC D n 0, HT` | 1B 44 n 00 09 | set pica tab stop, tab to it |
//! | `ESC \ lo hi` | 1B 5C lo hi | relative move, signed dot count |
//! | `ESC r n` | 1B 72 n | select ink color |
//! | `ESC . c v h m nL nH` | 1B 2E ... | ESC/P2 raster, c=1 for RLE |
//! | `FF ESC @` | 0C 1B 40 | eject and reset |
//!
//! ## Reference
//!
//! Epson ESC/P Reference Manual; ESC/P2 additions per the Stylus-series
//! programming guides.

use crate::device::profile::Plane;
use crate::protocol::commands::{u16_le, ESC, FF, HT};

// ============================================================================
// SETUP COMMANDS
// ============================================================================

/// # Reset (ESC @)
///
/// Returns the printer to power-on defaults, clearing the line buffer,
/// tab stops, and any graphics state. Sent first in every job and again
/// after the final form feed.
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Line Height (ESC 3 n)
///
/// Sets the line-feed distance to n/216" (n/180" on ESC/P2 devices).
/// Graphics set this to exactly one band so LF lands on the next band
/// boundary.
#[inline]
pub fn line_height(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// # Head Direction (ESC U n)
///
/// `1` forces unidirectional printing, `0` restores bidirectional.
#[inline]
pub fn direction(unidirectional: bool) -> Vec<u8> {
    vec![ESC, b'U', unidirectional as u8]
}

/// # Ink Color Select (ESC r n)
///
/// | Plane | n |
/// |-------|---|
/// | Black | 0 |
/// | Magenta | 1 |
/// | Cyan | 2 |
/// | Yellow | 4 |
#[inline]
pub fn color_select(plane: Plane) -> Vec<u8> {
    let n = match plane {
        Plane::Black => 0,
        Plane::Magenta => 1,
        Plane::Cyan => 2,
        Plane::Yellow => 4,
    };
    vec![ESC, b'r', n]
}

// ============================================================================
// POSITIONING COMMANDS
// ============================================================================

/// # Fine Vertical Skip (ESC J n)
///
/// Feeds n/216" (n/180" on ESC/P2) without a carriage return. The count
/// is a single byte, so longer skips are chunked by the emitter.
#[inline]
pub fn skip(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

/// # Tab To Pica Stop (ESC D n 0, HT)
///
/// Sets a single horizontal tab stop at pica character position `n`
/// (n/10 inch from the left margin) and immediately tabs to it. Used to
/// elide long zero runs; the stop table is rewritten for every tab so
/// no stale stops accumulate.
#[inline]
pub fn tab_to(stop: u8) -> Vec<u8> {
    vec![ESC, b'D', stop, 0, HT]
}

/// # Relative Move (ESC \ lo hi)
///
/// Moves the head by a signed little-endian dot count from the current
/// position. ESC/P2 only.
#[inline]
pub fn move_relative(dots: i16) -> Vec<u8> {
    let [lo, hi] = dots.to_le_bytes();
    vec![ESC, b'\\', lo, hi]
}

// ============================================================================
// GRAPHICS COMMANDS
// ============================================================================

/// # Bit Image Header (ESC K/L/Y/Z or ESC * m)
///
/// Announces `columns` columns of bit-image data. Modes 0-3 have
/// dedicated single-letter commands ("KLYZ"); every other mode goes
/// through `ESC *`. The 16-bit column count is little-endian and the
/// column data follows raw, `stride` bytes per column.
#[inline]
pub fn bit_image_header(mode: u8, columns: u16) -> Vec<u8> {
    let mut cmd = vec![ESC];
    if mode <= 3 {
        cmd.push(b"KLYZ"[mode as usize]);
    } else {
        cmd.push(b'*');
        cmd.push(mode);
    }
    cmd.extend_from_slice(&u16_le(columns));
    cmd
}

/// # ESC/P2 Raster Header (ESC . c v h m nL nH)
///
/// Announces one band of raster data: `c` selects uncompressed (0) or
/// run-length encoded (1) transfer, `v`/`h` are the vertical/horizontal
/// resolutions in 3600ths of an inch, `m` is the band height in rows,
/// and the little-endian count is the band width in **dots**, not
/// bytes.
#[inline]
pub fn raster_header(compressed: bool, v: u8, h: u8, lines: u8, dots: u16) -> Vec<u8> {
    let mut cmd = vec![ESC, b'.', compressed as u8, v, h, lines];
    cmd.extend_from_slice(&u16_le(dots));
    cmd
}

/// # Eject (FF ESC @)
///
/// Form feed, then reset so a following text job starts clean.
#[inline]
pub fn eject() -> Vec<u8> {
    vec![FF, ESC, b'@']
}
