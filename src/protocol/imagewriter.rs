//! # ImageWriter Protocol Commands
//!
//! Command builders for the Apple Dot Matrix Printer / ImageWriter /
//! ImageWriter II / ImageWriter LQ dialect (the C. Itoh 8510 command
//! set). The dialect's signature quirk is that bitmap column counts are
//! sent as **4-digit ASCII decimal**, not binary.
//!
//! ## Command Summary
//!
//! | Command | Bytes | Purpose |
//! |---------|-------|---------|
//! | `ESC q` | 1B 71 | condensed pitch (15 cpi, 120 dpi graphics) |
//! | `ESC P` | 1B 50 | elite proportional pitch (160 dpi graphics) |
//! | `ESC a 3` | 1B 61 33 | letter-quality proportional (LQ, 320 dpi) |
//! | `ESC T nn` | 1B 54 n n | line height nn/144" (ASCII digits) |
//! | `ESC G nnnn data` | 1B 47 ... | 8-dot bitmap, nnnn columns |
//! | `ESC V nnnn b` | 1B 56 ... | repeat byte `b` nnnn times (8-dot) |
//! | `ESC C nnnn data` | 1B 43 ... | 24-wire bitmap, nnnn columns |
//! | `ESC U nnnn b b b` | 1B 55 ... | repeat 3-byte column nnnn times |
//! | `ESC K d` | 1B 4B d | select ribbon color (ASCII digit) |
//! | `ESC <` / `ESC >` | 1B 3C / 3E | bidirectional / unidirectional |
//! | `ESC @ d` | 1B 40 d | select paper bin (LQ sheet feeder) |
//! | `ESC A` | 1B 41 | line height 1/6" (text default) |
//! | `ESC E` | 1B 45 | elite pitch (text default) |
//!
//! ## Reference
//!
//! ImageWriter II Technical Reference Manual; ImageWriter LQ owner's
//! documentation for the sheet-feeder bin command.

use crate::device::profile::Plane;
use crate::protocol::commands::{ascii4, ESC};

// ============================================================================
// PITCH SELECT SEQUENCES (referenced by the resolution-mode tables)
// ============================================================================

/// Condensed pitch: 15 cpi text, 120 dpi graphics.
pub const PITCH_CONDENSED: &[u8] = &[ESC, b'q'];

/// Elite proportional pitch: 160 dpi graphics.
pub const PITCH_ELITE: &[u8] = &[ESC, b'P'];

/// Letter-quality: elite proportional plus LQ mode, 320 dpi graphics.
pub const PITCH_LQ: &[u8] = &[ESC, b'P', ESC, b'a', b'3'];

// ============================================================================
// SETUP COMMANDS
// ============================================================================

/// # Head Direction (ESC < / ESC >)
///
/// Unidirectional printing trades speed for horizontal registration;
/// worth it for graphics on a worn carriage.
#[inline]
pub fn direction(unidirectional: bool) -> Vec<u8> {
    vec![ESC, if unidirectional { b'>' } else { b'<' }]
}

/// # Line Height (ESC T nn)
///
/// Sets the line-feed distance to `n`/144". The argument is two ASCII
/// digits; `n` is at most 99. Graphics bands use 16/144" (= 1/9", one
/// 8-row band at 72 dpi) and the interleaved modes drop to 01/15 around
/// the fine second pass.
#[inline]
pub fn line_height(n: u8) -> Vec<u8> {
    vec![ESC, b'T', b'0' + n / 10, b'0' + n % 10]
}

/// # Paper Bin Select (ESC @ d)
///
/// ImageWriter LQ sheet feeder only; `bin` is 0-based and at most 2.
/// Validation rejects out-of-range bins before any byte is written.
#[inline]
pub fn bin_select(bin: u8) -> Vec<u8> {
    vec![ESC, b'@', b'0' + bin]
}

/// # Ribbon Color Select (ESC K d)
///
/// The color argument is an ASCII digit identifying the ribbon band.
/// Note the digits do not follow CMYK order; they are positions on the
/// physical ribbon.
///
/// | Plane | Digit |
/// |-------|-------|
/// | Yellow | `1` |
/// | Magenta | `2` |
/// | Cyan | `3` |
/// | Black | `0` |
#[inline]
pub fn color_select(plane: Plane) -> Vec<u8> {
    let digit = match plane {
        Plane::Yellow => b'1',
        Plane::Magenta => b'2',
        Plane::Cyan => b'3',
        Plane::Black => b'0',
    };
    vec![ESC, b'K', digit]
}

// ============================================================================
// GRAPHICS COMMANDS
// ============================================================================

/// # Bitmap Graphics Header (ESC G nnnn / ESC C nnnn)
///
/// Announces `columns` columns of bitmap data, sent as a 4-digit ASCII
/// decimal count. `ESC G` takes one byte per column (8-dot head);
/// `ESC C` takes three (24-wire LQ head). The column data follows raw.
#[inline]
pub fn bitmap_header(columns: u16, hires: bool) -> Vec<u8> {
    let mut cmd = vec![ESC, if hires { b'C' } else { b'G' }];
    cmd.extend_from_slice(&ascii4(columns));
    cmd
}

/// # Repeated Bitmap (ESC V nnnn b / ESC U nnnn b b b)
///
/// Prints one column pattern `columns` times. With an all-zeros pattern
/// this is the dialect's only horizontal positioning command: the head
/// walks right without any visible output, which is how leading blank
/// runs are elided.
#[inline]
pub fn repeat_column(columns: u16, pattern: &[u8], hires: bool) -> Vec<u8> {
    debug_assert_eq!(pattern.len(), if hires { 3 } else { 1 });
    let mut cmd = vec![ESC, if hires { b'U' } else { b'V' }];
    cmd.extend_from_slice(&ascii4(columns));
    cmd.extend_from_slice(pattern);
    cmd
}

/// # End-of-Page Reset (ESC < ESC A ESC E)
///
/// Restores text defaults: bidirectional head, 1/6" line feeds, elite
/// pitch. There is no way to restore the true power-on state.
#[inline]
pub fn reset() -> Vec<u8> {
    vec![ESC, b'<', ESC, b'A', ESC, b'E']
}
