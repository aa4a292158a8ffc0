//! # Bit-Plane Transposer
//!
//! Dot-matrix and inkjet heads fire one vertical column of dots per data
//! byte, so horizontal scanlines must be transposed 8×8 bits at a time
//! into column-major dot groups before emission. The transform is pure
//! data reshaping with no decision logic, and must be bit-exact: the
//! print head fires dots directly from this pattern.
//!
//! ## Layout
//!
//! For an 8-row group, input byte `i` of each row covers bit columns
//! `8i..8i+8`. The transposed output places the column byte for bit
//! column `c` at `c × stride` (+ pass offset), where `stride` is 3 for
//! 24-pin heads so the three 8-row "wires" of one head column land in
//! adjacent bytes.
//!
//! ## Dot order
//!
//! Row-to-bit assignment is a device fact ([`DotOrder`]): Epson heads
//! put the top row in bit 7; the Apple heads are wired the other way
//! around, so the band rows are taken in reverse.

use crate::device::profile::{DotOrder, Interleave, ResolutionMode};
use crate::raster::band::ScanBand;

/// Transpose one 8×8 bit block.
///
/// Output byte `j` collects bit `7-j` of every input row, with row 0 in
/// bit 7. The transform is an involution: applying it twice yields the
/// original block, which is what the round-trip tests rely on.
#[inline]
pub fn transpose_8x8(rows: [u8; 8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (i, &row) in rows.iter().enumerate() {
        if row == 0 {
            continue;
        }
        for (j, o) in out.iter_mut().enumerate() {
            *o |= ((row >> (7 - j)) & 1) << (7 - i);
        }
    }
    out
}

/// Band row index feeding group row `g` of pass `p`.
#[inline]
fn band_row(interleave: Interleave, pass: u32, group_row: u32) -> u32 {
    match interleave {
        Interleave::Progressive => group_row,
        Interleave::EvenOdd => 2 * group_row + pass,
        Interleave::Stacked => pass * 8 + group_row,
    }
}

/// Transpose a whole band into the printer's column-major layout.
///
/// `out` must be `line_stride × band_height` bytes. Pass layout:
///
/// - stride 1: pass `p` occupies `out[p·8·line_stride ..]` contiguously,
///   one 8-byte column group per input byte;
/// - stride 3 (24-pin): the three passes interleave as
///   `out[column·3 + p]`, so one head column is three adjacent bytes.
pub fn transpose_band(
    band: &ScanBand,
    mode: &ResolutionMode,
    dot_order: DotOrder,
    out: &mut [u8],
) {
    let line_stride = band.line_stride();
    debug_assert_eq!(out.len(), line_stride * mode.band_height as usize);
    out.fill(0);

    for pass in 0..mode.passes as u32 {
        for i in 0..line_stride {
            let mut rows = [0u8; 8];
            for (g, slot) in rows.iter_mut().enumerate() {
                let g = match dot_order {
                    DotOrder::TopBitMsb => g as u32,
                    DotOrder::BottomBitMsb => 7 - g as u32,
                };
                *slot = band.row(band_row(mode.interleave, pass, g))[i];
            }
            let cols = transpose_8x8(rows);
            for (j, &col) in cols.iter().enumerate() {
                let column = i * 8 + j;
                let dst = if mode.out_stride == 1 {
                    pass as usize * line_stride * 8 + column
                } else {
                    column * mode.out_stride + pass as usize
                };
                out[dst] = col;
            }
        }
    }
}
