//! # Bayer 8x8 Ordered Dithering
//!
//! Converts continuous-tone input to the 1-bit planar raster the
//! pipeline consumes. The engine proper treats halftoning as already
//! done upstream; this module exists for the CLI path, which has to
//! produce printable input from ordinary image files.
//!
//! Ordered dithering compares each pixel's intensity against a
//! position-dependent threshold from a repeating 8×8 matrix. The Bayer
//! arrangement spreads consecutive threshold values apart spatially, so
//! flat grays become even dot fields instead of bands.
//!
//! ```text
//! matrix_value = BAYER8[y mod 8][x mod 8]
//! threshold    = (matrix_value + 0.5) / 64
//! print dot    = intensity > threshold
//! ```
//!
//! The +0.5 bias keeps the threshold strictly inside (0, 1): full black
//! always prints and full white never does.

/// Bayer 8x8 dithering matrix. Values 0-63; low values activate first.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Dithering threshold for a pixel position, strictly inside (0, 1).
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Whether to fire a dot at `(x, y)` for ink coverage `intensity`
/// (0.0 = none, 1.0 = solid).
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Pack a row of dot decisions into bytes, MSB leftmost, zero-padded
/// to a whole byte.
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut packed = vec![0u8; pixels.len().div_ceil(8)];
    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            packed[i / 8] |= 0x80 >> (i % 8);
        }
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_is_a_permutation_of_0_63() {
        let mut seen = [false; 64];
        for row in &BAYER8 {
            for &v in row {
                assert!(!seen[v as usize]);
                seen[v as usize] = true;
            }
        }
    }

    #[test]
    fn test_extremes() {
        for y in 0..8 {
            for x in 0..8 {
                assert!(should_print(x, y, 1.0), "solid ink must print");
                assert!(!should_print(x, y, 0.0), "no ink must not print");
            }
        }
    }

    #[test]
    fn test_mid_gray_is_half_coverage() {
        let printed = (0..8)
            .flat_map(|y| (0..8).map(move |x| should_print(x, y, 0.5)))
            .filter(|&p| p)
            .count();
        assert_eq!(printed, 32);
    }

    #[test]
    fn test_pack_row() {
        let row = [true, true, false, false, true, false, true, false];
        assert_eq!(pack_row(&row), vec![0b1100_1010]);
        // Partial byte is MSB-aligned and zero-padded.
        assert_eq!(pack_row(&[true, false, true]), vec![0b1010_0000]);
    }
}
