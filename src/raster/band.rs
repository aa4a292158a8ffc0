//! # Band Buffer & Blank Detection
//!
//! A [`ScanBand`] holds `band_height` consecutive scanlines of one color
//! plane, fetched from the raster source and zero-padded at the end of
//! the page. It is allocated once per page and refilled band by band.
//!
//! ## Blank detection
//!
//! Blankness is tested at two granularities: whole scanline (cheap,
//! drives the vertical skip counter) and whole band (gates the expensive
//! transpose step). A line is blank iff its first byte is zero and every
//! remaining byte equals the first; a single set bit anywhere flips the
//! result.

use crate::error::RastroError;
use crate::raster::source::RasterSource;

/// A scanline is blank iff every byte is 0x00.
#[inline]
pub fn is_blank_line(line: &[u8]) -> bool {
    match line.split_first() {
        Some((&first, rest)) => first == 0 && rest.iter().all(|&b| b == first),
        None => true,
    }
}

/// Band buffer for one color plane.
#[derive(Debug)]
pub struct ScanBand {
    data: Vec<u8>,
    line_stride: usize,
    band_height: u32,
}

impl ScanBand {
    /// Allocate a zeroed band of `band_height` rows.
    ///
    /// Fails with [`RastroError::Allocation`] if the buffer size
    /// overflows, before any allocation is attempted.
    pub fn new(line_stride: usize, band_height: u32) -> Result<Self, RastroError> {
        let size = line_stride
            .checked_mul(band_height as usize)
            .ok_or_else(|| {
                RastroError::Allocation(format!(
                    "band buffer {line_stride} x {band_height} overflows"
                ))
            })?;
        Ok(Self {
            data: vec![0u8; size],
            line_stride,
            band_height,
        })
    }

    #[inline]
    pub fn line_stride(&self) -> usize {
        self.line_stride
    }

    #[inline]
    pub fn band_height(&self) -> u32 {
        self.band_height
    }

    /// The whole band, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// One row of the band.
    #[inline]
    pub fn row(&self, i: u32) -> &[u8] {
        let start = i as usize * self.line_stride;
        &self.data[start..start + self.line_stride]
    }

    /// Refill from the raster source starting at `start_row`. Rows past
    /// the end of the page are zero-padded. Returns the number of real
    /// rows fetched.
    pub fn fill(
        &mut self,
        source: &mut dyn RasterSource,
        plane: usize,
        start_row: u32,
    ) -> Result<u32, RastroError> {
        let fetched = source.read_rows(plane, start_row, &mut self.data)?;
        if fetched > self.band_height {
            return Err(RastroError::ProtocolInvariant(format!(
                "raster source returned {fetched} rows for a {}-row band",
                self.band_height
            )));
        }
        let valid = fetched as usize * self.line_stride;
        self.data[valid..].fill(0);
        Ok(fetched)
    }

    /// Whether every row of the band is blank.
    pub fn is_blank(&self) -> bool {
        is_blank_line(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::source::PlanarRaster;

    #[test]
    fn test_blank_line_all_zero() {
        assert!(is_blank_line(&[0, 0, 0, 0]));
        assert!(is_blank_line(&[]));
    }

    #[test]
    fn test_single_bit_flips_blankness() {
        assert!(!is_blank_line(&[0, 0, 1, 0]));
        assert!(!is_blank_line(&[0x80, 0, 0, 0]));
        assert!(!is_blank_line(&[0, 0, 0, 0x01]));
    }

    #[test]
    fn test_uniform_nonzero_is_not_blank() {
        // All bytes identical but nonzero: dots everywhere.
        assert!(!is_blank_line(&[0xAA, 0xAA, 0xAA]));
    }

    #[test]
    fn test_fill_zero_pads_partial_band() {
        let mut raster = PlanarRaster::blank(2, 10, 1);
        raster.set_pixel(0, 0, 9);
        let mut band = ScanBand::new(2, 8).unwrap();
        let fetched = band.fill(&mut raster, 0, 8).unwrap();
        assert_eq!(fetched, 2);
        assert_eq!(band.row(1), &[0x80, 0x00]);
        // Rows 2..8 padded with zeros.
        for i in 2..8 {
            assert!(is_blank_line(band.row(i)));
        }
    }

    #[test]
    fn test_fill_clears_previous_contents() {
        let mut raster = PlanarRaster::blank(2, 16, 1);
        raster.set_pixel(0, 3, 1);
        let mut band = ScanBand::new(2, 8).unwrap();
        band.fill(&mut raster, 0, 0).unwrap();
        assert!(!band.is_blank());
        band.fill(&mut raster, 0, 8).unwrap();
        assert!(band.is_blank());
    }

    #[test]
    fn test_band_blank_whole_buffer() {
        let band = ScanBand::new(4, 8).unwrap();
        assert!(band.is_blank());
    }
}
