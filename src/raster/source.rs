//! # Raster Source Contract
//!
//! The rendering engine that rasterizes, color-separates and halftones
//! the page lives outside this crate. The pipeline consumes it through
//! one narrow accessor: "give me the next N scanlines of plane P".
//!
//! Rows are 1 bit per pixel, packed MSB-leftmost, exactly
//! [`RasterSource::line_stride`] bytes each. A source may return fewer
//! rows than requested only at the end of the page; the band buffer
//! zero-pads the remainder.

use crate::error::RastroError;

/// Accessor for device-independent, already-halftoned scanlines.
pub trait RasterSource {
    /// Bytes per scanline of one color plane.
    fn line_stride(&self) -> usize;

    /// Total page height in rows.
    fn height(&self) -> u32;

    /// Fill `out` with consecutive rows of `plane` starting at
    /// `start_row`, one `line_stride` chunk per row. Returns the number
    /// of rows actually provided, which is less than requested only
    /// when the page ends inside the range.
    fn read_rows(
        &mut self,
        plane: usize,
        start_row: u32,
        out: &mut [u8],
    ) -> Result<u32, RastroError>;
}

/// In-memory planar raster: one packed 1-bit buffer per color plane.
///
/// This is the implementation used by the CLI (after dithering) and by
/// tests; a real rendering engine would implement [`RasterSource`]
/// directly over its band store.
#[derive(Debug, Clone)]
pub struct PlanarRaster {
    planes: Vec<Vec<u8>>,
    line_stride: usize,
    height: u32,
}

impl PlanarRaster {
    /// All-white raster with `num_planes` planes.
    pub fn blank(line_stride: usize, height: u32, num_planes: usize) -> Self {
        Self {
            planes: vec![vec![0u8; line_stride * height as usize]; num_planes],
            line_stride,
            height,
        }
    }

    /// Single-plane raster over existing row data.
    ///
    /// `data` must be `line_stride × height` bytes.
    pub fn from_rows(line_stride: usize, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), line_stride * height as usize);
        Self {
            planes: vec![data],
            line_stride,
            height,
        }
    }

    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Set a single pixel (dot) in one plane.
    pub fn set_pixel(&mut self, plane: usize, x: u32, y: u32) {
        let idx = y as usize * self.line_stride + (x / 8) as usize;
        self.planes[plane][idx] |= 0x80 >> (x % 8);
    }

    /// One row of one plane.
    pub fn row(&self, plane: usize, y: u32) -> &[u8] {
        let start = y as usize * self.line_stride;
        &self.planes[plane][start..start + self.line_stride]
    }
}

impl RasterSource for PlanarRaster {
    fn line_stride(&self) -> usize {
        self.line_stride
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_rows(
        &mut self,
        plane: usize,
        start_row: u32,
        out: &mut [u8],
    ) -> Result<u32, RastroError> {
        let requested = (out.len() / self.line_stride) as u32;
        if plane >= self.planes.len() {
            return Err(RastroError::ProtocolInvariant(format!(
                "raster has {} planes, plane {} requested",
                self.planes.len(),
                plane
            )));
        }
        let available = self.height.saturating_sub(start_row).min(requested);
        let src_start = start_row as usize * self.line_stride;
        let len = available as usize * self.line_stride;
        out[..len].copy_from_slice(&self.planes[plane][src_start..src_start + len]);
        Ok(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_pixel_packs_msb_left() {
        let mut raster = PlanarRaster::blank(2, 4, 1);
        raster.set_pixel(0, 0, 0);
        raster.set_pixel(0, 9, 1);
        assert_eq!(raster.row(0, 0), &[0x80, 0x00]);
        assert_eq!(raster.row(0, 1), &[0x00, 0x40]);
    }

    #[test]
    fn test_read_rows_full() {
        let mut raster = PlanarRaster::blank(3, 8, 1);
        raster.set_pixel(0, 0, 2);
        let mut buf = vec![0xFFu8; 3 * 8];
        let n = raster.read_rows(0, 0, &mut buf).unwrap();
        assert_eq!(n, 8);
        assert_eq!(&buf[6..9], &[0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_read_rows_short_at_page_end() {
        let mut raster = PlanarRaster::blank(2, 10, 1);
        let mut buf = vec![0u8; 2 * 8];
        let n = raster.read_rows(0, 8, &mut buf).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_read_rows_past_end() {
        let mut raster = PlanarRaster::blank(2, 4, 1);
        let mut buf = vec![0u8; 2 * 8];
        let n = raster.read_rows(0, 4, &mut buf).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_bad_plane_is_invariant_error() {
        let mut raster = PlanarRaster::blank(2, 4, 1);
        let mut buf = vec![0u8; 2];
        let err = raster.read_rows(3, 0, &mut buf).unwrap_err();
        assert!(err.is_fatal());
    }
}
