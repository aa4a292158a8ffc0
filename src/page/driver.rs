//! # Page Driver
//!
//! Orchestrates one page: validates the capability descriptor, emits
//! init, iterates bands (pulling scanlines through the raster accessor,
//! sequencing color planes, transposing and encoding each band), emits
//! the eject/reset sequence, and owns the error path.
//!
//! ## State machine
//!
//! ```text
//! Uninitialized → Initializing → Banding → Ejecting → Done
//!                           ↘ ErrorCleanup (from anywhere)
//! ```
//!
//! `ErrorCleanup` releases every buffer (scoped ownership does this on
//! return) and surfaces the error. Validation failures happen in
//! `Uninitialized`, before any byte reaches the sink; later failures are
//! fatal for the page and the partial output must be discarded.

use std::io::Write;

use crate::device::profile::{DeviceProfile, GraphicsMode, Interleave, Plane, VerticalAdvance};
use crate::device::Capabilities;
use crate::error::RastroError;
use crate::page::emitter::Emitter;
use crate::raster::transpose::transpose_band;
use crate::raster::{RasterSource, ScanBand};

/// Page processing phase, visible to the caller for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Initializing,
    Banding,
    Ejecting,
    Done,
    ErrorCleanup,
}

/// What a completed page looked like.
#[derive(Debug, Clone)]
pub struct PageSummary {
    /// Bands processed, including blank ones.
    pub bands: u32,
    /// Total bytes accepted by the sink.
    pub bytes_written: u64,
    /// Non-fatal findings from validation (unsafe-margin notice).
    pub warnings: Vec<String>,
}

/// Drives one page through the pipeline.
pub struct PageDriver<'p> {
    profile: &'p DeviceProfile,
    caps: Capabilities,
    state: PageState,
}

impl<'p> PageDriver<'p> {
    pub fn new(profile: &'p DeviceProfile, caps: Capabilities) -> Self {
        Self {
            profile,
            caps,
            state: PageState::Uninitialized,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Process the whole page into `sink`.
    ///
    /// On a recoverable error (configuration, allocation) nothing has
    /// been written; on a fatal error the stream is partial and must
    /// not be sent to a printer. Either way the driver ends in
    /// `ErrorCleanup` and all buffers are released before returning.
    pub fn print_page<W: Write>(
        &mut self,
        source: &mut dyn RasterSource,
        sink: W,
    ) -> Result<PageSummary, RastroError> {
        self.state = PageState::Uninitialized;
        match self.run(source, sink) {
            Ok(summary) => {
                self.state = PageState::Done;
                Ok(summary)
            }
            Err(e) => {
                self.state = PageState::ErrorCleanup;
                Err(e)
            }
        }
    }

    fn run<W: Write>(
        &mut self,
        source: &mut dyn RasterSource,
        sink: W,
    ) -> Result<PageSummary, RastroError> {
        let validated = self.caps.validate(self.profile)?;
        let mode = validated.mode;
        let warnings = validated.warnings;

        let line_stride = self.caps.line_stride();
        if source.line_stride() != line_stride {
            return Err(RastroError::ProtocolInvariant(format!(
                "raster source stride {} does not match descriptor stride {}",
                source.line_stride(),
                line_stride
            )));
        }

        let mut band = ScanBand::new(line_stride, mode.band_height)?;
        let mut transposed = vec![0u8; line_stride * mode.band_height as usize];

        self.state = PageState::Initializing;
        let mut emitter = Emitter::new(sink, self.profile, mode);
        emitter.begin_page(self.caps.unidirectional, self.caps.bin)?;

        // Monochrome devices print one anonymous plane; color devices
        // run the profile's declared pass order.
        let color = self.profile.num_components == 4;
        let order: &[Plane] = if color {
            self.profile.color_order
        } else {
            &[Plane::Black]
        };

        self.state = PageState::Banding;
        let mut bands = 0u32;
        let mut row = 0u32;
        while row < self.caps.height_px {
            let mut printed_any = false;
            let mut pass_fed = false;

            for (i, &plane) in order.iter().enumerate() {
                let final_plane = i == order.len() - 1;
                let plane_index = if color { plane.index() } else { 0 };
                band.fill(source, plane_index, row)?;
                if band.is_blank() {
                    continue;
                }

                emitter.flush_skip()?;
                if color {
                    emitter.select_plane(plane)?;
                }

                match mode.graphics {
                    GraphicsMode::RasterDot { .. } => {
                        emitter.emit_raster_band(&band)?;
                    }
                    _ => {
                        transpose_band(&band, mode, self.profile.dot_order, &mut transposed);
                        match mode.interleave {
                            Interleave::EvenOdd => {
                                let half = line_stride * 8;
                                emitter.emit_pass(&transposed[..half])?;
                                // Intermediate colors overprint both
                                // passes at the same head height; only
                                // the final plane takes the fine feed.
                                if final_plane {
                                    emitter.pass_feed()?;
                                    pass_fed = true;
                                } else {
                                    emitter.carriage_return()?;
                                }
                                emitter.emit_pass(&transposed[half..])?;
                            }
                            _ => {
                                emitter.emit_pass(&transposed)?;
                            }
                        }
                    }
                }

                printed_any = true;
                if !final_plane {
                    emitter.carriage_return()?;
                }
            }

            if printed_any {
                emitter.finish_band(pass_fed)?;
            } else {
                match mode.advance {
                    VerticalAdvance::EscJ { .. } => {
                        emitter.add_skip_rows(mode.band_height);
                    }
                    // No skip command on this family: a blank band is
                    // still a full CR + LF, never silently dropped.
                    VerticalAdvance::LineFeed => emitter.finish_band(false)?,
                }
            }

            bands += 1;
            row += mode.band_height;
        }

        self.state = PageState::Ejecting;
        emitter.eject()?;

        Ok(PageSummary {
            bands,
            bytes_written: emitter.bytes_written(),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands::{CR, ESC, FF, LF};
    use crate::protocol::{escp, imagewriter};
    use crate::raster::PlanarRaster;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_error_writes_zero_bytes() {
        // 8.5" platen at 120 dpi = 1020 px maximum.
        let caps = Capabilities::mono(120, 72, 2000, 16);
        let mut source = PlanarRaster::blank(250, 16, 1);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::EPSON9, caps);
        let err = driver.print_page(&mut source, &mut sink).unwrap_err();
        assert!(matches!(err, RastroError::Config(_)));
        assert!(sink.is_empty());
        assert_eq!(driver.state(), PageState::ErrorCleanup);
    }

    #[test]
    fn test_stride_mismatch_is_invariant_error() {
        let caps = Capabilities::mono(120, 72, 80, 8);
        let mut source = PlanarRaster::blank(99, 8, 1);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::EPSON9, caps);
        let err = driver.print_page(&mut source, &mut sink).unwrap_err();
        assert!(matches!(err, RastroError::ProtocolInvariant(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_epson_blank_leading_band_becomes_skip() {
        // Blank first band, single dot at the top of the second.
        let caps = Capabilities::mono(120, 72, 8, 16);
        let mut source = PlanarRaster::blank(1, 16, 1);
        source.set_pixel(0, 0, 8);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::EPSON9, caps);
        let summary = driver.print_page(&mut source, &mut sink).unwrap();

        let mut expected = escp::init();
        expected.extend(escp::line_height(24)); // 8 rows x 3/216"
        expected.extend(escp::direction(false));
        expected.extend(escp::skip(24)); // 8 blank rows
        expected.extend(escp::bit_image_header(1, 1));
        expected.push(0x80);
        expected.extend_from_slice(&[CR, LF]);
        expected.extend(escp::eject());
        assert_eq!(sink, expected);
        assert_eq!(summary.bands, 2);
        assert_eq!(summary.bytes_written, sink.len() as u64);
        assert_eq!(driver.state(), PageState::Done);
    }

    #[test]
    fn test_trailing_blank_bands_never_flush() {
        // Content only in the first band; the rest of the page rides
        // on the form feed.
        let caps = Capabilities::mono(120, 72, 8, 32);
        let mut source = PlanarRaster::blank(1, 32, 1);
        source.set_pixel(0, 0, 0);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::EPSON9, caps);
        driver.print_page(&mut source, &mut sink).unwrap();
        // No ESC J anywhere: the three trailing blank bands are dropped.
        assert!(!sink.windows(2).any(|w| w == [ESC, b'J']));
        assert_eq!(&sink[sink.len() - 3..], &[FF, ESC, b'@']);
    }

    #[test]
    fn test_imagewriter_blank_band_still_advances() {
        let caps = Capabilities::mono(120, 72, 8, 16);
        let mut source = PlanarRaster::blank(1, 16, 1);
        source.set_pixel(0, 0, 8);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::APPLEDMP, caps);
        driver.print_page(&mut source, &mut sink).unwrap();

        let mut expected = imagewriter::direction(false);
        expected.extend(imagewriter::line_height(16));
        expected.extend_from_slice(imagewriter::PITCH_CONDENSED);
        expected.extend_from_slice(&[CR, LF]); // blank band: advance only
        expected.extend(imagewriter::bitmap_header(1, false));
        expected.push(0x01); // reversed dot order: top row in bit 0
        expected.extend_from_slice(&[CR, LF]);
        expected.extend(imagewriter::reset());
        assert_eq!(sink, expected);
    }

    #[test]
    fn test_color_plane_sequencing_escp2() {
        // Ink only in the second declared plane (magenta): exactly one
        // select, one raster command, and a bare CR after it.
        let caps = Capabilities::cmyk(180, 180, 32, 8);
        let mut source = PlanarRaster::blank(4, 8, 4);
        source.set_pixel(Plane::Magenta.index(), 0, 0);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::ESCP2_CMYK, caps);
        driver.print_page(&mut source, &mut sink).unwrap();

        let mut expected = escp::init();
        expected.extend(escp::line_height(8));
        expected.extend(escp::direction(false));
        expected.extend(escp::color_select(Plane::Magenta));
        expected.extend(escp::raster_header(true, 20, 20, 8, 8));
        // One byte per row, only row 0 inked; the seven zero rows make
        // the run-length encoding cheaper than the 8 literal bytes.
        expected.extend_from_slice(&[0x00, 0x80, 0xFA, 0x00]);
        expected.push(CR); // not the line-feed variant
        expected.extend_from_slice(&[CR, LF]); // band still closes with a feed
        expected.extend(escp::eject());
        assert_eq!(sink, expected);
    }

    #[test]
    fn test_color_black_plane_gets_line_feed() {
        let caps = Capabilities::cmyk(180, 180, 32, 8);
        let mut source = PlanarRaster::blank(4, 8, 4);
        source.set_pixel(Plane::Black.index(), 0, 0);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::ESCP2_CMYK, caps);
        driver.print_page(&mut source, &mut sink).unwrap();
        // The final plane ends the band with CR LF before the eject.
        let eject = escp::eject();
        let tail = &sink[sink.len() - eject.len() - 2..];
        assert_eq!(&tail[..2], &[CR, LF]);
    }

    #[test]
    fn test_imagewriter_color_ribbon_order() {
        // Ink in every plane: selects must run Y, C, M, K.
        let caps = Capabilities::cmyk(120, 72, 8, 8);
        let mut source = PlanarRaster::blank(1, 8, 4);
        for plane in 0..4 {
            source.set_pixel(plane, 0, 0);
        }
        let mut sink = Vec::new();
        let mut driver =
            PageDriver::new(&DeviceProfile::IMAGEWRITER_II_COLOR, caps);
        driver.print_page(&mut source, &mut sink).unwrap();

        let selects: Vec<u8> = sink
            .windows(3)
            .filter(|w| w[0] == ESC && w[1] == b'K')
            .map(|w| w[2])
            .collect();
        assert_eq!(selects, vec![b'1', b'3', b'2', b'0']);
    }

    #[test]
    fn test_wide_blank_page_chunked_skip_absent() {
        // A page that is entirely blank emits init + eject only.
        let caps = Capabilities::mono(120, 72, 800, 800);
        let mut source = PlanarRaster::blank(100, 800, 1);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::EPSON9, caps);
        let summary = driver.print_page(&mut source, &mut sink).unwrap();
        let mut expected = escp::init();
        expected.extend(escp::line_height(24));
        expected.extend(escp::direction(false));
        expected.extend(escp::eject());
        assert_eq!(sink, expected);
        assert_eq!(summary.bands, 100);
    }

    #[test]
    fn test_deep_skip_chunks_at_255_units() {
        // 96 blank rows = 288 units: one ESC J 255 and one ESC J 33.
        let caps = Capabilities::mono(120, 72, 8, 104);
        let mut source = PlanarRaster::blank(1, 104, 1);
        source.set_pixel(0, 0, 96);
        let mut sink = Vec::new();
        let mut driver = PageDriver::new(&DeviceProfile::EPSON9, caps);
        driver.print_page(&mut source, &mut sink).unwrap();
        let mut skips = Vec::new();
        for w in sink.windows(3) {
            if w[0] == ESC && w[1] == b'J' {
                skips.push(w[2]);
            }
        }
        assert_eq!(skips, vec![255, 33]);
    }
}
