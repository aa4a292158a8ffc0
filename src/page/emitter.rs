//! # Protocol Emitter
//!
//! The emitter owns the output sink and the cursor state, and is the
//! only place in the crate that writes bytes. Every write is checked
//! against the command length: these printers are stateful, and a
//! partially transmitted escape sequence desynchronizes them in a way
//! only a hardware reset can fix, so a short write is fatal and never
//! retried.
//!
//! ## Cursor state
//!
//! [`CursorState`] survives across bands and is mutated exclusively
//! through emitter operations. It tracks:
//!
//! - the vertical position in rows and the pending blank-row skip,
//!   flushed as chunked `ESC J` commands on devices that have one;
//! - the horizontal byte position within the current line;
//! - the selected color plane, so redundant ribbon/ink selects are
//!   suppressed;
//! - the configured line height, so feed commands are only reissued
//!   when the height actually changes;
//! - the last raster transfer mode, feeding the run encoder's
//!   switch-cost amortization.

use std::io::Write;

use crate::device::profile::{
    DeviceProfile, Family, GraphicsMode, Plane, Positioning, ResolutionMode, VerticalAdvance,
};
use crate::encode::rle;
use crate::encode::trim::{self, Segment, TabPolicy};
use crate::encode::RunMode;
use crate::error::RastroError;
use crate::protocol::commands::{CR, LF};
use crate::protocol::{escp, imagewriter};
use crate::raster::ScanBand;

/// Head and stream state, owned by the emitter.
#[derive(Debug, Clone, Default)]
pub struct CursorState {
    /// Vertical position in dot rows from the top of the page.
    pub vertical: u32,
    /// Horizontal position in output bytes from the left margin.
    pub horizontal: usize,
    /// Blank rows accumulated but not yet turned into a skip command.
    pub pending_skip: u32,
    /// Currently selected color plane, if any select has been sent.
    pub active_plane: Option<Plane>,
    /// Configured line-feed height in device units, once set.
    pub line_height: Option<u8>,
    /// Transfer mode of the previous raster band.
    pub run_mode: Option<RunMode>,
}

/// Writes the escape-code stream for one page.
pub struct Emitter<'p, W: Write> {
    sink: W,
    profile: &'p DeviceProfile,
    mode: &'p ResolutionMode,
    cursor: CursorState,
    bytes_written: u64,
}

impl<'p, W: Write> Emitter<'p, W> {
    pub fn new(sink: W, profile: &'p DeviceProfile, mode: &'p ResolutionMode) -> Self {
        Self {
            sink,
            profile,
            mode,
            cursor: CursorState::default(),
            bytes_written: 0,
        }
    }

    /// Total bytes accepted by the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// The single checked write. `written != len` is a corrupt stream.
    fn put(&mut self, bytes: &[u8]) -> Result<(), RastroError> {
        let written = self.sink.write(bytes)?;
        if written != bytes.len() {
            return Err(RastroError::ShortWrite {
                expected: bytes.len(),
                written,
            });
        }
        self.bytes_written += written as u64;
        Ok(())
    }

    /// Line-feed height in device units that advances exactly one band.
    ///
    /// ImageWriter heights are in 1/144": one band is 16/144 at every
    /// supported vertical resolution. Epson heights are in the `ESC J`
    /// unit, one band = `band_height × units_per_row`.
    fn band_line_height(&self) -> u8 {
        match self.profile.family {
            Family::ImageWriter => 16,
            Family::Epson | Family::EscP2 => match self.mode.advance {
                VerticalAdvance::EscJ { units_per_row } => {
                    (self.mode.band_height * units_per_row) as u8
                }
                VerticalAdvance::LineFeed => self.mode.band_height as u8,
            },
        }
    }

    /// Set the line-feed height, if it differs from the current one.
    pub fn set_line_height(&mut self, n: u8) -> Result<(), RastroError> {
        if self.cursor.line_height == Some(n) {
            return Ok(());
        }
        let cmd = match self.profile.family {
            Family::ImageWriter => imagewriter::line_height(n),
            Family::Epson | Family::EscP2 => escp::line_height(n),
        };
        self.put(&cmd)?;
        self.cursor.line_height = Some(n);
        Ok(())
    }

    // ========================================================================
    // PAGE LIFECYCLE
    // ========================================================================

    /// Initialization commands: reset/bin/direction/line-height/pitch.
    pub fn begin_page(
        &mut self,
        unidirectional: bool,
        bin: Option<u8>,
    ) -> Result<(), RastroError> {
        match self.profile.family {
            Family::ImageWriter => {
                if let Some(bin) = bin {
                    self.put(&imagewriter::bin_select(bin))?;
                }
                self.put(&imagewriter::direction(unidirectional))?;
                self.set_line_height(self.band_line_height())?;
                let pitch = self.mode.pitch;
                if !pitch.is_empty() {
                    self.put(pitch)?;
                }
            }
            Family::Epson | Family::EscP2 => {
                self.put(&escp::init())?;
                self.set_line_height(self.band_line_height())?;
                self.put(&escp::direction(unidirectional))?;
            }
        }
        Ok(())
    }

    /// Page eject. The ImageWriter family never form-feeds: the
    /// per-band line feeds already carried the paper, so it only
    /// restores text defaults. The Epson families form-feed and reset.
    pub fn eject(&mut self) -> Result<(), RastroError> {
        match self.profile.family {
            Family::ImageWriter => self.put(&imagewriter::reset())?,
            Family::Epson | Family::EscP2 => self.put(&escp::eject())?,
        }
        self.sink.flush()?;
        Ok(())
    }

    // ========================================================================
    // VERTICAL MOTION
    // ========================================================================

    /// Account for blank rows without emitting anything yet.
    pub fn add_skip_rows(&mut self, rows: u32) {
        self.cursor.pending_skip += rows;
    }

    /// Turn the accumulated blank rows into skip commands, chunked at
    /// the device maximum. A no-op when nothing is pending; trailing
    /// blank rows at the bottom of a page are simply never flushed.
    pub fn flush_skip(&mut self) -> Result<(), RastroError> {
        if self.cursor.pending_skip == 0 {
            return Ok(());
        }
        let units_per_row = match self.mode.advance {
            VerticalAdvance::EscJ { units_per_row } => units_per_row,
            VerticalAdvance::LineFeed => {
                return Err(RastroError::ProtocolInvariant(
                    "skip accumulated on a device without a skip command".into(),
                ));
            }
        };
        let mut units = self.cursor.pending_skip * units_per_row;
        let max = self.profile.max_skip_command as u32;
        while units > 0 {
            let n = units.min(max);
            self.put(&escp::skip(n as u8))?;
            units -= n;
        }
        self.cursor.vertical += self.cursor.pending_skip;
        self.cursor.pending_skip = 0;
        Ok(())
    }

    /// Return the head to column 0 without advancing.
    pub fn carriage_return(&mut self) -> Result<(), RastroError> {
        self.put(&[CR])?;
        self.cursor.horizontal = 0;
        Ok(())
    }

    /// Return the head and advance one line at the current height.
    pub fn line_feed(&mut self) -> Result<(), RastroError> {
        self.put(&[CR, LF])?;
        self.cursor.horizontal = 0;
        Ok(())
    }

    /// Advance past a band with CR + LF. When a fine pass feed already
    /// consumed 1/144" of the band height (`pass_fed`), the line height
    /// is set to the remaining 15/144 so the feed completes the band;
    /// otherwise it is restored to the full band height.
    pub fn finish_band(&mut self, pass_fed: bool) -> Result<(), RastroError> {
        if pass_fed {
            self.set_line_height(15)?;
        } else {
            self.set_line_height(self.band_line_height())?;
        }
        self.line_feed()?;
        self.cursor.vertical += self.mode.band_height;
        Ok(())
    }

    /// Fine feed between interleaved passes (1/144" on the
    /// ImageWriter). Leaves the line height at 1; the closing
    /// [`finish_band`](Self::finish_band) raises it to the remainder
    /// after the second pass's data.
    pub fn pass_feed(&mut self) -> Result<(), RastroError> {
        self.set_line_height(1)?;
        self.put(&[LF])?;
        self.cursor.horizontal = 0;
        Ok(())
    }

    // ========================================================================
    // COLOR
    // ========================================================================

    /// Select a color plane, suppressing redundant selects.
    pub fn select_plane(&mut self, plane: Plane) -> Result<(), RastroError> {
        if self.cursor.active_plane == Some(plane) {
            return Ok(());
        }
        let cmd = match self.profile.family {
            Family::ImageWriter => imagewriter::color_select(plane),
            Family::Epson | Family::EscP2 => escp::color_select(plane),
        };
        self.put(&cmd)?;
        self.cursor.active_plane = Some(plane);
        Ok(())
    }

    // ========================================================================
    // GRAPHICS
    // ========================================================================

    fn tab_policy(&self) -> TabPolicy {
        let stride = self.mode.out_stride;
        match self.profile.positioning {
            Positioning::PicaTab => {
                // Threshold in columns, scaled to output bytes.
                let tenths = self.mode.x_dpi * self.profile.min_tab_10ths / 10;
                TabPolicy {
                    stride,
                    bytes_per_stop: (self.mode.x_dpi / 10) as usize * stride,
                    min_run: self.profile.min_tab_bytes.max(tenths as usize * stride),
                    min_gain: self.profile.min_tab_gain,
                    interior: self.profile.interior_tabs,
                }
            }
            Positioning::RepeatZero | Positioning::DotOffset => TabPolicy {
                stride,
                bytes_per_stop: 1,
                min_run: self.profile.min_tab_bytes,
                min_gain: self.profile.min_tab_gain,
                interior: self.profile.interior_tabs,
            },
        }
    }

    /// Position the head at `to_byte` without printing.
    fn emit_position(&mut self, to_byte: usize) -> Result<(), RastroError> {
        let stride = self.mode.out_stride;
        let columns = ((to_byte - self.cursor.horizontal) / stride) as u16;
        match self.profile.positioning {
            Positioning::RepeatZero => {
                let hires = matches!(
                    self.mode.graphics,
                    GraphicsMode::AsciiBitmap { hires: true }
                );
                let pattern: &[u8] = if hires { &[0, 0, 0] } else { &[0] };
                self.put(&imagewriter::repeat_column(columns, pattern, hires))?;
            }
            Positioning::PicaTab => {
                let stop = (to_byte / stride) / (self.mode.x_dpi / 10) as usize;
                self.put(&escp::tab_to(stop as u8))?;
            }
            Positioning::DotOffset => {
                self.put(&escp::move_relative((columns as i16) * 8))?;
            }
        }
        self.cursor.horizontal = to_byte;
        Ok(())
    }

    /// Emit one transposed 8-row pass (or a whole stacked 24-row band)
    /// as bitmap commands, eliding zero runs per the device's
    /// positioning strategy. Returns whether anything was printed; an
    /// all-zero pass emits nothing at all.
    pub fn emit_pass(&mut self, data: &[u8]) -> Result<bool, RastroError> {
        let stride = self.mode.out_stride;
        let trimmed = trim::trim_trailing(data, stride);
        if trimmed.is_empty() {
            return Ok(false);
        }
        for segment in trim::split_segments(trimmed, &self.tab_policy()) {
            match segment {
                Segment::Skip { to_byte } => self.emit_position(to_byte)?,
                Segment::Print { data, .. } => {
                    let columns = (data.len() / stride) as u16;
                    let header = match self.mode.graphics {
                        GraphicsMode::AsciiBitmap { hires } => {
                            imagewriter::bitmap_header(columns, hires)
                        }
                        GraphicsMode::BitImage { mode } => {
                            escp::bit_image_header(mode, columns)
                        }
                        GraphicsMode::RasterDot { .. } => {
                            return Err(RastroError::ProtocolInvariant(
                                "bit-image pass on a raster-mode device".into(),
                            ));
                        }
                    };
                    self.put(&header)?;
                    self.put(data)?;
                    self.cursor.horizontal += data.len();
                }
            }
        }
        Ok(true)
    }

    /// Emit one untransposed band as an ESC/P2 raster command,
    /// compressed when the run encoder's cost model says it pays.
    /// Returns whether anything was printed.
    pub fn emit_raster_band(&mut self, band: &ScanBand) -> Result<bool, RastroError> {
        let (v, h, lines) = match self.mode.graphics {
            GraphicsMode::RasterDot { v, h, lines } => (v, h, lines),
            _ => {
                return Err(RastroError::ProtocolInvariant(
                    "raster band on a bit-image device".into(),
                ));
            }
        };
        let stride = band.line_stride();

        // Tight byte bounds across all rows of the band.
        let mut left = stride;
        let mut right = 0usize;
        for i in 0..band.band_height() {
            let row = band.row(i);
            if let Some(first) = row.iter().position(|&b| b != 0) {
                left = left.min(first);
            }
            if let Some(last) = row.iter().rposition(|&b| b != 0) {
                right = right.max(last + 1);
            }
        }
        if right == 0 {
            return Ok(false);
        }
        // Elide the left margin only when the move beats its cost.
        if left < self.profile.min_tab_bytes || left <= self.profile.min_tab_gain {
            left = 0;
        }
        if left > 0 {
            self.put(&escp::move_relative((left * 8) as i16))?;
            self.cursor.horizontal = left;
        }

        let mut payload = Vec::with_capacity((right - left) * band.band_height() as usize);
        for i in 0..band.band_height() {
            payload.extend_from_slice(&band.row(i)[left..right]);
        }
        let run_mode = rle::choose_mode(
            self.cursor.run_mode,
            payload.len(),
            rle::compressed_len(&payload),
            self.profile.mode_switch_cost,
        );
        let dots = ((right - left) * 8) as u16;
        self.put(&escp::raster_header(
            run_mode == RunMode::Rle,
            v,
            h,
            lines,
            dots,
        ))?;
        match run_mode {
            RunMode::Literal => self.put(&payload)?,
            RunMode::Rle => {
                let mut compressed = Vec::new();
                rle::compress(&payload, &mut compressed);
                self.put(&compressed)?;
            }
        }
        self.cursor.run_mode = Some(run_mode);
        self.cursor.horizontal = right;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands::ESC;

    fn emitter(profile: &'static DeviceProfile) -> Emitter<'static, Vec<u8>> {
        Emitter::new(Vec::new(), profile, profile.default_mode())
    }

    fn emitter_mode(
        profile: &'static DeviceProfile,
        mode_idx: usize,
    ) -> Emitter<'static, Vec<u8>> {
        Emitter::new(Vec::new(), profile, &profile.modes[mode_idx])
    }

    #[test]
    fn test_short_write_is_fatal() {
        struct Stingy;
        impl Write for Stingy {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                Ok(buf.len().saturating_sub(1))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut e = Emitter::new(Stingy, &DeviceProfile::EPSON9, &DeviceProfile::EPSON9.modes[1]);
        let err = e.carriage_return().unwrap_err();
        assert!(matches!(
            err,
            RastroError::ShortWrite {
                expected: 1,
                written: 0
            }
        ));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_skip_flush_chunks_at_255() {
        let mut e = emitter_mode(&DeviceProfile::EPSON9, 1);
        // 100 blank rows at 3 units each = 300 units: 255 + 45.
        e.add_skip_rows(100);
        e.flush_skip().unwrap();
        assert_eq!(e.sink, vec![ESC, b'J', 255, ESC, b'J', 45]);
        assert_eq!(e.cursor.pending_skip, 0);
        assert_eq!(e.cursor.vertical, 100);
    }

    #[test]
    fn test_flush_skip_noop_when_empty() {
        let mut e = emitter_mode(&DeviceProfile::EPSON9, 1);
        e.flush_skip().unwrap();
        assert!(e.sink.is_empty());
    }

    #[test]
    fn test_plane_select_dedup() {
        let mut e = emitter(&DeviceProfile::ESCP2_CMYK);
        e.select_plane(Plane::Cyan).unwrap();
        e.select_plane(Plane::Cyan).unwrap();
        assert_eq!(e.sink, vec![ESC, b'r', 2]);
        e.select_plane(Plane::Black).unwrap();
        assert_eq!(e.sink.len(), 6);
    }

    #[test]
    fn test_line_height_dedup() {
        let mut e = emitter_mode(&DeviceProfile::EPSON9, 1);
        e.set_line_height(24).unwrap();
        e.set_line_height(24).unwrap();
        assert_eq!(e.sink, vec![ESC, b'3', 24]);
    }

    #[test]
    fn test_emit_pass_blank_emits_nothing() {
        let mut e = emitter_mode(&DeviceProfile::EPSON9, 1);
        assert!(!e.emit_pass(&[0u8; 64]).unwrap());
        assert!(e.sink.is_empty());
    }

    #[test]
    fn test_emit_pass_single_column() {
        let mut e = emitter_mode(&DeviceProfile::EPSON9, 1);
        let mut data = vec![0u8; 16];
        data[0] = 0x80;
        assert!(e.emit_pass(&data).unwrap());
        // Mode 1 bit image, one column, trailing zeros trimmed.
        assert_eq!(e.sink, vec![ESC, b'L', 1, 0, 0x80]);
    }

    #[test]
    fn test_emit_pass_imagewriter_repeat_zero_positioning() {
        let mut e = emitter(&DeviceProfile::APPLEDMP);
        let mut data = vec![0u8; 40];
        data[20] = 0x01;
        assert!(e.emit_pass(&data).unwrap());
        let mut expected = imagewriter::repeat_column(20, &[0], false);
        expected.extend(imagewriter::bitmap_header(1, false));
        expected.push(0x01);
        assert_eq!(e.sink, expected);
    }

    #[test]
    fn test_emit_pass_short_leading_run_prints_zeros() {
        // 5 zero columns are cheaper to print than to position past.
        let mut e = emitter(&DeviceProfile::APPLEDMP);
        let mut data = vec![0u8; 8];
        data[5] = 0xFF;
        assert!(e.emit_pass(&data).unwrap());
        let mut expected = imagewriter::bitmap_header(6, false);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0xFF]);
        assert_eq!(e.sink, expected);
    }

    #[test]
    fn test_emit_pass_pica_tab_interior_run() {
        // epson9 at 120 dpi: stops every 12 bytes, threshold 180 bytes.
        let mut e = emitter_mode(&DeviceProfile::EPSON9, 1);
        let mut data = vec![0xAAu8; 4];
        data.extend(std::iter::repeat(0).take(200));
        data.push(0xBB);
        assert!(e.emit_pass(&data).unwrap());
        // 4 + 200 = 204; stop at byte 204, pica position 17.
        let mut expected = escp::bit_image_header(1, 4);
        expected.extend_from_slice(&[0xAA; 4]);
        expected.extend(escp::tab_to(17));
        expected.extend(escp::bit_image_header(1, 1));
        expected.push(0xBB);
        assert_eq!(e.sink, expected);
    }

    #[test]
    fn test_raster_band_literal_vs_rle() {
        let mut e = emitter(&DeviceProfile::ESCP2_CMYK);
        let mut band = ScanBand::new(4, 8).unwrap();
        let mut raster = crate::raster::PlanarRaster::blank(4, 8, 1);
        for y in 0..8 {
            for x in 0..32 {
                raster.set_pixel(0, x, y);
            }
        }
        band.fill(&mut raster, 0, 0).unwrap();
        assert!(e.emit_raster_band(&band).unwrap());
        // 32 bytes of 0xFF: RLE wins (2 bytes).
        let mut expected = escp::raster_header(true, 20, 20, 8, 32);
        expected.extend_from_slice(&[0xE1, 0xFF]); // repeat 32
        assert_eq!(e.sink, expected);
        assert_eq!(e.cursor.run_mode, Some(RunMode::Rle));
    }

    #[test]
    fn test_raster_band_blank_emits_nothing() {
        let mut e = emitter(&DeviceProfile::ESCP2_CMYK);
        let band = ScanBand::new(4, 8).unwrap();
        assert!(!e.emit_raster_band(&band).unwrap());
        assert!(e.sink.is_empty());
    }

    #[test]
    fn test_raster_band_left_margin_move() {
        let mut e = emitter(&DeviceProfile::ESCP2_CMYK);
        let stride = 20;
        let mut raster = crate::raster::PlanarRaster::blank(stride, 8, 1);
        raster.set_pixel(0, (15 * 8) as u32, 3); // first ink at byte 15
        let mut band = ScanBand::new(stride, 8).unwrap();
        band.fill(&mut raster, 0, 0).unwrap();
        assert!(e.emit_raster_band(&band).unwrap());
        // Move 15 bytes = 120 dots, then a one-byte-wide band.
        assert_eq!(&e.sink[..4], &escp::move_relative(120)[..]);
        assert_eq!(e.cursor.horizontal, 16);
    }

    #[test]
    fn test_pass_feed_and_finish_band_total_one_band() {
        let mut e = emitter_mode(&DeviceProfile::IMAGEWRITER_II, 0);
        e.set_line_height(16).unwrap();
        e.sink.clear();
        e.pass_feed().unwrap();
        // T01 + LF (1/144 consumed); the height stays low until the
        // second pass's data is out.
        let mut expected = imagewriter::line_height(1);
        expected.push(LF);
        assert_eq!(e.sink, expected);
        e.sink.clear();
        // Fed band: the remaining 15/144 close it out.
        e.finish_band(true).unwrap();
        let mut expected = imagewriter::line_height(15);
        expected.extend_from_slice(&[CR, LF]);
        assert_eq!(e.sink, expected);
        assert_eq!(e.cursor.vertical, 16);
        e.sink.clear();
        // Unfed band: height goes back to the full 16/144.
        e.finish_band(false).unwrap();
        let mut expected = imagewriter::line_height(16);
        expected.extend_from_slice(&[CR, LF]);
        assert_eq!(e.sink, expected);
        assert_eq!(e.cursor.vertical, 32);
    }
}
