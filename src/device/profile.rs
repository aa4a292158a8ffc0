//! # Device Profiles
//!
//! This module defines hardware protocol facts for the supported printer
//! families. A [`DeviceProfile`] carries everything device-specific the
//! generic pipeline needs: supported resolution modes, graphics command
//! encoding, head-positioning strategy, color pass order, and the
//! compression thresholds. The pipeline itself contains no per-device
//! branching beyond what these tables describe.
//!
//! ## Supported Devices
//!
//! | Profile | Resolutions | Colors | Platen | Family |
//! |---------|-------------|--------|--------|--------|
//! | `appledmp` | 120×72 | mono | 8.5" | ImageWriter |
//! | `iwlo` | 160×72, 120×72 | mono | 8.5" | ImageWriter |
//! | `iwhi` | 160×144, 160×72, 120×72 | mono | 8.5" | ImageWriter |
//! | `iwhic` | 160×144, 160×72, 120×72 | CMYK | 8.5" | ImageWriter |
//! | `iwlq` | 320×216, 160×144, 160×72, 120×72 | mono | 13.6" | ImageWriter |
//! | `iwlqc` | 320×216, 160×144, 160×72, 120×72 | CMYK | 13.6" | ImageWriter |
//! | `epson9` | 60×72, 120×72 | mono | 8.5" | Epson |
//! | `epson24` | 60×216, 120×216, 180×216 | mono | 8.5" | Epson |
//! | `escp2` | 180×180 | CMYK | 8.5" | EscP2 |
//!
//! ## Color pass order
//!
//! The plane order is a property of the physical device, not of color
//! theory. Impact-ribbon devices print yellow before the darker inks to
//! minimize cross-band ribbon contamination; the inkjet prints C, M, Y
//! and finishes with black.

use serde::{Deserialize, Serialize};

/// One color component of the page raster, printed as a separate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    Cyan,
    Magenta,
    Yellow,
    Black,
}

impl Plane {
    /// Index of this plane in the raster source (standard CMYK order).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Plane::Cyan => 0,
            Plane::Magenta => 1,
            Plane::Yellow => 2,
            Plane::Black => 3,
        }
    }
}

/// Printer family. Selects init/eject sequences and command dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Apple Dot Matrix Printer / ImageWriter / ImageWriter LQ.
    /// ASCII-decimal bitmap counts, repeat-zero head positioning.
    ImageWriter,
    /// Epson ESC/P 9- and 24-pin. Binary little-endian bitmap counts,
    /// pica tab stops, fine vertical skip.
    Epson,
    /// ESC/P2-style raster inkjet with per-command RLE compression and
    /// dot-offset head positioning.
    EscP2,
}

/// How scanline rows map onto the bits of a transposed column byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotOrder {
    /// Top row of the band lands in bit 7 (Epson convention).
    TopBitMsb,
    /// Bottom row of the band lands in bit 7. The Apple printers fire
    /// their pins in the reverse of the expected order: an underscore
    /// is a series of 0x80 bytes, an overscore a series of 0x01.
    BottomBitMsb,
}

/// How the 8-row groups of a band are drawn from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleave {
    /// One 8-row pass; band row = group row.
    Progressive,
    /// Two passes over a 16-row band; pass p takes rows 2·r + p.
    /// The passes print at the same head height with a fine feed
    /// between them, doubling the vertical resolution.
    EvenOdd,
    /// Three stacked 8-row groups of a 24-row band, interleaved into
    /// the output three bytes per column for a 24-pin head.
    Stacked,
}

/// Graphics command encoding for one resolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsMode {
    /// Epson bit image: `ESC K/L/Y/Z` (modes 0–3) or `ESC * m`, then a
    /// little-endian 16-bit column count and the column data.
    BitImage { mode: u8 },
    /// ImageWriter bitmap with a 4-digit ASCII-decimal column count:
    /// `ESC G`/`ESC V` (8-pin) or `ESC C`/`ESC U` (24-wire hires).
    AsciiBitmap { hires: bool },
    /// ESC/P2 raster: `ESC . c v h m nL nH`, where `c` selects
    /// uncompressed (0) or run-length encoded (1) data, `v`/`h` are
    /// 3600/dpi unit codes and `m` is the band height in rows.
    RasterDot { v: u8, h: u8, lines: u8 },
}

/// How leading/interior runs of blank columns are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// Print a repeated all-zeros bitmap (`ESC V`/`ESC U` with a repeat
    /// count) to walk the head to the start position.
    RepeatZero,
    /// Set a pica tab stop (`ESC D n 0`) and emit HT. Tab stops sit on
    /// `x_dpi / 10` column boundaries.
    PicaTab,
    /// Relative move by a signed 16-bit dot count (`ESC \ lo hi`).
    DotOffset,
}

/// How the vertical cursor advances past blank regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAdvance {
    /// Fine skip command (`ESC J n`), chunked at the device maximum.
    /// `units_per_row` converts dot rows to command units.
    EscJ { units_per_row: u32 },
    /// No skip command: every band advances by a line feed at the line
    /// height configured during init, blank or not.
    LineFeed,
}

/// One supported resolution pair and its band geometry.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionMode {
    pub x_dpi: u32,
    pub y_dpi: u32,
    /// Rows buffered per band; always a multiple of 8.
    pub band_height: u32,
    /// 8-row passes per band.
    pub passes: u8,
    pub interleave: Interleave,
    /// Output bytes per column (3 for 24-pin heads, else 1).
    pub out_stride: usize,
    pub graphics: GraphicsMode,
    pub advance: VerticalAdvance,
    /// Pitch/resolution select bytes written during init.
    pub pitch: &'static [u8],
}

/// # Device Profile
///
/// Protocol facts for one printer model. All fields are constants of the
/// physical device; the pipeline treats them as read-only.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    /// Profile name as used on the command line.
    pub name: &'static str,
    pub family: Family,
    /// 1 (monochrome) or 4 (CMYK).
    pub num_components: u8,
    /// Maximum physical print width in inches, independent of the
    /// configured page width.
    pub platen_inches: f32,
    pub modes: &'static [ResolutionMode],
    /// Color pass order; empty for monochrome devices. The last entry
    /// is the final pass (black), which advances the line.
    pub color_order: &'static [Plane],
    pub dot_order: DotOrder,
    pub positioning: Positioning,
    /// Whether interior blank runs may be tab-skipped, or only the
    /// leading run.
    pub interior_tabs: bool,
    /// Minimum blank-run length, in output bytes, before a tab command
    /// pays for itself.
    pub min_tab_bytes: usize,
    /// Minimum blank-run length in tenths of an inch; a tab must meet
    /// both this and `min_tab_bytes`. Head motion is slower than
    /// printing blanks for short runs.
    pub min_tab_10ths: u32,
    /// Minimum bytes actually saved for a tab to be emitted.
    pub min_tab_gain: usize,
    /// Largest count a single vertical-skip command can encode.
    pub max_skip_command: u8,
    /// Byte cost of switching compression modes between bands; used by
    /// the run encoder's cost model.
    pub mode_switch_cost: usize,
    /// Number of selectable paper bins, if any.
    pub bins: Option<u8>,
}

// ============================================================================
// RESOLUTION MODE TABLES
// ============================================================================

use crate::protocol::imagewriter::{PITCH_CONDENSED, PITCH_ELITE, PITCH_LQ};

/// ImageWriter-family modes. Line feeds advance 16/144" (one 8-row band
/// at 72 dpi, one 24-row band at 216 dpi), so no skip command is needed.
const IW_120X72: ResolutionMode = ResolutionMode {
    x_dpi: 120,
    y_dpi: 72,
    band_height: 8,
    passes: 1,
    interleave: Interleave::Progressive,
    out_stride: 1,
    graphics: GraphicsMode::AsciiBitmap { hires: false },
    advance: VerticalAdvance::LineFeed,
    pitch: PITCH_CONDENSED,
};

const IW_160X72: ResolutionMode = ResolutionMode {
    x_dpi: 160,
    y_dpi: 72,
    band_height: 8,
    passes: 1,
    interleave: Interleave::Progressive,
    out_stride: 1,
    graphics: GraphicsMode::AsciiBitmap { hires: false },
    advance: VerticalAdvance::LineFeed,
    pitch: PITCH_ELITE,
};

const IW_160X144: ResolutionMode = ResolutionMode {
    x_dpi: 160,
    y_dpi: 144,
    band_height: 16,
    passes: 2,
    interleave: Interleave::EvenOdd,
    out_stride: 1,
    graphics: GraphicsMode::AsciiBitmap { hires: false },
    advance: VerticalAdvance::LineFeed,
    pitch: PITCH_ELITE,
};

const IW_320X216: ResolutionMode = ResolutionMode {
    x_dpi: 320,
    y_dpi: 216,
    band_height: 24,
    passes: 3,
    interleave: Interleave::Stacked,
    out_stride: 3,
    graphics: GraphicsMode::AsciiBitmap { hires: true },
    advance: VerticalAdvance::LineFeed,
    pitch: PITCH_LQ,
};

/// Epson 9-pin modes. `ESC J` and `ESC 3` use 1/216" units, so one row
/// at 72 dpi is 3 units.
const EPS9_60X72: ResolutionMode = ResolutionMode {
    x_dpi: 60,
    y_dpi: 72,
    band_height: 8,
    passes: 1,
    interleave: Interleave::Progressive,
    out_stride: 1,
    graphics: GraphicsMode::BitImage { mode: 0 },
    advance: VerticalAdvance::EscJ { units_per_row: 3 },
    pitch: &[],
};

const EPS9_120X72: ResolutionMode = ResolutionMode {
    x_dpi: 120,
    y_dpi: 72,
    band_height: 8,
    passes: 1,
    interleave: Interleave::Progressive,
    out_stride: 1,
    graphics: GraphicsMode::BitImage { mode: 1 },
    advance: VerticalAdvance::EscJ { units_per_row: 3 },
    pitch: &[],
};

/// Epson 24-pin modes: three stacked 8-row groups interleaved at three
/// bytes per column. One row at 216 dpi is one 1/216" unit.
const EPS24_60X216: ResolutionMode = ResolutionMode {
    x_dpi: 60,
    y_dpi: 216,
    band_height: 24,
    passes: 3,
    interleave: Interleave::Stacked,
    out_stride: 3,
    graphics: GraphicsMode::BitImage { mode: 32 },
    advance: VerticalAdvance::EscJ { units_per_row: 1 },
    pitch: &[],
};

const EPS24_120X216: ResolutionMode = ResolutionMode {
    graphics: GraphicsMode::BitImage { mode: 33 },
    x_dpi: 120,
    ..EPS24_60X216
};

const EPS24_180X216: ResolutionMode = ResolutionMode {
    graphics: GraphicsMode::BitImage { mode: 39 },
    x_dpi: 180,
    ..EPS24_60X216
};

/// ESC/P2 raster mode: 180 dpi, 8-row bands, per-command RLE.
/// `v = h = 3600/180 = 20`; `ESC J` units are 1/180".
const ESCP2_180X180: ResolutionMode = ResolutionMode {
    x_dpi: 180,
    y_dpi: 180,
    band_height: 8,
    passes: 1,
    interleave: Interleave::Progressive,
    out_stride: 1,
    graphics: GraphicsMode::RasterDot {
        v: 20,
        h: 20,
        lines: 8,
    },
    advance: VerticalAdvance::EscJ { units_per_row: 1 },
    pitch: &[],
};

// ============================================================================
// COLOR PASS ORDERS
// ============================================================================

/// ImageWriter ribbon order: yellow first, then the darker inks, in a
/// recommended order of printing for minimizing cross-band ribbon
/// contamination. Black is always last.
const IW_COLOR_ORDER: &[Plane] = &[Plane::Yellow, Plane::Cyan, Plane::Magenta, Plane::Black];

/// Inkjet order: C, M, Y, then black.
const ESCP2_COLOR_ORDER: &[Plane] = &[Plane::Cyan, Plane::Magenta, Plane::Yellow, Plane::Black];

// ============================================================================
// BUILT-IN PROFILES
// ============================================================================

impl DeviceProfile {
    /// Apple Dot Matrix Printer / C. Itoh 8510. 120×72 only.
    pub const APPLEDMP: Self = Self {
        name: "appledmp",
        family: Family::ImageWriter,
        num_components: 1,
        platen_inches: 8.5,
        modes: &[IW_120X72],
        color_order: &[],
        dot_order: DotOrder::BottomBitMsb,
        positioning: Positioning::RepeatZero,
        interior_tabs: false,
        min_tab_bytes: 8,
        min_tab_10ths: 0,
        min_tab_gain: 7,
        max_skip_command: 255,
        mode_switch_cost: 0,
        bins: None,
    };

    /// ImageWriter, 8.5" carriage.
    pub const IMAGEWRITER: Self = Self {
        name: "iwlo",
        modes: &[IW_160X72, IW_120X72],
        ..Self::APPLEDMP
    };

    /// ImageWriter II.
    pub const IMAGEWRITER_II: Self = Self {
        name: "iwhi",
        modes: &[IW_160X144, IW_160X72, IW_120X72],
        ..Self::APPLEDMP
    };

    /// ImageWriter II with a color ribbon.
    pub const IMAGEWRITER_II_COLOR: Self = Self {
        name: "iwhic",
        num_components: 4,
        color_order: IW_COLOR_ORDER,
        ..Self::IMAGEWRITER_II
    };

    /// ImageWriter LQ: wide carriage, 24-wire head, three paper bins.
    pub const IMAGEWRITER_LQ: Self = Self {
        name: "iwlq",
        platen_inches: 13.6,
        modes: &[IW_320X216, IW_160X144, IW_160X72, IW_120X72],
        bins: Some(3),
        ..Self::APPLEDMP
    };

    /// ImageWriter LQ with a color ribbon.
    pub const IMAGEWRITER_LQ_COLOR: Self = Self {
        name: "iwlqc",
        num_components: 4,
        color_order: IW_COLOR_ORDER,
        ..Self::IMAGEWRITER_LQ
    };

    /// Generic Epson 9-pin (FX-compatible).
    pub const EPSON9: Self = Self {
        name: "epson9",
        family: Family::Epson,
        num_components: 1,
        platen_inches: 8.5,
        modes: &[EPS9_60X72, EPS9_120X72],
        color_order: &[],
        dot_order: DotOrder::TopBitMsb,
        positioning: Positioning::PicaTab,
        interior_tabs: true,
        min_tab_bytes: 10,
        min_tab_10ths: 15,
        min_tab_gain: 10,
        max_skip_command: 255,
        mode_switch_cost: 0,
        bins: None,
    };

    /// Generic Epson 24-pin (LQ-compatible).
    pub const EPSON24: Self = Self {
        name: "epson24",
        modes: &[EPS24_60X216, EPS24_120X216, EPS24_180X216],
        ..Self::EPSON9
    };

    /// ESC/P2-style CMYK raster inkjet.
    pub const ESCP2_CMYK: Self = Self {
        name: "escp2",
        family: Family::EscP2,
        num_components: 4,
        platen_inches: 8.5,
        modes: &[ESCP2_180X180],
        color_order: ESCP2_COLOR_ORDER,
        dot_order: DotOrder::TopBitMsb,
        positioning: Positioning::DotOffset,
        interior_tabs: false,
        min_tab_bytes: 10,
        min_tab_10ths: 0,
        min_tab_gain: 10,
        max_skip_command: 255,
        mode_switch_cost: 0,
        bins: None,
    };

    /// All built-in profiles.
    pub fn built_in() -> &'static [Self] {
        &[
            Self::APPLEDMP,
            Self::IMAGEWRITER,
            Self::IMAGEWRITER_II,
            Self::IMAGEWRITER_II_COLOR,
            Self::IMAGEWRITER_LQ,
            Self::IMAGEWRITER_LQ_COLOR,
            Self::EPSON9,
            Self::EPSON24,
            Self::ESCP2_CMYK,
        ]
    }

    /// Look up a built-in profile by name.
    pub fn from_name(name: &str) -> Option<&'static Self> {
        Self::built_in().iter().find(|p| p.name == name)
    }

    /// The profile's default (highest-resolution) mode.
    pub fn default_mode(&self) -> &ResolutionMode {
        &self.modes[0]
    }

    /// Final color pass, if this is a color device. The final pass is
    /// the one that advances the line after printing.
    pub fn final_plane(&self) -> Option<Plane> {
        self.color_order.last().copied()
    }
}
