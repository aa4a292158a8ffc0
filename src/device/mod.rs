//! # Device Layer
//!
//! This module defines what the pipeline knows about the target printer:
//!
//! - [`profile`]: per-family protocol constants ([`DeviceProfile`]) and
//!   the resolution-mode tables
//! - [`Capabilities`]: the per-page capability descriptor supplied by the
//!   caller, plus its validation against a profile
//!
//! Validation happens before any byte is written and before any buffer is
//! sized; a page that fails validation produces zero output.

pub mod profile;

pub use profile::{DeviceProfile, Plane, ResolutionMode};

use serde::{Deserialize, Serialize};

use crate::error::RastroError;

/// Minimum physical margin on any side, in points. Smaller margins risk
/// paper jams or head damage on the supported devices.
pub const MARGIN_MIN_PTS: f32 = 18.0;

/// # Capability Descriptor
///
/// Read-only facts about one page render, supplied once before page
/// processing begins. Immutable for the lifetime of the page.
///
/// Resolution and component count must agree with the target
/// [`DeviceProfile`]; [`Capabilities::validate`] checks this along with
/// the hardware safety invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Horizontal resolution in dots per inch.
    pub x_dpi: u32,
    /// Vertical resolution in dots per inch.
    pub y_dpi: u32,
    /// Page width in device pixels.
    pub width_px: u32,
    /// Page height in device pixels.
    pub height_px: u32,
    /// Color component count (1 = monochrome, 4 = CMYK).
    pub num_components: u8,
    /// Physical margins in points: left, bottom, right, top.
    pub margins: [f32; 4],
    /// Allow margins below the safety minimum. Downgrades the margin
    /// check from a hard error to a warning.
    #[serde(default)]
    pub unsafe_margins: bool,
    /// Print unidirectionally (slower, better vertical registration).
    #[serde(default)]
    pub unidirectional: bool,
    /// Paper bin selection, for devices with multiple bins.
    #[serde(default)]
    pub bin: Option<u8>,
}

impl Capabilities {
    /// Monochrome descriptor with safe default margins.
    pub fn mono(x_dpi: u32, y_dpi: u32, width_px: u32, height_px: u32) -> Self {
        Self {
            x_dpi,
            y_dpi,
            width_px,
            height_px,
            num_components: 1,
            margins: [MARGIN_MIN_PTS; 4],
            unsafe_margins: false,
            unidirectional: false,
            bin: None,
        }
    }

    /// CMYK descriptor with safe default margins.
    pub fn cmyk(x_dpi: u32, y_dpi: u32, width_px: u32, height_px: u32) -> Self {
        Self {
            num_components: 4,
            ..Self::mono(x_dpi, y_dpi, width_px, height_px)
        }
    }

    /// Bytes per scanline for one color plane (1 bit per pixel).
    #[inline]
    pub fn line_stride(&self) -> usize {
        self.width_px.div_ceil(8) as usize
    }

    /// Validate this descriptor against a device profile.
    ///
    /// Checks, in order:
    ///
    /// 1. component count matches the profile (1 vs. 4);
    /// 2. the resolution pair maps to one of the profile's discrete
    ///    modes (e.g. 120×72, 160×144, 320×216);
    /// 3. the page fits the platen: `width_px ≤ platen_inches × x_dpi`;
    /// 4. all four margins meet [`MARGIN_MIN_PTS`], unless
    ///    `unsafe_margins` is set, in which case a warning is recorded
    ///    instead;
    /// 5. the requested paper bin exists on the device.
    ///
    /// Every failure is a [`RastroError::Config`]; nothing has been
    /// written and the caller may fix the descriptor and retry.
    pub fn validate<'p>(
        &self,
        profile: &'p DeviceProfile,
    ) -> Result<Validated<'p>, RastroError> {
        if self.num_components != profile.num_components {
            return Err(RastroError::Config(format!(
                "{}: descriptor has {} color components, device expects {}",
                profile.name, self.num_components, profile.num_components
            )));
        }

        let mode = profile
            .modes
            .iter()
            .find(|m| m.x_dpi == self.x_dpi && m.y_dpi == self.y_dpi)
            .ok_or_else(|| {
                let supported: Vec<String> = profile
                    .modes
                    .iter()
                    .map(|m| format!("{}x{}", m.x_dpi, m.y_dpi))
                    .collect();
                RastroError::Config(format!(
                    "{}: unsupported resolution {}x{} (supported: {})",
                    profile.name,
                    self.x_dpi,
                    self.y_dpi,
                    supported.join(", ")
                ))
            })?;

        let max_width = profile.platen_inches * self.x_dpi as f32;
        if self.width_px as f32 > max_width {
            return Err(RastroError::Config(format!(
                "{}: image too wide for printer: {} of {:.0} maximum",
                profile.name, self.width_px, max_width
            )));
        }

        let mut warnings = Vec::new();
        if self.margins.iter().any(|&m| m < MARGIN_MIN_PTS) {
            if self.unsafe_margins {
                warnings.push(format!(
                    "{}: unsafe margins requested -- printer jams or damage may occur",
                    profile.name
                ));
            } else {
                return Err(RastroError::Config(format!(
                    "{}: margins must not be less than {}pt on any side",
                    profile.name, MARGIN_MIN_PTS
                )));
            }
        }

        if let Some(bin) = self.bin {
            match profile.bins {
                Some(count) if bin < count => {}
                Some(count) => {
                    return Err(RastroError::Config(format!(
                        "{}: bin out of range: {} (device has {})",
                        profile.name, bin, count
                    )));
                }
                None => {
                    return Err(RastroError::Config(format!(
                        "{}: device has no selectable paper bins",
                        profile.name
                    )));
                }
            }
        }

        Ok(Validated { mode, warnings })
    }
}

/// Result of a successful capability validation.
#[derive(Debug)]
pub struct Validated<'p> {
    /// The resolution mode the page will print in.
    pub mode: &'p ResolutionMode,
    /// Non-fatal findings (currently only the unsafe-margin notice).
    pub warnings: Vec<String>,
}
