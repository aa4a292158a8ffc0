//! # Rastro - Printer Band-Encoding Library
//!
//! Rastro turns device-independent page rasters into the escape-code
//! byte streams understood by classic dot-matrix and inkjet printers
//! (Apple ImageWriter family, Epson 9/24-pin, ESC/P2). It provides:
//!
//! - **Band pipeline**: scanline banding, blank-band skip, 8×8 bit
//!   transposition into head orientation
//! - **Run encoding**: zero-run elision and packbits RLE with a cost
//!   model
//! - **Protocol dialects**: byte-exact command builders per printer
//!   family
//! - **Page driver**: validation, color-pass sequencing and eject for
//!   one page
//!
//! ## Quick Start
//!
//! ```no_run
//! use rastro::{Capabilities, DeviceProfile, PageDriver, PlanarRaster};
//!
//! // Look up the target device and describe the page.
//! let profile = DeviceProfile::from_name("epson9")
//!     .ok_or_else(|| rastro::RastroError::Config("unknown profile".into()))?;
//! let caps = Capabilities::mono(120, 72, 960, 792);
//!
//! // Build a one-dot raster (a real caller dithers an image instead).
//! let mut raster = PlanarRaster::blank(caps.line_stride(), caps.height_px, 1);
//! raster.set_pixel(0, 0, 9);
//!
//! // Drive the page into a byte buffer.
//! let mut out = Vec::new();
//! let mut driver = PageDriver::new(profile, caps);
//! let summary = driver.print_page(&mut raster, &mut out)?;
//! println!("{} bands, {} bytes", summary.bands, summary.bytes_written);
//!
//! # Ok::<(), rastro::RastroError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`device`] | Capability descriptors and device profiles |
//! | [`raster`] | Band buffering, blank detection, transposition |
//! | [`encode`] | Zero-run elision and packbits RLE |
//! | [`protocol`] | Escape-code command builders per dialect |
//! | [`page`] | Cursor-tracking emitter and page state machine |
//! | [`render`] | Ordered dithering and color separation |
//! | [`error`] | Error types |
//!
//! ## Supported Devices
//!
//! Built-in profiles cover the Apple DMP, ImageWriter, ImageWriter II
//! (mono and color), ImageWriter LQ (mono and color), Epson FX-class
//! 9-pin, Epson LQ-class 24-pin, and a generic ESC/P2 CMYK inkjet. Run
//! `rastro profiles` for the full table.

pub mod device;
pub mod encode;
pub mod error;
pub mod page;
pub mod protocol;
pub mod raster;
pub mod render;

// Re-exports for convenience
pub use device::profile::DeviceProfile;
pub use device::Capabilities;
pub use error::RastroError;
pub use page::{PageDriver, PageSummary};
pub use raster::{PlanarRaster, RasterSource};
