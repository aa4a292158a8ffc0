//! # Raster Input Layer
//!
//! This module consumes the device-independent page raster produced by
//! an upstream rendering engine and prepares it for encoding:
//!
//! - [`source`]: the scanline accessor contract ([`RasterSource`]) and an
//!   in-memory planar implementation
//! - [`band`]: the band buffer ([`ScanBand`]) and blank detection
//! - [`transpose`]: the 8×8 bit-matrix transpose into the printer's
//!   column-major dot orientation
//!
//! The pipeline never sees pixels individually; it sees bands of
//! `band_height` scanlines, each a multiple of the 8-row transposition
//! block.

pub mod band;
pub mod source;
pub mod transpose;

pub use band::ScanBand;
pub use source::{PlanarRaster, RasterSource};
