//! # Escape-Code Dialects
//!
//! Byte-exact command builders for the supported printer protocols.
//! Commands are plain `Vec<u8>` values; nothing here touches the output
//! sink or tracks state; the page emitter does both.
//!
//! - [`commands`]: shared control bytes and count encodings
//! - [`imagewriter`]: Apple DMP / ImageWriter / ImageWriter LQ dialect
//!   (ASCII-decimal counts, repeat-column positioning, ribbon colors)
//! - [`escp`]: Epson ESC/P bit image and ESC/P2 raster dialect (binary
//!   little-endian counts, fine vertical skip, pica tabs)

pub mod commands;
pub mod escp;
pub mod imagewriter;
