//! # Run Encoder
//!
//! Compresses a transposed band before emission, using two cooperating
//! strategies:
//!
//! - [`trim`]: leading/trailing zero-run elision; trailing zeros are
//!   dropped, long leading (and, where supported, interior) zero runs
//!   become head-positioning commands instead of data.
//! - [`rle`]: packbits repeated-byte run-length encoding for protocols
//!   with a compressed transfer mode, plus the per-band cost model that
//!   decides whether compression pays.
//!
//! The encoder produces segments and byte streams only; the protocol
//! emitter turns them into actual command bytes.

pub mod rle;
pub mod trim;

pub use rle::{choose_mode, RunMode};
pub use trim::{Segment, TabPolicy};
