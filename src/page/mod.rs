//! # Page Pipeline
//!
//! The top of the crate: the [`Emitter`](emitter::Emitter) owns the
//! output sink and cursor state and writes every byte; the
//! [`PageDriver`](driver::PageDriver) orchestrates validation, banding,
//! color sequencing and eject for one page.

pub mod driver;
pub mod emitter;

pub use driver::{PageDriver, PageState, PageSummary};
pub use emitter::{CursorState, Emitter};
