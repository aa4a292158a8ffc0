//! # Zero-Run Elision
//!
//! A transposed band is mostly zeros on typical pages. Before emission
//! each band is trimmed and segmented:
//!
//! 1. trailing zeros are dropped outright (the head just stops earlier);
//! 2. leading (and, on devices with settable tab stops, interior)
//!    zero runs become [`Segment::Skip`]s that the emitter turns into a
//!    positioning command instead of transmitting the zeros.
//!
//! A run is only worth converting if it is long enough: the positioning
//! command has a fixed encoding cost, and on some devices a tab provokes
//! actual head motion that is slower than printing blanks. Both
//! thresholds come from the device profile; neither is exact science,
//! so they are tunables rather than protocol facts.
//!
//! All positions are byte offsets into the transposed buffer. On 24-pin
//! devices one head column is 3 bytes, so runs and stops move in
//! multiples of the output stride.

/// One horizontal piece of a trimmed band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Position the head at this byte offset without printing.
    Skip { to_byte: usize },
    /// Print these bytes starting at `start_byte`.
    Print { start_byte: usize, data: &'a [u8] },
}

/// Thresholds and alignment for zero-run elision, derived from the
/// device profile and resolution mode by the emitter.
#[derive(Debug, Clone, Copy)]
pub struct TabPolicy {
    /// Output bytes per head column (3 for 24-pin heads, else 1).
    pub stride: usize,
    /// Byte offsets a positioning command can target. For pica tab
    /// stops this is `x_dpi / 10` columns' worth of bytes; 1 when the
    /// device can position to any column.
    pub bytes_per_stop: usize,
    /// Minimum zero-run length in bytes before a skip is considered.
    pub min_run: usize,
    /// Minimum bytes actually elided for the skip to pay off.
    pub min_gain: usize,
    /// Whether interior runs may be skipped, or only the leading run.
    pub interior: bool,
}

/// Drop trailing zero bytes, keeping the length a multiple of `stride`
/// so partial head columns are never transmitted.
pub fn trim_trailing(data: &[u8], stride: usize) -> &[u8] {
    let mut end = data.len();
    while end >= stride && data[end - stride..end].iter().all(|&b| b == 0) {
        end -= stride;
    }
    &data[..end]
}

/// Split a trailing-trimmed band into skip and print segments.
///
/// Greedy left-to-right scan in stride steps. A zero run becomes a skip
/// only if it is at least `min_run` long and the nearest tab stop at or
/// before its end elides more than `min_gain` bytes; otherwise the
/// zeros are printed as part of the surrounding literal data. With
/// `interior` false only the run at the very start of the band is
/// considered.
pub fn split_segments<'a>(data: &'a [u8], policy: &TabPolicy) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    if data.is_empty() {
        return segments;
    }
    let stride = policy.stride.max(1);
    let mut block_start = 0usize;
    let mut pos = 0usize;

    while pos < data.len() {
        let eligible = policy.interior || pos == 0;
        if eligible && data[pos] == 0 {
            // Measure the zero run in stride steps.
            let mut run_end = pos;
            while run_end + stride <= data.len()
                && data[run_end..run_end + stride].iter().all(|&b| b == 0)
            {
                run_end += stride;
            }
            if run_end - pos >= policy.min_run {
                // Round down to the nearest reachable stop.
                let target = (run_end / policy.bytes_per_stop) * policy.bytes_per_stop;
                if target > pos + policy.min_gain {
                    if pos > block_start {
                        segments.push(Segment::Print {
                            start_byte: block_start,
                            data: &data[block_start..pos],
                        });
                    }
                    segments.push(Segment::Skip { to_byte: target });
                    block_start = target;
                    pos = target;
                    continue;
                }
            }
            pos = run_end.max(pos + stride);
        } else {
            pos += stride;
        }
    }

    if pos.min(data.len()) > block_start {
        segments.push(Segment::Print {
            start_byte: block_start,
            data: &data[block_start..],
        });
    }
    segments
}
