//! # Repeated-Byte Run Encoding
//!
//! Packbits-style run-length encoding as used by the ESC/P2 raster
//! command's compressed mode and the PCL row compressors. The stream is
//! a sequence of control-byte-led chunks:
//!
//! | control (two's complement) | meaning |
//! |----------------------------|---------|
//! | `0..=127`                  | next `control + 1` bytes are literal |
//! | `-127..=-1`                | next byte repeats `-control + 1` times |
//! | `-128`                     | no-op, never produced |
//!
//! Runs shorter than 3 bytes are left in the surrounding literal span;
//! a repeat chunk for them saves nothing. Both span kinds are chunked
//! at 128 bytes, the limit of the signed count field.
//!
//! Whether a band is sent compressed at all is a per-band cost decision
//! ([`choose_mode`]): some protocols charge a mode-switch command when
//! consecutive bands alternate, so the switch cost is amortized across
//! same-mode runs of bands.

use crate::error::RastroError;

/// Longest span a single control byte can describe.
const MAX_CHUNK: usize = 128;

/// Shortest run worth a repeat chunk.
const MIN_RUN: usize = 3;

/// Band transmission mode chosen by the cost model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Raw bytes, no control structure.
    Literal,
    /// Packbits stream per this module.
    Rle,
}

/// Append the packbits encoding of `data` to `out`.
pub fn compress(data: &[u8], out: &mut Vec<u8>) {
    let mut pos = 0;
    let mut literal_start = 0;

    let flush_literal = |out: &mut Vec<u8>, start: usize, end: usize| {
        let mut s = start;
        while s < end {
            let n = (end - s).min(MAX_CHUNK);
            out.push((n - 1) as u8);
            out.extend_from_slice(&data[s..s + n]);
            s += n;
        }
    };

    while pos < data.len() {
        let byte = data[pos];
        let mut run = 1;
        while pos + run < data.len() && data[pos + run] == byte {
            run += 1;
        }
        if run >= MIN_RUN {
            flush_literal(out, literal_start, pos);
            let mut remaining = run;
            while remaining > 0 {
                let n = remaining.min(MAX_CHUNK);
                if n >= MIN_RUN {
                    out.push((1i32 - n as i32) as u8);
                    out.push(byte);
                } else {
                    // Chunk remainder too short for a repeat.
                    out.push((n - 1) as u8);
                    for _ in 0..n {
                        out.push(byte);
                    }
                }
                remaining -= n;
            }
            pos += run;
            literal_start = pos;
        } else {
            pos += run;
        }
    }
    flush_literal(out, literal_start, data.len());
}

/// Byte length of the packbits encoding of `data` without building it.
pub fn compressed_len(data: &[u8]) -> usize {
    let mut len = 0usize;
    let mut pos = 0;
    let mut literal = 0usize;

    let flush = |len: &mut usize, literal: usize| {
        *len += literal + literal.div_ceil(MAX_CHUNK);
    };

    while pos < data.len() {
        let byte = data[pos];
        let mut run = 1;
        while pos + run < data.len() && data[pos + run] == byte {
            run += 1;
        }
        if run >= MIN_RUN {
            flush(&mut len, literal);
            literal = 0;
            let full = run / MAX_CHUNK;
            let rem = run % MAX_CHUNK;
            len += full * 2;
            if rem >= MIN_RUN {
                len += 2;
            } else if rem > 0 {
                len += 1 + rem;
            }
        } else {
            literal += run;
        }
        pos += run;
    }
    flush(&mut len, literal);
    len
}

/// Decode a packbits stream. Test fixture for the round-trip property;
/// the pipeline itself never decodes.
pub fn decompress(data: &[u8], out: &mut Vec<u8>) -> Result<(), RastroError> {
    let mut pos = 0;
    while pos < data.len() {
        let control = data[pos] as i8;
        pos += 1;
        match control {
            0..=127 => {
                let n = control as usize + 1;
                let end = pos + n;
                if end > data.len() {
                    return Err(RastroError::ProtocolInvariant(
                        "run stream truncated inside a literal span".into(),
                    ));
                }
                out.extend_from_slice(&data[pos..end]);
                pos = end;
            }
            -127..=-1 => {
                let n = 1 - control as isize;
                let byte = *data.get(pos).ok_or_else(|| {
                    RastroError::ProtocolInvariant(
                        "run stream truncated inside a repeat".into(),
                    )
                })?;
                pos += 1;
                out.extend(std::iter::repeat(byte).take(n as usize));
            }
            -128 => {} // no-op control
        }
    }
    Ok(())
}

/// Pick the cheaper transmission mode for one band.
///
/// `switch_cost` is charged when the choice differs from `prev`; ties
/// keep the previous mode so a marginal band never pays for a switch.
pub fn choose_mode(
    prev: Option<RunMode>,
    literal_cost: usize,
    rle_cost: usize,
    switch_cost: usize,
) -> RunMode {
    let charge = |mode: RunMode, base: usize| match prev {
        Some(p) if p != mode => base + switch_cost,
        _ => base,
    };
    let lit = charge(RunMode::Literal, literal_cost);
    let rle = charge(RunMode::Rle, rle_cost);
    if rle < lit {
        RunMode::Rle
    } else if lit < rle {
        RunMode::Literal
    } else {
        prev.unwrap_or(RunMode::Literal)
    }
}
