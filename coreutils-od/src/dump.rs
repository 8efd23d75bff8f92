//! Per-block rendering and duplicate-block elision, ported from
//! `od.c`'s `write_block`: format one block per type spec, but collapse
//! a run of blocks identical to the previous one into a single `*`
//! line.

use crate::address::AddressRadix;
use crate::format::{OutputFormat, TypeSpec};

const CHARNAME: [&str; 33] = [
    "nul", "soh", "stx", "etx", "eot", "enq", "ack", "bel", "bs", "ht", "nl", "vt", "ff", "cr", "so", "si", "dle",
    "dc1", "dc2", "dc3", "dc4", "nak", "syn", "etb", "can", "em", "sub", "esc", "fs", "gs", "rs", "us", "sp",
];

/// Tracks whether the previous block equaled the one before it, the
/// Rust shape of `write_block`'s `static int first`/`prev_pair_equal`.
#[derive(Default)]
pub struct DupState {
    first: bool,
    prev_pair_equal: bool,
    prev_block: Vec<u8>,
}

impl DupState {
    pub fn new() -> Self {
        DupState {
            first: true,
            prev_pair_equal: false,
            prev_block: Vec::new(),
        }
    }

    /// Render one block, returning `None` when it was elided as a
    /// duplicate (the caller should then print nothing, or `*` exactly
    /// once per elided run).
    pub fn render(
        &mut self,
        address: u64,
        block: &[u8],
        bytes_per_block: usize,
        specs: &[TypeSpec],
        radix: AddressRadix,
        abbreviate: bool,
    ) -> RenderedBlock {
        let is_full = block.len() == bytes_per_block;
        let equals_prev = is_full && !self.first && self.prev_block.len() == bytes_per_block && self.prev_block == block;

        let result = if abbreviate && equals_prev {
            if self.prev_pair_equal {
                RenderedBlock::Elided
            } else {
                self.prev_pair_equal = true;
                RenderedBlock::Star
            }
        } else {
            self.prev_pair_equal = false;
            RenderedBlock::Lines(render_lines(address, block, specs, radix))
        };

        self.first = false;
        if is_full {
            self.prev_block = block.to_vec();
        }
        result
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RenderedBlock {
    Lines(Vec<String>),
    Star,
    Elided,
}

pub(crate) fn render_lines(address: u64, block: &[u8], specs: &[TypeSpec], radix: AddressRadix) -> Vec<String> {
    let pad_len = match radix {
        AddressRadix::Octal => 7,
        AddressRadix::Decimal => 7,
        AddressRadix::Hex => 6,
        AddressRadix::None => 0,
    };

    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let addr_col = if i == 0 {
                radix.format(address, pad_len)
            } else {
                " ".repeat(pad_len)
            };
            let values = render_spec(block, *spec);
            if addr_col.is_empty() {
                values
            } else {
                format!("{}{}", addr_col, values)
            }
        })
        .collect()
}

fn render_spec(block: &[u8], spec: TypeSpec) -> String {
    let width = spec.size.bytes();
    let field_width = spec.field_width();
    let mut out = String::new();

    if spec.fmt == OutputFormat::Character || spec.fmt == OutputFormat::NamedCharacter {
        for &b in block {
            out.push_str(&format!("{:>width$}", render_byte(b, spec.fmt), width = field_width));
        }
        return out;
    }

    let mut i = 0;
    while i < block.len() {
        let end = (i + width).min(block.len());
        let mut bytes = [0u8; 8];
        bytes[..end - i].copy_from_slice(&block[i..end]);
        let v = u64::from_le_bytes(bytes);
        let rendered = match spec.fmt {
            OutputFormat::Octal => format!("{:o}", v),
            OutputFormat::Hexadecimal => format!("{:x}", v),
            OutputFormat::UnsignedDecimal => format!("{}", v),
            OutputFormat::SignedDecimal => format!("{}", sign_extend(v, width)),
            OutputFormat::Float => render_float(bytes, spec.size),
            OutputFormat::Character | OutputFormat::NamedCharacter => unreachable!(),
        };
        out.push_str(&format!(" {:>width$}", rendered, width = field_width));
        i += width;
    }
    out
}

fn render_float(bytes: [u8; 8], size: crate::format::SizeSpec) -> String {
    use crate::format::SizeSpec;
    match size {
        SizeSpec::FloatSingle => {
            let mut b4 = [0u8; 4];
            b4.copy_from_slice(&bytes[..4]);
            format!("{:e}", f32::from_le_bytes(b4))
        }
        _ => format!("{:e}", f64::from_le_bytes(bytes)),
    }
}

fn sign_extend(v: u64, width: usize) -> i64 {
    match width {
        1 => v as u8 as i8 as i64,
        2 => v as u16 as i16 as i64,
        4 => v as u32 as i32 as i64,
        _ => v as i64,
    }
}

fn render_byte(b: u8, fmt: OutputFormat) -> String {
    if fmt == OutputFormat::Character {
        if b.is_ascii_graphic() || b == b' ' {
            (b as char).to_string()
        } else {
            format!("\\{:03o}", b)
        }
    } else if (b as usize) < CHARNAME.len() {
        CHARNAME[b as usize].to_string()
    } else if b == 0x7f {
        "del".to_string()
    } else {
        format!("{:o}", b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SizeSpec;

    #[test]
    fn second_identical_full_block_becomes_a_star() {
        let mut state = DupState::new();
        let specs = vec![TypeSpec { fmt: OutputFormat::Octal, size: SizeSpec::Int }];
        let block = vec![0u8; 16];
        let first = state.render(0, &block, 16, &specs, AddressRadix::Octal, true);
        assert!(matches!(first, RenderedBlock::Lines(_)));
        let second = state.render(16, &block, 16, &specs, AddressRadix::Octal, true);
        assert_eq!(second, RenderedBlock::Star);
        let third = state.render(32, &block, 16, &specs, AddressRadix::Octal, true);
        assert_eq!(third, RenderedBlock::Elided);
    }

    #[test]
    fn different_block_resets_elision() {
        let mut state = DupState::new();
        let specs = vec![TypeSpec { fmt: OutputFormat::Octal, size: SizeSpec::Int }];
        let a = vec![1u8; 16];
        let b = vec![2u8; 16];
        state.render(0, &a, 16, &specs, AddressRadix::Octal, true);
        state.render(16, &a, 16, &specs, AddressRadix::Octal, true);
        let changed = state.render(32, &b, 16, &specs, AddressRadix::Octal, true);
        assert!(matches!(changed, RenderedBlock::Lines(_)));
    }

    #[test]
    fn float_single_renders_in_scientific_notation() {
        let specs = vec![TypeSpec { fmt: OutputFormat::Float, size: SizeSpec::FloatSingle }];
        let block = 1.5f32.to_le_bytes();
        let rendered = render_spec(&block, specs[0]);
        assert!(rendered.contains("1.5e0"));
    }

    #[test]
    fn short_final_block_is_never_elided() {
        let mut state = DupState::new();
        let specs = vec![TypeSpec { fmt: OutputFormat::Octal, size: SizeSpec::Int }];
        let full = vec![0u8; 16];
        let partial = vec![0u8; 4];
        state.render(0, &full, 16, &specs, AddressRadix::Octal, true);
        let result = state.render(16, &partial, 16, &specs, AddressRadix::Octal, true);
        assert!(matches!(result, RenderedBlock::Lines(_)));
    }
}
