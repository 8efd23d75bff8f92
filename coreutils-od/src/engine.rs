//! Top-level driver, the Rust shape of `od.c`'s `dump`/`dump_strings`
//! main loops: read the whole (possibly skip/limit-bounded) input,
//! then either stream formatted blocks through [`crate::dump::DupState`]
//! or extract strings via [`crate::strings::find_strings`].

use std::io::{Read, Write};

use crate::address::AddressRadix;
use crate::dump::{render_lines, DupState, RenderedBlock};
use crate::error::OdError;
use crate::format::TypeSpec;
use crate::strings::find_strings;

#[derive(Debug, Clone)]
pub struct OdConfig {
    pub specs: Vec<TypeSpec>,
    pub radix: AddressRadix,
    pub bytes_per_block: usize,
    pub skip_bytes: u64,
    pub limit_bytes: Option<u64>,
    pub abbreviate_duplicates: bool,
    pub dump_strings: bool,
    pub string_min: usize,
}

impl Default for OdConfig {
    fn default() -> Self {
        OdConfig {
            specs: vec![TypeSpec {
                fmt: crate::format::OutputFormat::Octal,
                size: crate::format::SizeSpec::Short,
            }],
            radix: AddressRadix::Octal,
            bytes_per_block: 16,
            skip_bytes: 0,
            limit_bytes: None,
            abbreviate_duplicates: true,
            dump_strings: false,
            string_min: 4,
        }
    }
}

pub struct OdEngine {
    config: OdConfig,
}

impl OdEngine {
    pub fn new(config: OdConfig) -> Self {
        OdEngine { config }
    }

    pub fn run<R: Read>(&self, mut input: R, out: &mut dyn Write) -> Result<(), OdError> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        let start = (self.config.skip_bytes as usize).min(data.len());
        let mut end = data.len();
        if let Some(limit) = self.config.limit_bytes {
            end = end.min(start + limit as usize);
        }
        let data = &data[start..end];

        if self.config.dump_strings {
            self.run_strings(data, start as u64, out)
        } else {
            self.run_dump(data, start as u64, out)
        }
    }

    fn run_strings(&self, data: &[u8], base_offset: u64, out: &mut dyn Write) -> Result<(), OdError> {
        for (offset, text) in find_strings(data, self.config.string_min)? {
            let addr = self.config.radix.format(base_offset + offset as u64, 7);
            writeln!(out, "{} {}", addr, text)?;
        }
        Ok(())
    }

    /// `write_block`'s duplicate-elision state `DupState` tracks would
    /// otherwise let the last block of the file collapse into `*`/be
    /// dropped if it repeats its predecessor; the final block must
    /// always be printed in full, so it bypasses `DupState` here.
    fn run_dump(&self, data: &[u8], base_offset: u64, out: &mut dyn Write) -> Result<(), OdError> {
        let mut state = DupState::new();
        let mut offset = 0usize;
        while offset < data.len() {
            let end = (offset + self.config.bytes_per_block).min(data.len());
            let block = &data[offset..end];
            let is_last = end == data.len();

            if is_last {
                let lines = render_lines(base_offset + offset as u64, block, &self.config.specs, self.config.radix);
                for line in lines {
                    writeln!(out, "{}", line)?;
                }
            } else {
                let rendered = state.render(
                    base_offset + offset as u64,
                    block,
                    self.config.bytes_per_block,
                    &self.config.specs,
                    self.config.radix,
                    self.config.abbreviate_duplicates,
                );
                match rendered {
                    RenderedBlock::Lines(lines) => {
                        for line in lines {
                            writeln!(out, "{}", line)?;
                        }
                    }
                    RenderedBlock::Star => writeln!(out, "*")?,
                    RenderedBlock::Elided => {}
                }
            }
            offset = end;
        }
        let final_addr = self.config.radix.format(base_offset + data.len() as u64, 7);
        if !final_addr.is_empty() {
            writeln!(out, "{}", final_addr)?;
        }
        Ok(())
    }
}
