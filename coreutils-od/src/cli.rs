use std::path::PathBuf;

use clap::Parser;

use crate::address::AddressRadix;
use crate::engine::OdConfig;
use crate::error::OdError;
use crate::format::{parse_type_string, OutputFormat, SizeSpec, TypeSpec};
use crate::offset::parse_old_offset;

#[derive(Debug, Parser)]
#[command(name = "od", about = "Dump files in octal and other formats")]
pub struct OdOpts {
    /// File to dump; standard input if omitted.
    pub file: Option<PathBuf>,
    /// Traditional trailing `[+]OFFSET[.][b]` argument.
    pub offset: Option<String>,

    /// Select output format(s): one or more `-t` type letters.
    #[arg(short = 't', long = "format")]
    pub format: Vec<String>,

    /// Address radix: `o`, `d`, `x`, or `n` for none.
    #[arg(short = 'A', long = "address-radix")]
    pub address_radix: Option<char>,

    /// Bytes of input to skip before formatting.
    #[arg(short = 'j', long = "skip-bytes")]
    pub skip_bytes: Option<u64>,

    /// Limit formatting to this many bytes.
    #[arg(short = 'N', long = "read-bytes")]
    pub read_bytes: Option<u64>,

    /// Bytes formatted per output line.
    #[arg(short = 'w', long = "width")]
    pub width: Option<usize>,

    /// Never elide duplicate blocks with `*`.
    #[arg(short = 'v', long = "output-duplicates")]
    pub output_duplicates: bool,

    /// Output strings of at least MIN printable characters.
    #[arg(short = 's', long = "strings", num_args = 0..=1, default_missing_value = "3")]
    pub strings: Option<usize>,
}

/// Least common multiple of two positive integers.
fn lcm(a: usize, b: usize) -> usize {
    fn gcd(a: usize, b: usize) -> usize {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }
    a / gcd(a, b) * b
}

impl OdOpts {
    pub fn to_config(&self) -> Result<OdConfig, OdError> {
        let specs = if self.format.is_empty() {
            vec![TypeSpec {
                fmt: OutputFormat::Octal,
                size: SizeSpec::Short,
            }]
        } else {
            let mut out = Vec::new();
            for f in &self.format {
                out.extend(parse_type_string(f)?);
            }
            out
        };

        let radix = match self.address_radix {
            Some('o') | None => AddressRadix::Octal,
            Some('d') => AddressRadix::Decimal,
            Some('x') => AddressRadix::Hex,
            Some('n') => AddressRadix::None,
            Some(c) => return Err(OdError::BadOffset(c.to_string())),
        };

        let skip_bytes = match &self.offset {
            Some(s) => parse_old_offset(s).ok_or_else(|| OdError::BadOffset(s.clone()))?,
            None => self.skip_bytes.unwrap_or(0),
        };

        // `bytes_per_block` must be a multiple of every selected spec's
        // element size, or a spec would straddle a block boundary; the
        // requested (or default 16) width is rounded up to the next
        // multiple of their LCM when it doesn't already divide evenly.
        let spec_lcm = specs.iter().map(|s| s.size.bytes()).fold(1, lcm);
        let requested = self.width.unwrap_or(16).max(1);
        let bytes_per_block = if requested % spec_lcm == 0 {
            requested
        } else {
            spec_lcm * requested.div_ceil(spec_lcm)
        };

        Ok(OdConfig {
            specs,
            radix,
            bytes_per_block,
            skip_bytes,
            limit_bytes: self.read_bytes,
            abbreviate_duplicates: !self.output_duplicates,
            dump_strings: self.strings.is_some(),
            string_min: self.strings.unwrap_or(4),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_produce_octal_short_words() {
        let opts = OdOpts {
            file: None,
            offset: None,
            format: vec![],
            address_radix: None,
            skip_bytes: None,
            read_bytes: None,
            width: None,
            output_duplicates: false,
            strings: None,
        };
        let cfg = opts.to_config().unwrap();
        assert_eq!(cfg.specs[0].fmt, OutputFormat::Octal);
        assert_eq!(cfg.bytes_per_block, 16);
    }

    #[test]
    fn bytes_per_block_defaults_to_sixteen_when_it_divides_evenly() {
        let opts = OdOpts {
            file: None,
            offset: None,
            format: vec!["o".to_string()],
            address_radix: None,
            skip_bytes: None,
            read_bytes: None,
            width: None,
            output_duplicates: false,
            strings: None,
        };
        let cfg = opts.to_config().unwrap();
        assert_eq!(cfg.bytes_per_block, 16);
    }

    #[test]
    fn bytes_per_block_rounds_up_to_a_multiple_of_the_spec_lcm() {
        let opts = OdOpts {
            file: None,
            offset: None,
            format: vec!["o".to_string()],
            address_radix: None,
            skip_bytes: None,
            read_bytes: None,
            width: Some(10),
            output_duplicates: false,
            strings: None,
        };
        let cfg = opts.to_config().unwrap();
        // spec element size is 4 bytes (plain "o" defaults to Int); 10
        // is not a multiple of 4, so it rounds up to 12.
        assert_eq!(cfg.bytes_per_block, 12);
    }

    #[test]
    fn legacy_offset_argument_sets_skip_bytes() {
        let opts = OdOpts {
            file: None,
            offset: Some("20".to_string()),
            format: vec![],
            address_radix: None,
            skip_bytes: None,
            read_bytes: None,
            width: None,
            output_duplicates: false,
            strings: None,
        };
        let cfg = opts.to_config().unwrap();
        assert_eq!(cfg.skip_bytes, 16);
    }
}
