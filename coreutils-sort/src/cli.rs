//! Command-line surface, the Rust analogue of `sort.c`'s `getopt_long`
//! table and `long_options` array.

use std::path::PathBuf;

use clap::Parser;

use crate::engine::{SortConfig, DEFAULT_BUFFER_BYTES};
use crate::error::SortError;
use crate::key::{parse_key_spec, KeySpec};

/// Rewrite the obsolete `+POS1 [-POS2]` zero-origin key syntax into an
/// equivalent `--key` argument before `clap` ever sees the argument
/// vector, since `getopt_long` itself never recognized `+POS1` as an
/// option and `-POS2` would otherwise collide with short flags. Once
/// rewritten, the resulting `KeySpec` is built by the same
/// [`parse_key_spec`] path as a `-k`-supplied one; there is no separate
/// legacy representation.
pub fn rewrite_legacy_args(args: &[String]) -> Result<Vec<String>, SortError> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if let Some(pos1) = arg.strip_prefix('+') {
            if pos1.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                let pos2 = match iter.peek() {
                    Some(next) if is_legacy_pos2(next) => {
                        Some(iter.next().unwrap().strip_prefix('-').unwrap())
                    }
                    _ => None,
                };
                out.push("--key".to_string());
                out.push(legacy_to_key_spec(pos1, pos2)?);
                continue;
            }
        }
        out.push(arg.clone());
    }
    Ok(out)
}

fn is_legacy_pos2(s: &str) -> bool {
    s.strip_prefix('-')
        .is_some_and(|rest| rest.chars().next().is_some_and(|c| c.is_ascii_digit()))
}

/// Translate one `+POS1`/`-POS2` operand pair into the `-k` syntax's
/// `F1[.C1][OPTS1][,F2[.C2][OPTS2]]`, converting each zero-origin field
/// number to `-k`'s one-origin convention.
fn legacy_to_key_spec(pos1: &str, pos2: Option<&str>) -> Result<String, SortError> {
    let (f1, c1, o1) = split_legacy_pos(pos1)?;
    let mut spec = (f1 + 1).to_string();
    if c1 > 0 {
        spec.push('.');
        spec.push_str(&c1.to_string());
    }
    spec.push_str(o1);
    if let Some(pos2) = pos2 {
        let (f2, c2, o2) = split_legacy_pos(pos2)?;
        spec.push(',');
        spec.push_str(&(f2 + 1).to_string());
        if c2 > 0 {
            spec.push('.');
            spec.push_str(&c2.to_string());
        }
        spec.push_str(o2);
    }
    Ok(spec)
}

/// Parse one legacy `F[.C][OPTS]` operand; unlike `-k`'s `parse_pos`,
/// field 0 is legal since the legacy syntax is zero-origin.
fn split_legacy_pos(s: &str) -> Result<(i64, i64, &str), SortError> {
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits_end == 0 {
        return Err(SortError::BadKeySpec(s.to_string(), "missing field number"));
    }
    let field: i64 = s[..digits_end]
        .parse()
        .map_err(|_| SortError::BadKeySpec(s.to_string(), "field number out of range"))?;
    let rest = &s[digits_end..];
    if let Some(rest) = rest.strip_prefix('.') {
        let char_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let chars: i64 = if char_end == 0 {
            0
        } else {
            rest[..char_end]
                .parse()
                .map_err(|_| SortError::BadKeySpec(s.to_string(), "char offset out of range"))?
        };
        Ok((field, chars, &rest[char_end..]))
    } else {
        Ok((field, 0, rest))
    }
}

#[derive(Debug, Parser)]
#[command(name = "sort", about = "Sort lines of text files")]
pub struct SortOpts {
    /// Files to sort; `-` or omitted means standard input.
    pub files: Vec<PathBuf>,

    /// Sort key: `-k POS1[,POS2]`, repeatable.
    #[arg(short = 'k', long = "key")]
    pub key: Vec<String>,

    /// Compare according to string numerical value.
    #[arg(short = 'n', long = "numeric-sort")]
    pub numeric: bool,

    /// Compare according to general numerical value.
    #[arg(short = 'g', long = "general-numeric-sort")]
    pub general_numeric: bool,

    /// Compare (unknown) < 'JAN' < ... < 'DEC'.
    #[arg(short = 'M', long = "month-sort")]
    pub month: bool,

    /// Reverse the result of comparisons.
    #[arg(short = 'r', long = "reverse")]
    pub reverse: bool,

    /// Consider only blanks and alphanumeric characters.
    #[arg(short = 'd', long = "dictionary-order")]
    pub dictionary_order: bool,

    /// Consider only printable characters.
    #[arg(short = 'i', long = "ignore-nonprinting")]
    pub ignore_nonprinting: bool,

    /// Fold lower case to upper case characters.
    #[arg(short = 'f', long = "ignore-case")]
    pub ignore_case: bool,

    /// Output only the first of an equal run.
    #[arg(short = 'u', long = "unique")]
    pub unique: bool,

    /// Check whether input is sorted; do not sort.
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// Like `-c`, but do not report the first bad line.
    #[arg(short = 'C', long = "check-silent")]
    pub check_quiet: bool,

    /// Merge already-sorted files; do not sort.
    #[arg(short = 'm', long = "merge")]
    pub merge: bool,

    /// Stabilize sort by disabling last-resort comparison.
    #[arg(short = 's', long = "stable")]
    pub stable: bool,

    /// Use SEP instead of non-blank to blank transition.
    #[arg(short = 't', long = "field-separator")]
    pub field_separator: Option<char>,

    /// Line delimiter is NUL, not newline.
    #[arg(short = 'z', long = "zero-terminated")]
    pub zero_terminated: bool,

    /// Write result to FILE instead of standard output.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Use DIR for temporaries, not $TMPDIR or /tmp.
    #[arg(short = 'T', long = "temporary-directory")]
    pub temporary_directory: Option<PathBuf>,

    /// Approximate maximum in-core buffer size, e.g. "8M".
    #[arg(short = 'S', long = "buffer-size")]
    pub buffer_size: Option<String>,
}

impl SortOpts {
    /// Build a [`SortConfig`] from the parsed flags, folding the global
    /// `-n`/`-g`/`-M`/`-r`/... flags into an implicit whole-line key
    /// when no explicit `-k` was given, matching `sort.c`'s `gkey`
    /// fallback (a key list with only the default key behaves like no
    /// key list at all, but still carries the global ordering flags).
    pub fn to_config(&self) -> Result<SortConfig, SortError> {
        let mut keys: Vec<KeySpec> = self
            .key
            .iter()
            .map(|s| parse_key_spec(s))
            .collect::<Result<_, _>>()?;

        if keys.is_empty() && (self.numeric || self.general_numeric || self.month || self.dictionary_order || self.ignore_nonprinting || self.ignore_case) {
            let mut k = KeySpec::default();
            k.mode = if self.general_numeric {
                crate::key::KeyMode::GeneralNumeric
            } else if self.numeric {
                crate::key::KeyMode::Numeric
            } else if self.month {
                crate::key::KeyMode::Month
            } else {
                crate::key::KeyMode::Lexicographic
            };
            k.ignore_nondictionary = self.dictionary_order;
            k.ignore_nonprinting = self.ignore_nonprinting;
            k.fold_case = self.ignore_case;
            keys.push(k);
        }
        for k in &mut keys {
            if self.reverse {
                k.reverse = true;
            }
        }

        Ok(SortConfig {
            keys,
            overall_reverse: self.reverse,
            unique: self.unique,
            check: self.check || self.check_quiet,
            check_quiet: self.check_quiet,
            merge_only: self.merge,
            stable: self.stable,
            field_delimiter: self.field_separator.map(|c| c as u8),
            zero_terminated: self.zero_terminated,
            buffer_bytes: self
                .buffer_size
                .as_deref()
                .and_then(parse_buffer_size)
                .unwrap_or(DEFAULT_BUFFER_BYTES),
            temp_dir: self.temporary_directory.clone(),
            output: self.output.clone(),
        })
    }
}

fn parse_buffer_size(s: &str) -> Option<usize> {
    let s = s.trim();
    let (digits, suffix) = s.split_at(s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len()));
    let n: usize = digits.parse().ok()?;
    let mult = match suffix.to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" => 1024,
        "M" => 1024 * 1024,
        "G" => 1024 * 1024 * 1024,
        _ => return None,
    };
    Some(n * mult)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_size_parses_suffixes() {
        assert_eq!(parse_buffer_size("8M"), Some(8 * 1024 * 1024));
        assert_eq!(parse_buffer_size("512K"), Some(512 * 1024));
        assert_eq!(parse_buffer_size("100"), Some(100));
    }

    #[test]
    fn global_flags_become_an_implicit_key() {
        let opts = SortOpts {
            files: vec![],
            key: vec![],
            numeric: true,
            general_numeric: false,
            month: false,
            reverse: false,
            dictionary_order: false,
            ignore_nonprinting: false,
            ignore_case: false,
            unique: false,
            check: false,
            check_quiet: false,
            merge: false,
            stable: false,
            field_separator: None,
            zero_terminated: false,
            output: None,
            temporary_directory: None,
            buffer_size: None,
        };
        let cfg = opts.to_config().unwrap();
        assert_eq!(cfg.keys.len(), 1);
        assert_eq!(cfg.keys[0].mode, crate::key::KeyMode::Numeric);
    }

    #[test]
    fn rewrites_legacy_single_position() {
        let args: Vec<String> = vec!["+1".to_string()];
        let rewritten = rewrite_legacy_args(&args).unwrap();
        assert_eq!(rewritten, vec!["--key".to_string(), "2".to_string()]);
    }

    #[test]
    fn rewrites_legacy_position_pair_with_options() {
        let args: Vec<String> = vec!["+1.2bn".to_string(), "-3.1r".to_string()];
        let rewritten = rewrite_legacy_args(&args).unwrap();
        assert_eq!(rewritten, vec!["--key".to_string(), "2.2bn,4.1r".to_string()]);
    }

    #[test]
    fn legacy_position_parses_into_an_equivalent_key_spec() {
        let args: Vec<String> = vec!["+0".to_string(), "-2".to_string()];
        let rewritten = rewrite_legacy_args(&args).unwrap();
        let spec = parse_key_spec(&rewritten[1]).unwrap();
        assert_eq!(spec.sword, 0);
        assert_eq!(spec.eword, 2);
    }

    #[test]
    fn leaves_ordinary_flags_untouched() {
        let args: Vec<String> = vec!["-n".to_string(), "-u".to_string(), "file.txt".to_string()];
        let rewritten = rewrite_legacy_args(&args).unwrap();
        assert_eq!(rewritten, args);
    }
}
