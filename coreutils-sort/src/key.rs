//! Key specifications (`-k POS1[,POS2]`) and the field-extraction logic
//! that locates a key's bytes within a line, ported from `sort.c`'s
//! `begfield`/`limfield`/`set_ordering`/`key_init`.

use crate::error::SortError;

/// Per-key comparison mode. Mirrors the mutually-exclusive `numeric`,
/// `general_numeric` and `month` flags on the source's `keyfield`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    #[default]
    Lexicographic,
    Numeric,
    GeneralNumeric,
    Month,
}

/// One `-k` key specification, plus whichever of the `b`/`d`/`f`/`i`/`r`
/// ordering flags were attached to it.
#[derive(Debug, Clone)]
pub struct KeySpec {
    /// Zero-origin field to start at, or -1 meaning "whole line".
    pub sword: i64,
    /// Extra characters to skip after `sword`.
    pub schar: i64,
    pub skip_start_blanks: bool,
    /// Zero-origin first field after the key, or -1 meaning "to EOL".
    pub eword: i64,
    pub echar: i64,
    pub skip_end_blanks: bool,
    pub mode: KeyMode,
    pub reverse: bool,
    pub ignore_nondictionary: bool,
    pub ignore_nonprinting: bool,
    pub fold_case: bool,
}

impl Default for KeySpec {
    fn default() -> Self {
        KeySpec {
            sword: -1,
            schar: 0,
            skip_start_blanks: false,
            eword: -1,
            echar: 0,
            skip_end_blanks: false,
            mode: KeyMode::Lexicographic,
            reverse: false,
            ignore_nondictionary: false,
            ignore_nonprinting: false,
            fold_case: false,
        }
    }
}

/// Parse a `-k` argument: `POS1[,POS2]`, each position `F[.C][OPTS]`.
pub fn parse_key_spec(spec: &str) -> Result<KeySpec, SortError> {
    let mut key = KeySpec::default();
    let (pos1, pos2) = match spec.split_once(',') {
        Some((a, b)) => (a, Some(b)),
        None => (spec, None),
    };

    let (sword, schar, opts1) = parse_pos(pos1)?;
    key.sword = sword.saturating_sub(1).max(0);
    key.schar = schar;
    apply_ordering(&mut key, opts1, true)?;

    if let Some(pos2) = pos2 {
        let (eword, echar, opts2) = parse_pos(pos2)?;
        key.eword = eword.saturating_sub(1).max(0);
        key.echar = echar;
        apply_ordering(&mut key, opts2, false)?;
    }

    Ok(key)
}

/// Parse one `F[.C][OPTS]` position into (field, char-offset, trailing
/// option letters).
fn parse_pos(s: &str) -> Result<(i64, i64, &str), SortError> {
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits_end == 0 {
        return Err(SortError::BadKeySpec(s.to_string(), "missing field number"));
    }
    let field: i64 = s[..digits_end]
        .parse()
        .map_err(|_| SortError::BadKeySpec(s.to_string(), "field number out of range"))?;
    if field < 1 {
        return Err(SortError::BadKeySpec(s.to_string(), "field numbers start at 1"));
    }

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

/// Apply `b`/`d`/`f`/`g`/`i`/`M`/`n`/`r` letters to `key`, split by
/// which end of the key range they were attached to (POSIX leaves `b`'s
/// meaning end-dependent; the rest apply globally).
fn apply_ordering(key: &mut KeySpec, opts: &str, is_start: bool) -> Result<(), SortError> {
    for c in opts.chars() {
        match c {
            'b' => {
                if is_start {
                    key.skip_start_blanks = true;
                } else {
                    key.skip_end_blanks = true;
                }
            }
            'd' => key.ignore_nondictionary = true,
            'f' => key.fold_case = true,
            'g' => key.mode = KeyMode::GeneralNumeric,
            'i' => key.ignore_nonprinting = true,
            'M' => key.mode = KeyMode::Month,
            'n' => key.mode = KeyMode::Numeric,
            'r' => key.reverse = true,
            other => {
                return Err(SortError::BadKeySpec(
                    opts.to_string(),
                    invalid_ordering_letter(other),
                ))
            }
        }
    }
    Ok(())
}

fn invalid_ordering_letter(_c: char) -> &'static str {
    "unknown ordering option"
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Byte offset of the start of `key`'s field within `line`, matching
/// `begfield`'s word-skipping and leading-blank-skipping behavior. Field
/// boundaries are whitespace runs unless `delim` overrides them (`-t`).
pub fn begfield(line: &[u8], key: &KeySpec, delim: Option<u8>) -> usize {
    let mut ptr = 0usize;
    let lim = line.len();
    let mut sword = key.sword;

    if let Some(delim) = delim {
        while ptr < lim && sword > 0 {
            while ptr < lim && line[ptr] != delim {
                ptr += 1;
            }
            if ptr < lim {
                ptr += 1;
            }
            sword -= 1;
        }
    } else {
        while ptr < lim && sword > 0 {
            while ptr < lim && is_blank(line[ptr]) {
                ptr += 1;
            }
            while ptr < lim && !is_blank(line[ptr]) {
                ptr += 1;
            }
            sword -= 1;
        }
    }

    if key.skip_start_blanks {
        while ptr < lim && is_blank(line[ptr]) {
            ptr += 1;
        }
    }

    let schar = key.schar.max(0) as usize;
    (ptr + schar).min(lim)
}

/// Byte offset one past the end of `key`'s field within `line`, matching
/// `limfield`.
pub fn limfield(line: &[u8], key: &KeySpec, delim: Option<u8>) -> usize {
    let mut ptr = 0usize;
    let lim = line.len();
    let mut eword = key.eword;

    if eword < 0 {
        return lim;
    }

    if let Some(delim) = delim {
        while ptr < lim && eword > 0 {
            while ptr < lim && line[ptr] != delim {
                ptr += 1;
            }
            if ptr < lim && (eword > 1 || key.echar > 0) {
                ptr += 1;
            }
            eword -= 1;
        }
    } else {
        while ptr < lim && eword > 0 {
            while ptr < lim && is_blank(line[ptr]) {
                ptr += 1;
            }
            while ptr < lim && !is_blank(line[ptr]) {
                ptr += 1;
            }
            eword -= 1;
        }
    }

    if key.skip_end_blanks {
        while ptr < lim && is_blank(line[ptr]) {
            ptr += 1;
        }
    }

    let echar = key.echar.max(0) as usize;
    (ptr + echar).min(lim)
}

/// The byte range of `key`'s field within `line`, trimmed of trailing
/// blanks when `skip_end_blanks` is set.
pub fn key_range(line: &[u8], key: &KeySpec, delim: Option<u8>) -> (usize, usize) {
    let mut beg = if key.sword >= 0 {
        begfield(line, key, delim)
    } else {
        let mut b = 0;
        if key.skip_start_blanks {
            while b < line.len() && is_blank(line[b]) {
                b += 1;
            }
        }
        b
    };
    let mut end = if key.eword >= 0 {
        limfield(line, key, delim)
    } else {
        line.len()
    };
    if end < beg {
        end = beg;
    }
    if key.skip_end_blanks {
        while end > beg && is_blank(line[end - 1]) {
            end -= 1;
        }
    }
    if beg > end {
        beg = end;
    }
    (beg, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_field_key() {
        let k = parse_key_spec("2").unwrap();
        assert_eq!(k.sword, 1);
        assert_eq!(k.eword, -1);
    }

    #[test]
    fn parses_range_with_options() {
        let k = parse_key_spec("1,2n").unwrap();
        assert_eq!(k.sword, 0);
        assert_eq!(k.eword, 1);
        assert_eq!(k.mode, KeyMode::Numeric);
    }

    #[test]
    fn parses_char_offsets() {
        let k = parse_key_spec("1.3,1.5").unwrap();
        assert_eq!(k.schar, 3);
        assert_eq!(k.echar, 5);
    }

    #[test]
    fn rejects_zero_field() {
        assert!(parse_key_spec("0").is_err());
    }

    #[test]
    fn begfield_skips_whitespace_fields() {
        let line = b"  alpha beta gamma";
        let key = parse_key_spec("2").unwrap();
        let b = begfield(line, &key, None);
        assert_eq!(&line[b..b + 4], b"beta");
    }

    #[test]
    fn key_range_honors_tab_delimiter() {
        let line = b"a\tbb\tccc";
        let key = parse_key_spec("2,2").unwrap();
        let (b, e) = key_range(line, &key, Some(b'\t'));
        assert_eq!(&line[b..e], b"bb");
    }
}
