//! Field comparators, ported from `sort.c`'s `numcompare`,
//! `general_numcompare`, `getmonth` and `keycompare`.

use std::cmp::Ordering;

use crate::key::{key_range, KeyMode, KeySpec};

const MONTHS: [(&str, u32); 12] = [
    ("JAN", 1),
    ("FEB", 2),
    ("MAR", 3),
    ("APR", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AUG", 8),
    ("SEP", 9),
    ("OCT", 10),
    ("NOV", 11),
    ("DEC", 12),
];

/// A field parsed as a leading run of optional sign, digits, and an
/// optional `.`-separated fraction, the way `numcompare` extracts its
/// operands: no conversion to a floating-point value, so magnitudes
/// that would lose precision in `f64` still compare exactly.
struct PlainNumber {
    negative: bool,
    /// Integer-part digits with leading zeros stripped.
    integer: Vec<u8>,
    /// Fractional-part digits, in original order, not stripped.
    fraction: Vec<u8>,
    is_zero: bool,
}

fn parse_plain_number(field: &[u8]) -> PlainNumber {
    let mut i = 0;
    while i < field.len() && (field[i] == b' ' || field[i] == b'\t') {
        i += 1;
    }
    let mut negative = false;
    if i < field.len() && (field[i] == b'-' || field[i] == b'+') {
        negative = field[i] == b'-';
        i += 1;
    }
    let mut integer = Vec::new();
    while i < field.len() && field[i].is_ascii_digit() {
        integer.push(field[i]);
        i += 1;
    }
    let mut fraction = Vec::new();
    if i < field.len() && field[i] == b'.' {
        i += 1;
        while i < field.len() && field[i].is_ascii_digit() {
            fraction.push(field[i]);
            i += 1;
        }
    }
    let first_nonzero = integer.iter().position(|&d| d != b'0');
    let integer = match first_nonzero {
        Some(idx) => integer[idx..].to_vec(),
        None => Vec::new(),
    };
    let is_zero = integer.is_empty() && fraction.iter().all(|&d| d == b'0');
    PlainNumber { negative, integer, fraction, is_zero }
}

/// Compare two digit strings of possibly different lengths as if the
/// shorter one were right-padded with zeros.
fn compare_fraction(a: &[u8], b: &[u8]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let da = a.get(i).copied().unwrap_or(b'0');
        let db = b.get(i).copied().unwrap_or(b'0');
        if da != db {
            return da.cmp(&db);
        }
    }
    Ordering::Equal
}

/// Order of A relative to B as a leading run of optional sign then
/// decimal digits, the way `numcompare` does: sign, then digit count,
/// then digit-by-digit, never through a lossy float conversion.
fn numcompare(a: &[u8], b: &[u8]) -> Ordering {
    let pa = parse_plain_number(a);
    let pb = parse_plain_number(b);

    if pa.is_zero && pb.is_zero {
        return Ordering::Equal;
    }
    if pa.is_zero {
        return if pb.negative { Ordering::Greater } else { Ordering::Less };
    }
    if pb.is_zero {
        return if pa.negative { Ordering::Less } else { Ordering::Greater };
    }
    if pa.negative != pb.negative {
        return if pa.negative { Ordering::Less } else { Ordering::Greater };
    }

    let magnitude = pa
        .integer
        .len()
        .cmp(&pb.integer.len())
        .then_with(|| pa.integer.cmp(&pb.integer))
        .then_with(|| compare_fraction(&pa.fraction, &pb.fraction));

    if pa.negative {
        magnitude.reverse()
    } else {
        magnitude
    }
}

/// Order of A relative to B parsed as arbitrary floating point,
/// exponents included, the way `general_numcompare` does via `xstrtod`.
fn general_numcompare(a: &[u8], b: &[u8]) -> Ordering {
    let pa: f64 = std::str::from_utf8(a)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0.0);
    let pb: f64 = std::str::from_utf8(b)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0.0);
    pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
}

/// Month index in `1..=12` of a three-letter (case-insensitive,
/// leading/trailing-blank-tolerant) month name, or 0 if unrecognized.
fn getmonth(field: &[u8]) -> u32 {
    let s = std::str::from_utf8(field).unwrap_or("").trim();
    if s.len() < 3 {
        return 0;
    }
    let prefix = s[..3].to_ascii_uppercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == prefix)
        .map(|(_, val)| *val)
        .unwrap_or(0)
}

fn fold_case(b: u8) -> u8 {
    b.to_ascii_uppercase()
}

fn is_dictionary_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b' ' || b == b'\t'
}

fn is_printable(b: u8) -> bool {
    (0x20..0x7f).contains(&b)
}

/// Compare the bytes of one key's field in A against B, honoring that
/// key's `ignore_nondictionary`/`ignore_nonprinting`/`fold_case` filters.
fn compare_filtered(a: &[u8], b: &[u8], key: &KeySpec) -> Ordering {
    let keep = |byte: u8| -> bool {
        if key.ignore_nondictionary && !is_dictionary_char(byte) {
            return false;
        }
        if key.ignore_nonprinting && !is_printable(byte) {
            return false;
        }
        true
    };
    let xform = |byte: u8| -> u8 {
        if key.fold_case {
            fold_case(byte)
        } else {
            byte
        }
    };

    let mut ai = a.iter().copied().filter(|&b| keep(b)).map(xform);
    let mut bi = b.iter().copied().filter(|&b| keep(b)).map(xform);
    loop {
        match (ai.next(), bi.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
            }
        }
    }
}

/// Compare one key's field in `a` against `b`, dispatching on the key's
/// mode, then apply `key.reverse`.
pub fn compare_key(a: &[u8], b: &[u8], key: &KeySpec, delim: Option<u8>) -> Ordering {
    let (abeg, aend) = key_range(a, key, delim);
    let (bbeg, bend) = key_range(b, key, delim);
    let fa = &a[abeg..aend];
    let fb = &b[bbeg..bend];

    let ord = match key.mode {
        KeyMode::Numeric => numcompare(fa, fb),
        KeyMode::GeneralNumeric => general_numcompare(fa, fb),
        KeyMode::Month => getmonth(fa).cmp(&getmonth(fb)),
        KeyMode::Lexicographic => compare_filtered(fa, fb, key),
    };

    if key.reverse {
        ord.reverse()
    } else {
        ord
    }
}

/// Compare two records by every key in sequence, falling back to a
/// whole-line byte comparison if all keys tie (or none were given),
/// matching `compare`'s structure.
pub fn compare_record(a: &[u8], b: &[u8], keys: &[KeySpec], delim: Option<u8>, overall_reverse: bool) -> Ordering {
    for key in keys {
        let ord = compare_key(a, b, key, delim);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    let ord = a.cmp(b);
    if overall_reverse {
        ord.reverse()
    } else {
        ord
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::parse_key_spec;

    #[test]
    fn numeric_key_orders_by_value_not_lexicographically() {
        let key = parse_key_spec("1n").unwrap();
        assert_eq!(compare_key(b"9", b"10", &key, None), Ordering::Less);
    }

    #[test]
    fn month_key_orders_calendar_order() {
        let key = parse_key_spec("1M").unwrap();
        assert_eq!(compare_key(b"MAR", b"JAN", &key, None), Ordering::Greater);
    }

    #[test]
    fn reverse_flag_inverts_result() {
        let key = parse_key_spec("1nr").unwrap();
        assert_eq!(compare_key(b"1", b"2", &key, None), Ordering::Greater);
    }

    #[test]
    fn fold_case_makes_upper_and_lower_equal() {
        let key = parse_key_spec("1f").unwrap();
        assert_eq!(compare_key(b"abc", b"ABC", &key, None), Ordering::Equal);
    }

    #[test]
    fn whole_line_fallback_when_no_keys() {
        assert_eq!(compare_record(b"alpha", b"beta", &[], None, false), Ordering::Less);
    }

    #[test]
    fn numeric_key_keeps_precision_past_f64_mantissa() {
        let key = parse_key_spec("1n").unwrap();
        let a = b"100000000000000001";
        let b = b"100000000000000002";
        assert_eq!(compare_key(a, b, &key, None), Ordering::Less);
    }
}
