//! Traditional `OFFSET[.][Bb]` argument parsing, ported from `od.c`'s
//! `parse_old_offset`.

/// Parse a legacy bare-offset argument (octal by default, `0x`-prefixed
/// hex, or decimal when it contains a `.`), with an optional leading
/// `+` and an optional trailing `b`/`B` meaning "times 512".
pub fn parse_old_offset(s: &str) -> Option<u64> {
    if s.is_empty() {
        return None;
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let (digits, multiplier) = match s.strip_suffix(['b', 'B']) {
        Some(rest) => (rest, 512u64),
        None => (s, 1u64),
    };
    if digits.is_empty() {
        return None;
    }

    let (radix, digits) = if digits.contains('.') {
        (10u32, digits.trim_end_matches('.'))
    } else if let Some(rest) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16u32, rest)
    } else {
        (8u32, digits)
    };

    u64::from_str_radix(digits, radix).ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_octal() {
        assert_eq!(parse_old_offset("20"), Some(16));
    }

    #[test]
    fn decimal_when_dotted() {
        assert_eq!(parse_old_offset("20."), Some(20));
    }

    #[test]
    fn hex_when_0x_prefixed() {
        assert_eq!(parse_old_offset("0x20"), Some(32));
    }

    #[test]
    fn block_suffix_multiplies_by_512() {
        assert_eq!(parse_old_offset("1b"), Some(512));
    }

    #[test]
    fn leading_plus_is_skipped() {
        assert_eq!(parse_old_offset("+10"), Some(8));
    }
}
