//! Output format specs (`-t TYPE`), ported from `od.c`'s `enum
//! output_format`/`enum size_spec`/`decode_format_string`.

use crate::error::OdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    SignedDecimal,
    UnsignedDecimal,
    Octal,
    Hexadecimal,
    NamedCharacter,
    Character,
    Float,
}

/// Width, in bytes, of one datum: `width_bytes[size_spec]` in the
/// source. `FloatLong` stands in for `long double`; Rust has no native
/// 80/128-bit float, so it is rendered with the same width as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    Char,
    Short,
    Int,
    Long,
    FloatSingle,
    FloatDouble,
    FloatLong,
}

impl SizeSpec {
    pub fn bytes(self) -> usize {
        match self {
            SizeSpec::Char => 1,
            SizeSpec::Short => 2,
            SizeSpec::Int => 4,
            SizeSpec::Long => 8,
            SizeSpec::FloatSingle => 4,
            SizeSpec::FloatDouble => 8,
            SizeSpec::FloatLong => 8,
        }
    }

    fn from_suffix(c: Option<char>) -> Self {
        match c {
            Some('C') => SizeSpec::Char,
            Some('S') => SizeSpec::Short,
            Some('I') => SizeSpec::Int,
            Some('L') => SizeSpec::Long,
            _ => SizeSpec::Int,
        }
    }

    fn from_digit(n: usize) -> Option<Self> {
        match n {
            1 => Some(SizeSpec::Char),
            2 => Some(SizeSpec::Short),
            4 => Some(SizeSpec::Int),
            8 => Some(SizeSpec::Long),
            _ => None,
        }
    }

    fn float_from_digit(n: usize) -> Option<Self> {
        match n {
            4 => Some(SizeSpec::FloatSingle),
            8 => Some(SizeSpec::FloatDouble),
            _ => None,
        }
    }

    fn float_from_suffix(c: Option<char>) -> Self {
        match c {
            Some('F') => SizeSpec::FloatSingle,
            Some('L') => SizeSpec::FloatLong,
            _ => SizeSpec::FloatDouble,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub fmt: OutputFormat,
    pub size: SizeSpec,
}

impl TypeSpec {
    pub fn field_width(self) -> usize {
        if self.fmt == OutputFormat::Float {
            return match self.size {
                SizeSpec::FloatSingle => 14,
                _ => 24,
            };
        }
        let bytes = self.size.bytes();
        let idx = bytes.trailing_zeros() as usize; // 1,2,4,8 -> 0,1,2,3
        match self.fmt {
            OutputFormat::Octal => [4, 7, 12, 23][idx],
            OutputFormat::SignedDecimal => [4, 6, 11, 20][idx],
            OutputFormat::UnsignedDecimal => [3, 5, 10, 20][idx],
            OutputFormat::Hexadecimal => [2, 4, 8, 16][idx],
            OutputFormat::NamedCharacter | OutputFormat::Character => 4,
            OutputFormat::Float => unreachable!(),
        }
    }
}

/// Parse one `-t` argument into its component type specs, e.g. `"ox2"`
/// means octal words followed by 2-byte hex words.
pub fn parse_type_string(spec: &str) -> Result<Vec<TypeSpec>, OdError> {
    let mut out = Vec::new();
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let fmt = match chars[i] {
            'd' => OutputFormat::SignedDecimal,
            'u' => OutputFormat::UnsignedDecimal,
            'o' => OutputFormat::Octal,
            'x' => OutputFormat::Hexadecimal,
            'a' => OutputFormat::NamedCharacter,
            'c' => OutputFormat::Character,
            'f' => OutputFormat::Float,
            _ => return Err(OdError::BadTypeSpec(spec.to_string())),
        };
        i += 1;

        if fmt == OutputFormat::NamedCharacter || fmt == OutputFormat::Character {
            out.push(TypeSpec {
                fmt,
                size: SizeSpec::Char,
            });
            continue;
        }

        let size = if fmt == OutputFormat::Float {
            if i < chars.len() && chars[i].is_ascii_digit() {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let n: usize = chars[start..i].iter().collect::<String>().parse().unwrap();
                SizeSpec::float_from_digit(n).ok_or_else(|| OdError::BadTypeSpec(spec.to_string()))?
            } else if i < chars.len() && "FDL".contains(chars[i]) {
                let s = SizeSpec::float_from_suffix(Some(chars[i]));
                i += 1;
                s
            } else {
                SizeSpec::FloatDouble
            }
        } else if i < chars.len() && chars[i].is_ascii_digit() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let n: usize = chars[start..i].iter().collect::<String>().parse().unwrap();
            SizeSpec::from_digit(n).ok_or_else(|| OdError::BadTypeSpec(spec.to_string()))?
        } else if i < chars.len() && "CSIL".contains(chars[i]) {
            let s = SizeSpec::from_suffix(Some(chars[i]));
            i += 1;
            s
        } else {
            SizeSpec::Int
        };

        out.push(TypeSpec { fmt, size });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_octal() {
        let specs = parse_type_string("o").unwrap();
        assert_eq!(specs, vec![TypeSpec { fmt: OutputFormat::Octal, size: SizeSpec::Int }]);
    }

    #[test]
    fn parses_sized_hex_and_char() {
        let specs = parse_type_string("x1c").unwrap();
        assert_eq!(specs[0].size, SizeSpec::Char);
        assert_eq!(specs[1].fmt, OutputFormat::Character);
    }

    #[test]
    fn parses_letter_size_suffix() {
        let specs = parse_type_string("dL").unwrap();
        assert_eq!(specs[0].size, SizeSpec::Long);
    }

    #[test]
    fn rejects_unknown_letter() {
        assert!(parse_type_string("q").is_err());
    }

    #[test]
    fn parses_float_sizes() {
        let specs = parse_type_string("f4f8fL").unwrap();
        assert_eq!(specs[0], TypeSpec { fmt: OutputFormat::Float, size: SizeSpec::FloatSingle });
        assert_eq!(specs[1], TypeSpec { fmt: OutputFormat::Float, size: SizeSpec::FloatDouble });
        assert_eq!(specs[2], TypeSpec { fmt: OutputFormat::Float, size: SizeSpec::FloatLong });
    }

    #[test]
    fn bare_f_defaults_to_double() {
        let specs = parse_type_string("f").unwrap();
        assert_eq!(specs[0].size, SizeSpec::FloatDouble);
    }
}
