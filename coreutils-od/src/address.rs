//! Address-column formatting, ported from `od.c`'s
//! `format_address_std`/`format_address_none`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRadix {
    Octal,
    Decimal,
    Hex,
    None,
}

impl AddressRadix {
    /// Render `address` in this radix, zero-padded to `pad_len`
    /// characters, or the empty string for [`AddressRadix::None`].
    pub fn format(self, address: u64, pad_len: usize) -> String {
        let digits = match self {
            AddressRadix::Octal => format!("{:o}", address),
            AddressRadix::Decimal => format!("{}", address),
            AddressRadix::Hex => format!("{:x}", address),
            AddressRadix::None => return String::new(),
        };
        if digits.len() >= pad_len {
            digits
        } else {
            format!("{}{}", "0".repeat(pad_len - digits.len()), digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_requested_width() {
        assert_eq!(AddressRadix::Octal.format(8, 7), "0000010");
    }

    #[test]
    fn none_radix_is_empty() {
        assert_eq!(AddressRadix::None.format(100, 7), "");
    }

    #[test]
    fn hex_formats_lowercase() {
        assert_eq!(AddressRadix::Hex.format(255, 2), "ff");
    }
}
