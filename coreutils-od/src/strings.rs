//! `-S`/`--strings` mode, ported from `od.c`'s `dump_strings`: scan for
//! runs of at least `string_min` printable characters terminated by a
//! NUL byte, escaping control characters in the bell/backspace/
//! formfeed/newline/CR/tab family on output.
//!
//! `dump_strings` reads the stream one NUL-delimited record at a time
//! (any abandoned candidate just restarts scanning later in the same
//! record, never crossing a NUL), so each record yields at most one
//! reported string: the maximal printable suffix immediately before
//! its terminator, if that suffix is at least `string_min` bytes long.
//! A record with no terminating NUL (the tail of the input) never
//! yields a string, matching the source only printing once `c == '\0'`
//! is seen.

use std::io::Read;

use coreutils_core::line_reader::ReadOutcome;
use coreutils_core::read_until;

use crate::error::OdError;

fn is_printable(b: u8) -> bool {
    (0x20..0x7f).contains(&b)
}

fn escape(b: u8) -> String {
    match b {
        0x07 => "\\a".to_string(),
        0x08 => "\\b".to_string(),
        0x0c => "\\f".to_string(),
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        0x0b => "\\v".to_string(),
        _ => (b as char).to_string(),
    }
}

/// Find every NUL-terminated printable run of at least `string_min`
/// bytes in `stream`, returning `(offset_of_first_char, escaped_text)`
/// pairs, reading one NUL-delimited record at a time via
/// [`coreutils_core::read_until`].
pub fn find_strings<R: Read>(mut stream: R, string_min: usize) -> Result<Vec<(usize, String)>, OdError> {
    let mut out = Vec::new();
    let mut offset = 0usize;

    loop {
        let mut buf = Vec::new();
        let n = match read_until(&mut stream, &mut buf, 0, usize::MAX, 0, None)? {
            ReadOutcome::Eof => break,
            ReadOutcome::Bytes(n) => n,
        };
        buf.truncate(n);
        let terminated = buf.last() == Some(&0);
        if terminated {
            buf.pop();
        }

        if terminated {
            let run_start = buf
                .iter()
                .enumerate()
                .rev()
                .find(|&(_, &b)| !is_printable(b))
                .map(|(i, _)| i + 1)
                .unwrap_or(0);
            let run = &buf[run_start..];
            if run.len() >= string_min {
                let text: String = run.iter().map(|&b| escape(b)).collect();
                out.push((offset + run_start, text));
            }
        }

        offset += buf.len() + usize::from(terminated);
        if !terminated {
            break;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan(data: &[u8], string_min: usize) -> Vec<(usize, String)> {
        find_strings(Cursor::new(data.to_vec()), string_min).unwrap()
    }

    #[test]
    fn finds_a_single_terminated_run() {
        let found = scan(b"\x01\x02hello\0\x03", 4);
        assert_eq!(found, vec![(2, "hello".to_string())]);
    }

    #[test]
    fn ignores_runs_shorter_than_minimum() {
        let found = scan(b"hi\0world!!\0", 4);
        assert_eq!(found, vec![(3, "world!!".to_string())]);
    }

    #[test]
    fn unterminated_trailing_run_is_dropped() {
        assert!(scan(b"\0nottermin", 4).is_empty());
    }

    #[test]
    fn a_non_printable_byte_breaks_the_candidate_run() {
        // The tab splits the record into "ab\x01" (too short once the
        // leading non-printable byte is excluded) and the trailing
        // printable suffix "cdef", which reaches the NUL and qualifies.
        let found = scan(b"ab\x01cdef\0", 3);
        assert_eq!(found, vec![(3, "cdef".to_string())]);
    }

    #[test]
    fn escape_renders_the_control_character_family() {
        assert_eq!(escape(0x07), "\\a");
        assert_eq!(escape(0x08), "\\b");
        assert_eq!(escape(b'\t'), "\\t");
        assert_eq!(escape(b'\n'), "\\n");
        assert_eq!(escape(b'A'), "A");
    }
}
