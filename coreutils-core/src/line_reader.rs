//! Bounded-growth delimited reads, in the style of gnulib's `getndelim2`.
//!
//! `read_until` fills `buf` starting at `offset` until one of two
//! delimiters is seen or the stream ends, growing `buf` geometrically
//! but never past `nmax` bytes total. Unlike a plain `BufRead::read_until`,
//! the caller bounds memory use up front instead of discovering an
//! unbounded allocation after the fact.

use std::io::Read;

use crate::error::CoreError;

/// Smallest amount by which the buffer grows on each reallocation below
/// the doubling threshold; mirrors gnulib's `MIN_CHUNK`.
const MIN_CHUNK: usize = 64;

/// Outcome of a single [`read_until`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were appended to `buf` (not counting the trailing sentinel).
    Bytes(usize),
    /// The stream was already at EOF; nothing was read.
    Eof,
}

/// Read from `stream` into `buf` starting at `offset`, stopping at
/// `delim1`, `delim2` (if `Some`), or EOF, growing `buf` up to `nmax`
/// total bytes.
///
/// A trailing NUL sentinel is always written one byte past the last
/// byte returned (not counted in the returned length), so the caller
/// may treat the filled region as a C-style string if useful. Bytes
/// read beyond `nmax` are discarded, not pushed back onto the stream;
/// the delimiter (or EOF) still terminates the logical read.
pub fn read_until<R: Read>(
    stream: &mut R,
    buf: &mut Vec<u8>,
    offset: usize,
    nmax: usize,
    delim1: u8,
    delim2: Option<u8>,
) -> Result<ReadOutcome, CoreError> {
    if buf.len() < offset + 1 {
        buf.resize(offset + 1, 0);
    }

    let mut read_pos = offset;
    let mut one_byte = [0u8; 1];
    let mut stored = false;

    loop {
        // Keep at least one spare byte for the NUL sentinel.
        if buf.len() - read_pos < 2 && buf.len() < nmax + offset {
            let newsize = if buf.len() < MIN_CHUNK {
                buf.len() + MIN_CHUNK
            } else {
                2 * buf.len()
            };
            let newsize = newsize.min(nmax + offset).max(buf.len());
            if newsize > buf.len() {
                buf.resize(newsize, 0);
            }
        }

        let n = stream.read(&mut one_byte).map_err(CoreError::Io)?;
        if n == 0 {
            if !stored {
                return Ok(ReadOutcome::Eof);
            }
            break;
        }
        let c = one_byte[0];
        stored = true;

        if buf.len() - read_pos >= 2 {
            buf[read_pos] = c;
            read_pos += 1;
        }

        if c == delim1 || Some(c) == delim2 {
            break;
        }
    }

    buf[read_pos] = 0;
    Ok(ReadOutcome::Bytes(read_pos - offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_up_to_delimiter() {
        let mut stream = Cursor::new(b"hello\nworld\n".to_vec());
        let mut buf = Vec::new();
        let n = read_until(&mut stream, &mut buf, 0, 1024, b'\n', None).unwrap();
        assert_eq!(n, ReadOutcome::Bytes(6));
        assert_eq!(&buf[..6], b"hello\n");
    }

    #[test]
    fn reports_eof_on_empty_stream() {
        let mut stream = Cursor::new(Vec::new());
        let mut buf = Vec::new();
        let n = read_until(&mut stream, &mut buf, 0, 1024, b'\n', None).unwrap();
        assert_eq!(n, ReadOutcome::Eof);
    }

    #[test]
    fn returns_partial_line_at_eof() {
        let mut stream = Cursor::new(b"no newline here".to_vec());
        let mut buf = Vec::new();
        let n = read_until(&mut stream, &mut buf, 0, 1024, b'\n', None).unwrap();
        assert_eq!(n, ReadOutcome::Bytes(15));
    }

    #[test]
    fn honors_second_delimiter() {
        let mut stream = Cursor::new(b"a\0b\nc".to_vec());
        let mut buf = Vec::new();
        let n = read_until(&mut stream, &mut buf, 0, 1024, b'\n', Some(0)).unwrap();
        assert_eq!(n, ReadOutcome::Bytes(2));
        assert_eq!(&buf[..2], b"a\0");
    }

    #[test]
    fn discards_bytes_beyond_nmax() {
        let mut stream = Cursor::new(b"abcdefghij\n".to_vec());
        let mut buf = Vec::new();
        let n = read_until(&mut stream, &mut buf, 0, 4, b'\n', None).unwrap();
        assert_eq!(n, ReadOutcome::Bytes(4));
        assert_eq!(&buf[..4], b"abcd");
    }
}
