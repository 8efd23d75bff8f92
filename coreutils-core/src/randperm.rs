//! Uniform random permutation prefixes, ported from gnulib's
//! `randperm.c`, plus the pull-style entropy source it draws on
//! (gnulib's `randread.c`, generalized here to an external stream or
//! the internal [`crate::isaac`] generator).

use std::fs::File;
use std::io::{self, Read, Stdin};

use crate::error::CoreError;
use crate::isaac::{IsaacState, ISAAC_BYTES};

/// A source of random bytes: either an external byte stream (a named
/// file, or `-` for stdin) or the internal ISAAC generator.
///
/// Mirrors gnulib's `randread_source`: exactly one of the two is ever
/// active, and `read` is the only way to pull bytes out, so callers
/// cannot distinguish the internal representation from the outside.
pub enum RandintSource {
    /// Bytes are read directly from an open stream.
    Stream(Box<dyn Read>),
    /// Bytes come from a buffered ISAAC generator.
    Isaac {
        state: IsaacState,
        residue: [u8; ISAAC_BYTES],
        buffered: usize,
    },
}

impl RandintSource {
    /// Open the internal ISAAC PRNG, seeded from OS entropy plus
    /// process/user/time-based material as defense-in-depth.
    pub fn new_internal() -> Result<Self, CoreError> {
        let mut material = [0u8; ISAAC_BYTES];
        getrandom::getrandom(&mut material).map_err(|e| CoreError::Io(io::Error::other(e)))?;

        let pid = std::process::id() as u64;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let supplementary = pid ^ now.rotate_left(17);
        for (i, b) in supplementary.to_le_bytes().iter().enumerate() {
            material[i] ^= b;
        }

        let state = IsaacState::seeded_from(&material);
        Ok(RandintSource::Isaac {
            state,
            residue: [0u8; ISAAC_BYTES],
            buffered: 0,
        })
    }

    /// Open `name` as an external byte stream (`-` means stdin).
    pub fn new_external(name: &str) -> Result<Self, CoreError> {
        if name == "-" {
            Ok(RandintSource::Stream(Box::new(StdinSource(io::stdin()))))
        } else {
            Ok(RandintSource::Stream(Box::new(File::open(name)?)))
        }
    }

    /// Fill `out` with random bytes, refilling the internal generator
    /// or re-reading the external stream as needed.
    pub fn read(&mut self, out: &mut [u8]) -> Result<(), CoreError> {
        match self {
            RandintSource::Stream(s) => {
                s.read_exact(out).map_err(CoreError::Io)?;
                Ok(())
            }
            RandintSource::Isaac {
                state,
                residue,
                buffered,
            } => {
                let mut written = 0;
                while written < out.len() {
                    if *buffered == 0 {
                        let words = state.refill();
                        for (i, w) in words.iter().enumerate() {
                            residue[i * 4..i * 4 + 4].copy_from_slice(&w.to_le_bytes());
                        }
                        *buffered = ISAAC_BYTES;
                    }
                    let take = (out.len() - written).min(*buffered);
                    let start = ISAAC_BYTES - *buffered;
                    out[written..written + take].copy_from_slice(&residue[start..start + take]);
                    *buffered -= take;
                    written += take;
                }
                Ok(())
            }
        }
    }

    /// Choose a uniform value in `[0, bound)` via rejection sampling
    /// over the minimal number of random bytes needed.
    pub fn choose(&mut self, bound: u64) -> Result<u64, CoreError> {
        if bound == 0 {
            return Ok(0);
        }
        let bits = 64 - (bound - 1).leading_zeros().min(64);
        let bytes_needed = ((bits as usize) + 7) / 8;
        loop {
            let mut buf = [0u8; 8];
            self.read(&mut buf[..bytes_needed.max(1)])?;
            let mut v = u64::from_le_bytes(buf);
            if bits < 64 {
                v &= (1u64 << bits) - 1;
            }
            if v < bound {
                return Ok(v);
            }
        }
    }
}

struct StdinSource(Stdin);

impl Read for StdinSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.lock().read(buf)
    }
}

fn ceil_lg(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let mut b = 0;
    let mut n = n - 1;
    while n != 0 {
        b += 1;
        n /= 2;
    }
    b
}

/// Upper bound, in bytes, on the entropy needed to draw the first `h`
/// elements of a random permutation of `n` elements.
pub fn randperm_bound(h: usize, n: usize) -> usize {
    let lg_n = ceil_lg(n);
    let bits = lg_n * h;
    (bits + 7) / 8
}

/// Draw the first `h` elements of a uniform random permutation of
/// `[0, n)`, using `source` for entropy. `h` must not exceed `n`.
pub fn randperm_new(source: &mut RandintSource, h: usize, n: usize) -> Result<Vec<usize>, CoreError> {
    match h {
        0 => Ok(Vec::new()),
        1 => {
            let v = source.choose(n as u64)? as usize;
            Ok(vec![v])
        }
        _ => {
            let mut v: Vec<usize> = (0..n).collect();
            for i in 0..h {
                let j = i + source.choose((n - i) as u64)? as usize;
                v.swap(i, j);
            }
            v.truncate(h);
            Ok(v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_prefix_is_empty() {
        let mut src = RandintSource::new_internal().unwrap();
        assert!(randperm_new(&mut src, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn prefix_has_distinct_values_in_range() {
        let mut src = RandintSource::new_internal().unwrap();
        let v = randperm_new(&mut src, 5, 20).unwrap();
        assert_eq!(v.len(), 5);
        for &x in &v {
            assert!(x < 20);
        }
        let mut sorted = v.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), v.len());
    }

    #[test]
    fn bound_grows_with_h_and_n() {
        assert_eq!(randperm_bound(0, 100), 0);
        assert!(randperm_bound(10, 1000) > randperm_bound(1, 1000));
    }

    #[test]
    fn choose_never_exceeds_bound() {
        let mut src = RandintSource::new_internal().unwrap();
        for _ in 0..100 {
            let v = src.choose(7).unwrap();
            assert!(v < 7);
        }
    }
}
