//! Algorithm dispatch and line-oriented output, ported from `factor.c`'s
//! `print_factors`/`do_stdin`.

use std::io::Write;

use num_bigint::BigUint;

use crate::bignum::factor_bignum;
use crate::error::FactorError;
use crate::wheel::factor_wheel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Single-precision below 6 digits, arbitrary-precision at or
    /// above, matching the source's digit-count heuristic.
    #[default]
    Autoselect,
    Bignum,
    Single,
}

#[derive(Debug, Clone, Default)]
pub struct FactorConfig {
    pub algorithm: Algorithm,
    pub verbose: bool,
}

pub struct FactorEngine {
    config: FactorConfig,
}

impl FactorEngine {
    pub fn new(config: FactorConfig) -> Self {
        FactorEngine { config }
    }

    /// Factor the decimal string `s` and write `s: f1 f2 ...\n` to `out`.
    pub fn print_factors(&self, s: &str, out: &mut dyn Write) -> Result<(), FactorError> {
        let use_bignum = match self.config.algorithm {
            Algorithm::Bignum => true,
            Algorithm::Single => false,
            Algorithm::Autoselect => s.trim().len() >= 6,
        };

        if use_bignum {
            let n: BigUint = s
                .trim()
                .parse()
                .map_err(|_| FactorError::NotAPositiveInteger(s.to_string()))?;
            if self.config.verbose {
                tracing::debug!(input = s, "using arbitrary-precision arithmetic");
            }
            write!(out, "{}:", n)?;
            if !n.is_zero_value() {
                for f in factor_bignum(n) {
                    write!(out, " {}", f)?;
                }
            }
            writeln!(out)?;
        } else {
            let n: u64 = s
                .trim()
                .parse()
                .map_err(|_| FactorError::NotAPositiveInteger(s.to_string()))?;
            if self.config.verbose {
                tracing::debug!(input = s, "using single-precision arithmetic");
            }
            write!(out, "{}:", n)?;
            for f in factor_wheel(n) {
                write!(out, " {}", f)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Factor every whitespace-delimited token read from `input`,
    /// matching `do_stdin`'s token loop.
    pub fn run_stream(&self, input: &str, out: &mut dyn Write) -> Result<(), FactorError> {
        for token in input.split_whitespace() {
            self.print_factors(token, out)?;
        }
        Ok(())
    }
}

trait IsZeroValue {
    fn is_zero_value(&self) -> bool;
}

impl IsZeroValue for BigUint {
    fn is_zero_value(&self) -> bool {
        use num_traits::Zero;
        self.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cfg: FactorConfig, s: &str) -> String {
        let engine = FactorEngine::new(cfg);
        let mut out = Vec::new();
        engine.print_factors(s, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn autoselect_uses_single_precision_below_six_digits() {
        assert_eq!(run(FactorConfig::default(), "12"), "12: 2 2 3\n");
    }

    #[test]
    fn autoselect_uses_bignum_at_six_digits() {
        let out = run(FactorConfig::default(), "100000");
        assert!(out.starts_with("100000:"));
    }

    #[test]
    fn forced_bignum_matches_single_precision_result() {
        let cfg = FactorConfig {
            algorithm: Algorithm::Bignum,
            verbose: false,
        };
        assert_eq!(run(cfg, "12"), "12: 2 2 3\n");
    }

    #[test]
    fn zero_prints_no_factors() {
        assert_eq!(run(FactorConfig::default(), "0"), "0:\n");
    }

    #[test]
    fn rejects_non_numeric_input() {
        let engine = FactorEngine::new(FactorConfig::default());
        let mut out = Vec::new();
        assert!(engine.print_factors("abc", &mut out).is_err());
    }
}
