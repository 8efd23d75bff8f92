use clap::Parser;

use crate::engine::{Algorithm, FactorConfig};

#[derive(Debug, Parser)]
#[command(name = "factor", about = "Print the prime factors of each NUMBER")]
pub struct FactorOpts {
    /// Numbers to factor; read from standard input if none are given.
    pub numbers: Vec<String>,

    /// Always use arbitrary-precision arithmetic.
    #[arg(long = "bignum")]
    pub bignum: bool,

    /// Always use single-precision arithmetic.
    #[arg(long = "no-bignum")]
    pub no_bignum: bool,

    /// Print diagnostics about which algorithm was chosen.
    #[arg(long = "verbose")]
    pub verbose: bool,
}

impl FactorOpts {
    pub fn to_config(&self) -> FactorConfig {
        let algorithm = if self.bignum {
            Algorithm::Bignum
        } else if self.no_bignum {
            Algorithm::Single
        } else {
            Algorithm::Autoselect
        };
        FactorConfig {
            algorithm,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bignum_flag_forces_bignum_algorithm() {
        let opts = FactorOpts {
            numbers: vec![],
            bignum: true,
            no_bignum: false,
            verbose: false,
        };
        assert_eq!(opts.to_config().algorithm, Algorithm::Bignum);
    }
}
