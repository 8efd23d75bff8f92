//! Prime factorization, ported from GNU coreutils' `factor.c`: a
//! single-precision wheel-factorization path for small numbers and an
//! arbitrary-precision trial-division plus Pollard's-rho path for
//! large ones.

pub mod bignum;
pub mod cli;
pub mod engine;
pub mod error;
pub mod wheel;

pub use cli::FactorOpts;
pub use engine::{Algorithm, FactorConfig, FactorEngine};
pub use error::FactorError;
