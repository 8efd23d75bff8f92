//! A byte dumper ported from GNU coreutils' `od.c`: octal/decimal/hex/
//! character formatting, address-column radixes, duplicate-block
//! elision, and `-S` strings-extraction mode.

pub mod address;
pub mod cli;
pub mod dump;
pub mod engine;
pub mod error;
pub mod format;
pub mod offset;
pub mod strings;

pub use cli::OdOpts;
pub use engine::{OdConfig, OdEngine};
pub use error::OdError;
