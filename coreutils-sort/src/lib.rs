//! External merge sort over line-oriented text, ported from GNU
//! coreutils' `sort.c`: key specs, field extraction, an in-core
//! two-way mergesort, and a temp-file-backed k-way external merge for
//! inputs too large to hold in memory at once.

pub mod cli;
pub mod compare;
pub mod engine;
pub mod error;
pub mod external;
pub mod key;
pub mod mergesort;
pub mod record;
pub mod signals;

pub use cli::{rewrite_legacy_args, SortOpts};
pub use engine::{SortConfig, SortEngine};
pub use error::SortError;
pub use key::{parse_key_spec, KeyMode, KeySpec};
