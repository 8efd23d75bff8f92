//! Shared systems primitives consumed by the sort, factor and od engines.
//!
//! Each module here has a single, narrow job and no knowledge of its
//! callers: a bounded-growth line reader, a comparator-driven heap, a
//! symlink cycle detector, the ISAAC PRNG and its pull-style byte
//! source, a partial Fisher-Yates permutation generator, and an
//! absolute-path canonicalizer.

pub mod canonicalize;
pub mod cycle_check;
pub mod error;
pub mod heap;
pub mod isaac;
pub mod line_reader;
pub mod randperm;

pub use canonicalize::{canonicalize, CanonicalizeMode};
pub use cycle_check::CycleCheck;
pub use error::CoreError;
pub use heap::Heap;
pub use isaac::{IsaacState, ISAAC_BYTES, ISAAC_WORDS};
pub use line_reader::read_until;
pub use randperm::{randperm_bound, randperm_new, RandintSource};
