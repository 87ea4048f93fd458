//! Supporting utilities for the experiment runners.
//!
//! - **`data_loader`**: Reads externally supplied tables of zeta zero heights,
//!   one decimal value per line, so that experiments can be compared against
//!   a reference table other than the built-in one.
//!
//! - **`perf`**: Memory bookkeeping for dense operators. A dense matrix of
//!   dimension `N` takes `8·N²` bytes, which reaches gigabytes for the largest
//!   grids, and the peak resident set size is read back on Linux.

pub mod data_loader;
pub mod perf;
