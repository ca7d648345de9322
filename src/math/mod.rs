//! Numerical building blocks: error metric, RBF kernel, checked inversion and
//! a reference least-squares solver.

pub mod kernel;
pub mod linalg;
pub mod metric;
pub mod ols;

pub use kernel::*;
pub use linalg::*;
pub use metric::*;
pub use ols::*;
