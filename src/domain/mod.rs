//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - labeled data and its partitions (`Dataset`, `Split`)
//! - per-run fitted state (`CovarianceMetric`, `BasisCenters`)
//! - configuration (`SplitConfig`, `SgdConfig`, `TrainConfig`, `SweepConfig`)
//! - solver and trial outputs (`ClosedFormFit`, `SgdFit`, `TrialResult`, etc.)

pub mod types;

pub use types::*;
