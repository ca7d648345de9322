//! `rbf-regression` library crate.
//!
//! Regression over a Gaussian radial-basis-function expansion:
//!
//! - shuffle and partition labeled data (`data`)
//! - pick basis centers by clustering the training inputs (`cluster`)
//! - expand every split into a design matrix with one shared metric (`fit::design`)
//! - solve for weights in closed form (ridge) or by adaptive SGD (`fit`)
//! - measure RMSE per split and across a λ × K grid (`pipeline`, `fit::sweep`)
//!
//! All randomness is passed in by the caller, so seeded runs are reproducible.
//! The crate emits diagnostics through the `log` facade and never installs a
//! logger itself.

pub mod cluster;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod pipeline;
