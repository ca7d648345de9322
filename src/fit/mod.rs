//! Model fitting.
//!
//! Responsibilities:
//!
//! - expand raw inputs into the RBF design matrix (`design`)
//! - solve for weights in closed form or by adaptive SGD (`closed_form`, `sgd`)
//! - evaluate a λ × K grid of configurations in parallel (`sweep`)

pub mod closed_form;
pub mod design;
pub mod sgd;
pub mod sweep;

pub use closed_form::*;
pub use design::*;
pub use sgd::*;
pub use sweep::*;
