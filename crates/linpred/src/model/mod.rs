//! Model store: fitted coefficients consumed read-only by prediction.
//!
//! - [`LinearModel`]: typed coefficients and intercepts
//! - [`AnyModel`]: precision-erased model for runtime-configured predictors
//!
//! Models are produced by a training stage (see [`crate::training`] or any
//! external pipeline) and never mutated afterwards. Share one model across
//! predictors by wrapping it in an `Arc`.

mod any;
mod linear;

pub use any::AnyModel;
pub use linear::LinearModel;
