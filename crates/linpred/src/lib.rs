//! linpred: batch prediction with fitted linear regression models.
//!
//! Applies a linear model (coefficients plus optional intercepts, one or more
//! responses) to a dense table of observations and produces one prediction
//! row per observation.
//!
//! # Key Types
//!
//! - [`BatchPredictor`] - Binds a model and input, computes the result table
//! - [`PredictorConfig`] - Precision, method and resource configuration
//! - [`LinearModel`] / [`AnyModel`] - Fitted model, typed or precision-erased
//! - [`NumericTable`] / [`AnyTable`] - Dense row- or column-major tables
//!
//! # Prediction
//!
//! For typed code, [`LinearModelPredict`] predicts directly on a
//! [`LinearModel`]. [`BatchPredictor`] wraps the same kernel behind a
//! bind-then-compute lifecycle with precision checked at runtime.
//!
//! # Training
//!
//! [`training::fit_normal_equations`] fits a model by least squares.

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod model;
pub mod predictor;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use predictor::{BatchPredictor, PredictorState};

pub use config::{Precision, PredictionMethod, PredictorConfig};

pub use data::{AnyTable, DataLayout, Element, NumericTable};
pub use model::{AnyModel, LinearModel};

pub use inference::LinearModelPredict;
pub use training::{fit_normal_equations, TrainParams};

pub use error::{PredictError, Result};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
