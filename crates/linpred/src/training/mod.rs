//! Fitting linear models from training data.
//!
//! Prediction only needs a [`LinearModel`](crate::model::LinearModel); this
//! module produces one by ordinary or ridge least squares so a full
//! train-then-predict workflow lives in one crate.

mod normal_equations;

pub use normal_equations::{fit_normal_equations, TrainParams, TrainParamsBuilder};
