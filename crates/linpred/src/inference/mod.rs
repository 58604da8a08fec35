//! Prediction kernel.
//!
//! - [`LinearModelPredict`]: typed prediction methods on [`LinearModel`]
//! - [`predict`]: precision-erased convenience for [`AnyModel`] / [`AnyTable`]
//!
//! [`LinearModel`]: crate::model::LinearModel

mod linear;

pub use linear::{LinearModelPredict, DEFAULT_ROW_BLOCK};

use crate::data::{AnyTable, Element};
use crate::error::Result;
use crate::model::{AnyModel, LinearModel};
use crate::utils::Parallelism;

/// Predict a batch with a runtime-precision model and input.
///
/// Precision is resolved once here; the typed kernel runs afterwards.
///
/// # Errors
///
/// [`PrecisionMismatch`](crate::error::PredictError::PrecisionMismatch) if model and input precisions differ,
/// plus everything [`LinearModelPredict::predict_into`] can return.
pub fn predict(model: &AnyModel, input: &AnyTable, parallelism: Parallelism) -> Result<AnyTable> {
    match model {
        AnyModel::F32(m) => predict_typed(m, input, parallelism),
        AnyModel::F64(m) => predict_typed(m, input, parallelism),
    }
}

fn predict_typed<T: Element>(
    model: &LinearModel<T>,
    input: &AnyTable,
    parallelism: Parallelism,
) -> Result<AnyTable> {
    let input = input.typed::<T>()?;
    Ok(model.predict_with(input, parallelism)?.into())
}
