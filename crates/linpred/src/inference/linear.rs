//! Linear model prediction kernel.
//!
//! Computes `result[r][j] = intercept[j] + sum_k(coef[j][k] * input[r][k])`
//! as one blocked matrix multiply per row block:
//!
//! ```text
//! out_block = broadcast(intercepts)
//! out_block += input_block · weights      (gemm, beta = 1)
//! ```
//!
//! The gemm is `ndarray::linalg::general_mat_mul`, which delegates to the
//! packed, vectorized `matrixmultiply` kernels. Accumulation happens in the
//! element type: `f32` models accumulate in `f32`, `f64` models in `f64`.
//!
//! Rows are independent, so row blocks are distributed over the rayon pool
//! when parallelism is allowed. Block boundaries do not depend on the
//! parallelism mode, so sequential and parallel runs perform the same
//! arithmetic for every row.

use ndarray::linalg::general_mat_mul;
use ndarray::{ArrayView1, ArrayView2, ArrayViewMut2, Axis};

use crate::data::{DataLayout, Element, NumericTable};
use crate::error::{ensure_dim, PredictError, Result};
use crate::model::LinearModel;
use crate::utils::Parallelism;

/// Default number of rows per kernel block.
pub const DEFAULT_ROW_BLOCK: usize = 256;

/// Prediction methods for [`LinearModel`].
pub trait LinearModelPredict<T: Element> {
    /// Predict into a caller-owned output view of shape `(n_rows, n_responses)`.
    ///
    /// All shapes are validated before anything is written: on error the
    /// output is left untouched.
    ///
    /// # Errors
    ///
    /// [`PredictError::DimensionMismatch`] if the input column count differs
    /// from the model's feature count or the output shape is not
    /// `(input rows, n_responses)`; [`PredictError::Configuration`] if
    /// `row_block == 0`.
    fn predict_into(
        &self,
        input: ArrayView2<'_, T>,
        output: ArrayViewMut2<'_, T>,
        parallelism: Parallelism,
        row_block: usize,
    ) -> Result<()>;

    /// Predict a batch, allocating a row-major result table.
    fn predict(&self, input: &NumericTable<T>) -> Result<NumericTable<T>>;

    /// Predict a batch with explicit parallelism control.
    fn predict_with(
        &self,
        input: &NumericTable<T>,
        parallelism: Parallelism,
    ) -> Result<NumericTable<T>>;

    /// Predict a single observation.
    ///
    /// Returns a vector of length `n_responses`.
    fn predict_row(&self, features: &[T]) -> Result<Vec<T>>;
}

impl<T: Element> LinearModelPredict<T> for LinearModel<T> {
    fn predict_into(
        &self,
        input: ArrayView2<'_, T>,
        mut output: ArrayViewMut2<'_, T>,
        parallelism: Parallelism,
        row_block: usize,
    ) -> Result<()> {
        ensure_dim("input columns", self.n_features(), input.ncols())?;
        ensure_dim("result rows", input.nrows(), output.nrows())?;
        ensure_dim("result columns", self.n_responses(), output.ncols())?;
        if row_block == 0 {
            return Err(PredictError::Configuration(
                "row block size must be at least 1".into(),
            ));
        }
        if input.nrows() == 0 {
            return Ok(());
        }

        let weights = self.weight_matrix();
        let intercepts = self.intercepts();

        let blocks = input
            .axis_chunks_iter(Axis(0), row_block)
            .zip(output.axis_chunks_iter_mut(Axis(0), row_block));

        tracing::trace!(
            rows = input.nrows(),
            row_block,
            parallel = parallelism.is_parallel(),
            "dispatching prediction blocks"
        );

        parallelism.maybe_par_bridge_for_each(blocks, |(x, mut out)| {
            predict_block(x, weights, intercepts, &mut out);
        });

        Ok(())
    }

    fn predict(&self, input: &NumericTable<T>) -> Result<NumericTable<T>> {
        self.predict_with(input, Parallelism::Sequential)
    }

    fn predict_with(
        &self,
        input: &NumericTable<T>,
        parallelism: Parallelism,
    ) -> Result<NumericTable<T>> {
        ensure_dim("input columns", self.n_features(), input.column_count())?;
        let mut output =
            NumericTable::zeros(input.row_count(), self.n_responses(), DataLayout::RowMajor)?;
        self.predict_into(
            input.view(),
            output.view_mut(),
            parallelism,
            DEFAULT_ROW_BLOCK,
        )?;
        Ok(output)
    }

    fn predict_row(&self, features: &[T]) -> Result<Vec<T>> {
        ensure_dim("input columns", self.n_features(), features.len())?;

        let weights = self.weight_matrix();
        let outputs = (0..self.n_responses())
            .map(|response| {
                features
                    .iter()
                    .zip(weights.column(response))
                    .fold(T::zero(), |acc, (&x, &w)| acc + x * w)
                    + self.intercept(response)
            })
            .collect();

        Ok(outputs)
    }
}

/// Compute one row block: broadcast intercepts, then accumulate `x · weights`.
#[inline]
fn predict_block<T: Element>(
    x: ArrayView2<'_, T>,
    weights: ArrayView2<'_, T>,
    intercepts: ArrayView1<'_, T>,
    out: &mut ArrayViewMut2<'_, T>,
) {
    for mut row in out.rows_mut() {
        row.assign(&intercepts);
    }
    // Zero-feature models predict the intercepts alone
    if weights.nrows() == 0 {
        return;
    }
    general_mat_mul(T::one(), &x, &weights, T::one(), out);
}
