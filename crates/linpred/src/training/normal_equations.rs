//! Least squares via the normal equations.
//!
//! Solves `(X'X + λI) B = X'Y` for all responses at once, where `X` carries a
//! trailing column of ones when an intercept is fitted. The ridge term is
//! never applied to the intercept.
//!
//! The system is assembled and solved in `f64` regardless of the element
//! type; coefficients are narrowed back to `T` at the end. QR is tried first,
//! with an SVD pseudo-inverse fallback for rank-deficient designs.

use bon::Builder;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data::{Element, NumericTable};
use crate::error::{ensure_dim, PredictError, Result};
use crate::model::LinearModel;

/// Singular values below `max_sv * SVD_RCOND` are treated as zero.
const SVD_RCOND: f64 = f64::EPSILON * 100.0;
const SVD_MAX_ITERATIONS: usize = 1000;
/// QR is rejected when `min |R_ii| / max |R_ii|` falls below this.
const QR_MIN_PIVOT_RATIO: f64 = 1e-10;

/// Parameters for [`fit_normal_equations`].
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct TrainParams {
    /// Fit an intercept per response. Default: true.
    #[builder(default = true)]
    pub fit_intercept: bool,

    /// L2 penalty on coefficients (ridge). Default: 0.0.
    #[builder(default = 0.0)]
    pub l2: f64,
}

impl<S: train_params_builder::IsComplete> TrainParamsBuilder<S> {
    /// Build and validate the parameters.
    pub fn build(self) -> Result<TrainParams> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl TrainParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(PredictError::Configuration(format!(
                "l2 must be finite and non-negative, got {}",
                self.l2
            )));
        }
        Ok(())
    }
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            l2: 0.0,
        }
    }
}

/// Fit a linear model to `x` (`n_rows x n_features`) and `y`
/// (`n_rows x n_responses`).
///
/// # Errors
///
/// - [`PredictError::DimensionMismatch`] if `x` and `y` row counts differ.
/// - [`PredictError::Configuration`] for empty data, invalid parameters, or
///   non-finite values.
/// - [`PredictError::SingularSystem`] if no finite solution is found.
pub fn fit_normal_equations<T: Element>(
    x: &NumericTable<T>,
    y: &NumericTable<T>,
    params: &TrainParams,
) -> Result<LinearModel<T>> {
    params.validate()?;
    ensure_dim("response rows", x.row_count(), y.row_count())?;
    if x.row_count() == 0 {
        return Err(PredictError::Configuration(
            "training data must have at least 1 row".into(),
        ));
    }
    if y.column_count() == 0 {
        return Err(PredictError::Configuration(
            "training data must have at least 1 response".into(),
        ));
    }
    let all_finite = |t: &NumericTable<T>| t.view().iter().all(|v| v.is_finite());
    if !all_finite(x) || !all_finite(y) {
        return Err(PredictError::Configuration(
            "training data contains non-finite values".into(),
        ));
    }

    let (n_rows, n_features) = x.shape();
    let n_responses = y.column_count();
    let n_coeffs = n_features + usize::from(params.fit_intercept);
    if n_coeffs == 0 {
        return Err(PredictError::Configuration(
            "no features and no intercept to fit".into(),
        ));
    }

    let xv = x.view();
    let yv = y.view();
    let design = DMatrix::from_fn(n_rows, n_coeffs, |i, j| {
        if j < n_features {
            xv[[i, j]].as_f64()
        } else {
            1.0
        }
    });
    let targets = DMatrix::from_fn(n_rows, n_responses, |i, j| yv[[i, j]].as_f64());

    let design_t = design.transpose();
    let mut xtx = &design_t * &design;
    let xty = &design_t * &targets;
    for j in 0..n_features {
        xtx[(j, j)] += params.l2;
    }

    tracing::debug!(
        n_rows,
        n_features,
        n_responses,
        fit_intercept = params.fit_intercept,
        l2 = params.l2,
        "solving normal equations"
    );

    let solution = solve(xtx, &xty).ok_or(PredictError::SingularSystem)?;

    let coefficients = Array2::from_shape_fn((n_responses, n_features), |(r, f)| {
        T::cast_from_f64(solution[(f, r)])
    });
    if params.fit_intercept {
        let intercepts =
            Array1::from_shape_fn(n_responses, |r| T::cast_from_f64(solution[(n_features, r)]));
        LinearModel::from_parts(coefficients, intercepts)
    } else {
        LinearModel::without_intercept(coefficients)
    }
}

/// Solve `a * s = b`.
///
/// QR is used when its triangular factor is well conditioned. Otherwise the
/// SVD pseudo-inverse gives the minimum-norm solution.
fn solve(a: DMatrix<f64>, b: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let finite = |m: &DMatrix<f64>| m.iter().all(|v| v.is_finite());

    let qr = a.clone().qr();
    let pivots = qr.r().diagonal().map(f64::abs);
    let (min_pivot, max_pivot) = (pivots.min(), pivots.max());
    if max_pivot > 0.0 && min_pivot / max_pivot >= QR_MIN_PIVOT_RATIO {
        if let Some(solution) = qr.solve(b) {
            if finite(&solution) {
                return Some(solution);
            }
        }
    }

    tracing::debug!(min_pivot, max_pivot, "ill-conditioned QR, falling back to SVD");
    let svd = a.try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)?;
    let eps = svd.singular_values.max() * SVD_RCOND;
    svd.solve(b, eps).ok().filter(finite)
}
