//! Linear regression model data structure.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::config::Precision;
use crate::data::Element;
use crate::error::{ensure_dim, PredictError, Result};

/// Fitted linear regression model (coefficients + intercepts).
///
/// Stores a weight matrix with shape `[n_features + 1, n_responses]`:
///
/// ```text
/// weights[[feature, response]] → coefficient
/// weights[[n_features, response]] → intercept (last row)
/// ```
///
/// This layout enables direct dot-product prediction:
/// `output = features · weights[:-1, :] + weights[-1, :]`
///
/// The model is immutable once built; prediction only reads it.
///
/// # Example
///
/// ```
/// use linpred::model::LinearModel;
/// use ndarray::array;
///
/// // 2 features, 1 response: y = 1 + 2 x0 + 3 x1
/// let model = LinearModel::from_parts(array![[2.0f64, 3.0]], array![1.0]).unwrap();
///
/// assert_eq!(model.n_features(), 2);
/// assert_eq!(model.coefficient(0, 1), 3.0);
/// assert_eq!(model.intercept(0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "LinearModelRepr<T>",
    bound(deserialize = "T: Element + Deserialize<'de>")
)]
pub struct LinearModel<T> {
    /// Weight matrix: shape `[n_features + 1, n_responses]`.
    /// Last row is the intercept term.
    weights: Array2<T>,
    /// Whether the intercept row was fitted (otherwise it is all zeros).
    has_intercept: bool,
}

impl<T: Element> LinearModel<T> {
    /// Create a model from a weight matrix `[n_features + 1, n_responses]`
    /// whose last row holds the intercepts.
    ///
    /// # Errors
    ///
    /// [`PredictError::Configuration`] if the matrix has no intercept row or
    /// no response columns.
    pub fn from_weights(weights: Array2<T>) -> Result<Self> {
        if weights.nrows() == 0 {
            return Err(PredictError::Configuration(
                "weights must have at least 1 row (intercept)".into(),
            ));
        }
        if weights.ncols() == 0 {
            return Err(PredictError::Configuration(
                "model must have at least 1 response".into(),
            ));
        }
        let weights = weights.as_standard_layout().into_owned();
        Ok(Self {
            weights,
            has_intercept: true,
        })
    }

    /// Create a model from coefficients `[n_responses, n_features]` and one
    /// intercept per response.
    pub fn from_parts(coefficients: Array2<T>, intercepts: Array1<T>) -> Result<Self> {
        ensure_dim("intercepts", coefficients.nrows(), intercepts.len())?;
        let (n_responses, n_features) = coefficients.dim();
        let row_len = weight_rows(n_features, n_responses)?;
        let mut weights = Array2::zeros((row_len, n_responses));
        weights
            .slice_mut(s![..n_features, ..])
            .assign(&coefficients.t());
        weights.row_mut(n_features).assign(&intercepts);
        Self::from_weights(weights)
    }

    /// Create a model with coefficients `[n_responses, n_features]` and all
    /// intercepts fixed at zero.
    pub fn without_intercept(coefficients: Array2<T>) -> Result<Self> {
        let intercepts = Array1::zeros(coefficients.nrows());
        let mut model = Self::from_parts(coefficients, intercepts)?;
        model.has_intercept = false;
        Ok(model)
    }

    /// Create a model from a flat response-major beta buffer.
    ///
    /// Each response contributes `n_features + 1` values, intercept first:
    /// `[b0_r0, b1_r0, ..., bp_r0, b0_r1, ...]`.
    pub fn from_beta(beta: &[T], n_features: usize, n_responses: usize) -> Result<Self> {
        let row_len = weight_rows(n_features, n_responses)?;
        let expected = row_len
            .checked_mul(n_responses)
            .ok_or(PredictError::DimensionOverflow {
                rows: n_responses,
                cols: row_len,
            })?;
        ensure_dim("beta length", expected, beta.len())?;

        let mut weights = Array2::zeros((row_len, n_responses));
        for (response, chunk) in beta.chunks_exact(row_len).enumerate() {
            weights[[n_features, response]] = chunk[0];
            for (feature, &b) in chunk[1..].iter().enumerate() {
                weights[[feature, response]] = b;
            }
        }
        Self::from_weights(weights)
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        // Last row is the intercept
        self.weights.nrows() - 1
    }

    /// Number of responses (output columns).
    #[inline]
    pub fn n_responses(&self) -> usize {
        self.weights.ncols()
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        T::PRECISION
    }

    /// Whether the model carries fitted intercepts.
    #[inline]
    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// Coefficient of `feature` for `response`.
    #[inline]
    pub fn coefficient(&self, response: usize, feature: usize) -> T {
        self.weights[[feature, response]]
    }

    /// Intercept for `response`.
    #[inline]
    pub fn intercept(&self, response: usize) -> T {
        self.weights[[self.n_features(), response]]
    }

    /// All intercepts, one per response.
    #[inline]
    pub fn intercepts(&self) -> ArrayView1<'_, T> {
        self.weights.row(self.n_features())
    }

    /// Coefficients as `[n_responses, n_features]` (a transposed view).
    #[inline]
    pub fn coefficients(&self) -> ArrayView2<'_, T> {
        self.weight_matrix().reversed_axes()
    }

    /// Weight matrix without the intercept row, shape `[n_features, n_responses]`.
    #[inline]
    pub fn weight_matrix(&self) -> ArrayView2<'_, T> {
        self.weights.slice(s![..self.n_features(), ..])
    }

    /// Full weight matrix including the intercept row.
    #[inline]
    pub fn as_array(&self) -> ArrayView2<'_, T> {
        self.weights.view()
    }

    /// Flat response-major beta buffer, the inverse of [`from_beta`](Self::from_beta).
    pub fn to_beta(&self) -> Vec<T> {
        let n_features = self.n_features();
        let mut beta = Vec::with_capacity((n_features + 1) * self.n_responses());
        for column in self.weights.axis_iter(Axis(1)) {
            beta.push(column[n_features]);
            beta.extend(column.iter().take(n_features).copied());
        }
        beta
    }

    /// Copy into another precision.
    pub fn convert<U: Element>(&self) -> LinearModel<U> {
        LinearModel {
            weights: self.weights.mapv(|w| w.cast::<U>()),
            has_intercept: self.has_intercept,
        }
    }
}

/// Rows of the weight matrix: one per feature plus the intercept row.
fn weight_rows(n_features: usize, n_responses: usize) -> Result<usize> {
    n_features
        .checked_add(1)
        .ok_or(PredictError::DimensionOverflow {
            rows: n_features,
            cols: n_responses,
        })
}

/// Unvalidated serialized form of [`LinearModel`].
#[derive(Deserialize)]
struct LinearModelRepr<T> {
    weights: Array2<T>,
    has_intercept: bool,
}

impl<T: Element> TryFrom<LinearModelRepr<T>> for LinearModel<T> {
    type Error = PredictError;

    fn try_from(repr: LinearModelRepr<T>) -> Result<Self> {
        let mut model = Self::from_weights(repr.weights)?;
        model.has_intercept = repr.has_intercept;
        Ok(model)
    }
}
