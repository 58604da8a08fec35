//! Batch predictor: binds a model and an input table, computes a result table.
//!
//! # Lifecycle
//!
//! ```text
//! Constructed ──bind_input──▶ Configured ──compute──▶ Computed
//!                                  ▲                     │
//!                                  └─ bind_input / set_result / take_result
//! ```
//!
//! A predictor can be cloned in any state. Clones share the read-only model
//! and the bound input table by reference count, and own an independent copy
//! of the result; rebinding on one clone never affects another.
//!
//! # Example
//!
//! ```
//! use linpred::{BatchPredictor, LinearModel, NumericTable, Precision, PredictionMethod};
//! use ndarray::array;
//!
//! let model = LinearModel::from_parts(array![[2.0f64, 3.0]], array![1.0]).unwrap();
//! let input = NumericTable::from_rows(&[[1.0f64, 1.0], [0.0, 0.0]]).unwrap();
//!
//! let mut predictor = BatchPredictor::new(Precision::Double, PredictionMethod::DefaultDense).unwrap();
//! predictor.bind_model(model).unwrap();
//! predictor.bind_input(input).unwrap();
//!
//! let result = predictor.compute().unwrap();
//! assert_eq!(result.get_f64(0, 0).unwrap(), 6.0);
//! assert_eq!(result.get_f64(1, 0).unwrap(), 1.0);
//! ```

use std::sync::Arc;

use crate::config::{Precision, PredictionMethod, PredictorConfig};
use crate::data::{AnyTable, DataLayout, Element, NumericTable};
use crate::error::{PredictError, Result};
use crate::inference::LinearModelPredict;
use crate::model::AnyModel;
use crate::utils::run_with_threads;

/// Where a predictor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorState {
    /// Created; no input bound yet.
    Constructed,
    /// Input bound; ready to compute once a model is bound.
    Configured,
    /// A result is available.
    Computed,
}

/// Result storage and who allocated it.
#[derive(Debug, Clone)]
enum ResultBuffer {
    /// Registered by the caller via `set_result`; reused across computes.
    Supplied(AnyTable),
    /// Allocated by the predictor; replaced on every compute.
    Allocated(AnyTable),
}

impl ResultBuffer {
    fn table(&self) -> &AnyTable {
        match self {
            ResultBuffer::Supplied(t) | ResultBuffer::Allocated(t) => t,
        }
    }

    fn into_table(self) -> AnyTable {
        match self {
            ResultBuffer::Supplied(t) | ResultBuffer::Allocated(t) => t,
        }
    }
}

/// Linear regression model-based prediction in batch mode.
#[derive(Debug, Clone)]
pub struct BatchPredictor {
    config: PredictorConfig,
    model: Option<Arc<AnyModel>>,
    input: Option<Arc<AnyTable>>,
    result: Option<ResultBuffer>,
    state: PredictorState,
}

impl BatchPredictor {
    /// Create a predictor with the given precision and method.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Configuration`] if the default configuration
    /// fails validation.
    pub fn new(precision: Precision, method: PredictionMethod) -> Result<Self> {
        Self::from_config(PredictorConfig::new(precision, method))
    }

    /// Create a predictor from external integer codes.
    ///
    /// # Errors
    ///
    /// [`PredictError::UnsupportedPrecision`] or
    /// [`PredictError::UnsupportedMethod`] for unknown codes.
    pub fn from_codes(precision: i32, method: i32) -> Result<Self> {
        let method = PredictionMethod::from_code(method)?;
        let precision = Precision::from_code(precision)?;
        Self::new(precision, method)
    }

    /// Create a predictor from a full configuration.
    pub fn from_config(config: PredictorConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            precision = %config.precision,
            method = %config.method,
            n_threads = config.n_threads,
            "predictor constructed"
        );
        Ok(Self {
            config,
            model: None,
            input: None,
            result: None,
            state: PredictorState::Constructed,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn precision(&self) -> Precision {
        self.config.precision
    }

    pub fn method(&self) -> PredictionMethod {
        self.config.method
    }

    pub fn state(&self) -> PredictorState {
        self.state
    }

    /// The bound model.
    ///
    /// # Errors
    ///
    /// [`PredictError::Configuration`] if no model has been bound.
    pub fn model(&self) -> Result<&AnyModel> {
        self.model
            .as_deref()
            .ok_or_else(|| PredictError::unbound("model"))
    }

    /// Shared handle to the bound model, for binding to other predictors.
    pub fn shared_model(&self) -> Option<Arc<AnyModel>> {
        self.model.clone()
    }

    /// The bound input table.
    ///
    /// # Errors
    ///
    /// [`PredictError::Configuration`] if no input has been bound.
    pub fn input(&self) -> Result<&AnyTable> {
        self.input
            .as_deref()
            .ok_or_else(|| PredictError::unbound("input"))
    }

    /// The last computed result, or a caller-supplied table not yet computed.
    pub fn result(&self) -> Option<&AnyTable> {
        self.result.as_ref().map(ResultBuffer::table)
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Associate a fitted model.
    ///
    /// # Errors
    ///
    /// [`PredictError::PrecisionMismatch`] if the model precision differs.
    pub fn bind_model(&mut self, model: impl Into<AnyModel>) -> Result<()> {
        self.bind_shared_model(Arc::new(model.into()))
    }

    /// Associate a model shared with other predictors.
    pub fn bind_shared_model(&mut self, model: Arc<AnyModel>) -> Result<()> {
        self.check_precision(model.precision())?;
        tracing::debug!(
            n_features = model.n_features(),
            n_responses = model.n_responses(),
            "model bound"
        );
        self.model = Some(model);
        self.invalidate_result();
        Ok(())
    }

    /// Associate the feature batch.
    ///
    /// # Errors
    ///
    /// [`PredictError::PrecisionMismatch`] if the table precision differs.
    pub fn bind_input(&mut self, input: impl Into<AnyTable>) -> Result<()> {
        self.bind_shared_input(Arc::new(input.into()))
    }

    /// Associate a feature batch shared with other predictors.
    pub fn bind_shared_input(&mut self, input: Arc<AnyTable>) -> Result<()> {
        self.check_precision(input.precision())?;
        tracing::debug!(
            rows = input.row_count(),
            columns = input.column_count(),
            layout = ?input.layout(),
            "input bound"
        );
        self.input = Some(input);
        self.state = PredictorState::Configured;
        self.invalidate_result();
        Ok(())
    }

    /// Register a pre-allocated table to receive the next result.
    ///
    /// The table must have `input rows x model responses` elements when
    /// [`compute`](Self::compute) runs, otherwise compute fails and the table
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// [`PredictError::PrecisionMismatch`] if the table precision differs.
    pub fn set_result(&mut self, result: impl Into<AnyTable>) -> Result<()> {
        let result = result.into();
        self.check_precision(result.precision())?;
        tracing::debug!(
            rows = result.row_count(),
            columns = result.column_count(),
            "result buffer registered"
        );
        self.result = Some(ResultBuffer::Supplied(result));
        if self.state == PredictorState::Computed {
            self.state = PredictorState::Configured;
        }
        Ok(())
    }

    /// Remove and return the result table.
    pub fn take_result(&mut self) -> Option<AnyTable> {
        let result = self.result.take().map(ResultBuffer::into_table);
        if self.state == PredictorState::Computed {
            self.state = PredictorState::Configured;
        }
        result
    }

    fn check_precision(&self, actual: Precision) -> Result<()> {
        if actual == self.config.precision {
            Ok(())
        } else {
            Err(PredictError::PrecisionMismatch {
                expected: self.config.precision,
                actual,
            })
        }
    }

    /// Drop a predictor-allocated result that no longer matches the bindings.
    fn invalidate_result(&mut self) {
        if let Some(ResultBuffer::Allocated(_)) = self.result {
            self.result = None;
        }
        if self.state == PredictorState::Computed {
            self.state = PredictorState::Configured;
        }
    }

    // =========================================================================
    // Compute
    // =========================================================================

    /// Run prediction over the bound input.
    ///
    /// Either fully populates the result table or leaves it unchanged.
    ///
    /// # Errors
    ///
    /// - [`PredictError::Configuration`] if the model or input is unbound.
    /// - [`PredictError::DimensionMismatch`] if the input column count
    ///   differs from the model's feature count, or a caller-supplied result
    ///   table has the wrong shape.
    /// - [`PredictError::PrecisionMismatch`] on mixed precision.
    #[tracing::instrument(level = "debug", skip(self), fields(precision = %self.config.precision))]
    pub fn compute(&mut self) -> Result<&AnyTable> {
        match self.config.precision {
            Precision::Single => self.compute_typed::<f32>()?,
            Precision::Double => self.compute_typed::<f64>()?,
        }
        self.state = PredictorState::Computed;

        match &self.result {
            Some(buffer) => Ok(buffer.table()),
            None => Err(PredictError::unbound("result")),
        }
    }

    fn compute_typed<T: Element>(&mut self) -> Result<()> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| PredictError::unbound("model"))?
            .typed::<T>()?;
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| PredictError::unbound("input"))?
            .typed::<T>()?;

        let n_threads = self.config.n_threads;
        let row_block = self.config.row_block_size;
        let rows = input.row_count();

        match self.result.as_mut() {
            Some(ResultBuffer::Supplied(table)) => {
                let actual = table.precision();
                let output = table
                    .downcast_mut::<T>()
                    .ok_or(PredictError::PrecisionMismatch {
                        expected: T::PRECISION,
                        actual,
                    })?;
                run_with_threads(n_threads, |parallelism| {
                    model.predict_into(input.view(), output.view_mut(), parallelism, row_block)
                })?;
            }
            _ => {
                let mut output: NumericTable<T> =
                    NumericTable::zeros(rows, model.n_responses(), DataLayout::RowMajor)?;
                run_with_threads(n_threads, |parallelism| {
                    model.predict_into(input.view(), output.view_mut(), parallelism, row_block)
                })?;
                self.result = Some(ResultBuffer::Allocated(output.into()));
            }
        }

        tracing::debug!(
            rows,
            n_responses = model.n_responses(),
            "prediction computed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;
    use ndarray::array;

    fn model_f64() -> LinearModel<f64> {
        LinearModel::from_parts(array![[2.0, 3.0]], array![1.0]).unwrap()
    }

    fn input_f64(rows: &[[f64; 2]]) -> NumericTable<f64> {
        NumericTable::from_rows(rows).unwrap()
    }

    fn double_predictor() -> BatchPredictor {
        BatchPredictor::new(Precision::Double, PredictionMethod::DefaultDense).unwrap()
    }

    #[test]
    fn lifecycle_states() {
        let mut p = double_predictor();
        assert_eq!(p.state(), PredictorState::Constructed);

        p.bind_model(model_f64()).unwrap();
        assert_eq!(p.state(), PredictorState::Constructed);

        p.bind_input(input_f64(&[[1.0, 1.0]])).unwrap();
        assert_eq!(p.state(), PredictorState::Configured);

        p.compute().unwrap();
        assert_eq!(p.state(), PredictorState::Computed);

        p.bind_input(input_f64(&[[0.0, 0.0]])).unwrap();
        assert_eq!(p.state(), PredictorState::Configured);
        assert!(p.result().is_none());
    }

    #[test]
    fn unbound_state_is_a_configuration_error() {
        let mut p = double_predictor();
        assert!(matches!(p.model(), Err(PredictError::Configuration(_))));
        assert!(matches!(p.input(), Err(PredictError::Configuration(_))));
        assert!(matches!(p.compute(), Err(PredictError::Configuration(_))));

        p.bind_input(input_f64(&[[1.0, 1.0]])).unwrap();
        assert!(matches!(p.compute(), Err(PredictError::Configuration(_))));
    }

    #[test]
    fn from_codes_validates() {
        assert_eq!(
            BatchPredictor::from_codes(1, 0).unwrap().precision(),
            Precision::Single
        );
        assert!(matches!(
            BatchPredictor::from_codes(0, 3),
            Err(PredictError::UnsupportedMethod(_))
        ));
        assert!(matches!(
            BatchPredictor::from_codes(2, 0),
            Err(PredictError::UnsupportedPrecision(_))
        ));
    }

    #[test]
    fn precision_checked_on_bind() {
        let mut p = BatchPredictor::new(Precision::Single, PredictionMethod::DefaultDense).unwrap();
        assert_eq!(
            p.bind_model(model_f64()).unwrap_err(),
            PredictError::PrecisionMismatch {
                expected: Precision::Single,
                actual: Precision::Double
            }
        );
        assert!(p.bind_input(input_f64(&[[1.0, 1.0]])).is_err());
        assert!(p
            .set_result(NumericTable::<f64>::zeros(1, 1, DataLayout::RowMajor).unwrap())
            .is_err());
        assert_eq!(p.state(), PredictorState::Constructed);
    }

    #[test]
    fn supplied_result_is_written_in_place() {
        let mut p = double_predictor();
        p.bind_model(model_f64()).unwrap();
        p.bind_input(input_f64(&[[1.0, 1.0], [0.0, 0.0]])).unwrap();
        p.set_result(NumericTable::<f64>::zeros(2, 1, DataLayout::ColumnMajor).unwrap())
            .unwrap();

        let result = p.compute().unwrap().typed::<f64>().unwrap();
        assert_eq!(result.layout(), DataLayout::ColumnMajor);
        assert_eq!(result.at(0, 0), 6.0);
        assert_eq!(result.at(1, 0), 1.0);

        // Supplied buffers survive rebinding of the input
        p.bind_input(input_f64(&[[2.0, 0.0], [0.0, 2.0]])).unwrap();
        let result = p.compute().unwrap().typed::<f64>().unwrap();
        assert_eq!(result.layout(), DataLayout::ColumnMajor);
        assert_eq!(result.at(0, 0), 5.0);
        assert_eq!(result.at(1, 0), 7.0);
    }

    #[test]
    fn wrong_result_shape_leaves_buffer_untouched() {
        let mut p = double_predictor();
        p.bind_model(model_f64()).unwrap();
        p.bind_input(input_f64(&[[1.0, 1.0]])).unwrap();
        p.set_result(NumericTable::<f64>::full(3, 1, -1.0, DataLayout::RowMajor).unwrap())
            .unwrap();

        assert!(matches!(
            p.compute(),
            Err(PredictError::DimensionMismatch { what: "result rows", .. })
        ));
        let untouched = p.result().unwrap().typed::<f64>().unwrap();
        assert!(untouched.view().iter().all(|&v| v == -1.0));
        assert_eq!(p.state(), PredictorState::Configured);
    }

    #[test]
    fn take_result_returns_configured() {
        let mut p = double_predictor();
        p.bind_model(model_f64()).unwrap();
        p.bind_input(input_f64(&[[1.0, 1.0]])).unwrap();
        p.compute().unwrap();

        let result = p.take_result().unwrap();
        assert_eq!(result.shape(), (1, 1));
        assert_eq!(p.state(), PredictorState::Configured);
        assert!(p.result().is_none());
    }

    #[test]
    fn clone_shares_model() {
        let mut p = double_predictor();
        p.bind_model(model_f64()).unwrap();
        let clone = p.clone();

        let a = p.shared_model().unwrap();
        let b = clone.shared_model().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
