//! Precision-erased model.

use serde::{Deserialize, Serialize};

use super::LinearModel;
use crate::config::Precision;
use crate::data::Element;
use crate::error::{PredictError, Result};

/// A [`LinearModel`] whose precision is only known at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "precision", content = "model")]
pub enum AnyModel {
    #[serde(rename = "single")]
    F32(LinearModel<f32>),
    #[serde(rename = "double")]
    F64(LinearModel<f64>),
}

impl AnyModel {
    pub fn precision(&self) -> Precision {
        match self {
            AnyModel::F32(_) => Precision::Single,
            AnyModel::F64(_) => Precision::Double,
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            AnyModel::F32(m) => m.n_features(),
            AnyModel::F64(m) => m.n_features(),
        }
    }

    pub fn n_responses(&self) -> usize {
        match self {
            AnyModel::F32(m) => m.n_responses(),
            AnyModel::F64(m) => m.n_responses(),
        }
    }

    pub fn has_intercept(&self) -> bool {
        match self {
            AnyModel::F32(m) => m.has_intercept(),
            AnyModel::F64(m) => m.has_intercept(),
        }
    }

    /// Typed reference, or `None` if the precision differs.
    pub fn downcast_ref<T: Element>(&self) -> Option<&LinearModel<T>> {
        T::model_ref(self)
    }

    /// Typed reference, failing with [`PredictError::PrecisionMismatch`].
    pub fn typed<T: Element>(&self) -> Result<&LinearModel<T>> {
        self.downcast_ref::<T>()
            .ok_or(PredictError::PrecisionMismatch {
                expected: T::PRECISION,
                actual: self.precision(),
            })
    }
}

impl<T: Element> From<LinearModel<T>> for AnyModel {
    fn from(model: LinearModel<T>) -> Self {
        T::wrap_model(model)
    }
}
