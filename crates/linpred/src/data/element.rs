//! Element types for tables and models.

use ndarray::LinalgScalar;
use num_traits::Float;

use super::{AnyTable, NumericTable};
use crate::config::Precision;
use crate::model::{AnyModel, LinearModel};

// Sealed trait pattern to prevent external implementations
mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating-point element of a table or model: `f32` or `f64`.
///
/// Generic code is monomorphized per element type, so precision is resolved
/// statically in the kernel. The `wrap`/`*_ref` helpers bridge to the tagged
/// unions [`AnyTable`] and [`AnyModel`], where precision is resolved once per
/// call.
pub trait Element:
    sealed::Sealed + LinalgScalar + Float + Send + Sync + std::fmt::Debug + Default
{
    /// Precision tag of this element type.
    const PRECISION: Precision;

    /// Widen to `f64` (exact for both element types).
    fn as_f64(self) -> f64;

    /// Narrow from `f64` with round-to-nearest.
    fn cast_from_f64(value: f64) -> Self;

    /// Convert between element types through `f64`.
    #[inline]
    fn cast<U: Element>(self) -> U {
        U::cast_from_f64(self.as_f64())
    }

    fn wrap_table(table: NumericTable<Self>) -> AnyTable;
    fn table_ref(table: &AnyTable) -> Option<&NumericTable<Self>>;
    fn table_mut(table: &mut AnyTable) -> Option<&mut NumericTable<Self>>;
    fn unwrap_table(table: AnyTable) -> std::result::Result<NumericTable<Self>, AnyTable>;

    fn wrap_model(model: LinearModel<Self>) -> AnyModel;
    fn model_ref(model: &AnyModel) -> Option<&LinearModel<Self>>;
}

impl Element for f32 {
    const PRECISION: Precision = Precision::Single;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn cast_from_f64(value: f64) -> Self {
        value as f32
    }

    fn wrap_table(table: NumericTable<Self>) -> AnyTable {
        AnyTable::F32(table)
    }

    fn table_ref(table: &AnyTable) -> Option<&NumericTable<Self>> {
        match table {
            AnyTable::F32(t) => Some(t),
            AnyTable::F64(_) => None,
        }
    }

    fn table_mut(table: &mut AnyTable) -> Option<&mut NumericTable<Self>> {
        match table {
            AnyTable::F32(t) => Some(t),
            AnyTable::F64(_) => None,
        }
    }

    fn unwrap_table(table: AnyTable) -> std::result::Result<NumericTable<Self>, AnyTable> {
        match table {
            AnyTable::F32(t) => Ok(t),
            other => Err(other),
        }
    }

    fn wrap_model(model: LinearModel<Self>) -> AnyModel {
        AnyModel::F32(model)
    }

    fn model_ref(model: &AnyModel) -> Option<&LinearModel<Self>> {
        match model {
            AnyModel::F32(m) => Some(m),
            AnyModel::F64(_) => None,
        }
    }
}

impl Element for f64 {
    const PRECISION: Precision = Precision::Double;

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn cast_from_f64(value: f64) -> Self {
        value
    }

    fn wrap_table(table: NumericTable<Self>) -> AnyTable {
        AnyTable::F64(table)
    }

    fn table_ref(table: &AnyTable) -> Option<&NumericTable<Self>> {
        match table {
            AnyTable::F64(t) => Some(t),
            AnyTable::F32(_) => None,
        }
    }

    fn table_mut(table: &mut AnyTable) -> Option<&mut NumericTable<Self>> {
        match table {
            AnyTable::F64(t) => Some(t),
            AnyTable::F32(_) => None,
        }
    }

    fn unwrap_table(table: AnyTable) -> std::result::Result<NumericTable<Self>, AnyTable> {
        match table {
            AnyTable::F64(t) => Ok(t),
            other => Err(other),
        }
    }

    fn wrap_model(model: LinearModel<Self>) -> AnyModel {
        AnyModel::F64(model)
    }

    fn model_ref(model: &AnyModel) -> Option<&LinearModel<Self>> {
        match model {
            AnyModel::F64(m) => Some(m),
            AnyModel::F32(_) => None,
        }
    }
}
