//! Precision-erased table.

use super::{DataLayout, Element, NumericTable};
use crate::config::Precision;
use crate::error::{PredictError, Result};

/// A [`NumericTable`] whose precision is only known at runtime.
///
/// Precision is inspected once per operation through
/// [`downcast_ref`](Self::downcast_ref) and the typed table is used from then
/// on; no per-element dispatch happens.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTable {
    F32(NumericTable<f32>),
    F64(NumericTable<f64>),
}

impl AnyTable {
    /// Zero-filled table of the given precision.
    pub fn zeros(precision: Precision, rows: usize, cols: usize, layout: DataLayout) -> Result<Self> {
        Ok(match precision {
            Precision::Single => AnyTable::F32(NumericTable::zeros(rows, cols, layout)?),
            Precision::Double => AnyTable::F64(NumericTable::zeros(rows, cols, layout)?),
        })
    }

    pub fn precision(&self) -> Precision {
        match self {
            AnyTable::F32(_) => Precision::Single,
            AnyTable::F64(_) => Precision::Double,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            AnyTable::F32(t) => t.row_count(),
            AnyTable::F64(t) => t.row_count(),
        }
    }

    pub fn column_count(&self) -> usize {
        match self {
            AnyTable::F32(t) => t.column_count(),
            AnyTable::F64(t) => t.column_count(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn layout(&self) -> DataLayout {
        match self {
            AnyTable::F32(t) => t.layout(),
            AnyTable::F64(t) => t.layout(),
        }
    }

    /// Element read widened to `f64`.
    pub fn get_f64(&self, row: usize, col: usize) -> Result<f64> {
        match self {
            AnyTable::F32(t) => t.get(row, col).map(f64::from),
            AnyTable::F64(t) => t.get(row, col),
        }
    }

    /// Typed reference, or `None` if the precision differs.
    pub fn downcast_ref<T: Element>(&self) -> Option<&NumericTable<T>> {
        T::table_ref(self)
    }

    /// Typed mutable reference, or `None` if the precision differs.
    pub fn downcast_mut<T: Element>(&mut self) -> Option<&mut NumericTable<T>> {
        T::table_mut(self)
    }

    /// Typed reference, failing with [`PredictError::PrecisionMismatch`].
    pub fn typed<T: Element>(&self) -> Result<&NumericTable<T>> {
        let actual = self.precision();
        self.downcast_ref::<T>()
            .ok_or(PredictError::PrecisionMismatch {
                expected: T::PRECISION,
                actual,
            })
    }

    /// Unwrap into the typed table, failing with [`PredictError::PrecisionMismatch`].
    pub fn into_typed<T: Element>(self) -> Result<NumericTable<T>> {
        T::unwrap_table(self).map_err(|other| PredictError::PrecisionMismatch {
            expected: T::PRECISION,
            actual: other.precision(),
        })
    }
}

impl<T: Element> From<NumericTable<T>> for AnyTable {
    fn from(table: NumericTable<T>) -> Self {
        T::wrap_table(table)
    }
}
