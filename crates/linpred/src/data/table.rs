//! Dense numeric table with row-major or column-major storage.
//!
//! A [`NumericTable`] is a 2D block of `f32` or `f64` values: rows are
//! observations, columns are features (inputs) or responses (results).
//! Storage is an `ndarray::Array2`, so the layout is encoded in its strides
//! and every kernel sees a plain [`ArrayView2`] regardless of layout.
//!
//! # Layouts
//!
//! - [`DataLayout::RowMajor`]: rows are contiguous. `index = row * n_cols + col`
//! - [`DataLayout::ColumnMajor`]: columns are contiguous. `index = col * n_rows + row`
//!
//! # Example
//!
//! ```
//! use linpred::data::{DataLayout, NumericTable};
//!
//! let rm = NumericTable::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], 2, 2, DataLayout::RowMajor).unwrap();
//! let cm = NumericTable::from_vec(vec![1.0f32, 3.0, 2.0, 4.0], 2, 2, DataLayout::ColumnMajor).unwrap();
//! assert_eq!(rm.get(0, 1).unwrap(), 2.0);
//! assert_eq!(cm.get(0, 1).unwrap(), 2.0);
//! ```

use std::ops::{Bound, RangeBounds};

use ndarray::{s, Array2, ArrayView2, ArrayViewMut2, Ix2, Shape, ShapeBuilder};
use serde::{Deserialize, Serialize};

use super::Element;
use crate::config::Precision;
use crate::error::{ensure_dim, PredictError, Result};

// =============================================================================
// DataLayout
// =============================================================================

/// Memory layout of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataLayout {
    /// Rows are contiguous.
    #[default]
    RowMajor,
    /// Columns are contiguous.
    ColumnMajor,
}

/// Compute `rows * cols`, failing instead of wrapping.
#[inline]
pub(crate) fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or(PredictError::DimensionOverflow { rows, cols })
}

#[inline]
fn shape_for(rows: usize, cols: usize, layout: DataLayout) -> Shape<Ix2> {
    (rows, cols).set_f(layout == DataLayout::ColumnMajor)
}

// =============================================================================
// NumericTable
// =============================================================================

/// Owned dense 2D table of floating-point values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable<T: Element> {
    data: Array2<T>,
    layout: DataLayout,
}

impl<T: Element> NumericTable<T> {
    /// Take ownership of a flat buffer laid out as `layout`.
    ///
    /// # Errors
    ///
    /// - [`PredictError::DimensionOverflow`] if `rows * cols` overflows.
    /// - [`PredictError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize, layout: DataLayout) -> Result<Self> {
        let expected = checked_len(rows, cols)?;
        let actual = data.len();
        ensure_dim("table buffer length", expected, actual)?;

        let data = Array2::from_shape_vec(shape_for(rows, cols, layout), data)
            .map_err(|_| PredictError::mismatch("table buffer length", expected, actual))?;
        Ok(Self { data, layout })
    }

    /// Copy a borrowed buffer laid out as `layout`.
    pub fn from_slice(data: &[T], rows: usize, cols: usize, layout: DataLayout) -> Result<Self> {
        Self::from_vec(data.to_vec(), rows, cols, layout)
    }

    /// Build from rows of equal length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(checked_len(rows.len(), n_cols)?);
        for row in rows {
            ensure_dim("row length", n_cols, row.as_ref().len())?;
            data.extend_from_slice(row.as_ref());
        }
        Self::from_vec(data, rows.len(), n_cols, DataLayout::RowMajor)
    }

    /// Wrap an existing array.
    ///
    /// Standard (C-order) arrays become row-major tables and Fortran-order
    /// arrays become column-major tables. Any other striding is copied into
    /// row-major order.
    pub fn from_array(data: Array2<T>) -> Self {
        if data.is_standard_layout() {
            Self {
                data,
                layout: DataLayout::RowMajor,
            }
        } else if data.t().is_standard_layout() {
            Self {
                data,
                layout: DataLayout::ColumnMajor,
            }
        } else {
            Self {
                data: data.as_standard_layout().into_owned(),
                layout: DataLayout::RowMajor,
            }
        }
    }

    /// Allocate a table filled with `value`.
    pub fn full(rows: usize, cols: usize, value: T, layout: DataLayout) -> Result<Self> {
        checked_len(rows, cols)?;
        let data = Array2::from_elem(shape_for(rows, cols, layout), value);
        Ok(Self { data, layout })
    }

    /// Allocate a zero-filled table.
    pub fn zeros(rows: usize, cols: usize, layout: DataLayout) -> Result<Self> {
        Self::full(rows, cols, T::zero(), layout)
    }

    // =========================================================================
    // Shape
    // =========================================================================

    /// Number of rows (observations).
    #[inline]
    pub fn row_count(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    #[inline]
    pub fn layout(&self) -> DataLayout {
        self.layout
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        T::PRECISION
    }

    /// `true` if the table has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail unless the table has exactly `rows x cols` elements.
    pub fn expect_shape(&self, rows: usize, cols: usize) -> Result<()> {
        ensure_dim("table rows", rows, self.row_count())?;
        ensure_dim("table columns", cols, self.column_count())
    }

    // =========================================================================
    // Element access
    // =========================================================================

    /// Checked element read.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or_else(|| self.out_of_range(row, col))
    }

    /// Hot-path element read.
    ///
    /// Bounds are reported with a descriptive message only in debug builds;
    /// callers are expected to have validated the indices.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        debug_assert!(
            row < self.row_count() && col < self.column_count(),
            "element ({row}, {col}) out of range for {}x{} table",
            self.row_count(),
            self.column_count()
        );
        self.data[[row, col]]
    }

    /// Checked element write.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let err = self.out_of_range(row, col);
        let slot = self.data.get_mut((row, col)).ok_or(err)?;
        *slot = value;
        Ok(())
    }

    fn out_of_range(&self, row: usize, col: usize) -> PredictError {
        PredictError::OutOfRange {
            row,
            col,
            rows: self.row_count(),
            cols: self.column_count(),
        }
    }

    // =========================================================================
    // Row blocks
    // =========================================================================

    /// Resolve a row range against this table.
    fn resolve_rows(&self, rows: impl RangeBounds<usize>) -> Result<(usize, usize)> {
        let n_rows = self.row_count();
        let start = match rows.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match rows.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => n_rows,
        };
        if start > end || end > n_rows {
            return Err(PredictError::RowRangeOutOfRange {
                start,
                end,
                rows: n_rows,
            });
        }
        Ok((start, end))
    }

    /// Copy a block of rows into a new row-major array.
    ///
    /// Column-major tables are gathered row by row.
    ///
    /// ```
    /// use linpred::data::{DataLayout, NumericTable};
    ///
    /// let t = NumericTable::from_vec(vec![1.0f32, 2.0, 3.0, -1.0, -2.0, -3.0], 3, 2, DataLayout::ColumnMajor).unwrap();
    /// let block = t.pull_rows(1..).unwrap();
    /// assert_eq!(block.as_slice().unwrap(), &[2.0, -2.0, 3.0, -3.0]);
    /// ```
    pub fn pull_rows(&self, rows: impl RangeBounds<usize>) -> Result<Array2<T>> {
        let (start, end) = self.resolve_rows(rows)?;
        Ok(self
            .data
            .slice(s![start..end, ..])
            .as_standard_layout()
            .into_owned())
    }

    /// Copy a block of rows into a new row-major array of another precision.
    pub fn pull_rows_as<U: Element>(&self, rows: impl RangeBounds<usize>) -> Result<Array2<U>> {
        let (start, end) = self.resolve_rows(rows)?;
        let block = self.data.slice(s![start..end, ..]);
        Ok(Array2::from_shape_fn(block.dim(), |(r, c)| {
            block[[r, c]].cast::<U>()
        }))
    }

    /// Write a block of rows starting at `start`.
    ///
    /// # Errors
    ///
    /// - [`PredictError::DimensionMismatch`] if the block's column count differs.
    /// - [`PredictError::RowRangeOutOfRange`] if the block does not fit.
    pub fn push_rows(&mut self, block: ArrayView2<'_, T>, start: usize) -> Result<()> {
        ensure_dim("row block columns", self.column_count(), block.ncols())?;
        let end = start.saturating_add(block.nrows());
        if end > self.row_count() {
            return Err(PredictError::RowRangeOutOfRange {
                start,
                end,
                rows: self.row_count(),
            });
        }
        self.data.slice_mut(s![start..end, ..]).assign(&block);
        Ok(())
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Copy into the given layout.
    pub fn to_layout(&self, layout: DataLayout) -> Self {
        if layout == self.layout {
            return self.clone();
        }
        let data = match layout {
            DataLayout::RowMajor => self.data.as_standard_layout().into_owned(),
            DataLayout::ColumnMajor => {
                let (rows, cols) = self.data.dim();
                let mut out = Array2::zeros(shape_for(rows, cols, layout));
                out.assign(&self.data);
                out
            }
        };
        Self { data, layout }
    }

    /// Copy into a table of another precision, keeping the layout.
    pub fn convert<U: Element>(&self) -> NumericTable<U> {
        let converted = self.data.mapv(|v| v.cast::<U>());
        let mut table = NumericTable::from_array(converted);
        if table.layout != self.layout {
            table = table.to_layout(self.layout);
        }
        table
    }

    /// Read-only view.
    #[inline]
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Mutable view.
    #[inline]
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    /// Underlying storage in memory order, if contiguous.
    #[inline]
    pub fn as_slice_memory_order(&self) -> Option<&[T]> {
        self.data.as_slice_memory_order()
    }

    /// Consume into the underlying array.
    pub fn into_array(self) -> Array2<T> {
        self.data
    }
}

impl<T: Element> From<Array2<T>> for NumericTable<T> {
    fn from(data: Array2<T>) -> Self {
        Self::from_array(data)
    }
}
