//! Numeric table abstractions for input features and prediction results.
//!
//! # Overview
//!
//! - [`Element`]: sealed trait over `f32` and `f64`
//! - [`NumericTable`]: owned dense table, row-major or column-major
//! - [`AnyTable`]: precision-erased table, resolved once per call
//!
//! Tables expose their storage as ndarray views, so the prediction kernel
//! works the same for both layouts and for borrowed data wrapped with
//! `ArrayView2::from_shape`.

mod any;
mod element;
mod table;

pub use any::AnyTable;
pub use element::Element;
pub use table::{DataLayout, NumericTable};

pub(crate) use table::checked_len;
