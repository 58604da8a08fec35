//! Seeded random data for tests and benchmarks.
//!
//! Every helper takes an explicit seed so generated tables are reproducible
//! across runs and platforms.

use rand::prelude::*;

use crate::data::{checked_len, DataLayout, Element, NumericTable};
use crate::error::{PredictError, Result};
use crate::model::LinearModel;

/// Random table with values uniform in `[min, max)`.
///
/// # Errors
///
/// [`PredictError::Configuration`] if the range is empty, reversed or not
/// finite; [`PredictError::DimensionOverflow`] if `rows * cols` overflows.
pub fn random_table<T: Element>(
    rows: usize,
    cols: usize,
    layout: DataLayout,
    seed: u64,
    min: f64,
    max: f64,
) -> Result<NumericTable<T>> {
    if !(min.is_finite() && max.is_finite() && max >= min) {
        return Err(PredictError::Configuration(format!(
            "invalid value range [{min}, {max})"
        )));
    }
    let len = checked_len(rows, cols)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let width = max - min;
    // Values are generated in row-major order regardless of layout
    let data: Vec<T> = (0..len)
        .map(|_| T::cast_from_f64(min + rng.r#gen::<f64>() * width))
        .collect();
    let table = NumericTable::from_vec(data, rows, cols, DataLayout::RowMajor)?;
    Ok(table.to_layout(layout))
}

/// Random model with coefficients and intercepts uniform in `[-1, 1)`.
pub fn random_model<T: Element>(
    n_features: usize,
    n_responses: usize,
    seed: u64,
) -> Result<LinearModel<T>> {
    let row_len = n_features
        .checked_add(1)
        .ok_or(PredictError::DimensionOverflow {
            rows: n_features,
            cols: n_responses,
        })?;
    let len = checked_len(n_responses, row_len)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let beta: Vec<T> = (0..len)
        .map(|_| T::cast_from_f64(rng.r#gen::<f64>() * 2.0 - 1.0))
        .collect();
    LinearModel::from_beta(&beta, n_features, n_responses)
}

/// Training data generated by a known linear model.
#[derive(Debug, Clone)]
pub struct SyntheticRegression<T: Element> {
    pub features: NumericTable<T>,
    pub targets: NumericTable<T>,
    /// The model that generated `targets` before noise was added.
    pub model: LinearModel<T>,
}

/// Generate features in `[-1, 1)`, a random model, and targets
/// `model(features) + noise` with noise uniform in `[-noise, noise)`.
pub fn synthetic_regression<T: Element>(
    rows: usize,
    n_features: usize,
    n_responses: usize,
    noise: f64,
    seed: u64,
) -> Result<SyntheticRegression<T>> {
    let features = random_table::<T>(rows, n_features, DataLayout::RowMajor, seed, -1.0, 1.0)?;
    let model = random_model::<T>(n_features, n_responses, seed.wrapping_add(1))?;

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));
    let mut targets = NumericTable::zeros(rows, n_responses, DataLayout::RowMajor)?;
    for r in 0..rows {
        for j in 0..n_responses {
            let mut y = model.intercept(j).as_f64();
            for k in 0..n_features {
                y += model.coefficient(j, k).as_f64() * features.at(r, k).as_f64();
            }
            if noise > 0.0 {
                y += (rng.r#gen::<f64>() * 2.0 - 1.0) * noise;
            }
            targets.set(r, j, T::cast_from_f64(y))?;
        }
    }

    Ok(SyntheticRegression {
        features,
        targets,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn random_table_is_seeded() {
        let a = random_table::<f32>(10, 3, DataLayout::RowMajor, 7, -2.0, 2.0).unwrap();
        let b = random_table::<f32>(10, 3, DataLayout::ColumnMajor, 7, -2.0, 2.0).unwrap();
        assert_eq!(a.view(), b.view());
        assert_eq!(b.layout(), DataLayout::ColumnMajor);
        assert!(a.view().iter().all(|&v| (-2.0..2.0).contains(&v)));
    }

    #[test]
    fn random_table_rejects_bad_ranges() {
        assert!(matches!(
            random_table::<f64>(2, 2, DataLayout::RowMajor, 1, 1.0, -1.0),
            Err(PredictError::Configuration(_))
        ));
        assert!(matches!(
            random_table::<f64>(2, 2, DataLayout::RowMajor, 1, 0.0, f64::INFINITY),
            Err(PredictError::Configuration(_))
        ));
        assert_eq!(
            random_table::<f32>(usize::MAX, 2, DataLayout::RowMajor, 1, 0.0, 1.0).unwrap_err(),
            PredictError::DimensionOverflow {
                rows: usize::MAX,
                cols: 2
            }
        );
    }

    #[test]
    fn random_model_overflow_is_an_error() {
        assert!(matches!(
            random_model::<f64>(usize::MAX, 1, 0),
            Err(PredictError::DimensionOverflow { .. })
        ));
        assert!(matches!(
            random_model::<f64>(usize::MAX / 2, 4, 0),
            Err(PredictError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn synthetic_targets_follow_model() {
        let data = synthetic_regression::<f64>(20, 3, 2, 0.0, 11).unwrap();
        assert_eq!(data.features.shape(), (20, 3));
        assert_eq!(data.targets.shape(), (20, 2));

        let row = data.features.pull_rows(4..5).unwrap();
        let expected = data.model.intercept(1)
            + (0..3)
                .map(|k| data.model.coefficient(1, k) * row[[0, k]])
                .sum::<f64>();
        assert_abs_diff_eq!(data.targets.at(4, 1), expected, epsilon = 1e-12);
    }
}
