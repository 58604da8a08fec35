//! Train-then-predict workflow tests.

use approx::assert_relative_eq;
use rstest::rstest;

use linpred::testing::synthetic_regression;
use linpred::{
    fit_normal_equations, BatchPredictor, DataLayout, Element, LinearModelPredict, Precision,
    PredictionMethod, TrainParams,
};

fn recovers_generating_model<T: Element>(layout: DataLayout, tolerance: f64) {
    let data = synthetic_regression::<T>(400, 5, 2, 0.0, 42).unwrap();
    let features = data.features.to_layout(layout);

    let model = fit_normal_equations(&features, &data.targets, &TrainParams::default()).unwrap();

    for response in 0..2 {
        for feature in 0..5 {
            assert_relative_eq!(
                model.coefficient(response, feature).as_f64(),
                data.model.coefficient(response, feature).as_f64(),
                epsilon = tolerance
            );
        }
        assert_relative_eq!(
            model.intercept(response).as_f64(),
            data.model.intercept(response).as_f64(),
            epsilon = tolerance
        );
    }
}

#[rstest]
#[case(DataLayout::RowMajor)]
#[case(DataLayout::ColumnMajor)]
fn fit_recovers_model_f64(#[case] layout: DataLayout) {
    recovers_generating_model::<f64>(layout, 1e-8);
}

#[rstest]
#[case(DataLayout::RowMajor)]
#[case(DataLayout::ColumnMajor)]
fn fit_recovers_model_f32(#[case] layout: DataLayout) {
    recovers_generating_model::<f32>(layout, 1e-3);
}

#[test]
fn noisy_fit_predicts_close_to_targets() {
    let data = synthetic_regression::<f64>(1000, 3, 1, 0.01, 7).unwrap();
    let model = fit_normal_equations(&data.features, &data.targets, &TrainParams::default()).unwrap();

    let predictions = model.predict(&data.features).unwrap();
    let max_residual = predictions
        .view()
        .iter()
        .zip(data.targets.view().iter())
        .map(|(p, y)| (p - y).abs())
        .fold(0.0f64, f64::max);

    // Noise is bounded by 0.01, the fit can only do better on average
    assert!(max_residual < 0.05, "max residual {max_residual}");
}

#[test]
fn fitted_model_drives_predictor() {
    let data = synthetic_regression::<f32>(64, 4, 3, 0.0, 3).unwrap();
    let model = fit_normal_equations(&data.features, &data.targets, &TrainParams::default()).unwrap();

    let mut predictor = BatchPredictor::new(Precision::Single, PredictionMethod::DefaultDense).unwrap();
    predictor.bind_model(model).unwrap();
    predictor.bind_input(data.features.clone()).unwrap();

    let result = predictor.compute().unwrap().typed::<f32>().unwrap();
    assert_eq!(result.shape(), (64, 3));
    for (got, want) in result.view().iter().zip(data.targets.view().iter()) {
        assert_relative_eq!(*got, *want, epsilon = 1e-3);
    }
}
