use regression_math::polynomial::expand;
use regression_math::selection::{select_best_index, MIN_DEGREE};
use regression_math::{ExpansionCache, MathError, ModelSelector, Predictor, TrainingSeries};
use rstest::rstest;
use std::sync::Arc;

fn scenario_series() -> TrainingSeries {
    TrainingSeries::from_scalars(
        &[5.0, 15.0, 25.0, 35.0, 45.0, 55.0],
        &[5.0, 20.0, 14.0, 32.0, 22.0, 38.0],
    )
    .unwrap()
}

fn calendar_like_series(days: usize) -> TrainingSeries {
    let mut series = TrainingSeries::new();
    for i in 0..days {
        let month = (i / 30 % 12 + 1) as f64;
        let day = (i % 30 + 1) as f64;
        let target = ((i * 7) % 5) as f64;
        series.push(vec![month, day, (i + 1) as f64], target);
    }
    series
}

#[test]
fn test_scenario_prediction_is_finite() {
    let series = scenario_series();
    let predictor = ModelSelector::new(&series).compute_best_model().unwrap();

    let predictions = predictor.predict(&[vec![25.0]]).unwrap();
    assert_eq!(predictions.len(), 1);
    assert!(predictions[0].is_finite());
}

#[rstest]
#[case(3)]
#[case(5)]
#[case(10)]
#[case(20)]
fn test_selected_degree_within_ladder(#[case] max_degree: usize) {
    let series = scenario_series();
    let predictor = ModelSelector::new(&series)
        .with_max_degree(max_degree)
        .compute_best_model()
        .unwrap();

    let degree = predictor.degree().unwrap();
    assert!(degree >= MIN_DEGREE && degree < max_degree);
}

#[test]
fn test_selection_is_deterministic() {
    let series = calendar_like_series(60);
    let first = ModelSelector::new(&series).with_max_degree(6).compute_best_model().unwrap();
    let second = ModelSelector::new(&series).with_max_degree(6).compute_best_model().unwrap();

    assert_eq!(first.degree(), second.degree());
    let query = [3.0, 14.0, 61.0];
    assert_eq!(
        first.predict_one(&query).unwrap().to_bits(),
        second.predict_one(&query).unwrap().to_bits()
    );
}

#[test]
fn test_selected_candidate_follows_heuristic() {
    let series = scenario_series();
    let selector = ModelSelector::new(&series);
    let candidates = selector.candidates().unwrap();
    let scores: Vec<f64> = candidates.iter().map(|c| c.score()).collect();
    let expected = candidates[select_best_index(&scores).unwrap()].degree();

    let predictor = selector.compute_best_model().unwrap();
    assert_eq!(predictor.degree(), Some(expected));
}

#[test]
fn test_cache_is_shared_with_predictor() {
    let series = calendar_like_series(40);
    let cache = ExpansionCache::shared(10_000);
    let cached = ModelSelector::new(&series)
        .with_max_degree(5)
        .with_cache(Arc::clone(&cache))
        .compute_best_model()
        .unwrap();
    let plain = ModelSelector::new(&series).with_max_degree(5).compute_best_model().unwrap();

    // ladder fits expand each row once and bypass the cache
    assert!(cache.is_empty());
    assert_eq!(cached.degree(), plain.degree());

    let query = [2.0, 11.0, 41.0];
    assert_eq!(cached.predict_one(&query).unwrap(), plain.predict_one(&query).unwrap());
    assert_eq!(cached.predict_one(&query).unwrap(), plain.predict_one(&query).unwrap());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_overflowing_expansion_terminates() {
    // x^8 overflows to infinity for x around 1e40
    let series = TrainingSeries::from_scalars(&[1e40, 2e40, 3e40], &[1.0, 2.0, 3.0]).unwrap();

    match ModelSelector::new(&series).compute_best_model() {
        Ok(predictor) => {
            let degree = predictor.degree().unwrap();
            assert!((MIN_DEGREE..8).contains(&degree));
        }
        Err(err) => assert!(matches!(err, MathError::CalculationError(_))),
    }
}

#[test]
fn test_three_feature_rows_fit_at_high_degree() {
    let series = calendar_like_series(90);
    let predictor = ModelSelector::new(&series).with_max_degree(8).compute_best_model().unwrap();
    assert!(predictor.predict_one(&[4.0, 1.0, 91.0]).unwrap().is_finite());
}

#[test]
fn test_single_sample_series() {
    let series = TrainingSeries::from_scalars(&[3.0], &[12.0]).unwrap();
    let predictor = ModelSelector::new(&series).compute_best_model().unwrap();
    assert!(predictor.is_trained());
    assert!((predictor.predict_one(&[8.0]).unwrap() - 12.0).abs() < 1e-9);
}

#[test]
fn test_untrained_predictor() {
    let predictor = Predictor::Untrained;
    assert_eq!(predictor.predict_one(&[1.0]), Err(MathError::NotTrained));
}

#[test]
fn test_expansion_identity_embedding() {
    let xs = [1.0, 2.5, -4.0];
    let embedded: Vec<Vec<f64>> = xs.iter().map(|&v| expand(&[v], 1, false).unwrap()).collect();
    assert_eq!(embedded, vec![vec![1.0], vec![2.5], vec![-4.0]]);
}
