use drift_curves::domain::FitConfig;
use drift_curves::{CalibrationDataSet, CalibrationError, OffsetEngine};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

/// Distinct whole-degree temperatures with offsets, in shuffled order.
fn calibration_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::btree_set(-40i32..=150, min_len..=max_len)
        .prop_flat_map(|temps| {
            let n = temps.len();
            (Just(temps), prop::collection::vec(-0.5f64..0.5, n))
        })
        .prop_map(|(temps, offsets)| {
            temps
                .into_iter()
                .map(f64::from)
                .zip(offsets)
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        .. ProptestConfig::default()
    })]

    #[test]
    fn accepted_sets_are_sorted_and_complete(pairs in calibration_strategy(3, 12)) {
        let ds = CalibrationDataSet::from_pairs(&pairs, &FitConfig::default()).unwrap();
        prop_assert!(ds.is_valid());
        prop_assert_eq!(ds.len(), pairs.len());

        let temps = ds.temperatures();
        prop_assert!(temps.windows(2).all(|w| w[0] < w[1]));
        for &(t, o) in &pairs {
            let found = ds.points().iter().find(|p| p.temperature == t);
            prop_assert_eq!(found.map(|p| p.offset), Some(o));
        }
    }

    #[test]
    fn repeated_temperature_is_rejected(
        pairs in calibration_strategy(3, 10),
        pick in any::<prop::sample::Index>(),
        extra in -0.5f64..0.5,
    ) {
        let mut pairs = pairs;
        let repeated = pairs[pick.index(pairs.len())].0;
        pairs.push((repeated, extra));

        let err = CalibrationDataSet::from_pairs(&pairs, &FitConfig::default()).unwrap_err();
        prop_assert_eq!(err, CalibrationError::DuplicatePoint { temperature: repeated });
    }

    #[test]
    fn too_few_points_are_rejected(pairs in calibration_strategy(0, 2)) {
        let err = CalibrationDataSet::from_pairs(&pairs, &FitConfig::default()).unwrap_err();
        prop_assert_eq!(
            err,
            CalibrationError::InsufficientPoints { found: pairs.len(), required: 3 }
        );
    }

    #[test]
    fn queries_are_clamped_and_rounded(
        pairs in calibration_strategy(3, 8),
        below in 1.0f64..500.0,
        above in 1.0f64..500.0,
        inside in 0.0f64..=1.0,
    ) {
        let ds = CalibrationDataSet::from_pairs(&pairs, &FitConfig::default()).unwrap();
        let engine = OffsetEngine::from_dataset(ds).unwrap();
        let (lo, hi) = engine.temperature_range();

        prop_assert_eq!(engine.offset(lo - below), engine.offset(lo));
        prop_assert_eq!(engine.offset(hi + above), engine.offset(hi));

        let t = lo + inside * (hi - lo);
        let v = engine.offset(t);
        prop_assert!(v.is_finite());
        prop_assert!(((v * 1000.0).round() - v * 1000.0).abs() < 1e-6);
        prop_assert_eq!(v, engine.offset(t));
    }
}
