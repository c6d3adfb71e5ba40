//! Property-based tests for the probability engine and aggregator.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::One;
use proptest::prelude::*;

use plinko_engine::fixtures::{uniform_table, v_shaped_table};
use plinko_engine::{evaluate, Configuration, InvalidInput, ProbabilityEngine};

/// Strategy: a bias in (0, 1) with six decimal places, like real tier biases.
fn bias_strategy() -> impl Strategy<Value = BigDecimal> {
    (1i64..1_000_000).prop_map(|micros| BigDecimal::new(BigInt::from(micros), 6))
}

/// Strategy: a row count up to the largest boards in use.
fn rows_strategy() -> impl Strategy<Value = u32> {
    1u32..=20
}

fn tight() -> BigDecimal {
    BigDecimal::new(BigInt::one(), 9)
}

fn exact_pow(base: &BigDecimal, exp: u32) -> BigDecimal {
    (0..exp).fold(BigDecimal::one(), |acc, _| acc * base)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // 1. Probabilities over all buckets sum to 1
    #[test]
    fn normalization(rows in rows_strategy(), bias in bias_strategy()) {
        let engine = ProbabilityEngine::default();
        let mut total = BigDecimal::from(0);
        for k in 0..=rows {
            total += engine.probability(rows, k, &bias).unwrap();
        }
        prop_assert!((total - BigDecimal::one()).abs() < tight());
    }

    // 2. A fair board is mirror-symmetric
    #[test]
    fn symmetry_at_half(rows in 0u32..=20) {
        let engine = ProbabilityEngine::default();
        let half = BigDecimal::new(BigInt::from(5), 1);
        for k in 0..=rows {
            prop_assert_eq!(
                engine.probability(rows, k, &half).unwrap(),
                engine.probability(rows, rows - k, &half).unwrap()
            );
        }
    }

    // 3. More working precision never moves the 10-digit result
    #[test]
    fn stable_under_precision_increase(rows in rows_strategy(), bias in bias_strategy()) {
        let base = ProbabilityEngine::default();
        let wide = ProbabilityEngine::with_digits(150).unwrap();
        for k in 0..=rows {
            let a = base.probability(rows, k, &bias).unwrap().with_prec(10);
            let b = wide.probability(rows, k, &bias).unwrap().with_prec(10);
            prop_assert_eq!(a, b, "rows={} k={}", rows, k);
        }
    }

    // 4. Edge buckets are pure powers
    #[test]
    fn boundary_buckets(rows in rows_strategy(), bias in bias_strategy()) {
        // Wide enough that rounding never applies to six-decimal biases
        let engine = ProbabilityEngine::with_digits(200).unwrap();
        let right = BigDecimal::one() - &bias;
        prop_assert_eq!(engine.probability(rows, 0, &bias).unwrap(), exact_pow(&right, rows));
        prop_assert_eq!(engine.probability(rows, rows, &bias).unwrap(), exact_pow(&bias, rows));

        let engine = ProbabilityEngine::default();
        let rounded = engine.precision().round(&exact_pow(&right, rows));
        prop_assert_eq!(engine.probability(rows, 0, &bias).unwrap(), rounded);
    }

    // 5. Any bucket past the last row is rejected
    #[test]
    fn out_of_range_bucket(rows in 0u32..=20, extra in 1u32..5, bias in bias_strategy()) {
        let k = rows + extra;
        let err = ProbabilityEngine::default().probability(rows, k, &bias).unwrap_err();
        prop_assert_eq!(err, InvalidInput::BucketOutOfRange { bucket: k, rows });
    }

    // 6. Well-formed tables never raise the anomaly flag
    #[test]
    fn well_formed_tables_have_full_mass(rows in rows_strategy(), bias in bias_strategy()) {
        let config = Configuration::new(rows, bias, v_shaped_table(rows)).unwrap();
        let result = evaluate(&config).unwrap();
        prop_assert!(!result.has_anomaly());
        prop_assert!((result.total_probability().clone() - BigDecimal::one()).abs() < tight());
        prop_assert_eq!(result.contributions().len(), rows as usize + 1);
    }

    // 7. A flat table returns exactly its multiplier
    #[test]
    fn flat_table_rtp(rows in rows_strategy(), bias in bias_strategy()) {
        let config = Configuration::new(rows, bias, uniform_table(rows, "0.95")).unwrap();
        let result = evaluate(&config).unwrap();
        let expected = BigDecimal::new(BigInt::from(95), 2);
        prop_assert!((result.rtp().clone() - expected).abs() < tight());
    }
}

#[test]
fn test_invalid_input_scenario() {
    let half = BigDecimal::new(BigInt::from(5), 1);
    assert_eq!(
        plinko_engine::probability(5, 6, &half),
        Err(InvalidInput::BucketOutOfRange { bucket: 6, rows: 5 })
    );
}
