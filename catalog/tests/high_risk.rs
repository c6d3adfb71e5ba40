//! Golden RTP values for the built-in high risk tier.
//!
//! Reference values were produced by an independent 50-digit decimal
//! computation of the same tables.

use bigdecimal::BigDecimal;
use num_traits::{One, ToPrimitive};
use plinko_catalog::{Catalog, HIGH_RISK};
use plinko_engine::{parse_decimal, AnomalyKind, Classification, Configuration, ProbabilityEngine, RtpEvaluator};

const GOLDEN: [(u32, &str); 6] = [
    (11, "0.99160160753662137935791078366088922199249277921676"),
    (12, "0.99116216134838905058746429464416601624488868426325"),
    (13, "0.99086920027710009748993064588928439902305687170982"),
    (14, "0.98978278235781926113975755788670000156069085285068"),
    (15, "0.99026496833046041020450906352282270807624504909218"),
    (16, "0.98976447728088466239090474369737098267794886388303"),
];

fn dec(s: &str) -> BigDecimal {
    parse_decimal(s).unwrap()
}

#[test]
fn test_eleven_rows_known_value() {
    let config = Catalog::builtin().unwrap().configuration(HIGH_RISK, 11).unwrap();
    let result = plinko_engine::evaluate(&config).unwrap();

    let mass_error = (result.total_probability().clone() - BigDecimal::one()).abs();
    assert!(mass_error < dec("1e-9"));
    assert_eq!(result.rtp().with_prec(8), dec("0.99160161"));
    let rtp = result.rtp().to_f64().unwrap();
    assert!((rtp - 0.9916016075366214).abs() < 1e-12, "rtp = {}", rtp);
}

#[test]
fn test_all_high_risk_tables_keep_house_edge() {
    let catalog = Catalog::builtin().unwrap();
    let evaluator = RtpEvaluator::default();
    for (rows, golden) in GOLDEN {
        let config = catalog.configuration(HIGH_RISK, rows).unwrap();
        let result = evaluator.evaluate(&config).unwrap();
        assert!(!result.has_anomaly(), "rows {}", rows);
        assert_eq!(result.classification(), Classification::HouseEdge, "rows {}", rows);
        let error = (result.rtp().clone() - dec(golden)).abs();
        assert!(error < dec("1e-45"), "rows {} rtp {} golden {}", rows, result.rtp(), golden);
    }
}

#[test]
fn test_golden_values_stable_at_higher_precision() {
    let catalog = Catalog::builtin().unwrap();
    let wide = RtpEvaluator::new(ProbabilityEngine::with_digits(120).unwrap());
    for (rows, golden) in GOLDEN {
        let config = catalog.configuration(HIGH_RISK, rows).unwrap();
        let rtp = wide.evaluate(&config).unwrap().rtp().with_prec(10);
        assert_eq!(rtp, dec(golden).with_prec(10), "rows {}", rows);
    }
}

#[test]
fn test_short_eleven_row_table_flags_anomaly() {
    let catalog = Catalog::builtin().unwrap();
    let full = catalog.configuration(HIGH_RISK, 11).unwrap();
    let mut table = full.multipliers().to_vec();
    table.pop();
    let short = Configuration::with_unverified_table(11, full.bias().clone(), table).unwrap();

    let result = plinko_engine::evaluate(&short).unwrap();
    let anomaly = result.anomaly().expect("missing bucket must be flagged");
    let expected = dec("0.99951198723755889791877166395581435842519283242226");
    assert!((anomaly.total_probability.clone() - expected).abs() < dec("1e-45"));
    let full_result = plinko_engine::evaluate(&full).unwrap();
    assert!(result.rtp() < full_result.rtp());
}

#[test]
fn test_every_short_high_risk_table_flags_anomaly() {
    let catalog = Catalog::builtin().unwrap();
    for rows in 11..=16 {
        let full = catalog.configuration(HIGH_RISK, rows).unwrap();
        let mut table = full.multipliers().to_vec();
        table.pop();
        let short = Configuration::with_unverified_table(rows, full.bias().clone(), table).unwrap();

        let result = plinko_engine::evaluate(&short).unwrap();
        assert_eq!(result.contributions().len(), rows as usize, "rows {}", rows);
        let anomaly = result.anomaly().expect("missing bucket must be flagged");
        assert_eq!(
            anomaly.kind,
            AnomalyKind::MissingBuckets {
                covered: rows as usize,
                expected: rows as usize + 1
            },
            "rows {}",
            rows
        );
        assert!(*result.total_probability() < BigDecimal::one(), "rows {}", rows);
    }
}
