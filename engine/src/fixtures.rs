//! Synthetic configurations for tests and benchmarks
//!
//! Tables here are generated, not taken from any shipped game:
//!   uniform   every bucket pays the same multiplier, so RTP == multiplier
//!   v-shaped  bucket k pays |2k - rows|, the usual edges-pay-most layout

use crate::configuration::Configuration;
use crate::decimal::parse_decimal;
use bigdecimal::BigDecimal;

fn literal(s: &str) -> BigDecimal {
    parse_decimal(s).expect("fixture literal")
}

/// `rows + 1` copies of `value`.
pub fn uniform_table(rows: u32, value: &str) -> Vec<BigDecimal> {
    vec![literal(value); rows as usize + 1]
}

/// Bucket k pays |2k - rows|.
pub fn v_shaped_table(rows: u32) -> Vec<BigDecimal> {
    (0..=rows)
        .map(|k| BigDecimal::from((2 * i64::from(k) - i64::from(rows)).abs()))
        .collect()
}

/// Unbiased board with a v-shaped table.
pub fn fair_board(rows: u32) -> Configuration {
    Configuration::new(rows, literal("0.5"), v_shaped_table(rows)).expect("fair board")
}

/// Board whose v-shaped table is missing the last bucket.
pub fn short_table(rows: u32, bias: &str) -> Configuration {
    let mut table = v_shaped_table(rows);
    table.pop();
    Configuration::with_unverified_table(rows, literal(bias), table).expect("short table")
}
