//! Text and JSON rendering of evaluation results
//!
//! Decimals are converted to f64 only here, for display.

use bigdecimal::BigDecimal;
use num_traits::{One, ToPrimitive};
use plinko_engine::{AnomalyKind, Configuration, RtpResult};
use serde::Serialize;

const WIDTH: usize = 80;

/// RTP above this is reported as close to the target band.
const NEAR_TARGET: f64 = 0.99;

/// A configuration together with its evaluation
#[derive(Debug, Clone)]
pub struct Evaluated {
    pub config: Configuration,
    pub result: RtpResult,
}

/// Summary status shown per configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    PlayerAdvantage,
    NearTarget,
    Ok,
}

impl Status {
    pub fn of(result: &RtpResult) -> Self {
        if result.classification().is_player_advantage() {
            Status::PlayerAdvantage
        } else if as_f64(result.rtp()) > NEAR_TARGET {
            Status::NearTarget
        } else {
            Status::Ok
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::PlayerAdvantage => "❌ PLAYER ADVANTAGE",
            Status::NearTarget => "✅ OK (Near target)",
            Status::Ok => "✅ OK",
        }
    }
}

/// One summary line, as emitted with `--json`
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub tier: String,
    pub rows: u32,
    /// Full-precision RTP
    pub rtp: String,
    pub rtp_percent: f64,
    pub house_edge_percent: f64,
    pub total_probability: String,
    pub player_advantage: bool,
    pub distribution_anomaly: bool,
}

fn as_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn percent(value: &BigDecimal) -> f64 {
    as_f64(&(value.clone() * BigDecimal::from(100)))
}

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

/// Heading line for a tier, e.g. `HIGH RISK`
pub fn tier_title(tier: &str) -> String {
    format!("{} RISK", tier.to_uppercase())
}

/// Per-bucket table, totals and RTP lines for one configuration.
pub fn render_configuration(tier: &str, evaluated: &Evaluated) -> String {
    let Evaluated { config, result } = evaluated;
    let mut lines = vec![
        String::new(),
        rule('='),
        format!("{} - {} ROWS", tier_title(tier), config.rows()),
        rule('='),
        format!("Left Probability: {}", config.bias()),
        format!("Right Probability: {}", BigDecimal::one() - config.bias()),
        String::new(),
        "Bucket Analysis:".to_string(),
        format!(
            "{:<8} {:<12} {:<20} {:<12} {:<20}",
            "Bucket", "LeftSteps", "Probability", "Multiplier", "Contribution"
        ),
        rule('-'),
    ];
    for c in result.contributions() {
        lines.push(format!(
            "{:<8} {:<12} {:<20.10} {:<12.2} {:<20.10}",
            c.bucket,
            c.bucket,
            as_f64(&c.probability),
            as_f64(&c.multiplier),
            as_f64(&c.contribution)
        ));
    }
    lines.push(rule('-'));
    lines.push(format!(
        "{:<8} {:<12} {:<20.10} {:<12} {:<20.10}",
        "TOTALS",
        "",
        as_f64(result.total_probability()),
        "",
        as_f64(result.rtp())
    ));
    lines.push(String::new());
    lines.push(rule('='));
    lines.push(format!("THEORETICAL RTP: {:.8}%", percent(result.rtp())));
    lines.push(format!("HOUSE EDGE: {:.8}%", percent(&result.house_edge())));
    lines.push(rule('='));
    if let Some(anomaly) = result.anomaly() {
        lines.push(format!(
            "⚠️  WARNING: Total probability = {:.10} (should be 1.0)",
            as_f64(&anomaly.total_probability)
        ));
        if let AnomalyKind::MissingBuckets { covered, expected } = anomaly.kind {
            lines.push(format!(
                "⚠️  WARNING: Multiplier table covers {} of {} buckets",
                covered, expected
            ));
        }
    }
    lines.join("\n")
}

/// Summary table over every evaluated configuration.
pub fn render_summary(tier: &str, evaluated: &[Evaluated]) -> String {
    let mut lines = vec![
        String::new(),
        rule('='),
        format!(" SUMMARY - ALL {} CONFIGURATIONS", tier_title(tier)),
        rule('='),
        format!("{:<8} {:<15} {:<15} {:<20}", "Rows", "RTP", "House Edge", "Status"),
        rule('-'),
    ];
    for e in evaluated {
        lines.push(format!(
            "{:<8} {:.8}%   {:>7.4}%      {:<20}",
            e.config.rows(),
            percent(e.result.rtp()),
            percent(&e.result.house_edge()),
            Status::of(&e.result).label()
        ));
    }
    lines.push(rule('='));
    lines.join("\n")
}

/// Alert block for player-advantage configurations and anomalies.
pub fn render_findings(evaluated: &[Evaluated]) -> String {
    let mut lines = vec![String::new(), rule('='), " CRITICAL FINDINGS".to_string(), rule('=')];
    let advantage = evaluated
        .iter()
        .filter(|e| e.result.classification().is_player_advantage())
        .count();
    if advantage > 0 {
        lines.push(format!(
            "⚠️  {} configurations have NEGATIVE house edge (player wins!)",
            advantage
        ));
        lines.push("⚠️  This is mathematically IMPOSSIBLE for a casino game".to_string());
        lines.push("⚠️  The multiplier tables are INCORRECT".to_string());
    } else {
        lines.push("✅ All configurations have positive house edge".to_string());
    }
    let anomalies: Vec<String> = evaluated
        .iter()
        .filter(|e| e.result.has_anomaly())
        .map(|e| e.config.rows().to_string())
        .collect();
    if !anomalies.is_empty() {
        lines.push(format!(
            "⚠️  Probability mass anomaly for rows: {}",
            anomalies.join(", ")
        ));
    }
    lines.push(rule('='));
    lines.join("\n")
}

/// Machine-readable summary rows.
pub fn summary_rows(tier: &str, evaluated: &[Evaluated]) -> Vec<SummaryRow> {
    evaluated
        .iter()
        .map(|e| SummaryRow {
            tier: tier.to_string(),
            rows: e.config.rows(),
            rtp: e.result.rtp().to_string(),
            rtp_percent: percent(e.result.rtp()),
            house_edge_percent: percent(&e.result.house_edge()),
            total_probability: e.result.total_probability().to_string(),
            player_advantage: e.result.classification().is_player_advantage(),
            distribution_anomaly: e.result.has_anomaly(),
        })
        .collect()
}
