//! plinko Catalog - multiplier tables and biases per risk tier
//!
//! The engine never embeds game tables; this crate supplies them. A catalog
//! starts from the built-in tiers and may be extended or overridden by a TOML
//! file:
//!
//! ```toml
//! [evaluation]
//! precision = 50
//! tolerance = "0.0001"
//!
//! [tiers.high]
//! bias = "0.499975"
//! [tiers.high.tables]
//! 11 = [120, 14, 5.2, 1.4, 0.4, 0.2, 0.2, 0.4, 1.4, 5.2, 14, 120]
//! ```
//!
//! Every table is checked against its row count when the catalog is built,
//! so lookups only ever hand out well-formed configurations.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use plinko_engine::{parse_decimal, validate_bias, Configuration, InvalidInput, Precision};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the built-in high risk tier.
pub const HIGH_RISK: &str = "high";

/// Probability of a left decision on the high risk tier.
const HIGH_RISK_BIAS: &str = "0.499975";

const HIGH_RISK_TABLES: [(u32, &[&str]); 6] = [
    (11, &["120", "14", "5.2", "1.4", "0.4", "0.2", "0.2", "0.4", "1.4", "5.2", "14", "120"]),
    (12, &["170", "24", "8.1", "2", "0.7", "0.2", "0.2", "0.2", "0.7", "2", "8.1", "24", "170"]),
    (13, &["260", "37", "11", "4", "1", "0.2", "0.2", "0.2", "0.2", "1", "4", "11", "37", "260"]),
    (
        14,
        &["420", "56", "18", "5", "1.9", "0.3", "0.2", "0.2", "0.2", "0.3", "1.9", "5", "18", "56", "420"],
    ),
    (
        15,
        &[
            "620", "83", "27", "8", "3", "0.5", "0.2", "0.2", "0.2", "0.2", "0.5", "3", "8", "27", "83",
            "620",
        ],
    ),
    (
        16,
        &[
            "1000", "130", "26", "9", "4", "2", "0.2", "0.2", "0.2", "0.2", "0.2", "2", "4", "9", "26",
            "130", "1000",
        ],
    ),
];

/// Catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to render catalog: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Unknown risk tier '{0}'")]
    UnknownTier(String),

    #[error("Tier '{tier}' has no table for {rows} rows")]
    UnknownRows { tier: String, rows: u32 },

    #[error("Tier '{tier}': '{key}' is not a row count")]
    RowKey { tier: String, key: String },

    #[error("Tier '{tier}': {source}")]
    Invalid {
        tier: String,
        #[source]
        source: InvalidInput,
    },

    #[error("Evaluation settings: {0}")]
    Settings(#[source] InvalidInput),
}

/// A number as written in a catalog file.
///
/// Floats go through their shortest decimal rendering, so `5.2` means the
/// decimal 5.2 and not the nearest binary double.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalLiteral {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl DecimalLiteral {
    /// Convert to an exact decimal
    pub fn to_decimal(&self) -> Result<BigDecimal, InvalidInput> {
        match self {
            DecimalLiteral::Text(s) => parse_decimal(s),
            DecimalLiteral::Integer(i) => Ok(BigDecimal::from(*i)),
            DecimalLiteral::Float(f) => parse_decimal(&f.to_string()),
        }
    }
}

impl From<&BigDecimal> for DecimalLiteral {
    fn from(value: &BigDecimal) -> Self {
        DecimalLiteral::Text(value.to_string())
    }
}

/// `[evaluation]` section: engine settings a catalog may pin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// Working precision in significant digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u64>,

    /// Tolerance on |total probability − 1|
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<DecimalLiteral>,
}

impl EvaluationSettings {
    /// Tolerance as a decimal, if set
    pub fn tolerance(&self) -> Result<Option<BigDecimal>, CatalogError> {
        self.tolerance
            .as_ref()
            .map(|t| t.to_decimal().map_err(CatalogError::Settings))
            .transpose()
    }
}

/// `[tiers.<name>]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    pub bias: DecimalLiteral,

    /// Row count (as a TOML key) → multipliers, bucket 0 first
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<DecimalLiteral>>,
}

/// On-disk catalog layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub evaluation: EvaluationSettings,

    #[serde(default)]
    pub tiers: BTreeMap<String, TierSpec>,
}

/// One risk tier: a bias and a validated configuration per row count.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskTier {
    name: String,
    bias: BigDecimal,
    configurations: BTreeMap<u32, Configuration>,
}

impl RiskTier {
    fn from_spec(name: &str, spec: &TierSpec) -> Result<Self, CatalogError> {
        let invalid = |source| CatalogError::Invalid {
            tier: name.to_string(),
            source,
        };
        let bias = spec.bias.to_decimal().map_err(invalid)?;
        validate_bias(&bias).map_err(invalid)?;
        let mut configurations = BTreeMap::new();
        for (key, table) in &spec.tables {
            let rows: u32 = key.trim().parse().map_err(|_| CatalogError::RowKey {
                tier: name.to_string(),
                key: key.clone(),
            })?;
            let multipliers = table
                .iter()
                .map(DecimalLiteral::to_decimal)
                .collect::<Result<Vec<_>, _>>()
                .map_err(invalid)?;
            let config = Configuration::new(rows, bias.clone(), multipliers).map_err(invalid)?;
            configurations.insert(rows, config);
        }
        debug!(tier = name, tables = configurations.len(), "loaded risk tier");
        Ok(RiskTier {
            name: name.to_string(),
            bias,
            configurations,
        })
    }

    fn to_spec(&self) -> TierSpec {
        TierSpec {
            bias: DecimalLiteral::from(&self.bias),
            tables: self
                .configurations
                .iter()
                .map(|(rows, config)| {
                    let table = config.multipliers().iter().map(DecimalLiteral::from).collect();
                    (rows.to_string(), table)
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Probability of a left decision on this tier
    pub fn bias(&self) -> &BigDecimal {
        &self.bias
    }

    /// Row counts with a table, ascending
    pub fn row_counts(&self) -> Vec<u32> {
        self.configurations.keys().copied().collect()
    }

    /// Configuration for a row count
    pub fn configuration(&self, rows: u32) -> Result<&Configuration, CatalogError> {
        self.configurations
            .get(&rows)
            .ok_or_else(|| CatalogError::UnknownRows {
                tier: self.name.clone(),
                rows,
            })
    }
}

/// Risk tiers keyed by lowercase name, plus optional evaluation settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tiers: BTreeMap<String, RiskTier>,
    settings: EvaluationSettings,
}

impl Catalog {
    /// Catalog holding only the built-in tiers.
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        catalog.merge(builtin_file())?;
        Ok(catalog)
    }

    /// Built-in tiers overridden by the tiers of a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;
        let file: CatalogFile = toml::from_str(&content).map_err(|e| CatalogError::Parse {
            path: path.to_owned(),
            source: e,
        })?;
        let mut catalog = Catalog::builtin()?;
        catalog.merge(file)?;
        info!(path = %path.display(), tiers = catalog.tiers.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Add the tiers of `file`, replacing tiers with the same name, and take
    /// over any evaluation settings it pins.
    pub fn merge(&mut self, file: CatalogFile) -> Result<(), CatalogError> {
        // Validate everything first; a failed merge leaves the catalog untouched
        let mut tiers = BTreeMap::new();
        for (name, spec) in &file.tiers {
            let key = name.to_lowercase();
            let tier = RiskTier::from_spec(&key, spec)?;
            tiers.insert(key, tier);
        }
        if let Some(digits) = file.evaluation.precision {
            Precision::new(digits).map_err(CatalogError::Settings)?;
        }
        if let Some(tolerance) = file.evaluation.tolerance()? {
            if tolerance <= BigDecimal::zero() {
                return Err(CatalogError::Settings(InvalidInput::NonPositiveTolerance(
                    tolerance.to_string(),
                )));
            }
        }

        self.tiers.extend(tiers);
        if file.evaluation.precision.is_some() {
            self.settings.precision = file.evaluation.precision;
        }
        if file.evaluation.tolerance.is_some() {
            self.settings.tolerance = file.evaluation.tolerance;
        }
        Ok(())
    }

    /// Evaluation settings pinned by merged files
    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    /// Tier names, sorted
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.keys().map(String::as_str).collect()
    }

    /// Look up a tier by name (case-insensitive)
    pub fn tier(&self, name: &str) -> Result<&RiskTier, CatalogError> {
        self.tiers
            .get(&name.to_lowercase())
            .ok_or_else(|| CatalogError::UnknownTier(name.to_string()))
    }

    /// Row counts with a table on `tier`, ascending
    pub fn row_counts(&self, tier: &str) -> Result<Vec<u32>, CatalogError> {
        Ok(self.tier(tier)?.row_counts())
    }

    /// Configuration for `(tier, rows)`
    pub fn configuration(&self, tier: &str, rows: u32) -> Result<Configuration, CatalogError> {
        self.tier(tier)?.configuration(rows).cloned()
    }

    /// Render the catalog in the file layout it is loaded from.
    pub fn to_toml(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            evaluation: self.settings.clone(),
            tiers: self
                .tiers
                .iter()
                .map(|(name, tier)| (name.clone(), tier.to_spec()))
                .collect(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

fn builtin_file() -> CatalogFile {
    let tables = HIGH_RISK_TABLES
        .iter()
        .map(|(rows, table)| {
            let table = table.iter().map(|m| DecimalLiteral::Text(m.to_string())).collect();
            (rows.to_string(), table)
        })
        .collect();
    let mut tiers = BTreeMap::new();
    tiers.insert(
        HIGH_RISK.to_string(),
        TierSpec {
            bias: DecimalLiteral::Text(HIGH_RISK_BIAS.to_string()),
            tables,
        },
    );
    CatalogFile {
        evaluation: EvaluationSettings::default(),
        tiers,
    }
}
