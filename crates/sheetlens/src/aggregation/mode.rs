//! Calculation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Statistic applied to an observed field's numeric values within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    #[default]
    Average,
    Sum,
    Count,
    Min,
    Max,
    Median,
}

impl CalculationMode {
    /// Every mode, in menu order.
    pub const ALL: [CalculationMode; 6] = [
        CalculationMode::Average,
        CalculationMode::Sum,
        CalculationMode::Count,
        CalculationMode::Min,
        CalculationMode::Max,
        CalculationMode::Median,
    ];

    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMode::Average => "average",
            CalculationMode::Sum => "sum",
            CalculationMode::Count => "count",
            CalculationMode::Min => "min",
            CalculationMode::Max => "max",
            CalculationMode::Median => "median",
        }
    }
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "average" | "avg" | "mean" => Ok(CalculationMode::Average),
            "sum" => Ok(CalculationMode::Sum),
            "count" => Ok(CalculationMode::Count),
            "min" => Ok(CalculationMode::Min),
            "max" => Ok(CalculationMode::Max),
            "median" => Ok(CalculationMode::Median),
            _ => Err(format!(
                "Unknown calculation mode: {}. Use average, sum, count, min, max, or median.",
                s
            )),
        }
    }
}
