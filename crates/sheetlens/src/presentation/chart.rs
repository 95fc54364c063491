//! Chart kinds and their data requirements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visualization offered for an aggregation result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Area,
    Radar,
    Pie,
    Scatter,
    Bubble,
    Heatmap,
    BoxPlot,
    Violin,
}

impl ChartKind {
    /// Every kind, in menu order.
    pub const ALL: [ChartKind; 10] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Radar,
        ChartKind::Pie,
        ChartKind::Scatter,
        ChartKind::Bubble,
        ChartKind::Heatmap,
        ChartKind::BoxPlot,
        ChartKind::Violin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Radar => "radar",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Bubble => "bubble",
            ChartKind::Heatmap => "heatmap",
            ChartKind::BoxPlot => "boxplot",
            ChartKind::Violin => "violin",
        }
    }

    /// Whether the chart only makes sense for purely numeric observed data.
    /// Bar and pie charts can show tallies of categorical values.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, ChartKind::Bar | ChartKind::Pie)
    }

    /// Kinds admissible for a result.
    pub fn available(has_non_numeric: bool) -> Vec<ChartKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| !has_non_numeric || !kind.requires_numeric())
            .collect()
    }

    /// The requested kind if admissible, otherwise a bar chart.
    pub fn resolve(requested: ChartKind, has_non_numeric: bool) -> ChartKind {
        if has_non_numeric && requested.requires_numeric() {
            ChartKind::Bar
        } else {
            requested
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown chart type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_numeric_limits_choices() {
        assert_eq!(ChartKind::available(true), vec![ChartKind::Bar, ChartKind::Pie]);
        assert_eq!(ChartKind::available(false).len(), 10);
    }

    #[test]
    fn test_resolve_falls_back_to_bar() {
        assert_eq!(ChartKind::resolve(ChartKind::Violin, true), ChartKind::Bar);
        assert_eq!(ChartKind::resolve(ChartKind::Pie, true), ChartKind::Pie);
        assert_eq!(ChartKind::resolve(ChartKind::Violin, false), ChartKind::Violin);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Box-Plot".parse::<ChartKind>().unwrap(), ChartKind::BoxPlot);
        assert_eq!("heatmap".parse::<ChartKind>().unwrap(), ChartKind::Heatmap);
        assert!("donut".parse::<ChartKind>().is_err());
    }
}
