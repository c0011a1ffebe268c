use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The chart styles a user can pick when saving a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Bar3d,
    Pie,
    Pie3d,
    Line,
    Area,
    Scatter,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Bar3d => "bar3d",
            ChartKind::Pie => "pie",
            ChartKind::Pie3d => "pie3d",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Scatter => "scatter",
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
        match s {
            "bar" => Ok(ChartKind::Bar),
            "bar3d" => Ok(ChartKind::Bar3d),
            "pie" => Ok(ChartKind::Pie),
            "pie3d" => Ok(ChartKind::Pie3d),
            "line" => Ok(ChartKind::Line),
            "area" => Ok(ChartKind::Area),
            "scatter" => Ok(ChartKind::Scatter),
            other => Err(format!("unknown chart type '{}'", other)),
        }
    }
}

/// Label/value pairs ready for plotting. `values[i]` belongs to `labels[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// A saved chart definition and the series derived for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    /// Id of the source `FileRecord`.
    pub file: String,
    /// Display name of the source file, filled in on reads while it exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub x_axis: String,
    pub y_axis: String,
    pub data: ChartSeries,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
