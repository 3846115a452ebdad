use crate::error::{DashboardError, Result};
use crate::sunburst::SunburstOptions;
use crate::treemap::{LabelRules, TreemapOptions};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Canvas sizes and thresholds for every chart. Every field is optional in
/// the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Lowest score on the quality and stress axes.
    #[serde(default = "default_score_min")]
    pub score_min: u8,
    /// Highest score on the quality and stress axes.
    #[serde(default = "default_score_max")]
    pub score_max: u8,
    #[serde(default)]
    pub treemap: TreemapOptions,
    #[serde(default)]
    pub treemap_labels: LabelRules,
    #[serde(default)]
    pub sunburst: SunburstOptions,
}

fn default_score_min() -> u8 { 1 }
fn default_score_max() -> u8 { 10 }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            score_min: default_score_min(),
            score_max: default_score_max(),
            treemap: TreemapOptions::default(),
            treemap_labels: LabelRules::default(),
            sunburst: SunburstOptions::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn score_domain(&self) -> RangeInclusive<u8> {
        self.score_min..=self.score_max
    }

    pub fn validate(&self) -> Result<()> {
        if self.score_min > self.score_max {
            return Err(DashboardError::InvalidInput(format!(
                "score_min ({}) exceeds score_max ({})",
                self.score_min, self.score_max
            )));
        }
        let sizes = [
            ("treemap.width", self.treemap.width),
            ("treemap.height", self.treemap.height),
            ("treemap.padding_inner", self.treemap.padding_inner),
            ("treemap.padding_outer", self.treemap.padding_outer),
            ("sunburst.radius", self.sunburst.radius),
        ];
        for (name, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(DashboardError::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
