use serde::Serialize;

/// How an explicit minimum threshold combines with the average filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdPolicy {
    /// Value must reach both the gene mean and the minimum.
    #[default]
    Both,
    /// Only the gene mean applies once averaging is on.
    AverageOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringOptions {
    /// `None` means no floor: every value counts as expressed.
    pub min_expression: Option<f64>,
    pub average_filter: bool,
    pub cpm_normalization: bool,
    pub threshold_policy: ThresholdPolicy,
}

impl ScoringOptions {
    /// Minimum threshold actually in effect for the filter stage.
    pub fn effective_min(&self) -> Option<f64> {
        match (self.average_filter, self.threshold_policy) {
            (true, ThresholdPolicy::AverageOnly) => None,
            _ => self.min_expression,
        }
    }
}
