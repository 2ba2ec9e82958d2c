use crate::model::options::ScoringOptions;
use crate::model::tables::ExpressionTable;

/// Relative slack when comparing a value against its gene mean, so a gene
/// with identical values across samples is expressed everywhere.
const MEAN_TOLERANCE: f64 = 1e-12;

/// One flag per (gene, sample), rows in expression-table gene order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionMask {
    expressed: Vec<Vec<bool>>,
}

impl ExpressionMask {
    pub fn is_expressed(&self, gene_row: usize, sample_col: usize) -> bool {
        self.expressed[gene_row][sample_col]
    }

    pub fn n_genes(&self) -> usize {
        self.expressed.len()
    }
}

#[derive(Debug, Clone)]
pub struct Stage3Output {
    pub mask: ExpressionMask,
    /// Present only when the average filter ran.
    pub gene_means: Option<Vec<f64>>,
    pub expressed_per_sample: Vec<usize>,
    pub filtered_per_sample: Vec<usize>,
}

pub fn run_stage3(expression: &ExpressionTable, options: &ScoringOptions) -> Stage3Output {
    let min = options.effective_min();
    let gene_means = options.average_filter.then(|| gene_means(expression));

    let n_samples = expression.n_samples();
    let mut expressed_per_sample = vec![0usize; n_samples];
    let mut filtered_per_sample = vec![0usize; n_samples];
    let mut expressed = Vec::with_capacity(expression.n_genes());

    for (gene, row) in expression.values.iter().enumerate() {
        let mean = gene_means.as_ref().map(|m| m[gene]);
        let flags: Vec<bool> = row
            .iter()
            .map(|&value| passes(value, min, mean))
            .collect();
        for (col, &flag) in flags.iter().enumerate() {
            if flag {
                expressed_per_sample[col] += 1;
            } else {
                filtered_per_sample[col] += 1;
            }
        }
        expressed.push(flags);
    }

    Stage3Output {
        mask: ExpressionMask { expressed },
        gene_means,
        expressed_per_sample,
        filtered_per_sample,
    }
}

fn passes(value: f64, min: Option<f64>, mean: Option<f64>) -> bool {
    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(mean) = mean {
        if value < mean - mean.abs() * MEAN_TOLERANCE {
            return false;
        }
    }
    true
}

/// Mean of each gene across all samples; 0.0 when there are no samples.
pub fn gene_means(expression: &ExpressionTable) -> Vec<f64> {
    let n = expression.n_samples();
    expression
        .values
        .iter()
        .map(|row| {
            if n == 0 {
                0.0
            } else {
                row.iter().sum::<f64>() / n as f64
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_filter.rs"]
mod tests;
