use serde::Serialize;

use crate::model::scores::ScoreTable;
use crate::model::tables::{ExpressionTable, MarkerTable};
use crate::pipeline::stage3_filter::ExpressionMask;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringWarning {
    /// No gene is shared by the marker and expression tables.
    EmptyIntersection,
    /// Every scorable marker of the class has weight zero.
    ZeroMaxScore { class: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringAudit {
    pub shared_genes: usize,
    pub marker_only_genes: Vec<String>,
    pub expression_only_genes: Vec<String>,
    /// Best achievable raw score per class, in class order.
    pub max_scores: Vec<f64>,
    /// Shared marker genes passing the filter, per sample.
    pub expressed_markers: Vec<usize>,
    pub warnings: Vec<ScoringWarning>,
}

#[derive(Debug, Clone)]
pub struct Stage4Output {
    pub scores: ScoreTable,
    pub audit: ScoringAudit,
}

pub fn run_stage4(
    markers: &MarkerTable,
    expression: &ExpressionTable,
    mask: &ExpressionMask,
) -> Stage4Output {
    debug_assert_eq!(mask.n_genes(), expression.n_genes());
    let n_classes = markers.n_classes();

    let mut shared: Vec<(usize, usize)> = Vec::new();
    let mut marker_only_genes = Vec::new();
    for (marker_row, gene) in markers.genes.iter().enumerate() {
        match expression.gene_row(gene) {
            Some(expr_row) => shared.push((marker_row, expr_row)),
            None => marker_only_genes.push(gene.clone()),
        }
    }
    let expression_only_genes: Vec<String> = expression
        .genes
        .iter()
        .filter(|gene| markers.gene_row(gene).is_none())
        .cloned()
        .collect();

    let mut max_scores = vec![0f64; n_classes];
    for &(marker_row, _) in &shared {
        for (class, &w) in markers.weights[marker_row].iter().enumerate() {
            max_scores[class] += w;
        }
    }

    let mut scores = Vec::with_capacity(expression.n_samples());
    let mut expressed_markers = Vec::with_capacity(expression.n_samples());
    for sample in 0..expression.n_samples() {
        let mut raw = vec![0f64; n_classes];
        let mut hits = 0usize;
        for &(marker_row, expr_row) in &shared {
            if !mask.is_expressed(expr_row, sample) {
                continue;
            }
            hits += 1;
            for (class, &w) in markers.weights[marker_row].iter().enumerate() {
                raw[class] += w;
            }
        }
        let ratios: Vec<f64> = raw
            .iter()
            .zip(&max_scores)
            .map(|(&r, &max)| if max > 0.0 { r / max } else { 0.0 })
            .collect();
        scores.push(ratios);
        expressed_markers.push(hits);
    }

    let mut warnings = Vec::new();
    if shared.is_empty() {
        warnings.push(ScoringWarning::EmptyIntersection);
    } else {
        for (class, &max) in markers.classes.iter().zip(&max_scores) {
            if max <= 0.0 {
                warnings.push(ScoringWarning::ZeroMaxScore {
                    class: class.clone(),
                });
            }
        }
    }

    Stage4Output {
        scores: ScoreTable {
            samples: expression.samples.clone(),
            classes: markers.classes.clone(),
            scores,
        },
        audit: ScoringAudit {
            shared_genes: shared.len(),
            marker_only_genes,
            expression_only_genes,
            max_scores,
            expressed_markers,
            warnings,
        },
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_scores.rs"]
mod tests;
