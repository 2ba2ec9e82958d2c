use crate::model::tables::ExpressionTable;

pub const CPM_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone)]
pub struct Stage2Output {
    pub table: ExpressionTable,
    /// Column sums of the input table, before any scaling.
    pub libsizes: Vec<f64>,
}

pub fn run_stage2(expression: &ExpressionTable, cpm_normalization: bool) -> Stage2Output {
    let table = if cpm_normalization {
        normalize_cpm(expression)
    } else {
        expression.clone()
    };
    Stage2Output {
        table,
        libsizes: expression.column_sums(),
    }
}

/// Counts-per-million scaling per sample. A sample whose values sum to zero
/// stays all zero.
pub fn normalize_cpm(expression: &ExpressionTable) -> ExpressionTable {
    let libsizes = expression.column_sums();
    let values: Vec<Vec<f64>> = expression
        .values
        .iter()
        .map(|row| {
            row.iter()
                .zip(&libsizes)
                .map(|(&v, &lib)| if lib == 0.0 { 0.0 } else { v / lib * CPM_SCALE })
                .collect::<Vec<f64>>()
        })
        .collect();
    expression.with_values(values)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_normalize.rs"]
mod tests;
