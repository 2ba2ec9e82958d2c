use std::path::Path;

use crate::input::InputError;
use crate::input::table::read_numeric_table;
use crate::model::tables::ExpressionTable;

/// Reads a gene x sample expression table.
pub fn load_expression(path: &Path, delimiter: &str) -> Result<ExpressionTable, InputError> {
    tracing::debug!(path = %path.display(), "reading expression file");
    let raw = read_numeric_table(path, delimiter)?;

    let mut table = ExpressionTable::new(raw.columns);
    for row in raw.rows {
        let gene = row.id.clone();
        if !table.push_gene(row.id, row.values) {
            tracing::warn!(
                gene = %gene,
                line = row.line,
                "duplicate expression gene; keeping first"
            );
        }
    }

    tracing::debug!(samples = ?table.samples, "found samples");
    tracing::debug!(genes = table.n_genes(), "found genes per sample");
    Ok(table)
}
