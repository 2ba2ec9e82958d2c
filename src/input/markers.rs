use std::path::Path;

use crate::input::InputError;
use crate::input::table::read_numeric_table;
use crate::model::tables::MarkerTable;

/// Reads a gene x class weight table. The first column holds gene ids, the
/// header names the classes.
pub fn load_markers(path: &Path, delimiter: &str) -> Result<MarkerTable, InputError> {
    tracing::debug!(path = %path.display(), "reading markers file");
    let raw = read_numeric_table(path, delimiter)?;

    let mut table = MarkerTable::new(raw.columns);
    for row in raw.rows {
        if row.values.iter().all(|&w| w == 0.0) {
            tracing::debug!(gene = %row.id, line = row.line, "marker row has no non-zero weight");
        }
        let gene = row.id.clone();
        if !table.push_gene(row.id, row.values) {
            tracing::warn!(
                gene = %gene,
                line = row.line,
                "duplicate marker gene; keeping first"
            );
        }
    }

    tracing::debug!(markers = table.n_genes(), "found markers");
    tracing::debug!(categories = ?table.classes, "found categories");
    Ok(table)
}
