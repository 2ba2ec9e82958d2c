use crate::model::scores::ScoreTable;
use crate::report::format_score;

pub const SAMPLE_HEADER: &str = "Sample";

/// Header row `Sample` + classes, then one row per sample in table order.
pub fn render_scores(scores: &ScoreTable, delimiter: &str) -> String {
    let mut out = String::new();

    let mut header = Vec::with_capacity(scores.n_classes() + 1);
    header.push(SAMPLE_HEADER);
    header.extend(scores.classes.iter().map(String::as_str));
    out.push_str(&header.join(delimiter));
    out.push('\n');

    for (sample, row) in scores.samples.iter().zip(&scores.scores) {
        let mut fields = Vec::with_capacity(row.len() + 1);
        fields.push(sample.clone());
        fields.extend(row.iter().map(|&v| format_score(v)));
        out.push_str(&fields.join(delimiter));
        out.push('\n');
    }

    out
}
