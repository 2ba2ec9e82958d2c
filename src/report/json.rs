use crate::report::{ReportError, RunSummary};

pub fn render_summary_json(summary: &RunSummary) -> Result<String, ReportError> {
    let mut json = serde_json::to_string_pretty(summary)?;
    json.push('\n');
    Ok(json)
}
