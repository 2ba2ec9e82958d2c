use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::input::{InputError, open_maybe_gz};

/// An id column followed by numeric columns, as read from disk.
#[derive(Debug, Clone)]
pub struct NumericTable {
    pub columns: Vec<String>,
    pub rows: Vec<NumericRow>,
}

#[derive(Debug, Clone)]
pub struct NumericRow {
    pub line: usize,
    pub id: String,
    pub values: Vec<f64>,
}

pub fn read_numeric_table(path: &Path, delimiter: &str) -> Result<NumericTable, InputError> {
    let delim = match delimiter.as_bytes() {
        [b] => *b,
        _ => return Err(InputError::InvalidDelimiter(delimiter.to_string())),
    };
    let mut reader = ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(open_maybe_gz(path)?);

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut last_line = 0usize;

    loop {
        let more = reader.read_record(&mut record).map_err(|err| {
            let line = err.position().map_or(last_line + 1, |p| p.line() as usize);
            InputError::parse(path, line, err.to_string())
        })?;
        if !more {
            break;
        }
        let line_no = record.position().map_or(last_line + 1, |p| p.line() as usize);
        last_line = line_no;

        // whitespace-only line: a single empty field once trimmed
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        let fields: Vec<&str> = record.iter().collect();

        let Some(columns) = &header else {
            header = Some(parse_header(path, line_no, &fields)?);
            continue;
        };

        let expected = columns.len() + 1;
        if fields.len() != expected {
            return Err(InputError::parse(
                path,
                line_no,
                format!("expected {} fields, found {}", expected, fields.len()),
            ));
        }
        let id = fields[0];
        if id.is_empty() {
            return Err(InputError::parse(path, line_no, "empty gene id"));
        }
        let mut values = Vec::with_capacity(columns.len());
        for (col, raw) in fields[1..].iter().enumerate() {
            values.push(parse_value(path, line_no, &columns[col], raw)?);
        }
        rows.push(NumericRow {
            line: line_no,
            id: id.to_string(),
            values,
        });
    }

    let columns = header.ok_or_else(|| InputError::Empty(path.to_path_buf()))?;
    Ok(NumericTable { columns, rows })
}

fn parse_header(path: &Path, line_no: usize, fields: &[&str]) -> Result<Vec<String>, InputError> {
    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(fields.len().saturating_sub(1));
    for (idx, name) in fields.iter().enumerate().skip(1) {
        if name.is_empty() {
            return Err(InputError::parse(
                path,
                line_no,
                format!("empty column name at position {}", idx + 1),
            ));
        }
        if !seen.insert(*name) {
            return Err(InputError::parse(
                path,
                line_no,
                format!("duplicate column name '{}'", name),
            ));
        }
        columns.push(name.to_string());
    }
    Ok(columns)
}

fn parse_value(path: &Path, line_no: usize, column: &str, raw: &str) -> Result<f64, InputError> {
    let value: f64 = raw.parse().map_err(|_| {
        InputError::parse(
            path,
            line_no,
            format!("non-numeric value '{}' in column '{}'", raw, column),
        )
    })?;
    if !value.is_finite() {
        return Err(InputError::parse(
            path,
            line_no,
            format!("non-finite value '{}' in column '{}'", raw, column),
        ));
    }
    if value < 0.0 {
        return Err(InputError::parse(
            path,
            line_no,
            format!("negative value '{}' in column '{}'", raw, column),
        ));
    }
    Ok(value)
}
