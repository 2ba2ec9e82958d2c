use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub mod expression;
pub mod markers;
pub mod table;

pub use expression::load_expression;
pub use markers::load_markers;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("delimiter must be a single byte, got '{0}'")]
    InvalidDelimiter(String),
    #[error("parse error: {} is empty", .0.display())]
    Empty(PathBuf),
    #[error("parse error: {}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl InputError {
    pub fn parse(path: &Path, line: usize, message: impl Into<String>) -> Self {
        InputError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Resolves a command-line delimiter to a single byte. Accepts the literal
/// character as well as `\t` and `tab`, since shells rarely pass a raw tab
/// through.
pub fn parse_delimiter(raw: &str) -> Result<String, String> {
    let delim = match raw {
        "\\t" | "tab" | "TAB" => "\t".to_string(),
        "comma" => ",".to_string(),
        "" => return Err("delimiter must not be empty".to_string()),
        other => other.to_string(),
    };
    if delim.len() != 1 {
        return Err(format!("delimiter must be a single byte, got '{raw}'"));
    }
    Ok(delim)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
