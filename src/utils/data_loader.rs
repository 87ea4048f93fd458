//! This module loads reference tables of zeta zero heights from text files.
//!
//! The format is one decimal value per line. Blank lines and lines starting
//! with `#` are ignored, and anything after the first whitespace-separated
//! token on a line is treated as a trailing comment. Values must be positive
//! and strictly increasing, matching the ordering of zeros on the critical
//! line.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use thiserror::Error;

/// Represents all possible errors that can occur while loading a reference table.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Occurs when a token cannot be parsed into a float.
    #[error("Parse error on line {line}: failed to parse float from '{token}'")]
    ParseFloat { line: usize, token: String },
    /// Occurs when a value is zero, negative, or not finite.
    #[error("Value error on line {line}: zero heights must be positive and finite, got {value}")]
    InvalidValue { line: usize, value: f64 },
    /// Occurs when the table is not strictly increasing.
    #[error("Ordering error on line {line}: {value} does not exceed the previous height {previous}")]
    NotIncreasing {
        line: usize,
        value: f64,
        previous: f64,
    },
    /// Occurs when the file holds no values at all.
    #[error("Format error: the reference table is empty.")]
    Empty,
}

/// Parses a reference table from any buffered reader.
pub fn parse_zero_heights(reader: impl BufRead) -> Result<Vec<f64>, DataLoaderError> {
    let mut heights: Vec<f64> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if token.starts_with('#') {
            continue;
        }

        let value: f64 = token.parse().map_err(|_| DataLoaderError::ParseFloat {
            line: line_number,
            token: token.to_string(),
        })?;
        if !(value.is_finite() && value > 0.0) {
            return Err(DataLoaderError::InvalidValue {
                line: line_number,
                value,
            });
        }
        if let Some(&previous) = heights.last() {
            if value <= previous {
                return Err(DataLoaderError::NotIncreasing {
                    line: line_number,
                    value,
                    previous,
                });
            }
        }
        heights.push(value);
    }

    if heights.is_empty() {
        return Err(DataLoaderError::Empty);
    }
    Ok(heights)
}

/// Loads a reference table of zero heights from `path`.
pub fn load_zero_heights(path: impl AsRef<Path>) -> Result<Vec<f64>, DataLoaderError> {
    let file = File::open(path)?;
    parse_zero_heights(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_with_comments_and_blank_lines() {
        let text = "# first zeros\n\n14.134725141734693790 tau_1\n21.022039638771554992\n  25.0108575801456887632  # tau_3\n";
        let heights = parse_zero_heights(Cursor::new(text)).unwrap();
        assert_eq!(heights.len(), 3);
        assert!((heights[0] - 14.134725141734694).abs() < 1e-15);
        assert!((heights[2] - 25.010857580145689).abs() < 1e-15);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_zero_heights(Cursor::new("14.1\nabc\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error on line 2: failed to parse float from 'abc'"
        );

        let err = parse_zero_heights(Cursor::new("21.0\n14.1\n")).unwrap_err();
        assert!(matches!(err, DataLoaderError::NotIncreasing { line: 2, .. }));

        let err = parse_zero_heights(Cursor::new("-1.0\n")).unwrap_err();
        assert!(matches!(err, DataLoaderError::InvalidValue { line: 1, .. }));

        let err = parse_zero_heights(Cursor::new("# nothing here\n\n")).unwrap_err();
        assert!(matches!(err, DataLoaderError::Empty));
    }

    #[test]
    fn test_missing_file() {
        let err = load_zero_heights("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, DataLoaderError::Io(_)));
    }
}
