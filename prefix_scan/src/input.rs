//! Reading scan inputs from text files and writing results back as text.

use itertools::Itertools;
use std::{fs, io, num::ParseIntError, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("couldn't read input file: {0}")]
    Io(#[from] io::Error),

    #[error("element {index} ({token:?}) is not a 32-bit integer: {source}")]
    Malformed {
        index: usize,
        token: String,
        source: ParseIntError,
    },
}

/// Reads the sequence on the first line of the file at `path`.
pub fn read_sequence(path: impl AsRef<Path>) -> Result<Vec<i32>, InputError> {
    let contents = fs::read_to_string(path)?;
    parse_sequence(contents.lines().next().unwrap_or(""))
}

/// Parses a comma separated list of integers, optionally wrapped in square
/// brackets, such as `[1, -2, 3]` or `1,-2,3`.
pub fn parse_sequence(line: &str) -> Result<Vec<i32>, InputError> {
    let line = line.trim();
    let line = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .unwrap_or(line)
        .trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    line.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(index, token)| {
            token.parse::<i32>().map_err(|source| InputError::Malformed {
                index,
                token: token.to_string(),
                source,
            })
        })
        .collect()
}

/// Formats a scan result as `a, b, c`.
pub fn format_sequence(ys: &[i32]) -> String {
    ys.iter().join(", ")
}

/// Formats a sequence the way `parse_sequence` reads it back, without
/// brackets or spaces.
pub fn format_input(xs: &[i32]) -> String {
    xs.iter().join(",")
}
