use super::error::{FileError, ParseErrorKind};
use std::io::BufRead;

/// Reads all lines, pairing each with its one-based line number.
pub(crate) fn numbered_lines(reader: &mut impl BufRead) -> Result<Vec<(usize, String)>, FileError> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| Ok((i + 1, line?)))
        .collect()
}

pub(crate) fn parse_f64(token: &str, field: &'static str, line: usize) -> Result<f64, FileError> {
    token.trim().parse().map_err(|_| {
        FileError::parse(
            line,
            ParseErrorKind::InvalidFloat {
                field,
                value: token.to_string(),
            },
        )
    })
}

pub(crate) fn parse_usize(token: &str, field: &'static str, line: usize) -> Result<usize, FileError> {
    token.trim().parse().map_err(|_| {
        FileError::parse(
            line,
            ParseErrorKind::InvalidInt {
                field,
                value: token.to_string(),
            },
        )
    })
}

pub(crate) fn parse_i32(token: &str, field: &'static str, line: usize) -> Result<i32, FileError> {
    token.trim().parse().map_err(|_| {
        FileError::parse(
            line,
            ParseErrorKind::InvalidInt {
                field,
                value: token.to_string(),
            },
        )
    })
}

pub(crate) fn require_fields<'a>(
    line: &'a str,
    expected: usize,
    line_num: usize,
) -> Result<Vec<&'a str>, FileError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < expected {
        return Err(FileError::parse(
            line_num,
            ParseErrorKind::TooFewFields {
                expected,
                found: fields.len(),
            },
        ));
    }
    Ok(fields)
}

/// Strips the `No.` prefix LOBSTER puts in front of bond numbers.
pub(crate) fn normalize_bond_label(label: &str) -> &str {
    label.trim().strip_prefix("No.").unwrap_or(label.trim())
}
