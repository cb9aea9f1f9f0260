use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("Invalid integer '{value}' for {field}")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid number '{value}' for {field}")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Unexpected number of fields: {found}")]
    UnexpectedFieldCount { found: usize },
    #[error("Invalid site label '{0}'")]
    InvalidSiteLabel(String),
    #[error("Invalid bond label '{0}'")]
    InvalidBondLabel(String),
    #[error("Unrecognized header '{0}'")]
    UnrecognizedHeader(String),
}

impl FileError {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        FileError::Parse { line, kind }
    }
}
