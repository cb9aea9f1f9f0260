use super::error::FileError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading LOBSTER and VASP output files.
///
/// Each implementor parses one file format into its in-memory model. Readers
/// only consume text; they never write files.
pub trait LobsterFile {
    /// The model produced by this reader.
    type Output;

    /// Parses the file contents from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed model.
    ///
    /// # Errors
    ///
    /// Returns [`FileError`] if reading fails or the contents are malformed.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, FileError>;

    /// Opens and parses a file.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to read.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Open`] if the file cannot be opened, or any error
    /// produced by [`LobsterFile::read_from`].
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, FileError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FileError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
