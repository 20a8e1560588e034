//! Why a dataset could not be opened.
//!
//! Variants carry the file, line or value at fault so the catalog can
//! pass a readable reason up to the user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("dataset file {path} does not exist")]
    FileNotFound { path: String },

    #[error("reading dataset failed: {0}")]
    IoError(#[from] std::io::Error),

    /// A line of a .dat file did not have the expected shape
    #[error("{file} line {line}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("{field} out of range: {value}")]
    InvalidValue { field: String, value: String },

    /// A rating points at a movie movies.dat never declared
    #[error("rating refers to unknown {entity} {id}")]
    MissingReference { entity: String, id: u32 },
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
