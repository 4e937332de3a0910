use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Parse / validation failures (never escape `DataFile::open`)
// ---------------------------------------------------------------------------

/// Why a raw data file could not be turned into a grid.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("no 'Time,Wavelength' / 'Wavelength,Time' or 'Time ...' header found")]
    MissingHeader,

    #[error("line {line}: '{field}' is not a number")]
    NonNumeric { line: usize, field: String },

    #[error("{wavelengths} wavelengths x {times} times: an axis is empty")]
    EmptyAxis { wavelengths: usize, times: usize },
}

// ---------------------------------------------------------------------------
// Cell edit rejections (collapsed to `false` at the public API)
// ---------------------------------------------------------------------------

/// Why a cell edit was refused. Model state is unchanged when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("row {row}, column {col} is out of range")]
    OutOfRange { row: usize, col: usize },

    #[error("row {row}, column {col} does not accept this kind of edit")]
    NotEditable { row: usize, col: usize },

    #[error("'{0}' is neither a number nor a :s/find/replace/ command")]
    NotANumber(String),

    #[error("malformed substitution command '{0}'")]
    BadSubstitution(String),

    #[error("substitution changed nothing")]
    NoMatch,

    #[error("'{0}' is not a valid series name")]
    InvalidName(String),

    #[error("'{0}' is not a recognised colour")]
    InvalidColor(String),

    #[error("'{0}' is not a recognised line style")]
    UnknownStyle(String),

    #[error("line style cannot be changed while a series is drawn as scatter")]
    StyleOnScatter,
}
