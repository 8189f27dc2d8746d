//! CLI argument parsing and error types for earth2exo.

use crate::model::ConvertOptions;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Exodus writer error
    #[error("Exodus error: {0}")]
    Exodus(#[from] exolite::ExodusError),

    /// A required keyword was not found in the input deck
    #[error("no {keyword} data found in {path}")]
    MissingKeyword {
        /// The missing keyword
        keyword: &'static str,
        /// The file that was searched
        path: String,
    },

    /// A data block has the wrong number of entries
    #[error("the number of {keyword} entries read is not correct: expected {expected}, got {actual}")]
    WrongCount {
        /// The keyword or column whose data was mis-sized
        keyword: String,
        /// Expected entry count
        expected: usize,
        /// Actual entry count
        actual: usize,
    },

    /// A token could not be parsed as a number
    #[error("cannot parse '{token}' in {keyword} data")]
    BadToken {
        /// The keyword being read
        keyword: String,
        /// The offending token
        token: String,
    },

    /// Input ended inside a data block
    #[error("unexpected end of input while reading {keyword}")]
    UnexpectedEof {
        /// The keyword being read
        keyword: String,
    },

    /// `--use-mapaxes` was given but the deck carries no MAPAXES keyword
    #[error("--use-mapaxes given but the deck has no MAPAXES keyword")]
    MissingMapAxes,

    /// The Leapfrog header does not state the block size
    #[error("could not locate the block size in {0}")]
    MissingBlockSize(String),

    /// A required CSV column is absent
    #[error("column '{column}' not found in {path}")]
    MissingColumn {
        /// The column that was looked up
        column: String,
        /// The file that was searched
        path: String,
    },

    /// A CSV file ends before its data rows
    #[error("not enough header lines in {0}")]
    TruncatedTable(String),

    /// The input extension maps to no known format
    #[error("file extension '{0}' is not supported (use --filetype)")]
    UnsupportedExtension(String),

    /// The output file already exists
    #[error("output file {0} exists (use --force to overwrite)")]
    OutputExists(String),

    /// The official Exodus API was requested but is not in this build
    #[error("the official Exodus API is not available in this build")]
    OfficialApiUnavailable,

    /// Array shape error
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Input formats understood by the converter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum FileType {
    /// ECLIPSE grdecl corner-point grid
    Eclipse,
    /// Leapfrog Geothermal CSV export
    Leapfrog,
}

/// Converts earth models to Exodus II format.
///
/// The input format is chosen by file extension (`.grdecl` for ECLIPSE, no
/// extension for Leapfrog) unless `--filetype` overrides it. The output is
/// written next to the input as `<basename>.e`.
#[derive(Parser, Debug)]
#[command(name = "earth2exo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input earth model file
    pub filename: PathBuf,

    /// Explicitly state the filetype for unknown extensions
    #[arg(long, value_enum)]
    pub filetype: Option<FileType>,

    /// Disable addition of nodesets
    #[arg(long = "no-nodesets")]
    pub no_nodesets: bool,

    /// Disable addition of sidesets
    #[arg(long = "no-sidesets")]
    pub no_sidesets: bool,

    /// Overwrite the output file if it exists
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Negate all Z coordinates
    #[arg(long = "flip-z")]
    pub flip_z: bool,

    /// Transform X/Y coordinates into the MAPAXES frame
    #[arg(long = "use-mapaxes")]
    pub use_mapaxes: bool,

    /// Use the official Exodus API to write files
    #[arg(short = 'u', long = "use-official-api")]
    pub use_official_api: bool,
}

impl From<&Cli> for ConvertOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            flip_z: cli.flip_z,
            use_mapaxes: cli.use_mapaxes,
            omit_nodesets: cli.no_nodesets,
            omit_sidesets: cli.no_sidesets,
            tolerance: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["earth2exo", "model.grdecl"]);
        assert_eq!(cli.filename, PathBuf::from("model.grdecl"));
        assert!(cli.filetype.is_none());
        assert!(!cli.force);
        assert!(!cli.flip_z);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "earth2exo",
            "model.dat",
            "--filetype",
            "eclipse",
            "--no-nodesets",
            "-f",
            "--flip-z",
        ]);
        assert_eq!(cli.filetype, Some(FileType::Eclipse));
        assert!(cli.no_nodesets);
        assert!(!cli.no_sidesets);
        assert!(cli.force);

        let options = ConvertOptions::from(&cli);
        assert!(options.flip_z);
        assert!(options.omit_nodesets);
        assert!(!options.omit_sidesets);
    }
}
