//! Error types for the Exodus writer.

use thiserror::Error;

/// Entity ID type (always 64-bit in Rust, converted to/from file format)
pub type EntityId = i64;

/// Result type alias for Exodus operations
pub type Result<T> = std::result::Result<T, ExodusError>;

/// Errors that can occur when writing Exodus files
#[derive(Error, Debug)]
pub enum ExodusError {
    /// NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::error::Error),

    /// Invalid dimension
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension value
        expected: String,
        /// Actual dimension value
        actual: usize,
    },

    /// Invalid array length
    #[error("Invalid array length: expected {expected}, got {actual}")]
    InvalidArrayLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Entity ID already in use
    #[error("{entity_type} ID {id} already in use")]
    DuplicateEntityId {
        /// The kind of entity being defined
        entity_type: String,
        /// The ID that was already taken
        id: EntityId,
    },

    /// Entity not found
    #[error("{entity_type} with ID {id} not found")]
    EntityNotFound {
        /// The kind of entity that was looked up
        entity_type: String,
        /// The ID that was searched for
        id: EntityId,
    },

    /// All declared slots of an entity kind are occupied
    #[error("no free {entity_type} slot: all {declared} declared slots are in use")]
    SlotsExhausted {
        /// The kind of entity being defined
        entity_type: String,
        /// How many slots were declared at creation
        declared: usize,
    },

    /// NetCDF variable not defined
    #[error("Variable not defined: {0}")]
    VariableNotDefined(String),

    /// Variable index outside the registered count
    #[error("variable index {index} out of range (1..={count})")]
    VariableIndexOutOfRange {
        /// The 1-based index that was passed
        index: usize,
        /// The registered variable count
        count: usize,
    },

    /// String too long for Exodus format
    #[error("String too long: max {max}, got {actual}")]
    StringTooLong {
        /// Maximum allowed length
        max: usize,
        /// Actual string length
        actual: usize,
    },

    /// Invalid time step
    #[error("Invalid time step: {0}")]
    InvalidTimeStep(usize),

    /// Operation outside the supported subset
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
