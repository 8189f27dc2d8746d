//! Constants baked into the files this writer emits.

/// Exodus file format version recorded in the global attributes.
pub const FILE_VERSION: f32 = 7.16;

/// Exodus API version recorded in the global attributes.
pub const API_VERSION: f32 = 7.16;

/// Size of the `len_string` dimension.
pub const LEN_STRING: usize = 32;

/// Size of the `len_name` dimension; name rows are null-padded to this.
pub const LEN_NAME: usize = 256;

/// Longest name accepted by the writer (the `maximum_name_length` attribute).
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum length for the title string.
pub const MAX_TITLE_LENGTH: usize = 80;
