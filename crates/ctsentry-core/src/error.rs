use thiserror::Error;

/// Result type alias for ctsentry-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while loading or validating configuration and
/// shared reference data (brand lists, suspicious-TLD sets, ...).
#[derive(Error, Debug)]
pub enum CoreError {
    /// The brand list file could not be read. This is fatal at startup:
    /// without brands there is nothing to detect typosquats against.
    #[error("failed to read brand list at {path}: {source}")]
    BrandList {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The brand list file was read but contained no non-blank lines.
    #[error("brand list at {path} is empty")]
    EmptyBrandList { path: String },

    /// Configuration file exists but failed to parse as TOML.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration file could not be read.
    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic validation failure surfaced from `validate-config`.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
