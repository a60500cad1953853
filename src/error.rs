//! Error types surfaced by syntax loading and translation

use std::path::PathBuf;

/// Result type for loading and translation operations
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors that abort a translation run before or during compilation
///
/// Nothing in the rewrite loop itself fails: every variant here is raised
/// while the syntax descriptions are decoded, resolved or compiled.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// A part definition is missing a required field or has the wrong shape
    #[error("Malformed definition for part '{part}': {reason}")]
    ConfigMalformed { part: String, reason: String },

    /// An alias part whose name does not end in any known base part name
    #[error("Alias part '{alias}' does not refer to an existing part")]
    UnknownAliasBase { alias: String },

    /// The target syntax has no template for a part of the source syntax
    #[error("Target syntax has no template for part '{part}'")]
    MissingTemplate { part: String },

    /// A part regex or replace-rule pattern failed to compile
    #[error("Invalid pattern in part '{part}':\n{details}")]
    PatternCompile {
        part: String,
        pattern: String,
        details: String,
    },

    /// The syntax description is not valid YAML
    #[error("Failed to parse syntax description {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The syntax description could not be read
    #[error("Failed to read syntax description {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranslateError {
    pub(crate) fn malformed(part: &str, reason: impl Into<String>) -> Self {
        TranslateError::ConfigMalformed {
            part: part.to_string(),
            reason: reason.into(),
        }
    }
}
