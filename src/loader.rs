//! Syntax file lookup
//!
//! Syntax descriptions are named on the command line by base name
//! (`python`, `../syntaxes/pseudo`); the file extension is appended here
//! and, for relative names that do not exist, the configured search
//! directories are tried in order.

use crate::config::SyntaxConfig;
use crate::error::{Result, TranslateError};
use crate::syntax::{SourceSyntax, TargetSyntax};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves syntax base names to files and decodes them
#[derive(Debug, Clone)]
pub struct SyntaxLocator {
    extension: String,
    search_dirs: Vec<PathBuf>,
}

impl Default for SyntaxLocator {
    fn default() -> Self {
        Self::new("yaml", Vec::new())
    }
}

impl SyntaxLocator {
    pub fn new(extension: impl Into<String>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            extension: extension.into(),
            search_dirs,
        }
    }

    pub fn from_config(config: &SyntaxConfig) -> Self {
        Self::new(
            config.extension.clone(),
            config.search_dirs.iter().map(PathBuf::from).collect(),
        )
    }

    /// Path for a syntax base name
    ///
    /// A name that already ends in the extension is used as given. If the
    /// resulting relative path does not exist, each search directory is
    /// tried; when none has the file, the unsearched path is returned so
    /// that the read error names what the user typed.
    pub fn resolve(&self, base: &str) -> PathBuf {
        let suffix = format!(".{}", self.extension);
        let file_name = if base.ends_with(&suffix) {
            base.to_string()
        } else {
            format!("{}{}", base, suffix)
        };

        let direct = PathBuf::from(&file_name);
        if direct.exists() || direct.is_absolute() {
            return direct;
        }

        for dir in &self.search_dirs {
            let candidate = dir.join(&file_name);
            if candidate.exists() {
                debug!(path = %candidate.display(), "found syntax in search directory");
                return candidate;
            }
        }

        direct
    }

    pub fn load_source(&self, base: &str) -> Result<SourceSyntax> {
        load_source_syntax(&self.resolve(base))
    }

    pub fn load_target(&self, base: &str) -> Result<TargetSyntax> {
        load_target_syntax(&self.resolve(base))
    }
}

/// Read and decode a source syntax file
pub fn load_source_syntax(path: &Path) -> Result<SourceSyntax> {
    let text = read_syntax(path)?;
    let syntax = SourceSyntax::from_yaml_str(&text, &path.display().to_string())?;
    debug!(path = %path.display(), parts = syntax.parts.len(), "loaded source syntax");
    Ok(syntax)
}

/// Read and decode a target syntax file
pub fn load_target_syntax(path: &Path) -> Result<TargetSyntax> {
    let text = read_syntax(path)?;
    let syntax = TargetSyntax::from_yaml_str(&text, &path.display().to_string())?;
    debug!(path = %path.display(), templates = syntax.len(), "loaded target syntax");
    Ok(syntax)
}

fn read_syntax(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| TranslateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
