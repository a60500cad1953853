/// Configuration management for LangTrans
///
/// LangTrans stores configuration in ~/.langtrans/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// LangTrans configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Syntax file lookup settings
    #[serde(default)]
    pub syntax: SyntaxConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a debug log to ~/.langtrans/langtrans.log
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print the translated text after writing it
    #[serde(default = "default_echo")]
    pub echo: bool,

    /// Print a diff of input and output
    #[serde(default)]
    pub diff: bool,

    /// Context lines around each change in the diff
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            echo: true,
            diff: false,
            context_lines: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxConfig {
    /// Extension appended to syntax base names
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directories searched for syntax files not found relative to the cwd
    #[serde(default)]
    pub search_dirs: Vec<String>,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            extension: "yaml".to_string(),
            search_dirs: Vec::new(),
        }
    }
}

// Default functions for serde
fn default_echo() -> bool { true }
fn default_context_lines() -> usize { 2 }
fn default_extension() -> String { "yaml".to_string() }

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;

    let config_dir = home_dir.join(".langtrans");
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    Ok(config_dir.join("config.toml"))
}

/// Get the default configuration file content with comments
fn get_default_config_content() -> &'static str {
    r#"# LangTrans Configuration File
#
# Command-line flags take precedence over values set here.
# Run 'langtrans config --show' to print the effective configuration.

[logging]
# Write a debug log to ~/.langtrans/langtrans.log (default: false)
# The -v/--verbose flag turns this on for a single run.
debug = false

[output]
# Print the translated text after writing the output file (default: true)
echo = true

# Print a line diff between input and output (default: false)
diff = false

# Number of unchanged lines shown around each change in the diff (default: 2, max: 10)
context_lines = 2

[syntax]
# Extension appended to the syntax names given on the command line (default: "yaml")
extension = "yaml"

# Directories searched, in order, for syntax files that are not found
# relative to the current directory.
#search_dirs = ["/usr/share/langtrans/syntaxes"]
"#
}

fn write_default_config(config_path: &Path) -> Result<()> {
    fs::write(config_path, get_default_config_content())
        .with_context(|| format!("Failed to write default config file: {}", config_path.display()))
}

/// Load configuration from file, creating default if needed
///
/// If the config file doesn't exist, creates it with defaults and returns them.
/// If the config file is malformed, recreates it with defaults.
pub fn load_config() -> Result<Config> {
    let config_path = config_file_path()?;
    load_config_from(&config_path)
}

/// Load configuration from a specific file, with the same recovery rules
pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        write_default_config(config_path)?;
    }

    let config_str = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: Config = match toml::from_str(&config_str) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %config_path.display(), error = %err, "malformed config, restoring defaults");
            write_default_config(config_path)?;
            return Ok(Config::default());
        }
    };

    Ok(config)
}

/// Render the configuration as TOML
pub fn config_to_toml(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    let extension = &config.syntax.extension;
    if extension.is_empty() {
        anyhow::bail!("Invalid syntax.extension: must not be empty");
    }
    if extension.starts_with('.') {
        anyhow::bail!("Invalid syntax.extension: {} (leave out the leading '.')", extension);
    }

    if config.syntax.search_dirs.iter().any(|dir| dir.trim().is_empty()) {
        anyhow::bail!("Invalid syntax.search_dirs: entries must not be empty");
    }

    if config.output.context_lines > 10 {
        anyhow::bail!("Invalid output.context_lines: {} (max 10)", config.output.context_lines);
    }

    Ok(())
}
