//! LangTrans: declarative rewriting of one surface syntax into another
//!
//! A source syntax (YAML) describes constructs as regexes with named tokens;
//! a target syntax gives a template per construct. [`Translator`] rewrites
//! text pass by pass until nothing matches or the loop limit is reached.
//! The binary is at src/main.rs.

pub mod cli;
pub mod config;
pub mod diff_formatter;
pub mod engine;
pub mod error;
pub mod extract;
pub mod files;
pub mod loader;
pub mod logger;
pub mod matcher;
pub mod postprocess;
pub mod regex_error;
pub mod replacement;
pub mod settings;
pub mod syntax;

// Re-export commonly used types for convenience
pub use engine::{Termination, Translation, Translator, translate};
pub use error::{Result, TranslateError};
pub use loader::SyntaxLocator;
pub use settings::LoopPolicy;
pub use syntax::{SourceSyntax, TargetSyntax};
