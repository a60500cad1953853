//! Token post-processing
//!
//! A captured token value can be reshaped before it is placed into the
//! target template: first line by line through an *eachline* template, then
//! through an ordered list of regex replace rules.

use regex::Regex;

/// Placeholder for the current line inside an eachline template
pub const LINE_PLACEHOLDER: &str = "<line>";

/// One compiled replace rule
#[derive(Debug, Clone)]
pub struct ReplaceRule {
    pub pattern: Regex,
    /// Replacement in `regex` crate syntax (`${1}`, `$$`)
    pub replacement: String,
}

impl ReplaceRule {
    pub fn apply(&self, value: &str) -> String {
        self.pattern
            .replace_all(value, self.replacement.as_str())
            .into_owned()
    }
}

/// Post-processing options of a single token
#[derive(Debug, Clone, Default)]
pub struct TokenOptions {
    pub eachline: Option<String>,
    pub replace: Vec<ReplaceRule>,
}

impl TokenOptions {
    pub fn is_empty(&self) -> bool {
        self.eachline.is_none() && self.replace.is_empty()
    }

    /// Transform a raw captured value
    pub fn apply(&self, raw: &str) -> String {
        let mut value = match &self.eachline {
            Some(template) => apply_eachline(template, raw),
            None => raw.to_string(),
        };

        for rule in &self.replace {
            value = rule.apply(&value);
        }

        value
    }
}

/// Render `template` once per non-blank line of `value`
///
/// Blank and whitespace-only lines are dropped. Each kept line is inserted
/// with its original indentation, and the rendered lines are joined with
/// `\n`.
pub fn apply_eachline(template: &str, value: &str) -> String {
    value
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| template.replace(LINE_PLACEHOLDER, line))
        .collect::<Vec<_>>()
        .join("\n")
}
