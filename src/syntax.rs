//! Syntax descriptions
//!
//! A *source* syntax describes the constructs to look for: each part has a
//! regex, the ordered names of the tokens its capture groups produce, and
//! optional per-token post-processing. A *target* syntax maps every part
//! name to the template the part is rewritten into.
//!
//! ```yaml
//! # source
//! settings:
//!   loop: true
//!   looplimit: 3
//!   variables:
//!     ident: '[A-Za-z_]\w*'
//! greet:
//!   regex: 'say (<ident>)'
//!   tokens: [name]
//!   name:
//!     replace:
//!       - ['^(\w)', '\1']
//! _altgreet:
//!   regex: 'hi (<ident>)'
//!
//! # target
//! greet: 'print("<name>")'
//! ```
//!
//! Both documents are decoded from YAML, keeping the order in which parts
//! are declared: parts are matched and rewritten in that order.

use crate::error::{Result, TranslateError};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// Name of the reserved entry holding loop and variable settings
pub const SETTINGS_KEY: &str = "settings";

/// Leading character that marks a part as an alias of another part
pub const ALIAS_MARKER: char = '_';

/// Decoded source syntax description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSyntax {
    /// Parts in declaration order
    pub parts: Vec<PartSpec>,
    /// The `settings` entry, if present
    pub settings: Option<SettingsSpec>,
}

/// A part as written in the source syntax
#[derive(Debug, Clone, PartialEq)]
pub struct PartSpec {
    pub name: String,
    pub regex: String,
    /// Declared token names; aliases may leave this out
    pub tokens: Option<Vec<String>>,
    /// Remaining keys of the part, undecoded, in declaration order
    ///
    /// A key naming one of the part's tokens holds that token's options;
    /// any other key is ignored. Which tokens an alias has is only known
    /// once its base part is resolved, so options are decoded on lookup.
    pub extra: Vec<(String, Value)>,
}

impl PartSpec {
    pub fn is_alias(&self) -> bool {
        is_alias_name(&self.name)
    }

    /// Options declared for `token` directly under this part
    pub fn options_for(&self, token: &str) -> Result<Option<TokenOptionsSpec>> {
        self.extra
            .iter()
            .find(|(key, _)| key == token)
            .map(|(_, value)| decode_token_options(&self.name, token, value.clone()))
            .transpose()
    }
}

/// Per-token options as written in the source syntax
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenOptionsSpec {
    /// Template applied to every non-blank line, with `<line>` placeholder
    #[serde(default)]
    pub eachline: Option<String>,

    /// Ordered `[pattern, replacement]` rules; replacement may be omitted
    #[serde(default)]
    pub replace: Option<Vec<Vec<String>>>,
}

/// The `settings` entry of a source syntax
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsSpec {
    pub loop_enabled: Option<bool>,
    pub loop_limit: Option<i64>,
    /// Regex variables in declaration order
    pub variables: Vec<(String, String)>,
}

/// Decoded target syntax description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSyntax {
    templates: HashMap<String, String>,
}

impl TargetSyntax {
    /// Template for a part, looked up by the (non-alias) part name
    pub fn template(&self, part: &str) -> Option<&str> {
        self.templates.get(part).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// True if `name` carries the alias marker
pub fn is_alias_name(name: &str) -> bool {
    name.starts_with(ALIAS_MARKER)
}

impl SourceSyntax {
    /// Decode a source syntax from YAML text
    ///
    /// `origin` names the document in error messages (usually its path).
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self> {
        let document = parse_document(yaml, origin)?;

        let mut syntax = SourceSyntax::default();
        for (key, value) in document {
            let name = key_to_string(&key, "<document>")?;
            if name == SETTINGS_KEY {
                syntax.settings = Some(decode_settings(value)?);
            } else {
                syntax.parts.push(decode_part(name, value)?);
            }
        }

        Ok(syntax)
    }
}

impl TargetSyntax {
    /// Decode a target syntax from YAML text
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self> {
        let document = parse_document(yaml, origin)?;

        let mut templates = HashMap::with_capacity(document.len());
        for (key, value) in document {
            let name = key_to_string(&key, "<document>")?;
            match value {
                Value::String(template) => {
                    templates.insert(name, template);
                }
                other => {
                    return Err(TranslateError::malformed(
                        &name,
                        format!("target template must be a string, found {}", kind_of(&other)),
                    ));
                }
            }
        }

        Ok(TargetSyntax { templates })
    }
}

fn parse_document(yaml: &str, origin: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(yaml).map_err(|source| TranslateError::Yaml {
        origin: origin.to_string(),
        source,
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(TranslateError::malformed(
            "<document>",
            format!("expected a mapping of part names, found {}", kind_of(&other)),
        )),
    }
}

fn decode_part(name: String, value: Value) -> Result<PartSpec> {
    let Value::Mapping(entries) = value else {
        return Err(TranslateError::malformed(
            &name,
            format!("expected a mapping, found {}", kind_of(&value)),
        ));
    };

    let mut regex = None;
    let mut tokens = None;
    let mut extra = Vec::new();

    for (key, value) in entries {
        let field = key_to_string(&key, &name)?;
        match field.as_str() {
            "regex" => match value {
                Value::String(pattern) => regex = Some(pattern),
                other => {
                    return Err(TranslateError::malformed(
                        &name,
                        format!("'regex' must be a string, found {}", kind_of(&other)),
                    ));
                }
            },
            "tokens" => {
                let list: Vec<String> = serde_yaml::from_value(value).map_err(|err| {
                    TranslateError::malformed(&name, format!("'tokens' must be a list of strings: {}", err))
                })?;
                tokens = Some(list);
            }
            _ => extra.push((field, value)),
        }
    }

    let Some(regex) = regex else {
        return Err(TranslateError::malformed(&name, "missing required field 'regex'"));
    };

    if tokens.is_none() && !is_alias_name(&name) {
        return Err(TranslateError::malformed(&name, "missing required field 'tokens'"));
    }

    Ok(PartSpec {
        name,
        regex,
        tokens,
        extra,
    })
}

fn decode_token_options(part: &str, token: &str, value: Value) -> Result<TokenOptionsSpec> {
    if value.is_null() {
        return Ok(TokenOptionsSpec::default());
    }

    let options: TokenOptionsSpec = serde_yaml::from_value(value).map_err(|err| {
        TranslateError::malformed(part, format!("invalid options for token '{}': {}", token, err))
    })?;

    if let Some(rules) = &options.replace {
        for rule in rules {
            if rule.is_empty() || rule.len() > 2 {
                return Err(TranslateError::malformed(
                    part,
                    format!(
                        "replace rule for token '{}' must be [pattern] or [pattern, replacement], found {} items",
                        token,
                        rule.len()
                    ),
                ));
            }
        }
    }

    Ok(options)
}

fn decode_settings(value: Value) -> Result<SettingsSpec> {
    let entries = match value {
        Value::Mapping(entries) => entries,
        Value::Null => return Ok(SettingsSpec::default()),
        other => {
            return Err(TranslateError::malformed(
                SETTINGS_KEY,
                format!("expected a mapping, found {}", kind_of(&other)),
            ));
        }
    };

    let mut settings = SettingsSpec::default();
    for (key, value) in entries {
        let field = key_to_string(&key, SETTINGS_KEY)?;
        match field.as_str() {
            "loop" => match value {
                Value::Bool(enabled) => settings.loop_enabled = Some(enabled),
                other => {
                    return Err(TranslateError::malformed(
                        SETTINGS_KEY,
                        format!("'loop' must be a boolean, found {}", kind_of(&other)),
                    ));
                }
            },
            "looplimit" => match value.as_i64() {
                Some(limit) => settings.loop_limit = Some(limit),
                None => {
                    return Err(TranslateError::malformed(
                        SETTINGS_KEY,
                        format!("'looplimit' must be an integer, found {}", kind_of(&value)),
                    ));
                }
            },
            "variables" => settings.variables = decode_variables(value)?,
            _ => {}
        }
    }

    Ok(settings)
}

fn decode_variables(value: Value) -> Result<Vec<(String, String)>> {
    let entries = match value {
        Value::Mapping(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(TranslateError::malformed(
                SETTINGS_KEY,
                format!("'variables' must be a mapping, found {}", kind_of(&other)),
            ));
        }
    };

    let mut variables = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        let name = key_to_string(&key, SETTINGS_KEY)?;
        match value {
            Value::String(fragment) => variables.push((name, fragment)),
            other => {
                return Err(TranslateError::malformed(
                    SETTINGS_KEY,
                    format!("variable '{}' must be a string, found {}", name, kind_of(&other)),
                ));
            }
        }
    }

    Ok(variables)
}

fn key_to_string(key: &Value, owner: &str) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(TranslateError::malformed(
            owner,
            format!("keys must be strings, found {}", kind_of(other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
