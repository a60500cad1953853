//! Definition extraction
//!
//! Compiles resolved part specs into [`CompiledPart`]s: the part regex,
//! the token table (names plus post-processing options), and the name of
//! the target template the part renders with.

use crate::error::{Result, TranslateError};
use crate::postprocess::{ReplaceRule, TokenOptions};
use crate::regex_error::compile_multiline;
use crate::replacement::convert_group_references;
use crate::settings::ResolvedSyntax;
use crate::syntax::{ALIAS_MARKER, PartSpec, TokenOptionsSpec, is_alias_name};
use regex::Regex;
use tracing::debug;

/// A named token of a part, in capture-group order
#[derive(Debug, Clone)]
pub struct Token {
    pub name: String,
    /// `<name>`, as it appears in target templates
    pub placeholder: String,
    pub options: TokenOptions,
}

/// A part ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPart {
    pub name: String,
    /// Target template key; the base part's name for aliases
    pub template_name: String,
    pub regex: Regex,
    pub tokens: Vec<Token>,
}

impl CompiledPart {
    /// Number of explicit capture groups in the part regex
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

/// Compile every part of a resolved syntax, in declaration order
pub fn extract(resolved: &ResolvedSyntax) -> Result<Vec<CompiledPart>> {
    resolved
        .parts
        .iter()
        .map(|part| compile_part(part, &resolved.parts))
        .collect()
}

fn compile_part(part: &PartSpec, all_parts: &[PartSpec]) -> Result<CompiledPart> {
    let (template_name, token_names) = if part.is_alias() {
        let base = resolve_alias(&part.name, all_parts)?;
        debug!(alias = %part.name, base = %base.name, "resolved alias part");
        (base.name.clone(), base.tokens.clone().unwrap_or_default())
    } else {
        let tokens = part.tokens.clone().ok_or_else(|| {
            TranslateError::malformed(&part.name, "missing required field 'tokens'")
        })?;
        (part.name.clone(), tokens)
    };

    let regex = compile_pattern(&part.name, &part.regex)?;

    let tokens = token_names
        .into_iter()
        .map(|name| {
            let options = match part.options_for(&name)? {
                Some(spec) => compile_options(&part.name, &name, &spec)?,
                None => TokenOptions::default(),
            };
            Ok(Token {
                placeholder: format!("<{}>", name),
                name,
                options,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if tokens.len() > 1 && tokens.len() != regex.captures_len() - 1 {
        debug!(
            part = %part.name,
            tokens = tokens.len(),
            groups = regex.captures_len() - 1,
            "token count does not match capture group count"
        );
    }

    Ok(CompiledPart {
        name: part.name.clone(),
        template_name,
        regex,
        tokens,
    })
}

/// Find the base part an alias refers to
///
/// The alias name minus its leading marker must end with the base part's
/// name (`_greet`, `_2greet` and `_altgreet` all refer to `greet`). When
/// several non-alias parts qualify, the longest name wins.
pub fn resolve_alias<'a>(alias: &str, parts: &'a [PartSpec]) -> Result<&'a PartSpec> {
    let stem = alias.strip_prefix(ALIAS_MARKER).unwrap_or(alias);

    parts
        .iter()
        .filter(|part| !is_alias_name(&part.name) && !part.name.is_empty())
        .filter(|part| stem.ends_with(part.name.as_str()))
        .max_by_key(|part| part.name.len())
        .ok_or_else(|| TranslateError::UnknownAliasBase {
            alias: alias.to_string(),
        })
}

fn compile_options(part: &str, token: &str, spec: &TokenOptionsSpec) -> Result<TokenOptions> {
    let replace = spec
        .replace
        .iter()
        .flatten()
        .map(|rule| {
            let pattern = rule.first().map(String::as_str).unwrap_or_default();
            let replacement = rule.get(1).map(String::as_str).unwrap_or_default();
            Ok(ReplaceRule {
                pattern: compile_pattern(part, pattern)?,
                replacement: convert_group_references(replacement),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        part,
        token,
        eachline = spec.eachline.is_some(),
        rules = replace.len(),
        "compiled token options"
    );

    Ok(TokenOptions {
        eachline: spec.eachline.clone(),
        replace,
    })
}

fn compile_pattern(part: &str, pattern: &str) -> Result<Regex> {
    compile_multiline(pattern).map_err(|err| TranslateError::PatternCompile {
        part: part.to_string(),
        pattern: pattern.to_string(),
        details: err.display(),
    })
}
