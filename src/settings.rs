//! Settings resolution
//!
//! Turns the `settings` entry of a source syntax into a [`LoopPolicy`] and
//! produces a copy of the parts with every `<variable>` reference in their
//! regexes expanded. The decoded [`SourceSyntax`] is left untouched.

use crate::error::{Result, TranslateError};
use crate::syntax::{PartSpec, SETTINGS_KEY, SourceSyntax};
use tracing::debug;

/// Pass limit used when the settings entry does not set `looplimit`
pub const DEFAULT_LOOP_LIMIT: usize = 7;

/// How many rewrite passes a translation may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPolicy {
    /// Keep running passes until nothing matches
    pub enabled: bool,
    /// Upper bound on completed passes when looping
    pub limit: usize,
}

impl Default for LoopPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: DEFAULT_LOOP_LIMIT,
        }
    }
}

impl LoopPolicy {
    /// Apply command-line overrides on top of the policy from the syntax
    pub fn with_overrides(self, enabled: Option<bool>, limit: Option<usize>) -> Self {
        Self {
            enabled: enabled.unwrap_or(self.enabled),
            limit: limit.unwrap_or(self.limit),
        }
    }
}

/// Source parts with all regex variables expanded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSyntax {
    pub parts: Vec<PartSpec>,
}

/// Resolve the settings entry of `source`
///
/// Variables are applied in declaration order over the text the user
/// wrote; see [`interpolate`].
pub fn resolve_settings(source: &SourceSyntax) -> Result<(ResolvedSyntax, LoopPolicy)> {
    let mut policy = LoopPolicy::default();
    let mut parts = source.parts.clone();

    let Some(settings) = &source.settings else {
        return Ok((ResolvedSyntax { parts }, policy));
    };

    if let Some(enabled) = settings.loop_enabled {
        policy.enabled = enabled;
    }

    if let Some(limit) = settings.loop_limit {
        if limit <= 0 {
            return Err(TranslateError::malformed(
                SETTINGS_KEY,
                format!("'looplimit' must be a positive integer, found {}", limit),
            ));
        }
        policy.limit = usize::try_from(limit).map_err(|_| {
            TranslateError::malformed(SETTINGS_KEY, format!("'looplimit' {} is too large", limit))
        })?;
    }

    if !settings.variables.is_empty() {
        for part in &mut parts {
            part.regex = interpolate(&part.regex, &settings.variables);
        }
    }

    debug!(
        loop_enabled = policy.enabled,
        loop_limit = policy.limit,
        variables = settings.variables.len(),
        "resolved source syntax settings"
    );

    Ok((ResolvedSyntax { parts }, policy))
}

/// Expand `<name>` references in a regex string
///
/// Fragments inserted by one variable are not scanned again, neither by
/// that variable nor by the ones declared after it.
pub fn interpolate(regex: &str, variables: &[(String, String)]) -> String {
    // (text, already substituted)
    let mut segments: Vec<(&str, bool)> = vec![(regex, false)];

    for (name, fragment) in variables {
        let placeholder = format!("<{}>", name);
        let mut next = Vec::with_capacity(segments.len());

        for (text, substituted) in segments {
            if substituted || !text.contains(&placeholder) {
                next.push((text, substituted));
                continue;
            }

            let mut pieces = text.split(placeholder.as_str()).peekable();
            while let Some(piece) = pieces.next() {
                if !piece.is_empty() {
                    next.push((piece, false));
                }
                if pieces.peek().is_some() {
                    next.push((fragment.as_str(), true));
                }
            }
        }

        segments = next;
    }

    segments.into_iter().map(|(text, _)| text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(yaml: &str) -> SourceSyntax {
        SourceSyntax::from_yaml_str(yaml, "test").unwrap()
    }

    #[test]
    fn test_defaults_without_settings() {
        let (resolved, policy) =
            resolve_settings(&source("p:\n  regex: 'a<x>'\n  tokens: [t]\n")).unwrap();
        assert_eq!(policy, LoopPolicy::default());
        assert!(!policy.enabled);
        assert_eq!(policy.limit, 7);
        assert_eq!(resolved.parts[0].regex, "a<x>");
    }

    #[test]
    fn test_loop_settings() {
        let (_, policy) = resolve_settings(&source(
            "settings:\n  loop: true\n  looplimit: 2\np:\n  regex: a\n  tokens: [t]\n",
        ))
        .unwrap();
        assert_eq!(
            policy,
            LoopPolicy {
                enabled: true,
                limit: 2
            }
        );
    }

    #[test]
    fn test_variables_are_expanded_in_every_part() {
        let yaml = r#"
settings:
  variables:
    id: '[a-z]+'
p:
  regex: 'let (<id>) = (<id>)'
  tokens: [a, b]
_q:
  regex: 'var (<id>)'
"#;
        let syntax = source(yaml);
        let (resolved, _) = resolve_settings(&syntax).unwrap();
        assert_eq!(resolved.parts[0].regex, "let ([a-z]+) = ([a-z]+)");
        assert_eq!(resolved.parts[1].regex, "var ([a-z]+)");

        // The decoded description is not modified
        assert_eq!(syntax.parts[0].regex, "let (<id>) = (<id>)");
    }

    #[test]
    fn test_inserted_fragments_are_not_rescanned() {
        let variables = vec![
            ("a".to_string(), "<b>x".to_string()),
            ("b".to_string(), "y".to_string()),
        ];
        // '<b>' introduced by 'a' stays literal, the original '<b>' expands
        assert_eq!(interpolate("<a>|<b>", &variables), "<b>x|y");
    }

    #[test]
    fn test_repeated_and_adjacent_references() {
        let variables = vec![
            ("d".to_string(), r"\d".to_string()),
            ("w".to_string(), r"\w".to_string()),
        ];
        assert_eq!(interpolate("<d><d>-<w><d>", &variables), r"\d\d-\w\d");
        assert_eq!(interpolate("no refs", &variables), "no refs");
        assert_eq!(interpolate("<unknown>", &variables), "<unknown>");
    }

    #[test]
    fn test_variable_is_not_expanded_recursively() {
        let variables = vec![("v".to_string(), "(<v>)".to_string())];
        assert_eq!(interpolate("<v>", &variables), "(<v>)");
    }

    #[test]
    fn test_zero_loop_limit_is_rejected() {
        let err = resolve_settings(&source(
            "settings:\n  loop: true\n  looplimit: 0\np:\n  regex: a\n  tokens: [t]\n",
        ))
        .unwrap_err();
        assert!(matches!(err, TranslateError::ConfigMalformed { ref part, .. } if part == "settings"));
    }

    #[test]
    fn test_overrides() {
        let policy = LoopPolicy::default().with_overrides(Some(true), None);
        assert_eq!(
            policy,
            LoopPolicy {
                enabled: true,
                limit: DEFAULT_LOOP_LIMIT
            }
        );
        let policy = policy.with_overrides(None, Some(3));
        assert_eq!(policy.limit, 3);
        assert!(policy.enabled);
    }
}
