//! Rewrite driver
//!
//! A [`Translator`] owns the compiled parts of a source syntax together with
//! their target templates and rewrites text in passes. Each pass collects
//! the matches of every part against the buffer as it was at the start of
//! the pass, then rewrites them part by part, occurrence by occurrence.
//!
//! Rewriting an occurrence replaces *every* copy of its matched text in the
//! buffer, not only the copy the matcher found. Identical source text always
//! renders identically, so this only differs from positional splicing when
//! an earlier rewrite in the same pass produced or destroyed such a copy.

use crate::error::{Result, TranslateError};
use crate::extract::{CompiledPart, extract};
use crate::matcher::{Occurrence, is_exhausted, match_all};
use crate::settings::{LoopPolicy, resolve_settings};
use crate::syntax::{SourceSyntax, TargetSyntax};
use std::fmt;
use tracing::{debug, info};

/// Why a translation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A pass found nothing left to rewrite
    Converged,
    /// The loop limit was reached while matches remained
    Bounded,
    /// Looping is off; exactly one pass ran
    Disabled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Termination::Converged => "converged",
            Termination::Bounded => "loop limit reached",
            Termination::Disabled => "single pass",
        };
        f.write_str(label)
    }
}

/// Outcome of a translation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub output: String,
    /// Completed rewrite passes
    pub passes: usize,
    /// Occurrences rewritten over all passes
    pub rewrites: usize,
    pub termination: Termination,
}

/// Compiled source syntax paired with its target templates
#[derive(Debug, Clone)]
pub struct Translator {
    parts: Vec<CompiledPart>,
    /// Template per part, indexed like `parts`
    templates: Vec<String>,
    policy: LoopPolicy,
}

impl Translator {
    /// Resolve settings, compile every part and bind target templates
    ///
    /// Fails before any text is touched if a part is malformed, a pattern
    /// does not compile, or a part has no template in `target`.
    pub fn new(source: &SourceSyntax, target: &TargetSyntax) -> Result<Self> {
        let (resolved, policy) = resolve_settings(source)?;
        let parts = extract(&resolved)?;

        let templates = parts
            .iter()
            .map(|part| {
                target
                    .template(&part.template_name)
                    .map(str::to_string)
                    .ok_or_else(|| TranslateError::MissingTemplate {
                        part: part.template_name.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(parts = parts.len(), "compiled source syntax");

        Ok(Self {
            parts,
            templates,
            policy,
        })
    }

    /// Replace the loop policy taken from the source syntax settings
    pub fn with_policy(mut self, policy: LoopPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> LoopPolicy {
        self.policy
    }

    /// Rewrite `input` until the loop policy stops
    pub fn translate(&self, input: &str) -> Translation {
        let mut buffer = input.to_string();
        let mut passes = 0;
        let mut rewrites = 0;

        let termination = loop {
            let matches = match_all(&self.parts, &buffer);
            if is_exhausted(&matches) {
                break Termination::Converged;
            }

            let rewritten = self.run_pass(&mut buffer, &matches);
            passes += 1;
            rewrites += rewritten;
            debug!(pass = passes, rewrites = rewritten, "completed rewrite pass");

            if !self.policy.enabled {
                break Termination::Disabled;
            }
            if passes >= self.policy.limit {
                break Termination::Bounded;
            }
        };

        info!(passes, rewrites, termination = %termination, "translation finished");

        Translation {
            output: buffer,
            passes,
            rewrites,
            termination,
        }
    }

    /// Apply one pass of precomputed matches to the buffer
    fn run_pass(&self, buffer: &mut String, matches: &[Vec<Occurrence>]) -> usize {
        let mut rewritten = 0;

        for (index, occurrences) in matches.iter().enumerate() {
            if occurrences.is_empty() {
                continue;
            }
            debug!(
                part = %self.parts[index].name,
                occurrences = occurrences.len(),
                "rewriting part"
            );

            for occurrence in occurrences {
                let rendered = self.render(index, occurrence);
                if buffer.contains(occurrence.matched.as_str()) {
                    *buffer = buffer.replace(occurrence.matched.as_str(), &rendered);
                    rewritten += 1;
                }
            }
        }

        rewritten
    }

    /// Fill the part's template with the post-processed token values
    ///
    /// Placeholders are filled in token order, so a value that itself
    /// contains `<other>` is filled in turn when `other` comes later.
    /// A token name listed more than once takes its last captured value.
    fn render(&self, index: usize, occurrence: &Occurrence) -> String {
        let part = &self.parts[index];
        let mut rendered = self.templates[index].clone();

        for (position, token) in part.tokens.iter().enumerate() {
            let Some(raw) = last_value_for(part, occurrence, position) else {
                continue;
            };
            let value = token.options.apply(raw);
            rendered = rendered.replace(token.placeholder.as_str(), &value);
        }

        rendered
    }
}

/// Raw value to render for the token at `position`
///
/// Only the first token of a repeated name renders, with the value of the
/// last same-named token that captured something.
fn last_value_for<'a>(
    part: &CompiledPart,
    occurrence: &'a Occurrence,
    position: usize,
) -> Option<&'a str> {
    let name = &part.tokens[position].name;
    if part.tokens[..position].iter().any(|token| &token.name == name) {
        return None;
    }

    (position..part.tokens.len())
        .rev()
        .filter(|&i| part.tokens[i].name == *name)
        .find_map(|i| occurrence.value(i))
}

/// Translate `content` from the source syntax into the target syntax
pub fn translate(content: &str, source: &SourceSyntax, target: &TargetSyntax) -> Result<String> {
    let translator = Translator::new(source, target)?;
    Ok(translator.translate(content).output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREET_SOURCE: &str = r#"
greet:
  regex: 'say (\w+)'
  tokens: [name]
_altgreet:
  regex: 'hi (\w+)'
"#;
    const GREET_TARGET: &str = "greet: 'print(\"<name>\")'\n";

    fn translator(source: &str, target: &str) -> Translator {
        let source = SourceSyntax::from_yaml_str(source, "source").unwrap();
        let target = TargetSyntax::from_yaml_str(target, "target").unwrap();
        Translator::new(&source, &target).unwrap()
    }

    #[test]
    fn test_simple_rewrite() {
        let t = translator(GREET_SOURCE, GREET_TARGET);
        let result = t.translate("say bob");
        assert_eq!(result.output, "print(\"bob\")");
        assert_eq!(result.passes, 1);
        assert_eq!(result.rewrites, 1);
        assert_eq!(result.termination, Termination::Disabled);
    }

    #[test]
    fn test_alias_renders_base_template() {
        let t = translator(GREET_SOURCE, GREET_TARGET);
        assert_eq!(t.translate("hi sue").output, "print(\"sue\")");
    }

    #[test]
    fn test_no_match_converges_without_passes() {
        let t = translator(GREET_SOURCE, GREET_TARGET);
        let result = t.translate("nothing to see");
        assert_eq!(result.output, "nothing to see");
        assert_eq!(result.passes, 0);
        assert_eq!(result.termination, Termination::Converged);
    }

    #[test]
    fn test_loop_converges() {
        let source = r#"
settings:
  loop: true
paren:
  regex: '\[(\w+)\]'
  tokens: [inner]
"#;
        let t = translator(source, "paren: '<inner>'\n");
        let result = t.translate("[[[x]]]");
        assert_eq!(result.output, "x");
        assert_eq!(result.passes, 3);
        assert_eq!(result.termination, Termination::Converged);
    }

    #[test]
    fn test_loop_is_bounded() {
        let source = "settings:\n  loop: true\n  looplimit: 4\ngrow:\n  regex: '(a+)'\n  tokens: [a]\n";
        let t = translator(source, "grow: '<a>a'\n");
        let result = t.translate("a");
        assert_eq!(result.passes, 4);
        assert_eq!(result.output, "aaaaa");
        assert_eq!(result.termination, Termination::Bounded);
    }

    #[test]
    fn test_disabled_loop_runs_one_pass() {
        let source = "paren:\n  regex: '\\[(\\w+)\\]'\n  tokens: [inner]\n";
        let t = translator(source, "paren: '<inner>'\n");
        let result = t.translate("[[x]]");
        assert_eq!(result.output, "[x]");
        assert_eq!(result.termination, Termination::Disabled);
    }

    #[test]
    fn test_policy_override() {
        let source = "paren:\n  regex: '\\[(\\w+)\\]'\n  tokens: [inner]\n";
        let t = translator(source, "paren: '<inner>'\n").with_policy(LoopPolicy {
            enabled: true,
            limit: 10,
        });
        assert_eq!(t.translate("[[x]]").output, "x");
    }

    #[test]
    fn test_placeholder_order_is_independent_of_token_order() {
        let source = "pair:\n  regex: '(\\w+),(\\w+)'\n  tokens: [a, b]\n";
        let t = translator(source, "pair: '<b>-<a>-<b>'\n");
        assert_eq!(t.translate("1,2").output, "2-1-2");
    }

    #[test]
    fn test_zero_width_part_never_rewrites() {
        let source = "settings:\n  loop: true\nmark:\n  regex: '^'\n  tokens: [t]\n";
        let t = translator(source, "mark: '> '\n");
        let result = t.translate("a\nb");
        assert_eq!(result.output, "a\nb");
        assert_eq!(result.passes, 0);
        assert_eq!(result.termination, Termination::Converged);
    }

    #[test]
    fn test_repeated_token_name_takes_last_value() {
        let source = "pair:\n  regex: '(\\w+),(\\w+)'\n  tokens: [v, v]\n";
        let t = translator(source, "pair: '[<v>]'\n");
        assert_eq!(t.translate("1,2").output, "[2]");

        // A repeat beyond the capture groups has no value and does not win
        let source = "pair:\n  regex: '(\\w+),(\\w+)'\n  tokens: [v, w, v]\n";
        let t = translator(source, "pair: '<v>/<w>'\n");
        assert_eq!(t.translate("1,2").output, "1/2");
    }

    #[test]
    fn test_tokens_missing_from_template_are_ignored() {
        let source = "pair:\n  regex: '(\\w+),(\\w+)'\n  tokens: [a, b]\n";
        let t = translator(source, "pair: 'only <a>'\n");
        assert_eq!(t.translate("1,2").output, "only 1");
    }

    #[test]
    fn test_identical_text_is_rewritten_everywhere() {
        let source = "kw:\n  regex: '^fn (\\w+)'\n  tokens: [name]\n";
        let t = translator(source, "kw: 'def <name>'\n");
        // The second 'fn x' is not at a line start but shares the matched text
        assert_eq!(t.translate("fn x\ncall(fn x)").output, "def x\ncall(def x)");
    }

    #[test]
    fn test_token_options_are_applied() {
        let source = r#"
block:
  regex: 'begin\n((?s:.*?))\nend'
  tokens: [body]
  body:
    eachline: '    <line>;'
    replace:
      - ['print', 'echo']
"#;
        let t = translator(source, "block: \"{\\n<body>\\n}\"\n");
        let result = t.translate("begin\nprint a\n\nprint b\nend");
        assert_eq!(result.output, "{\n    echo a;\n    echo b;\n}");
    }

    #[test]
    fn test_parts_rewrite_in_declaration_order() {
        let source = "first:\n  regex: 'a(b)'\n  tokens: [t]\nsecond:\n  regex: '(b)c'\n  tokens: [t]\n";
        let t = translator(source, "first: 'X<t>'\nsecond: 'Y<t>'\n");
        // Both match 'abc' up front; 'first' rewrites it, the stale 'bc' match
        // of 'second' still finds its text in the buffer
        assert_eq!(t.translate("abc").output, "XYb");
    }

    #[test]
    fn test_missing_template_fails_up_front() {
        let source = SourceSyntax::from_yaml_str(GREET_SOURCE, "source").unwrap();
        let target = TargetSyntax::from_yaml_str("other: 'x'\n", "target").unwrap();
        let err = Translator::new(&source, &target).unwrap_err();
        assert!(matches!(err, TranslateError::MissingTemplate { ref part } if part == "greet"));
    }

    #[test]
    fn test_translate_helper() {
        let source = SourceSyntax::from_yaml_str(GREET_SOURCE, "source").unwrap();
        let target = TargetSyntax::from_yaml_str(GREET_TARGET, "target").unwrap();
        assert_eq!(
            translate("say bob\nhi sue", &source, &target).unwrap(),
            "print(\"bob\")\nprint(\"sue\")"
        );
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::Converged.to_string(), "converged");
        assert_eq!(Termination::Bounded.to_string(), "loop limit reached");
        assert_eq!(Termination::Disabled.to_string(), "single pass");
    }
}
