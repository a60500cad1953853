//! Property-based tests for LangTrans
//!
//! These use proptest to check the invariants of the rewrite engine over
//! generated inputs: convergence, pass bounds, token pairing and the two
//! token post-processing steps.

use langtrans::postprocess::{ReplaceRule, TokenOptions, apply_eachline};
use langtrans::{LoopPolicy, SourceSyntax, TargetSyntax, Termination, Translator};
use regex::Regex;

// Import proptest macro
use proptest::prelude::*;

fn translator(source: &str, target: &str) -> Translator {
    let source = SourceSyntax::from_yaml_str(source, "source").unwrap();
    let target = TargetSyntax::from_yaml_str(target, "target").unwrap();
    Translator::new(&source, &target).unwrap()
}

const UNWRAP_LOOPING: &str = r#"
settings:
  loop: true
unwrap:
  regex: '\[(\w+)\]'
  tokens: [inner]
"#;

const UNWRAP_SINGLE: &str = r#"
unwrap:
  regex: '\[(\w+)\]'
  tokens: [inner]
"#;

const UNWRAP_TARGET: &str = "unwrap: '<inner>'\n";

fn nested(word: &str, depth: usize) -> String {
    format!("{}{}{}", "[".repeat(depth), word, "]".repeat(depth))
}

fn rule(pattern: &str, replacement: &str) -> ReplaceRule {
    ReplaceRule {
        pattern: Regex::new(pattern).unwrap(),
        replacement: replacement.to_string(),
    }
}

// ============================================================================
// Property 1: Idempotence under convergence
// ============================================================================

proptest! {
    /// Once a looping run converges, translating its output changes nothing
    #[test]
    fn prop_converged_output_is_fixpoint(
        word in "[a-z]{1,8}",
        depth in 0usize..6,
        prefix in "[a-z ]{0,10}",
    ) {
        let t = translator(UNWRAP_LOOPING, UNWRAP_TARGET);
        let input = format!("{}{}", prefix, nested(&word, depth));

        let first = t.translate(&input);
        prop_assert_eq!(first.termination, Termination::Converged);
        prop_assert_eq!(&first.output, &format!("{}{}", prefix, word));

        let second = t.translate(&first.output);
        prop_assert_eq!(second.passes, 0);
        prop_assert_eq!(second.output, first.output);
    }
}

// ============================================================================
// Property 2: Single pass when looping is disabled
// ============================================================================

proptest! {
    /// Without the loop setting exactly one pass runs, even if more would match
    #[test]
    fn prop_disabled_loop_runs_one_pass(
        word in "[a-z]{1,8}",
        depth in 1usize..6,
    ) {
        let t = translator(UNWRAP_SINGLE, UNWRAP_TARGET);
        let result = t.translate(&nested(&word, depth));

        prop_assert_eq!(result.passes, 1);
        prop_assert_eq!(result.termination, Termination::Disabled);
        prop_assert_eq!(&result.output, &nested(&word, depth - 1));

        // Same as a looping translator bounded to one pass
        let bounded = translator(UNWRAP_SINGLE, UNWRAP_TARGET).with_policy(LoopPolicy {
            enabled: true,
            limit: 1,
        });
        prop_assert_eq!(bounded.translate(&nested(&word, depth)).output, result.output);
    }
}

// ============================================================================
// Property 3: Token pairing does not depend on placeholder order
// ============================================================================

proptest! {
    #[test]
    fn prop_placeholder_order_independent(
        a in "[a-z]{1,8}",
        b in "[0-9]{1,8}",
    ) {
        let source = "assign:\n  regex: '(\\w+)=(\\w+)'\n  tokens: [lhs, rhs]\n";
        let forward = translator(source, "assign: '<lhs> := <rhs>'\n");
        let backward = translator(source, "assign: '<rhs> =: <lhs>'\n");

        let input = format!("{}={}", a, b);
        prop_assert_eq!(forward.translate(&input).output, format!("{} := {}", a, b));
        prop_assert_eq!(backward.translate(&input).output, format!("{} =: {}", b, a));
    }
}

// ============================================================================
// Property 4: Eachline renders one line per non-blank input line
// ============================================================================

proptest! {
    #[test]
    fn prop_eachline_counts_non_blank_lines(
        lines in prop::collection::vec(prop_oneof![
            "[a-z]{1,6}",
            "[ \t]{0,3}",
        ], 0..12),
    ) {
        let value = lines.join("\n");
        let non_blank: Vec<&String> = lines.iter().filter(|l| !l.trim().is_empty()).collect();

        let rendered = apply_eachline("- <line>", &value);
        let rendered_lines: Vec<&str> = if rendered.is_empty() {
            Vec::new()
        } else {
            rendered.split('\n').collect()
        };

        prop_assert_eq!(rendered_lines.len(), non_blank.len());
        for (out, original) in rendered_lines.iter().zip(non_blank) {
            prop_assert_eq!(*out, format!("- {}", original));
        }
    }
}

// ============================================================================
// Property 5: Replace rules compose in declaration order
// ============================================================================

proptest! {
    #[test]
    fn prop_replace_rules_compose(text in "[abx]{0,20}") {
        let forward = TokenOptions {
            eachline: None,
            replace: vec![rule("a", "b"), rule("b", "c")],
        };
        let backward = TokenOptions {
            eachline: None,
            replace: vec![rule("b", "c"), rule("a", "b")],
        };

        // a -> b -> c: every 'a' and 'b' ends up as 'c'
        prop_assert_eq!(forward.apply(&text), text.replace(['a', 'b'], "c"));
        // b -> c first, so the 'b's produced from 'a' survive
        prop_assert_eq!(backward.apply(&text), text.replace('b', "c").replace('a', "b"));
    }
}

// ============================================================================
// Property 6: Bounded termination
// ============================================================================

proptest! {
    /// A rule set that never converges still stops after `looplimit` passes
    #[test]
    fn prop_non_converging_rules_stop_at_limit(limit in 1usize..12) {
        let source = format!(
            "settings:\n  loop: true\n  looplimit: {}\ngrow:\n  regex: '(a+)'\n  tokens: [a]\n",
            limit
        );
        let t = translator(&source, "grow: '<a>a'\n");
        let result = t.translate("a");

        prop_assert_eq!(result.passes, limit);
        prop_assert_eq!(result.termination, Termination::Bounded);
        prop_assert_eq!(result.output.len(), limit + 1);
    }
}
