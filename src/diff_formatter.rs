use crate::engine::Translation;
use colored::*;
use similar::{ChangeTag, TextDiff};
use std::io::IsTerminal;

pub struct DiffFormatter;

impl DiffFormatter {
    /// Auto-detect if we should use colors
    fn should_use_color() -> bool {
        // Check NO_COLOR env var (https://no-color.org/)
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }

        std::io::stdout().is_terminal()
    }

    /// Format a line diff of `old` against `new` with surrounding context
    pub fn format_diff(label: &str, old: &str, new: &str, context_size: usize) -> String {
        Self::format_diff_with_color(label, old, new, context_size, Self::should_use_color())
    }

    pub fn format_diff_with_color(
        label: &str,
        old: &str,
        new: &str,
        context_size: usize,
        use_color: bool,
    ) -> String {
        let mut output = String::new();

        if use_color {
            output.push_str(&format!("{}\n", label.bold().cyan()));
        } else {
            output.push_str(&format!("{}\n", label));
        }

        let diff = TextDiff::from_lines(old, new);
        let groups = diff.grouped_ops(context_size);

        if groups.is_empty() {
            output.push_str("No changes.\n");
            return output;
        }

        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                if use_color {
                    output.push_str(&format!("{}\n", "...".dimmed()));
                } else {
                    output.push_str("...\n");
                }
            }

            for op in group {
                for change in diff.iter_changes(op) {
                    let (indicator, line_index) = match change.tag() {
                        ChangeTag::Equal => ("=", change.new_index()),
                        ChangeTag::Delete => ("-", change.old_index()),
                        ChangeTag::Insert => ("+", change.new_index()),
                    };
                    let line_num = line_index.map_or(0, |i| i + 1);
                    let content = change.value().trim_end_matches(['\n', '\r']);

                    let line = if use_color {
                        match change.tag() {
                            ChangeTag::Equal => {
                                format!("L{}: {} {}\n", line_num, indicator.dimmed(), content.dimmed())
                            }
                            ChangeTag::Delete => format!(
                                "L{}: {} {}\n",
                                line_num,
                                indicator.red().bold(),
                                content.red()
                            ),
                            ChangeTag::Insert => format!(
                                "L{}: {} {}\n",
                                line_num,
                                indicator.green().bold(),
                                content.green().bold()
                            ),
                        }
                    } else {
                        format!("L{}: {} {}\n", line_num, indicator, content)
                    };
                    output.push_str(&line);
                }
            }
        }

        output
    }

    /// One-line summary of a translation run
    pub fn format_summary(translation: &Translation) -> String {
        format!(
            "{} rewrite{} in {} pass{} ({})",
            translation.rewrites,
            if translation.rewrites == 1 { "" } else { "s" },
            translation.passes,
            if translation.passes == 1 { "" } else { "es" },
            translation.termination
        )
    }
}
