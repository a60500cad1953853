//! Part matching
//!
//! Runs every compiled part against the current buffer and pairs the
//! capture groups of each occurrence with the part's token names.

use crate::extract::CompiledPart;

/// One match of a part in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// The whole matched text
    pub matched: String,
    /// Raw value per token, in the part's token order; `None` when the
    /// regex has fewer groups than the part has tokens
    pub values: Vec<Option<String>>,
}

impl Occurrence {
    /// Raw value captured for the token at `index`
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// All non-overlapping occurrences of `part` in `text`, left to right
///
/// With explicit capture groups, group *i* feeds token *i*; a group that
/// did not participate in the match yields an empty value. Without groups
/// the whole match feeds the first token.
///
/// Empty matches are not returned, so a part whose regex only matches the
/// empty string never rewrites anything and never keeps a loop running.
pub fn match_part(part: &CompiledPart, text: &str) -> Vec<Occurrence> {
    let group_count = part.group_count();
    let mut occurrences = Vec::new();

    for caps in part.regex.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.as_str().is_empty() {
            continue;
        }

        let groups: Vec<&str> = if group_count == 0 {
            vec![whole.as_str()]
        } else {
            (1..=group_count)
                .map(|i| caps.get(i).map_or("", |m| m.as_str()))
                .collect()
        };

        let values = (0..part.tokens.len())
            .map(|i| groups.get(i).map(|g| g.to_string()))
            .collect();

        occurrences.push(Occurrence {
            matched: whole.as_str().to_string(),
            values,
        });
    }

    occurrences
}

/// Occurrences for every part, indexed like `parts`
pub fn match_all(parts: &[CompiledPart], text: &str) -> Vec<Vec<Occurrence>> {
    parts.iter().map(|part| match_part(part, text)).collect()
}

/// True when no part matched anything
pub fn is_exhausted(matches: &[Vec<Occurrence>]) -> bool {
    matches.iter().all(Vec::is_empty)
}
