//! Regex Error Handling
//!
//! Syntax descriptions are usually written against a backtracking regex
//! dialect, so patterns often use features the `regex` crate rejects. This
//! module turns compile failures into diagnostics that say what went wrong
//! and how to rewrite the pattern.

use regex::{Regex, RegexBuilder};

/// Regex compile failure with a classified cause and a suggested fix
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedRegexError {
    /// The pattern that failed to compile
    pub pattern: String,
    /// The classified cause
    pub error_type: RegexErrorType,
    /// Suggested fix, if one could be derived
    pub suggestion: Option<String>,
}

/// Classified causes of a regex compile failure
#[derive(Debug, Clone, PartialEq)]
pub enum RegexErrorType {
    /// Generic syntax error
    Syntax { message: String },
    /// Unrecognized escape sequence
    InvalidEscape { sequence: String, position: usize },
    /// Unclosed group, class or counted repetition
    UnclosedDelimiter { delimiter: char, position: usize },
    /// Quantifier with nothing to repeat or a bad range
    InvalidQuantifier { message: String },
    /// Look-ahead or look-behind
    Lookaround { message: String },
    /// Backreference inside a pattern
    Backreference { message: String },
    /// Compiled program exceeds the size limit
    TooLarge { message: String },
}

impl EnhancedRegexError {
    /// Build a diagnostic from a `regex::Error` and the offending pattern
    pub fn from_regex_error(err: &regex::Error, pattern: &str) -> Self {
        let error_type = Self::classify_error(err, pattern);
        let suggestion = Self::generate_suggestion(&error_type, pattern);

        EnhancedRegexError {
            pattern: pattern.to_string(),
            error_type,
            suggestion,
        }
    }

    fn classify_error(err: &regex::Error, pattern: &str) -> RegexErrorType {
        let error_msg = err.to_string();

        if let regex::Error::CompiledTooBig(_) = err {
            return RegexErrorType::TooLarge { message: error_msg };
        }

        let lower_msg = error_msg.to_lowercase();

        if lower_msg.contains("look-around") || lower_msg.contains("lookaround") {
            return RegexErrorType::Lookaround { message: error_msg };
        }

        if lower_msg.contains("backreference") {
            return RegexErrorType::Backreference { message: error_msg };
        }

        if lower_msg.contains("unclosed") {
            for (open, close) in [('(', ')'), ('[', ']'), ('{', '}')] {
                if let Some(position) = find_unclosed_delimiter(pattern, open, close) {
                    return RegexErrorType::UnclosedDelimiter {
                        delimiter: open,
                        position,
                    };
                }
            }
        }

        if lower_msg.contains("escape") {
            if let Some(position) = find_invalid_escape(pattern) {
                return RegexErrorType::InvalidEscape {
                    sequence: extract_escape_at(pattern, position),
                    position,
                };
            }
        }

        if lower_msg.contains("repetition") || lower_msg.contains("quantifier") {
            return RegexErrorType::InvalidQuantifier { message: error_msg };
        }

        RegexErrorType::Syntax { message: error_msg }
    }

    fn generate_suggestion(error_type: &RegexErrorType, pattern: &str) -> Option<String> {
        match error_type {
            RegexErrorType::UnclosedDelimiter {
                delimiter,
                position,
            } => {
                let closer = match delimiter {
                    '(' => ')',
                    '[' => ']',
                    '{' => '}',
                    _ => return None,
                };
                Some(format!(
                    "Add a closing '{}' to match the opening '{}' at position {}, \
                     or escape it as '\\{}' if it is meant literally.",
                    closer, delimiter, position, delimiter
                ))
            }

            RegexErrorType::InvalidEscape { sequence, .. } => Some(format!(
                "The escape sequence '{}' is not recognized. \
                 Common escapes are \\n, \\t, \\d, \\w, \\s, \\b and \\xHH; \
                 for a literal character drop the backslash or escape the backslash itself.",
                sequence
            )),

            RegexErrorType::InvalidQuantifier { message } => {
                let lower = message.to_lowercase();
                if lower.contains("missing") || lower.contains("nothing") {
                    Some("A quantifier (*, +, ?, {n}) has nothing to repeat. \
                          Place it after a character or group, e.g. 'a*', '(foo)+'."
                        .to_string())
                } else {
                    Some("Counted repetitions must look like '{n}', '{n,}' or '{n,m}' with n <= m."
                        .to_string())
                }
            }

            RegexErrorType::Lookaround { .. } => Some(
                "Look-ahead and look-behind are not supported. \
                 Capture the surrounding context in a group and put it back in the target \
                 template, or split the construct into two parts."
                    .to_string(),
            ),

            RegexErrorType::Backreference { .. } => Some(
                "Backreferences such as \\1 cannot be used inside a pattern. \
                 Match the repeated text with an explicit pattern instead."
                    .to_string(),
            ),

            RegexErrorType::TooLarge { .. } => Some(
                "The compiled pattern is too large. \
                 Reduce large counted repetitions or split the part into smaller parts."
                    .to_string(),
            ),

            RegexErrorType::Syntax { .. } => {
                if pattern.contains('[') && !pattern.contains(']') {
                    Some("Unclosed character class '[...]'. Add a closing ']'.".to_string())
                } else if pattern.contains('(') && !pattern.contains(')') {
                    Some("Unclosed group '(...)'. Add a closing ')'.".to_string())
                } else if pattern.contains('<') && pattern.contains('>') {
                    Some("Check that every '<variable>' placeholder is declared under \
                          settings.variables in the source syntax."
                        .to_string())
                } else {
                    None
                }
            }
        }
    }

    /// Format the error as a multi-line, user-facing message
    pub fn display(&self) -> String {
        let mut output = format!("  Pattern: \"{}\"\n", self.pattern);

        match &self.error_type {
            RegexErrorType::Syntax { message } => {
                output.push_str("  Type: Syntax error\n");
                output.push_str(&format!("  Details: {}\n", message));
            }
            RegexErrorType::InvalidEscape { sequence, position } => {
                output.push_str("  Type: Invalid escape sequence\n");
                output.push_str(&format!(
                    "  Sequence: '{}' at position {}\n",
                    sequence, position
                ));
            }
            RegexErrorType::UnclosedDelimiter {
                delimiter,
                position,
            } => {
                output.push_str("  Type: Unclosed delimiter\n");
                output.push_str(&format!(
                    "  Opening '{}' at position {} is never closed\n",
                    delimiter, position
                ));
            }
            RegexErrorType::InvalidQuantifier { message } => {
                output.push_str("  Type: Invalid quantifier\n");
                output.push_str(&format!("  Details: {}\n", message));
            }
            RegexErrorType::Lookaround { message } => {
                output.push_str("  Type: Unsupported look-around\n");
                output.push_str(&format!("  Details: {}\n", message));
            }
            RegexErrorType::Backreference { message } => {
                output.push_str("  Type: Unsupported backreference\n");
                output.push_str(&format!("  Details: {}\n", message));
            }
            RegexErrorType::TooLarge { message } => {
                output.push_str("  Type: Pattern too large\n");
                output.push_str(&format!("  Details: {}\n", message));
            }
        }

        if let Some(ref suggestion) = self.suggestion {
            output.push_str(&format!("  Suggestion: {}\n", suggestion));
        }

        output
    }
}

/// Compile a pattern with `^`/`$` matching at line boundaries
pub fn compile_multiline(pattern: &str) -> Result<Regex, EnhancedRegexError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|err| EnhancedRegexError::from_regex_error(&err, pattern))
}

/// Position (in chars) of the last unmatched opening delimiter
fn find_unclosed_delimiter(pattern: &str, open: char, close: char) -> Option<usize> {
    let mut stack = Vec::new();
    let mut in_char_class = false;
    let mut escaped = false;

    for (i, c) in pattern.chars().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }

        if open != '[' {
            if c == '[' {
                in_char_class = true;
                continue;
            }
            if c == ']' {
                in_char_class = false;
                continue;
            }
            if in_char_class {
                continue;
            }
        }

        if c == open {
            stack.push(i);
        } else if c == close {
            stack.pop();
        }
    }

    stack.last().copied()
}

/// Position (in chars) of the first escape the `regex` crate rejects
fn find_invalid_escape(pattern: &str) -> Option<usize> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' && i + 1 < chars.len() {
            let next = chars[i + 1];
            let is_valid = match next {
                'n' | 't' | 'r' | 'f' | 'v' | 'a' | '0' => true,
                'x' | 'u' | 'U' | 'p' | 'P' => true,
                'w' | 'W' | 'd' | 'D' | 's' | 'S' | 'b' | 'B' | 'A' | 'z' => true,
                _ if next.is_ascii_punctuation() => true,
                ' ' => true,
                _ => false,
            };

            if !is_valid {
                return Some(i);
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    None
}

fn extract_escape_at(pattern: &str, pos: usize) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    match (chars.get(pos), chars.get(pos + 1)) {
        (Some('\\'), Some(next)) => format!("\\{}", next),
        (Some(c), _) => c.to_string(),
        (None, _) => String::new(),
    }
}
