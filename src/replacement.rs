//! Replacement string conversion
//!
//! Replace rules in syntax descriptions use backslash-style group references
//! (`\1`, `\g<name>`), the convention of most scripting-language regex
//! engines. The `regex` crate expands `$1` / `${name}` instead and treats a
//! bare `$` as special, so replacements are rewritten before use.

/// Convert a backslash-style replacement into `regex` crate replacement syntax
///
/// # Conversion Rules
///
/// - `\1`..`\99` → `${1}`..`${99}` - Numbered group reference
/// - `\g<name>` / `\g<1>` → `${name}` / `${1}` - Named or numbered group reference
/// - `\n`, `\t`, `\r`, `\f`, `\v`, `\a`, `\b` → the control character itself
/// - `\\` → `\` - Escaped backslash
/// - `$` → `$$` - Dollar signs are literal
/// - Any other `\X` is kept as the two characters `\X`
///
/// # Examples
///
/// ```
/// use langtrans::replacement::convert_group_references;
///
/// assert_eq!(convert_group_references(r"\1-\2"), "${1}-${2}");
/// assert_eq!(convert_group_references(r"\g<word>!"), "${word}!");
/// assert_eq!(convert_group_references("cost: $5"), "cost: $$5");
/// ```
pub fn convert_group_references(replacement: &str) -> String {
    let mut result = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => result.push_str("$$"),
            '\\' => match chars.next() {
                Some(d @ '1'..='9') => {
                    let mut group = d.to_string();
                    if let Some(&next) = chars.peek() {
                        if next.is_ascii_digit() {
                            group.push(next);
                            chars.next();
                        }
                    }
                    push_group(&mut result, &group);
                }
                Some('g') if chars.peek() == Some(&'<') => {
                    chars.next();
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '>' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if closed {
                        push_group(&mut result, &name);
                    } else {
                        // Unterminated reference, keep it literal
                        result.push_str("\\g<");
                        result.push_str(&name.replace('$', "$$"));
                    }
                }
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('r') => result.push('\r'),
                Some('f') => result.push('\x0c'),
                Some('v') => result.push('\x0b'),
                Some('a') => result.push('\x07'),
                Some('b') => result.push('\x08'),
                Some('0') => result.push('\0'),
                Some('\\') => result.push('\\'),
                Some('$') => {
                    result.push('\\');
                    result.push_str("$$");
                }
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            },
            _ => result.push(c),
        }
    }

    result
}

fn push_group(result: &mut String, group: &str) {
    result.push_str("${");
    result.push_str(group);
    result.push('}');
}
