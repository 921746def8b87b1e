//! `$VAR` / `${VAR}` substitution inside path strings.
use crate::error::ParseError;

/// Replace variable references in `value` using `lookup`.
///
/// `$$` produces a literal `$`; a `$` not followed by a name or `{` is
/// kept verbatim.
pub(super) fn substitute(
    value: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, ParseError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                out.push('$');
            }
            Some((start, '{')) => {
                chars.next();
                let rest = value.get(start + 1..).unwrap_or_default();
                let Some(len) = rest.find('}') else {
                    return Err(ParseError::MalformedPath {
                        value: value.to_string(),
                        reason: "unterminated '${'".to_string(),
                    });
                };
                let name = rest.get(..len).unwrap_or_default();
                if !is_name(name) {
                    return Err(ParseError::MalformedPath {
                        value: value.to_string(),
                        reason: format!("invalid variable name '{name}'"),
                    });
                }
                out.push_str(&resolve(name, value, lookup)?);
                // skip the name and the closing brace
                for _ in 0..=name.chars().count() {
                    chars.next();
                }
            }
            Some((start, next)) if next == '_' || next.is_ascii_alphabetic() => {
                let rest = value.get(start..).unwrap_or_default();
                let len = rest
                    .find(|ch: char| ch != '_' && !ch.is_ascii_alphanumeric())
                    .unwrap_or(rest.len());
                let name = rest.get(..len).unwrap_or_default();
                out.push_str(&resolve(name, value, lookup)?);
                for _ in 0..name.chars().count() {
                    chars.next();
                }
            }
            _ => out.push('$'),
        }
    }
    Ok(out)
}

fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn resolve(
    name: &str,
    value: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, ParseError> {
    lookup(name).ok_or_else(|| ParseError::UndefinedVariable {
        var: name.to_string(),
        value: value.to_string(),
    })
}
