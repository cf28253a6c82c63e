//! Diagram file naming and member text shortening

use crate::config::DiagramNaming;
use crate::constants::diagram::{
    MAX_AFFIX_LENGTH, MAX_EXTENSION_LENGTH, MAX_SIGNATURE_LENGTH, TRUNCATION_SUFFIX,
};
use crate::types::{DocumentorError, Result};

/// Prefix/suffix characters: `[0-9A-Za-z-_.()+ ]`
fn is_affix_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')' | '+' | ' ')
}

pub fn validate_affix(label: &str, value: &str) -> Result<()> {
    if value.chars().count() > MAX_AFFIX_LENGTH {
        return Err(DocumentorError::Config(format!(
            "Diagram {} '{}' exceeds {} characters",
            label, value, MAX_AFFIX_LENGTH
        )));
    }
    if let Some(bad) = value.chars().find(|c| !is_affix_char(*c)) {
        return Err(DocumentorError::Config(format!(
            "Diagram {} '{}' contains invalid character '{}'",
            label, value, bad
        )));
    }
    Ok(())
}

pub fn validate_extension(value: &str) -> Result<()> {
    if value.is_empty()
        || value.len() > MAX_EXTENSION_LENGTH
        || !value.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(DocumentorError::Config(format!(
            "Diagram extension '{}' must be 1-{} alphanumeric characters",
            value, MAX_EXTENSION_LENGTH
        )));
    }
    Ok(())
}

/// Replace everything outside `[A-Za-z0-9_.]` with `_`
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Diagram identifier: everything outside `[A-Za-z0-9_]` becomes `_`
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// `<prefix><sanitized><suffix>.<extension>`
pub fn file_name(class_name: &str, naming: &DiagramNaming, default_extension: &str) -> String {
    format!(
        "{}{}{}.{}",
        naming.prefix,
        sanitize_file_stem(class_name),
        naming.suffix_or_default(),
        naming.extension_or(default_extension)
    )
}

/// Remove `<...>` groups, nested ones included
pub fn strip_generics(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Drop `pkg.sub.` qualifiers in front of identifiers
pub fn strip_qualifiers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let at_word_start = i == 0 || !is_word_char(chars[i - 1]);
        if at_word_start && (c.is_alphabetic() || c == '_') {
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            let qualified = i + 1 < chars.len()
                && chars[i] == '.'
                && (chars[i + 1].is_alphabetic() || chars[i + 1] == '_');
            if qualified {
                i += 1;
            } else {
                out.extend(&chars[start..i]);
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Simplify member text for a diagram body and fit it to the budget
pub fn shorten(text: &str) -> String {
    let cleaned = strip_qualifiers(&strip_generics(text));
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&cleaned)
}

/// Text over the budget keeps its first `budget - 3` chars plus `...`
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_SIGNATURE_LENGTH {
        return text.to_string();
    }
    let keep = MAX_SIGNATURE_LENGTH - TRUNCATION_SUFFIX.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(TRUNCATION_SUFFIX);
    out
}
