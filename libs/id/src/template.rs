//! `$placeholder` substitution for registry URL templates.
//!
//! Syntax: `$name` or `${name}`, where `name` is `[A-Za-z_][A-Za-z0-9_]*`,
//! and `$$` for a literal dollar sign. A `$` followed by anything else is
//! copied through unchanged.

use std::collections::HashMap;

use crate::error::{ArkError, ArkResult};

/// Named values available to a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    values: HashMap<&'static str, String>,
}

impl TemplateValues {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    /// Sets `name` if `value` is present.
    pub fn insert_opt(&mut self, name: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    /// Returns the value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Substitutes every placeholder in `template`.
    ///
    /// Fails with [`ArkError::MissingPlaceholder`] if the template names a
    /// value that is not set.
    pub fn render(&self, template: &str) -> ArkResult<String> {
        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
                continue;
            }

            let (name, tail) = match after.strip_prefix('{') {
                Some(braced) => match braced.split_once('}') {
                    Some((name, tail)) if is_identifier(name) => (name, tail),
                    _ => ("", after),
                },
                None => {
                    let end = identifier_len(after);
                    (&after[..end], &after[end..])
                }
            };

            if name.is_empty() {
                out.push('$');
                rest = after;
                continue;
            }

            let value = self.get(name).ok_or_else(|| ArkError::MissingPlaceholder {
                template: template.to_string(),
                placeholder: name.to_string(),
            })?;
            out.push_str(value);
            rest = tail;
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Percent-encodes `value` as a single opaque path component
/// (everything except `A-Za-z0-9-._~`, including `/`).
#[must_use]
pub fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn identifier_len(s: &str) -> usize {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return 0,
    }
    1 + bytes
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && identifier_len(s) == s.len()
}
