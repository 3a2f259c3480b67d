//! Value-level helpers shared by the cascade passes: list splitting,
//! `$(name)` expansion, integer parsing and the `~` terminator.
use std::collections::HashMap;

/// Reports malformed configuration values.
///
/// Loading never aborts on a bad value; the field keeps its default. When
/// `strict` is set (debug builds by default) a debug assertion fires as well.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Diagnostics {
    pub strict: bool,
}

impl Diagnostics {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn malformed(&self, section: &str, key: &str, value: &str) {
        tracing::warn!("Malformed configuration value [{section}] {key}={value:?}");
        if self.strict {
            debug_assert!(false, "malformed configuration value [{section}] {key}={value:?}");
        }
    }

    pub fn unresolved_variable(&self, name: &str, value: &str) {
        tracing::warn!("Unresolved variable {name} in {value:?}");
        if self.strict {
            debug_assert!(false, "unresolved variable {name} in {value:?}");
        }
    }
}

/// Variable dictionary keyed by the full reference form, e.g. `$(font)`.
pub(crate) type Variables = HashMap<String, String>;

/// Replaces every `$(name)` reference with its definition.
///
/// Unknown references are reported and left in place. Replacement text is
/// not rescanned, so definitions cannot recurse.
pub(crate) fn expand_variables(value: &str, vars: &Variables, diag: &Diagnostics) -> String {
    if !value.contains("$(") {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("$(") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(')') else {
            diag.unresolved_variable(tail, value);
            out.push_str(tail);
            return out;
        };
        let reference = &tail[..=end];
        match vars.get(reference) {
            Some(replacement) => out.push_str(replacement),
            None => {
                diag.unresolved_variable(reference, value);
                out.push_str(reference);
            }
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Splits on any of `delimiters`, trimming whitespace and dropping empty items.
pub(crate) fn split_list<'a>(value: &'a str, delimiters: &'a [char]) -> impl Iterator<Item = &'a str> {
    value
        .split(move |c| delimiters.contains(&c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Drops trailing `~` characters, the escape that keeps significant
/// trailing whitespace from being trimmed by the INI reader.
pub(crate) fn strip_tilde(value: &str) -> &str {
    value.trim_end_matches('~')
}

/// Parses a signed integer. Empty input yields `None` without a report
/// when `empty_ok` is set, otherwise every failure is reported.
pub(crate) fn parse_int(
    value: &str,
    empty_ok: bool,
    diag: &Diagnostics,
    section: &str,
    key: &str,
) -> Option<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() && empty_ok {
        return None;
    }
    match trimmed.parse::<i32>() {
        Ok(v) => Some(v),
        Err(_) => {
            diag.malformed(section, key, value);
            None
        }
    }
}

/// ASCII case-insensitive prefix test returning the remainder.
pub(crate) fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
