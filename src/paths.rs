//! Path helpers for configuration values and image file names
//!
//! Configured paths may contain `$VAR` / `${VAR}` references and either
//! separator style. Everything handed to the rest of the application is
//! expanded and normalized to the platform separator. Pattern matching
//! happens on forward-slash forms so the same pattern works everywhere.

use std::env;
use std::path::MAIN_SEPARATOR;

use crate::error::{MfdError, Result};

/// Expand `$VAR` and `${VAR}` from the process environment
/// Unknown variables expand to an empty string
pub fn expand_env(input: &str) -> String {
    expand_env_with(input, |name| env::var(name).ok())
}

pub fn expand_env_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
                continue;
            }
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            if len > 0 {
                out.push_str(&lookup(&after[..len]).unwrap_or_default());
                rest = &after[len..];
                continue;
            }
        }

        // Not a variable reference, keep the dollar sign
        out.push('$');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Rewrite every separator to the platform convention
pub fn normalize_separators(path: &str) -> String {
    path.chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect()
}

/// Rewrite every separator to `/`
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Expand, join and normalize a file name against the image base path
pub fn join_base(base: &str, name: &str) -> String {
    let joined = clean(&format!("{}/{}", to_forward_slashes(base), to_forward_slashes(name)));
    normalize_separators(&expand_env(&joined))
}

/// Whether `name` already lives under the base path pattern
///
/// A name qualifies when it matches the pattern itself, or when any of its
/// ancestor directories does. The second rule is what keeps a name that
/// was already joined from being joined again.
pub fn is_in_base(base: &str, name: &str) -> Result<bool> {
    let pattern = to_forward_slashes(base);
    let pattern = if pattern.len() > 1 { pattern.trim_end_matches('/') } else { pattern.as_str() };
    let name = to_forward_slashes(name);

    let mut candidate = name.as_str();
    loop {
        if glob_match(pattern, candidate)? {
            return Ok(true);
        }
        match candidate.rsplit_once('/') {
            Some(("", _)) if candidate != "/" => candidate = "/",
            Some((dir, _)) if !dir.is_empty() => candidate = dir,
            _ => return Ok(false),
        }
    }
}

/// Lexically clean a forward-slash path: collapse repeated separators,
/// drop `.` segments and resolve `..` where possible
fn clean(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Shell-style pattern match on `/`-separated names
///
/// `*` matches any run of non-separator characters, `?` a single
/// non-separator character, and `[...]` a character class with optional
/// `^` negation and `a-z` ranges. The whole pattern is validated before
/// matching so a malformed pattern always fails.
pub fn glob_match(pattern: &str, name: &str) -> Result<bool> {
    let pattern: Vec<char> = pattern.chars().collect();
    validate_pattern(&pattern).map_err(|reason| MfdError::Path {
        pattern: pattern.iter().collect(),
        reason,
    })?;
    let name: Vec<char> = name.chars().collect();
    Ok(match_from(&pattern, &name))
}

fn validate_pattern(pattern: &[char]) -> std::result::Result<(), &'static str> {
    let mut i = 0;
    while i < pattern.len() {
        if pattern[i] == '[' {
            i = class_end(pattern, i).ok_or("malformed character class")?;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Index just past the `]` closing the class that opens at `start`
fn class_end(pattern: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if pattern.get(i) == Some(&'^') {
        i += 1;
    }
    let body_start = i;

    loop {
        let lo = *pattern.get(i)?;
        if lo == ']' {
            // Classes must be non-empty
            return (i > body_start).then_some(i + 1);
        }
        i += 1;
        if pattern.get(i) == Some(&'-') {
            let hi = *pattern.get(i + 1)?;
            if hi == ']' {
                return None;
            }
            i += 2;
        }
    }
}

fn class_matches(body: &[char], c: char) -> bool {
    let (negated, body) = match body.split_first() {
        Some(('^', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut matched = false;
    let mut i = 0;
    while i < body.len() {
        let lo = body[i];
        if body.get(i + 1) == Some(&'-') && i + 2 < body.len() {
            let hi = body[i + 2];
            matched |= lo <= c && c <= hi;
            i += 3;
        } else {
            matched |= lo == c;
            i += 1;
        }
    }
    matched != negated
}

fn match_from(pattern: &[char], name: &[char]) -> bool {
    let Some((&head, rest)) = pattern.split_first() else {
        return name.is_empty();
    };

    match head {
        '*' => {
            for i in 0..=name.len() {
                if i > 0 && name[i - 1] == '/' {
                    break;
                }
                if match_from(rest, &name[i..]) {
                    return true;
                }
            }
            false
        }
        '?' => matches!(name.first(), Some(&c) if c != '/') && match_from(rest, &name[1..]),
        '[' => {
            // Validated up front
            let Some(end) = class_end(pattern, 0) else {
                return false;
            };
            match name.first() {
                Some(&c) if class_matches(&pattern[1..end - 1], c) => {
                    match_from(&pattern[end..], &name[1..])
                }
                _ => false,
            }
        }
        literal => name.first() == Some(&literal) && match_from(rest, &name[1..]),
    }
}
