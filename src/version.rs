//! Semantic version handling for version-gated strings.
//!
//! App versions are cleaned the way content authors expect (`" v1.2.3 "` is
//! `1.2.3`) and gate ranges use the npm range dialect found in content files:
//! space-separated comparators are intersected, `||` separates alternatives,
//! `a - b` is an inclusive hyphen range and a bare version is an exact match.
//! Each alternative is translated to a [`semver::VersionReq`].

use std::{fmt::Display, str::FromStr};

use semver::{Version, VersionReq};

use crate::error::Error;

/// Parses an app version after stripping whitespace and leading `=`/`v`.
pub fn clean_version(raw: &str) -> Result<Version, Error> {
    let cleaned = raw
        .trim()
        .trim_start_matches(|c: char| c == '=' || c == 'v')
        .trim();
    Version::parse(cleaned).map_err(|e| {
        Error::validation_error(format!(
            "Version must be a valid semver pattern, got `{}` ({})",
            raw, e
        ))
    })
}

/// A parsed version gate such as `>=2.0.0` or `1.x || >=3.1.0 <4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionRange {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let alternatives = raw
            .split("||")
            .map(|part| {
                let translated = translate_alternative(part);
                VersionReq::parse(&translated).map_err(|e| Error::InvalidVersionRange {
                    range: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::parse(s)
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

// Rewrites one npm alternative into `semver` crate syntax.
fn translate_alternative(part: &str) -> String {
    let part = part.trim();
    if part.is_empty() {
        return "*".to_string();
    }

    if let Some((low, high)) = part.split_once(" - ") {
        return format!(
            ">={}, <={}",
            strip_prefix_v(low.trim()),
            strip_prefix_v(high.trim())
        );
    }

    let mut comparators = Vec::new();
    let mut pending_op = String::new();
    for token in part.split_whitespace() {
        if token.chars().all(is_operator_char) {
            pending_op.push_str(token);
            continue;
        }
        let token = format!("{}{}", pending_op, token);
        pending_op.clear();
        comparators.push(translate_comparator(&token));
    }
    if !pending_op.is_empty() {
        // Leave the dangling operator in place so the parser reports it.
        comparators.push(pending_op);
    }

    comparators.join(", ")
}

fn translate_comparator(token: &str) -> String {
    let split = token
        .find(|c: char| !is_operator_char(c))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(split);
    let version = strip_prefix_v(version);

    if !op.is_empty() {
        return format!("{}{}", op, version);
    }
    if is_wildcard(version) {
        version.to_string()
    } else {
        format!("={}", version)
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '~' | '^')
}

fn is_wildcard(version: &str) -> bool {
    version
        .split('.')
        .any(|segment| matches!(segment, "x" | "X" | "*"))
}

fn strip_prefix_v(version: &str) -> &str {
    version.trim_start_matches('v')
}
