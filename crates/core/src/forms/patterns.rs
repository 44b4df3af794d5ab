//! Externally supplied detection patterns.
//!
//! Form-title and noise patterns are curated (or AI-identified) upstream
//! and injected here as an ordered list of named matchers. A malformed
//! pattern disables only itself: it is warned about and skipped, never
//! propagated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AcrfError, Result};

/// Backup noise patterns for common generation timestamps, applied even
/// when the upstream pattern set misses them.
const BACKUP_NOISE_PATTERNS: [&str; 3] = [
    r"Generated On:.*\(GMT\)",
    r"Created On:.*\(UTC\)",
    r"Document Generated:.*EST",
];

/// The pattern families produced by the upstream detection step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionPatterns {
    #[serde(default)]
    pub form_name_patterns: Vec<String>,
    #[serde(default)]
    pub header_patterns: Vec<String>,
    #[serde(default)]
    pub footer_patterns: Vec<String>,
    #[serde(default)]
    pub page_number_patterns: Vec<String>,
}

/// One named, case-insensitive matcher. Order in a matcher list is
/// priority order: the first match wins.
#[derive(Debug, Clone)]
pub struct Matcher {
    name: String,
    regex: Regex,
}

impl Matcher {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("(?i){pattern}")).map_err(|e| {
            AcrfError::InvalidPattern {
                pattern: pattern.to_string(),
                source: Box::new(e),
            }
        })?;
        Ok(Self {
            name: name.into(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn captures<'t>(&self, text: &'t str) -> Option<regex::Captures<'t>> {
        self.regex.captures(text)
    }
}

/// Compiles a pattern family into matchers, skipping malformed patterns
/// individually.
pub fn compile_matchers<'a, I>(patterns: I, family: &str) -> Vec<Matcher>
where
    I: IntoIterator<Item = &'a str>,
{
    patterns
        .into_iter()
        .enumerate()
        .filter_map(|(i, pattern)| {
            match Matcher::new(format!("{family}[{i}]"), pattern) {
                Ok(m) => Some(m),
                Err(e) => {
                    warn!(family, pattern, error = %e, "skipping malformed detection pattern");
                    None
                }
            }
        })
        .collect()
}

static STRIP_FORM_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^form:\s*").expect("static regex"));

/// Strips a leading `form:` marker from a title row's text.
pub fn strip_form_prefix(text: &str) -> &str {
    match STRIP_FORM_PREFIX.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text.trim(),
    }
}

/// Ordered deny-list used to drop header/footer/pagination/title rows
/// while collecting segment content.
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    matchers: Vec<Matcher>,
}

impl NoiseFilter {
    /// Builds the deny-list from every noise family plus the title
    /// patterns themselves (title rows are never content) and the built-in
    /// backup timestamp set.
    pub fn from_patterns(patterns: &DetectionPatterns) -> Self {
        let mut matchers = Vec::new();
        matchers.extend(compile_matchers(
            patterns.header_patterns.iter().map(String::as_str),
            "header",
        ));
        matchers.extend(compile_matchers(
            patterns.footer_patterns.iter().map(String::as_str),
            "footer",
        ));
        matchers.extend(compile_matchers(
            patterns.page_number_patterns.iter().map(String::as_str),
            "page_number",
        ));
        matchers.extend(compile_matchers(
            patterns.form_name_patterns.iter().map(String::as_str),
            "form_title",
        ));
        matchers.extend(compile_matchers(BACKUP_NOISE_PATTERNS, "backup"));
        Self { matchers }
    }

    /// Returns the name of the first matcher that flags the text as noise.
    pub fn matches(&self, text: &str) -> Option<&str> {
        self.matchers
            .iter()
            .find(|m| m.is_match(text))
            .map(|m| m.name())
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_pattern_is_isolated() {
        let matchers = compile_matchers(["valid.*", "(unclosed", "^Page \\d+$"], "test");
        assert_eq!(matchers.len(), 2);
        assert_eq!(matchers[0].name(), "test[0]");
        assert_eq!(matchers[1].name(), "test[2]");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let m = Matcher::new("t", "^page \\d+ of \\d+$").unwrap();
        assert!(m.is_match("Page 3 of 12"));
    }

    #[test]
    fn backup_timestamps_are_always_denied() {
        let filter = NoiseFilter::from_patterns(&DetectionPatterns::default());
        assert!(filter.matches("Generated On: 2024-01-01 (GMT)").is_some());
        assert!(filter.matches("Subject Initials").is_none());
    }

    #[test]
    fn form_prefix_stripping() {
        assert_eq!(strip_form_prefix("Form: Vital Signs"), "Vital Signs");
        assert_eq!(strip_form_prefix("Vital Signs"), "Vital Signs");
    }
}
