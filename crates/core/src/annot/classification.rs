//! Externally produced domain/variable classification for one question.
//!
//! The AI classification step (out of scope here) attaches one of these to
//! each mapping entry before rectangle generation. Structured entries are
//! preferred; the legacy string form (`"DM:SITEID; DM:USUBJID"` or a bare
//! variable list) is kept for compatibility with older study data.

use serde::{Deserialize, Serialize};

/// Placeholder rendered when a question is not submitted to the data
/// standard.
pub const NOT_SUBMITTED_TOKEN: &str = "[NOT SUBMITTED]";

/// How a question maps onto the data standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingType {
    Standard,
    Supplemental,
    NotSubmitted,
}

/// One domain/variable assignment for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableMapping {
    pub domain_code: String,
    #[serde(default)]
    pub domain_label: String,
    #[serde(default)]
    pub variable: String,
    pub mapping_type: MappingType,
}

impl VariableMapping {
    /// Display form of the domain, `"DM (Demographics)"` when a label is
    /// known, bare code otherwise.
    pub fn domain_display(&self) -> String {
        if self.domain_label.is_empty() {
            self.domain_code.clone()
        } else {
            format!("{} ({})", self.domain_code, self.domain_label)
        }
    }
}

/// Classification attached to a mapping entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionClassification {
    Structured(Vec<VariableMapping>),
    Legacy(String),
}

impl QuestionClassification {
    /// Whether the question is excluded from submission. Collapses every
    /// variable to the single [`NOT_SUBMITTED_TOKEN`].
    pub fn is_not_submitted(&self) -> bool {
        match self {
            Self::Structured(mappings) => mappings
                .iter()
                .any(|m| m.mapping_type == MappingType::NotSubmitted),
            Self::Legacy(s) => {
                s.contains(NOT_SUBMITTED_TOKEN) || s.trim().eq_ignore_ascii_case("null")
            }
        }
    }

    /// The variable tokens to render for this question, falling back to
    /// the question index when the classification names none.
    pub fn variables(&self, index: i64) -> Vec<String> {
        if self.is_not_submitted() {
            return vec![NOT_SUBMITTED_TOKEN.to_string()];
        }
        let vars: Vec<String> = match self {
            Self::Structured(mappings) => mappings
                .iter()
                .map(|m| m.variable.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
            Self::Legacy(s) => s
                .split(';')
                .map(|part| match part.find(':') {
                    Some(pos) if pos > 0 => part[pos + 1..].trim().to_string(),
                    _ => part.trim().to_string(),
                })
                .filter(|v| !v.is_empty())
                .collect(),
        };
        if vars.is_empty() {
            vec![index.to_string()]
        } else {
            vars
        }
    }

    /// The domain string that drives color assignment: the first domain
    /// named by the classification. Not-submitted questions have none.
    pub fn primary_domain(&self) -> Option<String> {
        if self.is_not_submitted() {
            return None;
        }
        match self {
            Self::Structured(mappings) => mappings.first().map(|m| m.domain_display()),
            Self::Legacy(s) => s.split(';').next().map(|part| {
                match part.find(':') {
                    Some(pos) if pos > 0 => part[..pos].trim().to_string(),
                    _ => part.trim().to_string(),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(entries: &[(&str, &str, &str, MappingType)]) -> QuestionClassification {
        QuestionClassification::Structured(
            entries
                .iter()
                .map(|(code, label, var, ty)| VariableMapping {
                    domain_code: code.to_string(),
                    domain_label: label.to_string(),
                    variable: var.to_string(),
                    mapping_type: *ty,
                })
                .collect(),
        )
    }

    #[test]
    fn structured_variables_and_domain() {
        let cls = structured(&[
            ("DM", "Demographics", "SITEID", MappingType::Standard),
            ("DM", "Demographics", "USUBJID", MappingType::Standard),
        ]);
        assert_eq!(cls.variables(7), vec!["SITEID", "USUBJID"]);
        assert_eq!(cls.primary_domain().as_deref(), Some("DM (Demographics)"));
    }

    #[test]
    fn not_submitted_collapses_to_single_token() {
        let cls = structured(&[("DM", "", "SITEID", MappingType::NotSubmitted)]);
        assert!(cls.is_not_submitted());
        assert_eq!(cls.variables(7), vec![NOT_SUBMITTED_TOKEN]);
        assert_eq!(cls.primary_domain(), None);
    }

    #[test]
    fn legacy_string_splits_on_colon_and_semicolon() {
        let cls = QuestionClassification::Legacy("DM:SITEID; DM:USUBJID".to_string());
        assert_eq!(cls.variables(3), vec!["SITEID", "USUBJID"]);
        assert_eq!(cls.primary_domain().as_deref(), Some("DM"));
    }

    #[test]
    fn empty_classification_falls_back_to_index() {
        let cls = structured(&[("DM", "", "", MappingType::Standard)]);
        assert_eq!(cls.variables(12), vec!["12"]);
    }
}
