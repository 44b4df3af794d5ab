//! Form-title detection over clustered rows.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::{Matcher, strip_form_prefix};
use crate::layout::{PageRows, Row};

/// One occurrence of a form title in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleEvent {
    pub page_number: u32,
    pub row_index: usize,
    pub form_name: String,
    pub normalized_name: String,
    /// The full title row, kept for downstream page/position lookups.
    pub title_row: Row,
}

/// Uppercases a form name and collapses whitespace runs to underscores.
pub fn normalize_form_name(name: &str) -> String {
    name.to_uppercase().split_whitespace().join("_")
}

/// Matches every row against the title matchers (first match wins) and
/// returns the occurrences in document order.
///
/// The form name is capture group 1 when the pattern provides one,
/// otherwise the row text with any leading `form:` marker stripped.
pub fn extract_form_titles(pages: &[PageRows], matchers: &[Matcher]) -> Vec<TitleEvent> {
    let mut titles = Vec::new();
    if matchers.is_empty() {
        return titles;
    }

    for page in pages {
        for row in &page.rows {
            let text = row.full_text.trim();
            for matcher in matchers {
                let Some(caps) = matcher.captures(text) else {
                    continue;
                };
                let form_name = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| strip_form_prefix(text).to_string());
                let normalized_name = normalize_form_name(&form_name);
                debug!(
                    form = %form_name,
                    page = page.page_number,
                    row = row.row_index,
                    matcher = matcher.name(),
                    "found form title"
                );
                titles.push(TitleEvent {
                    page_number: page.page_number,
                    row_index: row.row_index,
                    form_name,
                    normalized_name,
                    title_row: row.clone(),
                });
                break;
            }
        }
    }

    titles.sort_by_key(|t| (t.page_number, t.row_index));
    titles
}
