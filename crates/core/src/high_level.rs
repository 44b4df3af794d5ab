//! High-level form extraction API.
//!
//! Ties the pipeline together: words → rows → title events → segments →
//! classified forms. Rectangle generation stays a separate call so the
//! caller can attach external classifications (and form domains) to the
//! extracted forms first.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::forms::classify::{ClassifyParams, attach_tracks};
use crate::forms::patterns::{DetectionPatterns, NoiseFilter, compile_matchers};
use crate::forms::segmenter::{Form, SegmenterOptions, assign_rows_to_forms};
use crate::forms::titles::extract_form_titles;
use crate::layout::{PageRows, PageWords, RowParams, rows_for_pages};

/// Options for the whole extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    #[serde(default)]
    pub rows: RowParams,
    #[serde(default)]
    pub classify: ClassifyParams,
    #[serde(default)]
    pub segmenter: SegmenterOptions,
}

/// Name summary for UI display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormNameSummary {
    pub names: Vec<String>,
    pub total_forms: usize,
    pub original_titles: Vec<String>,
    pub unique_titles: Vec<String>,
}

/// Result of a full extraction pass, keyed by normalized form title in
/// discovery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormExtraction {
    pub forms: IndexMap<String, Form>,
    pub form_names: FormNameSummary,
}

/// Runs the extraction pipeline over a document's words.
///
/// A document with no matching titles yields an empty result; malformed
/// patterns are skipped individually. Nothing here aborts the document.
pub fn extract_forms(
    pages: &[PageWords],
    patterns: &DetectionPatterns,
    options: &ExtractOptions,
) -> FormExtraction {
    let page_rows = rows_for_pages(pages, &options.rows);
    extract_forms_from_rows(&page_rows, patterns, options)
}

/// Runs the pipeline over already-clustered rows, for callers that also
/// need the rows themselves (statistics, inspection) without clustering
/// the document twice.
pub fn extract_forms_from_rows(
    page_rows: &[PageRows],
    patterns: &DetectionPatterns,
    options: &ExtractOptions,
) -> FormExtraction {
    let title_matchers = compile_matchers(
        patterns.form_name_patterns.iter().map(String::as_str),
        "form_title",
    );
    let titles = extract_form_titles(page_rows, &title_matchers);
    if titles.is_empty() {
        warn!("no form titles detected, nothing to extract");
        return FormExtraction::default();
    }

    let noise = NoiseFilter::from_patterns(patterns);
    let mut forms = assign_rows_to_forms(page_rows, &titles, &noise, &options.segmenter);
    attach_tracks(&mut forms, &options.classify);

    let names: Vec<String> = forms.keys().cloned().collect();
    let original_titles: Vec<String> = titles.iter().map(|t| t.form_name.clone()).collect();
    let unique_titles: Vec<String> = original_titles.iter().cloned().unique().collect();
    info!(
        forms = names.len(),
        titles = titles.len(),
        "form extraction finished"
    );

    FormExtraction {
        form_names: FormNameSummary {
            total_forms: names.len(),
            names,
            original_titles,
            unique_titles,
        },
        forms,
    }
}
