//! Label/OID track classification over a form's filtered rows.
//!
//! Two parallel annotation lanes exist per question: a human-readable
//! label row (question text ending in its number) and an identifier row
//! (number leading a machine OID). Classification is purely spatial and
//! textual: edge alignment against the form's coordinate extremes plus
//! integer-token shape rules.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::segmenter::Form;
use crate::annot::QuestionClassification;
use crate::layout::Row;

/// Parameters for track classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifyParams {
    /// How far a row edge may sit from the form's coordinate extreme and
    /// still count as aligned, in page units.
    pub alignment_epsilon: f64,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            alignment_epsilon: 8.0,
        }
    }
}

/// Coordinate extremes across a form's rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormExtremes {
    pub x0_min: f64,
    pub x1_max: f64,
}

/// Computes the form's x extremes from row bounds and member word bounds.
pub fn form_extremes(rows: &[Row]) -> Option<FormExtremes> {
    let mut x0_min = f64::INFINITY;
    let mut x1_max = f64::NEG_INFINITY;
    for row in rows {
        if row.x_min.is_finite() {
            x0_min = x0_min.min(row.x_min);
        }
        if row.x_max.is_finite() {
            x1_max = x1_max.max(row.x_max);
        }
        for word in &row.words {
            if word.x0.is_finite() {
                x0_min = x0_min.min(word.x0);
            }
            if word.x1.is_finite() {
                x1_max = x1_max.max(word.x1);
            }
        }
    }
    if x0_min.is_finite() && x1_max.is_finite() {
        Some(FormExtremes { x0_min, x1_max })
    } else {
        None
    }
}

/// One classified row with the question number it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub match_index: i64,
    pub row: Row,
}

/// Joins the Label and OID tracks on their shared question index.
/// Either side may be absent; that is a recorded outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub index: i64,
    /// Label row text with the trailing question number stripped.
    pub label_row: Option<String>,
    /// OID row text with the leading question number stripped.
    pub oid_row_content: Option<String>,
    /// Attached by the external domain/variable classification step.
    #[serde(default)]
    pub classification: Option<QuestionClassification>,
}

static TRAILING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\d+\s*$").expect("static regex"));
static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\s*").expect("static regex"));

fn is_integer(token: &str) -> bool {
    let t = token.trim();
    !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())
}

fn contains_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn parse_integer(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

fn last_integer(tokens: &[&str]) -> Option<i64> {
    tokens.iter().rev().find(|t| is_integer(t)).and_then(|t| parse_integer(t))
}

fn first_integer(tokens: &[&str]) -> Option<i64> {
    tokens.iter().find(|t| is_integer(t)).and_then(|t| parse_integer(t))
}

/// Removes a trailing integer (and surrounding spaces) from label text.
pub fn strip_trailing_integer(text: &str) -> String {
    TRAILING_INTEGER.replace(text, "").trim().to_string()
}

/// Removes a leading integer (and surrounding spaces) from OID text.
pub fn strip_leading_integer(text: &str) -> String {
    LEADING_INTEGER.replace(text, "").trim().to_string()
}

/// Row x bounds, falling back to the first/last word when the row-level
/// bounds are unusable.
fn row_x_bounds(row: &Row) -> Option<(f64, f64)> {
    let x0 = if row.x_min.is_finite() {
        Some(row.x_min)
    } else {
        row.words.first().map(|w| w.x0)
    };
    let x1 = if row.x_max.is_finite() {
        Some(row.x_max)
    } else {
        row.words.last().map(|w| w.x1)
    };
    match (x0, x1) {
        (Some(x0), Some(x1)) if x0.is_finite() && x1.is_finite() => Some((x0, x1)),
        _ => None,
    }
}

fn label_text_rules(row: &Row, tokens: &[&str]) -> bool {
    tokens.last().is_some_and(|t| is_integer(t))
        && !row.full_text.contains('=')
        && contains_digit(&row.full_text)
}

fn oid_text_rules(row: &Row, tokens: &[&str]) -> bool {
    tokens.first().is_some_and(|t| is_integer(t))
        && !row.full_text.contains('=')
        && contains_digit(&row.full_text)
}

/// Classifies rows into Label and OID candidates.
pub fn classify_rows(
    rows: &[Row],
    extremes: FormExtremes,
    params: &ClassifyParams,
) -> (Vec<TrackEntry>, Vec<TrackEntry>) {
    let eps = params.alignment_epsilon;
    let mut labels = Vec::new();
    let mut oids = Vec::new();

    for row in rows {
        let Some((x0, x1)) = row_x_bounds(row) else {
            debug!(
                page = row.page_number,
                row = row.row_index,
                "row has no usable x bounds, left unclassified"
            );
            continue;
        };
        let tokens = row.tokens();

        let left_aligned = (x0 - extremes.x0_min).abs() <= eps;
        let right_aligned = (x1 - extremes.x1_max).abs() <= eps;

        if left_aligned && right_aligned && label_text_rules(row, &tokens) {
            if let Some(match_index) = last_integer(&tokens) {
                labels.push(TrackEntry {
                    match_index,
                    row: row.clone(),
                });
            }
        }
        if left_aligned && oid_text_rules(row, &tokens) {
            if let Some(match_index) = first_integer(&tokens) {
                oids.push(TrackEntry {
                    match_index,
                    row: row.clone(),
                });
            }
        }
    }

    (labels, oids)
}

/// Builds the index-keyed mapping as the sorted union of both tracks.
pub fn build_mapping(labels: &[TrackEntry], oids: &[TrackEntry]) -> Vec<MappingEntry> {
    let label_texts: BTreeMap<i64, String> = labels
        .iter()
        .map(|e| (e.match_index, strip_trailing_integer(&e.row.full_text)))
        .collect();
    let oid_texts: BTreeMap<i64, String> = oids
        .iter()
        .map(|e| (e.match_index, strip_leading_integer(&e.row.full_text)))
        .collect();

    let indices: BTreeSet<i64> = label_texts.keys().chain(oid_texts.keys()).copied().collect();

    let mapping: Vec<MappingEntry> = indices
        .into_iter()
        .map(|index| MappingEntry {
            index,
            label_row: label_texts.get(&index).cloned(),
            oid_row_content: oid_texts.get(&index).cloned(),
            classification: None,
        })
        .collect();

    for entry in &mapping {
        if entry.label_row.is_none() {
            debug!(index = entry.index, "OID present but label missing");
        }
        if entry.oid_row_content.is_none() {
            debug!(index = entry.index, "label present but OID missing");
        }
    }

    mapping
}

/// Populates `label_rows`, `oid_rows`, and `mapping` on every form.
pub fn attach_tracks(forms: &mut IndexMap<String, Form>, params: &ClassifyParams) {
    for (key, form) in forms.iter_mut() {
        let Some(extremes) = form_extremes(&form.filtered_rows) else {
            warn!(form = %key, "no usable coordinates, skipping track classification");
            continue;
        };
        let (labels, oids) = classify_rows(&form.filtered_rows, extremes, params);
        debug!(
            form = %key,
            labels = labels.len(),
            oids = oids.len(),
            "classified annotation tracks"
        );
        form.mapping = build_mapping(&labels, &oids);
        form.label_rows = labels;
        form.oid_rows = oids;
    }
}
