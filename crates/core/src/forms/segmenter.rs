//! Segments rows into logical forms using detected title boundaries.
//!
//! Title events are walked in document order; consecutive same-named
//! events extend the current segment, a differently-named event opens a
//! new one. A segment's content runs from the row after its first title to
//! the row before the next segment's first title (or to document end for
//! the last segment), with noise rows dropped. All segments sharing a
//! normalized form name aggregate into one `Form`.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::{MappingEntry, TrackEntry};
use super::patterns::NoiseFilter;
use super::titles::TitleEvent;
use crate::layout::{PageRows, Row};

/// Segmentation policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmenterOptions {
    /// When a form occurs as several segments (possibly on non-adjacent
    /// pages), classification normally sees only the first segment's rows.
    /// Set to expose the concatenation of every segment instead.
    #[serde(default)]
    pub expose_all_segments: bool,
}

/// One contiguous occurrence of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start_page: u32,
    /// Page holding the next segment's first title; `None` means this is
    /// the last segment and it extends to document end.
    pub end_page: Option<u32>,
    pub pages: Vec<u32>,
    pub filtered_rows: Vec<Row>,
    pub row_count: usize,
    pub word_count: usize,
    pub full_text: String,
}

/// The aggregate of all segments sharing one normalized form name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub title: String,
    pub normalized_title: String,
    pub title_positions: Vec<TitleEvent>,
    pub segments: Vec<Segment>,
    pub pages: Vec<u32>,
    pub is_multi_page: bool,
    pub row_count: usize,
    pub word_count: usize,
    pub full_text: String,
    /// Canonical rows used by classification; see
    /// [`SegmenterOptions::expose_all_segments`].
    pub filtered_rows: Vec<Row>,
    pub label_rows: Vec<TrackEntry>,
    pub oid_rows: Vec<TrackEntry>,
    pub mapping: Vec<MappingEntry>,
    /// Domain strings attached by the external classification step, used
    /// for form-level badges.
    pub form_domains: Vec<String>,
}

impl Form {
    fn new(title: &str, normalized_title: &str) -> Self {
        Self {
            title: title.to_string(),
            normalized_title: normalized_title.to_string(),
            title_positions: Vec::new(),
            segments: Vec::new(),
            pages: Vec::new(),
            is_multi_page: false,
            row_count: 0,
            word_count: 0,
            full_text: String::new(),
            filtered_rows: Vec::new(),
            label_rows: Vec::new(),
            oid_rows: Vec::new(),
            mapping: Vec::new(),
            form_domains: Vec::new(),
        }
    }
}

/// A maximal run of consecutive same-named title events.
struct TitleRun<'a> {
    form_name: &'a str,
    normalized_name: &'a str,
    titles: Vec<&'a TitleEvent>,
}

fn group_title_runs(titles: &[TitleEvent]) -> Vec<TitleRun<'_>> {
    let mut runs: Vec<TitleRun<'_>> = Vec::new();
    for event in titles {
        match runs.last_mut() {
            Some(run) if run.normalized_name == event.normalized_name => {
                run.titles.push(event);
            }
            _ => runs.push(TitleRun {
                form_name: &event.form_name,
                normalized_name: &event.normalized_name,
                titles: vec![event],
            }),
        }
    }
    runs
}

/// Collects each segment's rows and aggregates same-named segments into
/// Forms, keyed by normalized title in discovery order.
pub fn assign_rows_to_forms(
    pages: &[PageRows],
    titles: &[TitleEvent],
    noise: &NoiseFilter,
    options: &SegmenterOptions,
) -> IndexMap<String, Form> {
    let mut forms: IndexMap<String, Form> = IndexMap::new();
    let runs = group_title_runs(titles);

    for (idx, run) in runs.iter().enumerate() {
        let next_run = runs.get(idx + 1);
        let first_title = run.titles[0];
        let start_page = first_title.page_number;

        // Later titles on the same page win, so content starts below the
        // lowest title occurrence.
        let mut page_title_row: FxHashMap<u32, usize> = FxHashMap::default();
        for title in &run.titles {
            page_title_row.insert(title.page_number, title.row_index);
        }

        let boundary = next_run.map(|next| {
            let next_first = next.titles[0];
            (next_first.page_number, next_first.row_index.saturating_sub(1))
        });
        let end_page = boundary.map(|(page, _)| page);

        let mut filtered_rows: Vec<Row> = Vec::new();
        let mut collected_pages: BTreeSet<u32> = BTreeSet::new();

        for page in pages {
            if page.page_number < start_page {
                continue;
            }
            if let Some(end) = end_page
                && page.page_number > end
            {
                continue;
            }

            let page_start_row = match page_title_row.get(&page.page_number) {
                Some(&title_row) => title_row + 1,
                None if page.page_number == start_page => first_title.row_index + 1,
                None => 1,
            };
            let page_end_row = match boundary {
                Some((end, end_row)) if page.page_number == end => Some(end_row),
                _ => None,
            };

            for row in &page.rows {
                if row.row_index < page_start_row {
                    continue;
                }
                if let Some(end_row) = page_end_row
                    && row.row_index > end_row
                {
                    continue;
                }
                if let Some(matcher) = noise.matches(&row.full_text) {
                    debug!(
                        matcher,
                        page = page.page_number,
                        row = row.row_index,
                        text = %row.full_text,
                        "dropped noise row"
                    );
                    continue;
                }
                collected_pages.insert(page.page_number);
                filtered_rows.push(row.clone());
            }
        }

        let segment = Segment {
            start_page,
            end_page,
            pages: collected_pages.into_iter().collect(),
            row_count: filtered_rows.len(),
            word_count: filtered_rows.iter().map(|r| r.words.len()).sum(),
            full_text: itertools::join(filtered_rows.iter().map(|r| r.full_text.as_str()), " "),
            filtered_rows,
        };
        debug!(
            form = run.form_name,
            rows = segment.row_count,
            words = segment.word_count,
            pages = ?segment.pages,
            "segment collected"
        );

        let form = forms
            .entry(run.normalized_name.to_string())
            .or_insert_with(|| Form::new(run.form_name, run.normalized_name));
        form.title_positions
            .extend(run.titles.iter().map(|t| (*t).clone()));

        let union: BTreeSet<u32> = form
            .pages
            .iter()
            .copied()
            .chain(segment.pages.iter().copied())
            .collect();
        form.pages = union.into_iter().collect();
        form.is_multi_page = form.pages.len() > 1;
        form.row_count += segment.row_count;
        form.word_count += segment.word_count;
        if !segment.full_text.is_empty() {
            if !form.full_text.is_empty() {
                form.full_text.push(' ');
            }
            form.full_text.push_str(&segment.full_text);
        }
        form.segments.push(segment);
    }

    // Flatten to the canonical row set the classifier will see.
    for form in forms.values_mut() {
        form.filtered_rows = if options.expose_all_segments {
            form.segments
                .iter()
                .flat_map(|s| s.filtered_rows.iter().cloned())
                .collect()
        } else {
            form.segments
                .first()
                .map(|s| s.filtered_rows.clone())
                .unwrap_or_default()
        };
    }

    forms
}
