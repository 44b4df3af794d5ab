//! Computes per-page annotation rectangles for classified forms.
//!
//! Two independent families: form-level domain badges pinned to the top
//! left of every page a form spans, and per-question Label/OID boxes
//! placed beside their source rows. Inputs are in extraction coordinates
//! (top-left origin); output rectangles are in drawing coordinates
//! (bottom-left origin). Incomplete geometry skips the one rectangle with
//! a warning; generation never fails.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::color::{DomainColorState, Rgb};
use super::config::AnnotConfig;
use super::width::text_width;
use crate::forms::{Form, TrackEntry};
use crate::layout::{PageDimensions, Row};
use crate::utils::flip_y;

/// Which annotation family a rectangle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RectKind {
    Label,
    #[serde(rename = "OID")]
    Oid,
    FormDomain,
}

/// One overlay rectangle, in drawing coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRect {
    pub page_number: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Text the renderer paints inside the box.
    pub text: String,
    #[serde(rename = "type")]
    pub kind: RectKind,
    /// `[x0, y0, x1, y1]` in drawing coordinates.
    pub rect: [f64; 4],
    /// Fill color; `None` means the renderer omits the fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgb>,
    pub form_name: String,
    /// Question index for Label/OID boxes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_index: Option<i64>,
    /// Position within a multi-variable stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_index: Option<usize>,
    /// Position within a domain badge stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_index: Option<usize>,
}

/// Rectangles grouped by page, in generation order within each page.
pub type RectsByPage = BTreeMap<u32, Vec<AnnotationRect>>;

fn dimensions_map(pages: &[PageDimensions]) -> FxHashMap<u32, (f64, f64)> {
    pages
        .iter()
        .filter(|p| p.page_width.is_finite() && p.page_height.is_finite() && p.page_height > 0.0)
        .map(|p| (p.page_number, (p.page_width, p.page_height)))
        .collect()
}

/// Pages a form's annotations belong on: title positions first, the
/// aggregated page union second, pages referenced by classified rows last.
fn extract_form_pages(form: &Form) -> Vec<u32> {
    let title_pages: std::collections::BTreeSet<u32> = form
        .title_positions
        .iter()
        .map(|t| t.page_number)
        .collect();
    if !title_pages.is_empty() {
        return title_pages.into_iter().collect();
    }
    if !form.pages.is_empty() {
        return form.pages.clone();
    }
    let row_pages: std::collections::BTreeSet<u32> = form
        .mapping
        .iter()
        .flat_map(|entry| {
            let label = find_track(&form.label_rows, entry.index).map(|e| e.row.page_number);
            let oid = find_track(&form.oid_rows, entry.index).map(|e| e.row.page_number);
            label.into_iter().chain(oid)
        })
        .collect();
    row_pages.into_iter().collect()
}

fn find_track(entries: &[TrackEntry], index: i64) -> Option<&TrackEntry> {
    entries.iter().find(|e| e.match_index == index)
}

fn push_rect(out: &mut RectsByPage, rect: AnnotationRect) {
    out.entry(rect.page_number).or_default().push(rect);
}

fn row_y_center(row: &Row) -> f64 {
    if row.y_center.is_finite() {
        row.y_center
    } else {
        (row.y_min + row.y_max) / 2.0
    }
}

fn domain_badges(
    form_key: &str,
    form: &Form,
    dims: &FxHashMap<u32, (f64, f64)>,
    cfg: &AnnotConfig,
    state: &mut DomainColorState,
    out: &mut RectsByPage,
) {
    if form.form_domains.is_empty() {
        return;
    }
    let form_pages = extract_form_pages(form);
    if form_pages.is_empty() {
        warn!(form = form_key, "cannot resolve pages, skipping domain badges");
        return;
    }

    let widths: Vec<f64> = form
        .form_domains
        .iter()
        .map(|d| text_width(d, cfg.domain_font_size, cfg, cfg.domain_max_width))
        .collect();

    for &page_number in &form_pages {
        let Some(&(_, page_height)) = dims.get(&page_number) else {
            warn!(form = form_key, page = page_number, "missing page dimensions");
            continue;
        };
        let base_y = flip_y(cfg.top_margin, page_height);

        let mut x = cfg.left_margin;
        for (domain_index, (domain, &width)) in
            form.form_domains.iter().zip(widths.iter()).enumerate()
        {
            let color = state.color_for(domain);
            let rect = [
                x,
                base_y - cfg.box_height / 2.0,
                x + width,
                base_y + cfg.box_height / 2.0,
            ];
            push_rect(
                out,
                AnnotationRect {
                    page_number,
                    x: rect[0],
                    y: rect[1],
                    width,
                    height: cfg.box_height,
                    text: domain.clone(),
                    kind: RectKind::FormDomain,
                    rect,
                    background_color: Some(color),
                    form_name: form_key.to_string(),
                    original_index: None,
                    variable_index: None,
                    domain_index: Some(domain_index),
                },
            );
            x += width + cfg.stack_gap;
        }
    }
}

/// Builds one Label or OID box beside its source row.
#[allow(clippy::too_many_arguments)]
fn question_box(
    kind: RectKind,
    row: &Row,
    variable: &str,
    variable_index: usize,
    index: i64,
    form_key: &str,
    dims: &FxHashMap<u32, (f64, f64)>,
    cfg: &AnnotConfig,
    background_color: Option<Rgb>,
) -> Option<AnnotationRect> {
    let Some(&(_, page_height)) = dims.get(&row.page_number) else {
        warn!(
            form = form_key,
            index,
            page = row.page_number,
            "missing page dimensions, skipping box"
        );
        return None;
    };

    let width = text_width(variable, cfg.label_font_size, cfg, cfg.max_width);
    let offset = variable_index as f64 * (width + cfg.stack_gap);
    let x = match kind {
        RectKind::Label => {
            if !row.x_max.is_finite() {
                warn!(form = form_key, index, "label row has no right edge, skipping box");
                return None;
            }
            row.x_max + cfg.gap + offset
        }
        RectKind::Oid => {
            if !row.x_min.is_finite() {
                warn!(form = form_key, index, "OID row has no left edge, skipping box");
                return None;
            }
            row.x_min - cfg.gap - width - offset
        }
        RectKind::FormDomain => return None,
    };

    let y_center = row_y_center(row);
    if !y_center.is_finite() {
        warn!(form = form_key, index, "row has no vertical center, skipping box");
        return None;
    }
    let y = flip_y(y_center, page_height);
    let rect = [
        x,
        y - cfg.box_height / 2.0,
        x + width,
        y + cfg.box_height / 2.0,
    ];

    Some(AnnotationRect {
        page_number: row.page_number,
        x: rect[0],
        y: rect[1],
        width,
        height: cfg.box_height,
        text: variable.to_string(),
        kind,
        rect,
        background_color,
        form_name: form_key.to_string(),
        original_index: Some(index),
        variable_index: Some(variable_index),
        domain_index: None,
    })
}

fn question_boxes(
    form_key: &str,
    form: &Form,
    dims: &FxHashMap<u32, (f64, f64)>,
    cfg: &AnnotConfig,
    state: &mut DomainColorState,
    out: &mut RectsByPage,
) {
    for entry in &form.mapping {
        let Some(classification) = &entry.classification else {
            debug!(form = form_key, index = entry.index, "no classification attached, skipping");
            continue;
        };
        let variables = classification.variables(entry.index);
        if variables.is_empty() {
            continue;
        }
        let background_color = classification
            .primary_domain()
            .map(|domain| state.color_for(&domain));

        if let Some(label) = find_track(&form.label_rows, entry.index) {
            for (variable_index, variable) in variables.iter().enumerate() {
                if let Some(rect) = question_box(
                    RectKind::Label,
                    &label.row,
                    variable,
                    variable_index,
                    entry.index,
                    form_key,
                    dims,
                    cfg,
                    background_color,
                ) {
                    push_rect(out, rect);
                }
            }
        }
        if let Some(oid) = find_track(&form.oid_rows, entry.index) {
            for (variable_index, variable) in variables.iter().enumerate() {
                if let Some(rect) = question_box(
                    RectKind::Oid,
                    &oid.row,
                    variable,
                    variable_index,
                    entry.index,
                    form_key,
                    dims,
                    cfg,
                    background_color,
                ) {
                    push_rect(out, rect);
                }
            }
        }
    }
}

/// Generates rectangles for every form with a fresh color state.
pub fn generate_annotation_rects(
    forms: &IndexMap<String, Form>,
    pages: &[PageDimensions],
    cfg: &AnnotConfig,
) -> RectsByPage {
    let keys: Vec<String> = forms.keys().cloned().collect();
    let mut state = DomainColorState::new();
    generate_annotation_rects_with_state(forms, &keys, pages, cfg, &mut state)
}

/// Generates rectangles for a subset of forms, threading the color state
/// so batched calls assign the same colors as one unbatched run.
pub fn generate_annotation_rects_with_state(
    forms: &IndexMap<String, Form>,
    form_keys: &[String],
    pages: &[PageDimensions],
    cfg: &AnnotConfig,
    state: &mut DomainColorState,
) -> RectsByPage {
    let mut out = RectsByPage::new();
    let dims = dimensions_map(pages);
    if dims.is_empty() {
        warn!("no page dimensions available, cannot place annotations");
        return out;
    }

    for key in form_keys {
        let Some(form) = forms.get(key) else {
            warn!(form = %key, "unknown form key, skipping");
            continue;
        };
        // Form-level domains claim their colors before question boxes, so
        // badge and box colors agree within the form.
        for domain in &form.form_domains {
            state.color_for(domain);
        }
        domain_badges(key, form, &dims, cfg, state, &mut out);
        question_boxes(key, form, &dims, cfg, state, &mut out);
    }

    let total: usize = out.values().map(Vec::len).sum();
    debug!(pages = out.len(), rects = total, "annotation generation finished");
    out
}
