//! Annotation geometry tunables.

use serde::{Deserialize, Serialize};

/// Parameters for annotation rectangle placement.
///
/// Defaults match the production configuration; every value can be
/// overridden by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotConfig {
    /// Horizontal distance between a row edge and its annotation box.
    pub gap: f64,

    /// Fixed box height; only widths are dynamic.
    pub box_height: f64,

    /// Extra width added to every computed text width.
    pub text_pad: f64,

    /// Lower bound for any computed box width.
    pub min_width: f64,

    /// Upper bound for per-question Label/OID box widths.
    pub max_width: f64,

    /// Upper bound for form-level domain badge widths; domain strings run
    /// longer than variable names.
    pub domain_max_width: f64,

    /// Font size assumed when estimating Label/OID box text width.
    pub label_font_size: f64,

    /// Font size assumed when estimating domain badge text width.
    pub domain_font_size: f64,

    /// Domain badge anchor: distance from the left page edge.
    pub left_margin: f64,

    /// Domain badge anchor: distance from the top page edge.
    pub top_margin: f64,

    /// Gap between horizontally stacked boxes (domain badges and
    /// multi-variable question boxes).
    pub stack_gap: f64,
}

impl Default for AnnotConfig {
    fn default() -> Self {
        Self {
            gap: 10.0,
            box_height: 10.0,
            text_pad: 0.0,
            min_width: 18.0,
            max_width: 80.0,
            domain_max_width: 260.0,
            label_font_size: 18.0,
            domain_font_size: 13.0,
            left_margin: 50.0,
            top_margin: 30.0,
            stack_gap: 5.0,
        }
    }
}
