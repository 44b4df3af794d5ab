//! Input word records and per-page containers.

use serde::{Deserialize, Serialize};

use super::rows::Row;

/// One word extracted from the source document's text layer, in extraction
/// coordinates (origin top-left, Y grows downward). Immutable input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub page: u32,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Size metadata for one page, supplied by the upstream extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub page_number: u32,
    pub page_width: f64,
    pub page_height: f64,
}

/// All words on one page, as delivered by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageWords {
    pub page_number: u32,
    pub page_width: f64,
    pub page_height: f64,
    pub words: Vec<Word>,
}

impl PageWords {
    pub fn dimensions(&self) -> PageDimensions {
        PageDimensions {
            page_number: self.page_number,
            page_width: self.page_width,
            page_height: self.page_height,
        }
    }
}

/// One page's words regrouped into visual rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRows {
    pub page_number: u32,
    pub page_width: f64,
    pub page_height: f64,
    pub rows: Vec<Row>,
    pub row_count: usize,
    pub word_count: usize,
}
