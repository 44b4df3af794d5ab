//! Groups word records into visual rows by vertical proximity.
//!
//! Words are sorted by `(y0, x0)`, then scanned once: a word joins the
//! current row when its `y0` is within tolerance of the row's reference
//! point, otherwise a new row starts. Finished rows are reordered
//! left-to-right before their text is final. Every word ends up in
//! exactly one row.

use serde::{Deserialize, Serialize};

use super::params::{ClusterAnchor, RowParams};
use super::word::{PageRows, PageWords, Word};

/// An ordered cluster of words on one page.
///
/// `y_center` is the arithmetic mean of member `y0` values, recomputed
/// after every merge. With [`ClusterAnchor::DriftingMean`] it is also the
/// tolerance reference, so it drifts as members accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// 1-based position of the row on its page.
    pub row_index: usize,
    pub page_number: u32,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
    pub y_center: f64,
    pub word_count: usize,
    pub words: Vec<Word>,
    /// Member word texts joined by position with single spaces.
    pub full_text: String,
}

impl Row {
    fn from_word(row_index: usize, page_number: u32, word: Word) -> Self {
        Self {
            row_index,
            page_number,
            x_min: word.x0,
            x_max: word.x1,
            y_min: word.y0,
            y_max: word.y1,
            width: word.x1 - word.x0,
            height: word.y1 - word.y0,
            y_center: word.y0,
            word_count: 1,
            full_text: word.text.clone(),
            words: vec![word],
        }
    }

    fn push(&mut self, word: Word) {
        self.x_min = self.x_min.min(word.x0);
        self.x_max = self.x_max.max(word.x1);
        self.y_min = self.y_min.min(word.y0);
        self.y_max = self.y_max.max(word.y1);
        self.word_count += 1;
        self.words.push(word);
        let total_y0: f64 = self.words.iter().map(|w| w.y0).sum();
        self.y_center = total_y0 / self.words.len() as f64;
        self.full_text = itertools::join(self.words.iter().map(|w| w.text.as_str()), " ");
        self.width = self.x_max - self.x_min;
        self.height = self.y_max - self.y_min;
    }

    /// Tokens of the row: trimmed word texts when words are present,
    /// otherwise `full_text` split on whitespace.
    pub fn tokens(&self) -> Vec<&str> {
        if !self.words.is_empty() {
            self.words
                .iter()
                .map(|w| w.text.trim())
                .filter(|t| !t.is_empty())
                .collect()
        } else {
            self.full_text.split_whitespace().collect()
        }
    }
}

/// Groups one page's words into rows.
pub fn group_words_into_rows(words: &[Word], page_number: u32, params: &RowParams) -> Vec<Row> {
    if words.is_empty() {
        return Vec::new();
    }

    // The scan needs a total order. A tolerance-aware comparator ("x
    // within the window, else y") is non-transitive on dense jittered
    // baselines and panics the std sort, so the left-to-right ordering
    // inside each row is restored after clustering instead.
    let tol = params.y_tolerance;
    let mut sorted: Vec<Word> = words.to_vec();
    sorted.sort_by(|a, b| a.y0.total_cmp(&b.y0).then(a.x0.total_cmp(&b.x0)));

    let mut rows: Vec<Row> = Vec::new();
    // First member's y0 of the current row, used by the FirstWord anchor.
    let mut anchor_y0 = f64::NAN;

    for word in sorted {
        let joins = rows.last().is_some_and(|row| {
            let reference = match params.anchor {
                ClusterAnchor::DriftingMean => row.y_center,
                ClusterAnchor::FirstWord => anchor_y0,
            };
            (word.y0 - reference).abs() <= tol
        });

        if joins {
            rows.last_mut().expect("current row exists").push(word);
        } else {
            anchor_y0 = word.y0;
            rows.push(Row::from_word(rows.len() + 1, page_number, word));
        }
    }

    for row in &mut rows {
        row.words.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        row.full_text = itertools::join(row.words.iter().map(|w| w.text.as_str()), " ");
    }

    rows
}

/// Regroups every page's words into rows, preserving page metadata.
pub fn rows_for_pages(pages: &[PageWords], params: &RowParams) -> Vec<PageRows> {
    pages
        .iter()
        .map(|page| {
            let rows = group_words_into_rows(&page.words, page.page_number, params);
            tracing::debug!(
                page = page.page_number,
                rows = rows.len(),
                words = page.words.len(),
                "grouped words into rows"
            );
            PageRows {
                page_number: page.page_number,
                page_width: page.page_width,
                page_height: page.page_height,
                row_count: rows.len(),
                word_count: page.words.len(),
                rows,
            }
        })
        .collect()
}

/// Summary statistics over a rows-by-page result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDistribution {
    pub total_pages: usize,
    pub total_rows: usize,
    pub total_words: usize,
    /// Mean words per row, rounded to two decimals. Zero when no rows.
    pub avg_words_per_row: f64,
}

impl RowDistribution {
    pub fn from_pages(pages: &[PageRows]) -> Self {
        let total_rows: usize = pages.iter().map(|p| p.row_count).sum();
        let total_words: usize = pages.iter().map(|p| p.word_count).sum();
        let avg = if total_rows == 0 {
            0.0
        } else {
            (total_words as f64 / total_rows as f64 * 100.0).round() / 100.0
        };
        Self {
            total_pages: pages.len(),
            total_rows,
            total_words,
            avg_words_per_row: avg,
        }
    }
}
