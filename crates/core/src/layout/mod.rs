//! Visual layout reconstruction: words and row clustering.

pub mod params;
pub mod rows;
pub mod word;

pub use params::{ClusterAnchor, RowParams};
pub use rows::{Row, RowDistribution, group_words_into_rows, rows_for_pages};
pub use word::{PageDimensions, PageRows, PageWords, Word};
