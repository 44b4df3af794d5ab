//! acrf - layout reconstruction and annotation placement for CRF documents.
//!
//! Consumes per-word bounding boxes extracted from a Case Report Form,
//! reassembles visual rows, segments them into logical forms, classifies
//! Label/OID annotation tracks, and computes the exact page geometry for
//! overlay annotations. Extraction, AI classification, and rendering are
//! collaborator concerns; this crate is pure in-memory computation.

pub mod annot;
pub mod error;
pub mod forms;
pub mod high_level;
pub mod layout;
pub mod utils;

pub use error::{AcrfError, Result};
