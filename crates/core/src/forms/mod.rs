//! Logical form reconstruction: title detection, segmentation, and
//! Label/OID track classification.

pub mod classify;
pub mod patterns;
pub mod segmenter;
pub mod titles;

pub use classify::{ClassifyParams, MappingEntry, TrackEntry, attach_tracks};
pub use patterns::{DetectionPatterns, Matcher, NoiseFilter, compile_matchers};
pub use segmenter::{Form, Segment, SegmenterOptions, assign_rows_to_forms};
pub use titles::{TitleEvent, extract_form_titles, normalize_form_name};
