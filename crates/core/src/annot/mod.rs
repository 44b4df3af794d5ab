//! Annotation rectangle generation.
//!
//! Turns classified forms plus externally supplied domain/variable
//! classifications into per-page rectangle lists for the rendering step.

pub mod classification;
pub mod color;
pub mod config;
pub mod rects;
pub mod width;

pub use classification::{
    MappingType, NOT_SUBMITTED_TOKEN, QuestionClassification, VariableMapping,
};
pub use color::{DomainColorState, PALETTE, Rgb};
pub use config::AnnotConfig;
pub use rects::{
    AnnotationRect, RectKind, RectsByPage, generate_annotation_rects,
    generate_annotation_rects_with_state,
};
pub use width::text_width;
