//! Tests for the JSON wire shapes exchanged with the extraction and
//! classification services.

use acrf_core::annot::{
    AnnotationRect, MappingType, QuestionClassification, RectKind, VariableMapping,
};
use acrf_core::forms::DetectionPatterns;
use acrf_core::layout::PageWords;
use serde_json::json;

#[test]
fn page_words_parse_from_the_extractor_shape() {
    let value = json!({
        "page_number": 1,
        "page_width": 612.0,
        "page_height": 792.0,
        "words": [
            {"text": "Site", "page": 1, "x0": 40.0, "y0": 100.0, "x1": 72.0, "y1": 110.0}
        ]
    });
    let page: PageWords = serde_json::from_value(value).unwrap();
    assert_eq!(page.words.len(), 1);
    assert_eq!(page.words[0].text, "Site");
}

#[test]
fn detection_patterns_tolerate_missing_families() {
    let patterns: DetectionPatterns =
        serde_json::from_value(json!({"form_name_patterns": ["^Form:\\s*(.+)$"]})).unwrap();
    assert_eq!(patterns.form_name_patterns.len(), 1);
    assert!(patterns.header_patterns.is_empty());
    assert!(patterns.page_number_patterns.is_empty());
}

#[test]
fn classification_accepts_structured_and_legacy_forms() {
    let structured: QuestionClassification = serde_json::from_value(json!([
        {"domain_code": "DM", "domain_label": "Demographics",
         "variable": "SITEID", "mapping_type": "standard"}
    ]))
    .unwrap();
    assert_eq!(
        structured,
        QuestionClassification::Structured(vec![VariableMapping {
            domain_code: "DM".into(),
            domain_label: "Demographics".into(),
            variable: "SITEID".into(),
            mapping_type: MappingType::Standard,
        }])
    );

    let legacy: QuestionClassification =
        serde_json::from_value(json!("DM:SITEID; DM:USUBJID")).unwrap();
    assert_eq!(
        legacy,
        QuestionClassification::Legacy("DM:SITEID; DM:USUBJID".into())
    );

    let not_submitted: QuestionClassification = serde_json::from_value(json!([
        {"domain_code": "DM", "variable": "SITEID", "mapping_type": "not_submitted"}
    ]))
    .unwrap();
    assert!(not_submitted.is_not_submitted());
}

#[test]
fn annotation_rects_serialize_for_the_renderer() {
    let rect = AnnotationRect {
        page_number: 1,
        x: 570.0,
        y: 687.0,
        width: 37.0,
        height: 10.0,
        text: "SITEID".into(),
        kind: RectKind::Oid,
        rect: [570.0, 687.0, 607.0, 697.0],
        background_color: None,
        form_name: "DEMOGRAPHICS".into(),
        original_index: Some(12),
        variable_index: Some(0),
        domain_index: None,
    };
    let value = serde_json::to_value(&rect).unwrap();

    assert_eq!(value["type"], "OID");
    assert_eq!(value["rect"], json!([570.0, 687.0, 607.0, 697.0]));
    assert_eq!(value["original_index"], 12);
    // Absent options are omitted, not null.
    assert!(value.get("background_color").is_none());
    assert!(value.get("domain_index").is_none());
}
