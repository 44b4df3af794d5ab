//! Tests for Label/OID track classification and the joined mapping.

use acrf_core::forms::DetectionPatterns;
use acrf_core::forms::classify::{strip_leading_integer, strip_trailing_integer};
use acrf_core::high_level::{ExtractOptions, extract_forms};
use acrf_core::layout::{PageWords, Word};

fn word(text: &str, x0: f64, y0: f64, x1: f64) -> Word {
    Word {
        text: text.into(),
        page: 1,
        x0,
        y0,
        x1,
        y1: y0 + 10.0,
    }
}

/// One form page with every interesting row shape:
///
/// - "Site Number 12"   spans both extremes        → Label, index 12
/// - "12 DM.SITEID"     left-aligned, leading int  → OID, index 12
/// - "Race 3"           spans both extremes        → Label only
/// - "5 AE.AETERM"      left-aligned               → OID only
/// - "Weight = 70 kg 4" contains '='               → unclassified
/// - "7 VS.PULSE"       indented                   → unclassified
/// - "Investigator comments" no digits             → unclassified
fn fixture_page() -> PageWords {
    let mut words = vec![
        word("Form:", 40.0, 40.0, 80.0),
        word("Demographics", 85.0, 40.0, 181.0),
    ];
    words.extend([
        word("Site", 40.0, 100.0, 72.0),
        word("Number", 77.0, 100.0, 125.0),
        word("12", 544.0, 100.0, 560.0),
    ]);
    words.extend([word("12", 40.0, 130.0, 56.0), word("DM.SITEID", 60.0, 130.0, 132.0)]);
    words.extend([word("Race", 40.0, 160.0, 80.0), word("3", 550.0, 160.0, 558.0)]);
    words.extend([word("5", 40.0, 190.0, 48.0), word("AE.AETERM", 52.0, 190.0, 124.0)]);
    words.extend([
        word("Weight", 40.0, 220.0, 88.0),
        word("=", 93.0, 220.0, 101.0),
        word("70", 106.0, 220.0, 122.0),
        word("kg", 127.0, 220.0, 143.0),
        word("4", 552.0, 220.0, 560.0),
    ]);
    words.extend([word("7", 200.0, 250.0, 208.0), word("VS.PULSE", 212.0, 250.0, 284.0)]);
    words.extend([
        word("Investigator", 40.0, 280.0, 136.0),
        word("comments", 141.0, 280.0, 205.0),
    ]);
    PageWords {
        page_number: 1,
        page_width: 612.0,
        page_height: 792.0,
        words,
    }
}

fn patterns() -> DetectionPatterns {
    DetectionPatterns {
        form_name_patterns: vec![r"^Form:\s*(.+)$".into()],
        ..DetectionPatterns::default()
    }
}

// ============================================================================
// Track classification
// ============================================================================

#[test]
fn site_number_row_classifies_as_label_with_its_trailing_index() {
    let extraction =
        extract_forms(&[fixture_page()], &patterns(), &ExtractOptions::default());
    let form = &extraction.forms["DEMOGRAPHICS"];

    let label = form
        .label_rows
        .iter()
        .find(|e| e.match_index == 12)
        .expect("label 12");
    assert_eq!(label.row.full_text, "Site Number 12");

    let oid = form
        .oid_rows
        .iter()
        .find(|e| e.match_index == 12)
        .expect("oid 12");
    assert_eq!(oid.row.full_text, "12 DM.SITEID");
}

#[test]
fn rows_with_equals_or_indentation_stay_unclassified() {
    let extraction =
        extract_forms(&[fixture_page()], &patterns(), &ExtractOptions::default());
    let form = &extraction.forms["DEMOGRAPHICS"];

    let indices: Vec<i64> = form.mapping.iter().map(|e| e.index).collect();
    // '=' excludes the Weight row (4, 70); indentation excludes 7.
    assert!(!indices.contains(&4));
    assert!(!indices.contains(&70));
    assert!(!indices.contains(&7));
}

// ============================================================================
// Mapping union
// ============================================================================

#[test]
fn mapping_is_the_sorted_union_of_both_tracks() {
    let extraction =
        extract_forms(&[fixture_page()], &patterns(), &ExtractOptions::default());
    let form = &extraction.forms["DEMOGRAPHICS"];

    let indices: Vec<i64> = form.mapping.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![3, 5, 12]);

    let race = &form.mapping[0];
    assert_eq!(race.label_row.as_deref(), Some("Race"));
    assert_eq!(race.oid_row_content, None);

    let aeterm = &form.mapping[1];
    assert_eq!(aeterm.label_row, None);
    assert_eq!(aeterm.oid_row_content.as_deref(), Some("AE.AETERM"));

    let site = &form.mapping[2];
    assert_eq!(site.label_row.as_deref(), Some("Site Number"));
    assert_eq!(site.oid_row_content.as_deref(), Some("DM.SITEID"));
    assert!(site.classification.is_none());
}

// ============================================================================
// Index stripping
// ============================================================================

#[test]
fn index_stripping_trims_the_integer_and_surrounding_spaces() {
    assert_eq!(strip_trailing_integer("Site Number 12"), "Site Number");
    assert_eq!(strip_trailing_integer("Race 3"), "Race");
    assert_eq!(strip_trailing_integer("No index here"), "No index here");
    assert_eq!(strip_leading_integer("12 DM.SITEID"), "DM.SITEID");
    assert_eq!(strip_leading_integer("DM.SITEID"), "DM.SITEID");
}
