//! Tests for row clustering: partition properties, drifting-center
//! behavior, and page-level regrouping.

use acrf_core::layout::{
    ClusterAnchor, PageWords, RowParams, Word, group_words_into_rows, rows_for_pages,
};
use acrf_core::utils::{EPSILON, approx_eq};

fn word(text: &str, x0: f64, y0: f64) -> Word {
    Word {
        text: text.into(),
        page: 1,
        x0,
        y0,
        x1: x0 + 20.0,
        y1: y0 + 10.0,
    }
}

// ============================================================================
// Partition properties
// ============================================================================

#[test]
fn every_word_lands_in_exactly_one_row() {
    let words = vec![
        word("a", 10.0, 100.0),
        word("b", 40.0, 101.0),
        word("c", 10.0, 130.0),
        word("d", 40.0, 129.5),
        word("e", 10.0, 200.0),
    ];
    let rows = group_words_into_rows(&words, 1, &RowParams::default());

    let total: usize = rows.iter().map(|r| r.word_count).sum();
    assert_eq!(total, words.len());
    for row in &rows {
        assert_eq!(row.word_count, row.words.len());
    }

    // Every input word is present exactly once across all rows.
    for w in &words {
        let occurrences: usize = rows
            .iter()
            .flat_map(|r| r.words.iter())
            .filter(|rw| rw.text == w.text)
            .count();
        assert_eq!(occurrences, 1, "word {:?}", w.text);
    }
}

#[test]
fn y_center_is_the_mean_of_member_y0() {
    let words = vec![
        word("a", 10.0, 100.0),
        word("b", 40.0, 101.0),
        word("c", 70.0, 102.0),
    ];
    let rows = group_words_into_rows(&words, 1, &RowParams::default());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].y_center, 101.0);

    for row in &rows {
        let mean: f64 =
            row.words.iter().map(|w| w.y0).sum::<f64>() / row.words.len() as f64;
        assert!(approx_eq(row.y_center, mean, EPSILON));
    }
}

#[test]
fn row_indices_are_one_based_and_sequential() {
    let words = vec![
        word("a", 10.0, 100.0),
        word("b", 10.0, 130.0),
        word("c", 10.0, 160.0),
    ];
    let rows = group_words_into_rows(&words, 1, &RowParams::default());
    let indices: Vec<usize> = rows.iter().map(|r| r.row_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

// ============================================================================
// Drifting-center edge cases
// ============================================================================

#[test]
fn drifting_center_splits_100_101_5_103_at_tolerance_2() {
    // After merging {100, 101.5} the running center sits at 100.75, so the
    // word at 103 is 2.25 away and starts a new row: first and last words
    // do NOT share a row even though a 3pt spread might suggest otherwise.
    let words = vec![
        word("a", 10.0, 100.0),
        word("b", 40.0, 101.5),
        word("c", 70.0, 103.0),
    ];
    let rows = group_words_into_rows(&words, 1, &RowParams::default());

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].full_text, "a b");
    assert_eq!(rows[0].y_center, 100.75);
    assert_eq!(rows[1].full_text, "c");
}

#[test]
fn drifting_center_admits_words_beyond_the_first_anchor() {
    // 102.5 is 2.5 from the first word but only 1.75 from the drifted
    // center, so the drifting reference merges what a fixed first-word
    // window would split.
    let words = vec![
        word("a", 10.0, 100.0),
        word("b", 40.0, 101.5),
        word("c", 70.0, 102.5),
    ];
    let drifting = group_words_into_rows(&words, 1, &RowParams::default());
    assert_eq!(drifting.len(), 1);

    let fixed = group_words_into_rows(
        &words,
        1,
        &RowParams {
            anchor: ClusterAnchor::FirstWord,
            ..RowParams::default()
        },
    );
    assert_eq!(fixed.len(), 2);
}

#[test]
fn dense_jittered_baselines_cluster_without_panicking() {
    // 30 lines of 12 words whose baselines wobble by 0 to 3.6pt, so many
    // word pairs sit inside the 2.0 tolerance of each other while their
    // neighbors do not. The partition property must hold on such pages.
    let mut words = Vec::new();
    for line in 0..30u32 {
        for col in 0..12u32 {
            let jitter = ((line * 12 + col) % 5) as f64 * 0.9;
            let mut w = word("x", 20.0 + 45.0 * col as f64, 40.0 + 20.0 * line as f64 + jitter);
            w.text = format!("w{line}_{col}");
            words.push(w);
        }
    }

    let rows = group_words_into_rows(&words, 1, &RowParams::default());

    let total: usize = rows.iter().map(|r| r.word_count).sum();
    assert_eq!(total, words.len());
    for w in &words {
        let occurrences: usize = rows
            .iter()
            .flat_map(|r| r.words.iter())
            .filter(|rw| rw.text == w.text)
            .count();
        assert_eq!(occurrences, 1, "word {:?}", w.text);
    }

    for row in &rows {
        // Members read left to right and the row text reflects that order.
        for pair in row.words.windows(2) {
            assert!(pair[0].x0 <= pair[1].x0);
        }
        let joined: Vec<&str> = row.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(row.full_text, joined.join(" "));
        // No row straddles two visual lines (20pt apart, jitter under 4pt).
        assert!(row.y_max - row.y_min < 20.0);
    }
}

// ============================================================================
// Page regrouping
// ============================================================================

#[test]
fn rows_for_pages_preserves_page_metadata() {
    let pages = vec![PageWords {
        page_number: 3,
        page_width: 612.0,
        page_height: 792.0,
        words: vec![word("a", 10.0, 100.0), word("b", 10.0, 130.0)],
    }];
    let page_rows = rows_for_pages(&pages, &RowParams::default());

    assert_eq!(page_rows.len(), 1);
    assert_eq!(page_rows[0].page_number, 3);
    assert_eq!(page_rows[0].page_height, 792.0);
    assert_eq!(page_rows[0].row_count, 2);
    assert_eq!(page_rows[0].word_count, 2);
    for row in &page_rows[0].rows {
        assert_eq!(row.page_number, 3);
    }
}
