//! crf-annotate - Compute CRF annotation geometry from extracted words.
//!
//! Reads word bounding boxes and detection patterns as JSON, reconstructs
//! the document's forms, optionally attaches question classifications, and
//! writes the form map plus per-page annotation rectangles as JSON.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use acrf_core::annot::{AnnotConfig, QuestionClassification, RectsByPage, generate_annotation_rects};
use acrf_core::forms::DetectionPatterns;
use acrf_core::high_level::{ExtractOptions, FormExtraction, extract_forms_from_rows};
use acrf_core::layout::{PageDimensions, PageWords, RowDistribution, rows_for_pages};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

/// Words extraction result, as produced by the upstream extractor.
#[derive(Debug, Deserialize)]
struct WordsDocument {
    pages: Vec<PageWords>,
}

/// External classification for one form's questions.
#[derive(Debug, Default, Deserialize)]
struct FormClassification {
    #[serde(default)]
    form_domains: Vec<String>,
    /// Question index → classification.
    #[serde(default)]
    questions: HashMap<i64, QuestionClassification>,
}

#[derive(Debug, Serialize)]
struct Output {
    forms: FormExtraction,
    rects_by_page: RectsByPage,
    #[serde(skip_serializing_if = "Option::is_none")]
    row_distribution: Option<RowDistribution>,
}

/// Compute CRF annotation geometry from extracted word positions.
#[derive(Parser, Debug)]
#[command(name = "crf-annotate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the words JSON ({"pages": [{page_number, page_width,
    /// page_height, words: [...]}, ...]})
    words: PathBuf,

    /// Path to the detection patterns JSON (form_name_patterns,
    /// header_patterns, footer_patterns, page_number_patterns)
    patterns: PathBuf,

    /// Optional classification JSON: normalized form key →
    /// {form_domains, questions}
    #[arg(short = 'c', long)]
    classification: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short = 'o', long)]
    outfile: Option<PathBuf>,

    /// Y tolerance for row clustering, in page units
    #[arg(long, default_value = "2.0")]
    y_tolerance: f64,

    /// Classify over every segment of a form instead of only the first
    #[arg(long, action = ArgAction::SetTrue)]
    expose_all_segments: bool,

    /// Include row distribution statistics in the output
    #[arg(long, action = ArgAction::SetTrue)]
    stats: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    let words: WordsDocument = read_json(&args.words)?;
    let patterns: DetectionPatterns = read_json(&args.patterns)?;

    let mut options = ExtractOptions::default();
    options.rows.y_tolerance = args.y_tolerance;
    options.segmenter.expose_all_segments = args.expose_all_segments;

    // One clustering pass serves both extraction and the --stats summary.
    let page_rows = rows_for_pages(&words.pages, &options.rows);
    let mut extraction = extract_forms_from_rows(&page_rows, &patterns, &options);

    if let Some(path) = &args.classification {
        let classifications: HashMap<String, FormClassification> = read_json(path)?;
        for (key, cls) in classifications {
            let Some(form) = extraction.forms.get_mut(&key) else {
                tracing::warn!(form = %key, "classification for unknown form");
                continue;
            };
            form.form_domains = cls.form_domains;
            for entry in &mut form.mapping {
                if let Some(question) = cls.questions.get(&entry.index) {
                    entry.classification = Some(question.clone());
                }
            }
        }
    }

    let dimensions: Vec<PageDimensions> = words.pages.iter().map(PageWords::dimensions).collect();
    let rects_by_page =
        generate_annotation_rects(&extraction.forms, &dimensions, &AnnotConfig::default());

    let row_distribution = args.stats.then(|| RowDistribution::from_pages(&page_rows));

    let output = Output {
        forms: extraction,
        rects_by_page,
        row_distribution,
    };

    match &args.outfile {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            serde_json::to_writer_pretty(BufWriter::new(file), &output)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut handle, &output)?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}
