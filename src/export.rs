//! Writing results to disk and rendering the text summary.
//!
//! Every export writes four tables next to each other, named
//! `<stem>_<YYYYMMDD_HHMMSS>_<table>.<ext>`:
//! `dataset` (the joined rows), `wordfreq` (document ranking),
//! `topk_appearances` (how many segments list each word in their top-K) and
//! `segments` (each segment's cleaned tokens).

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;

use crate::dataset::DATASET_COLUMNS;
use crate::error::{AnalysisError, Result};
use crate::frequency::RankedList;
use crate::pipeline::Analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Txt,
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

///Neutralises spreadsheet formulas: a cell starting with `=`, `+`, `-` or `@` gets a leading `'`.
/// # Example
/// ```
/// use chapter_analysis::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("spice".to_string()), "spice");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

#[derive(Serialize)]
struct RankedRow<'a> {
    rank: usize,
    word: &'a str,
    count: u32,
}

#[derive(Serialize)]
struct AppearanceRow<'a> {
    rank: usize,
    word: &'a str,
    segments: u32,
}

#[derive(Serialize)]
struct SegmentRow<'a> {
    #[serde(rename = "Segment")]
    segment: usize,
    #[serde(rename = "Tokens")]
    tokens: &'a [String],
}

fn ranked_rows(ranked: &RankedList) -> Vec<RankedRow<'_>> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, (word, count))| RankedRow {
            rank: i + 1,
            word,
            count,
        })
        .collect()
}

fn timestamp() -> String {
    let local: DateTime<Local> = Local::now();
    local.format("%Y%m%d_%H%M%S").to_string()
}

fn output_path(out_dir: &Path, stem: &str, stamp: &str, table: &str, format: ExportFormat) -> PathBuf {
    out_dir.join(format!("{stem}_{stamp}_{table}.{}", format.extension()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    Ok(BufWriter::new(file))
}

fn write_delimited(
    path: &Path,
    delimiter: u8,
    header: &[&str],
    records: impl IntoIterator<Item = Vec<String>>,
) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(create(path)?);
    wtr.write_record(header)?;
    for record in records {
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(|e| AnalysisError::io(path, e))?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush().map_err(|e| AnalysisError::io(path, e))?;
    Ok(())
}

///Writes the analysis to `out_dir` in the chosen format and returns the written paths.
///`Txt` writes the rendered [`summary`].
pub fn export_analysis(
    analysis: &Analysis,
    stem: &str,
    format: ExportFormat,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| AnalysisError::io(out_dir, e))?;
    let stamp = timestamp();

    if format == ExportFormat::Txt {
        let path = output_path(out_dir, stem, &stamp, "summary", format);
        let mut out = create(&path)?;
        out.write_all(summary(analysis).as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| AnalysisError::io(&path, e))?;
        return Ok(vec![path]);
    }

    let dataset = output_path(out_dir, stem, &stamp, "dataset", format);
    let wordfreq = output_path(out_dir, stem, &stamp, "wordfreq", format);
    let appearances = output_path(out_dir, stem, &stamp, "topk_appearances", format);
    let segments = output_path(out_dir, stem, &stamp, "segments", format);

    let word_rows = ranked_rows(&analysis.document.ranked);
    let appearance_rows: Vec<AppearanceRow<'_>> = ranked_rows(&analysis.appearances.ranked)
        .into_iter()
        .map(|r| AppearanceRow {
            rank: r.rank,
            word: r.word,
            segments: r.count,
        })
        .collect();
    let segment_rows: Vec<SegmentRow<'_>> = analysis
        .segments
        .iter()
        .map(|s| SegmentRow {
            segment: s.index,
            tokens: &s.tokens,
        })
        .collect();

    match format {
        ExportFormat::Json => {
            write_json(&dataset, &analysis.rows)?;
            write_json(&wordfreq, &word_rows)?;
            write_json(&appearances, &appearance_rows)?;
            write_json(&segments, &segment_rows)?;
        }
        ExportFormat::Csv | ExportFormat::Tsv => {
            let delimiter = if format == ExportFormat::Tsv { b'\t' } else { b',' };
            write_delimited(
                &dataset,
                delimiter,
                &DATASET_COLUMNS,
                analysis.rows.iter().map(|r| {
                    vec![
                        r.segment.to_string(),
                        r.sentiment.to_string(),
                        r.rank.to_string(),
                        csv_safe_cell(r.word.clone()),
                        r.count.to_string(),
                    ]
                }),
            )?;
            write_delimited(
                &wordfreq,
                delimiter,
                &["rank", "word", "count"],
                word_rows.iter().map(|r| {
                    vec![
                        r.rank.to_string(),
                        csv_safe_cell(r.word.to_string()),
                        r.count.to_string(),
                    ]
                }),
            )?;
            write_delimited(
                &appearances,
                delimiter,
                &["rank", "word", "segments"],
                appearance_rows.iter().map(|r| {
                    vec![
                        r.rank.to_string(),
                        csv_safe_cell(r.word.to_string()),
                        r.segments.to_string(),
                    ]
                }),
            )?;
            write_delimited(
                &segments,
                delimiter,
                &["Segment", "Tokens"],
                segment_rows
                    .iter()
                    .map(|r| vec![r.segment.to_string(), csv_safe_cell(r.tokens.join(" "))]),
            )?;
        }
        ExportFormat::Txt => {}
    }
    Ok(vec![dataset, wordfreq, appearances, segments])
}

const LIST_HEAD: usize = 20;

fn push_word_list(out: &mut String, words: &[String]) {
    let shown: Vec<&str> = words.iter().take(LIST_HEAD).map(String::as_str).collect();
    let _ = write!(out, "  {}", shown.join(", "));
    if words.len() > LIST_HEAD {
        let _ = write!(out, ", ... ({} more)", words.len() - LIST_HEAD);
    }
    out.push('\n');
}

/// Plain-text report of an analysis: top words, unique words and per-segment sentiment.
pub fn summary(analysis: &Analysis) -> String {
    let mut out = String::new();
    let doc = &analysis.document;

    let _ = writeln!(
        out,
        "Segments: {}, distinct words: {}, tokens: {}",
        analysis.segments.len(),
        doc.ranked.len(),
        doc.table.total()
    );

    let _ = writeln!(out, "\n=== Top {} words ===", doc.top_x.len());
    for entry in &doc.top_x {
        let _ = writeln!(out, "{:>3}. {} ({})", entry.rank, entry.word, entry.count);
    }

    let _ = writeln!(out, "\n=== Words used once: {} ===", doc.unique_words.len());
    push_word_list(&mut out, &doc.unique_words);

    let _ = writeln!(
        out,
        "\n=== Words reaching a segment's top-K once: {} ===",
        analysis.appearances.once.len()
    );
    push_word_list(&mut out, &analysis.appearances.once);

    let _ = writeln!(out, "\n=== Segments ===");
    for segment in &analysis.segments {
        let words: Vec<&str> = segment.top_k.iter().map(|e| e.word.as_str()).collect();
        let _ = writeln!(
            out,
            "{:>3}  sentiment {:+.4}  {}",
            segment.index,
            segment.sentiment,
            words.join(", ")
        );
    }
    out
}
