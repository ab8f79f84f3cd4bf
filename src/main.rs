#![forbid(unsafe_code)]
//! # Chapter Analysis CLI
//!
//! Command-line front end for the `chapter_analysis` crate. It reads one text
//! file, splits it into chapters, ranks each chapter's words, scores its
//! sentiment and exports the joined dataset.
//!
//! ## Example
//! ```bash
//! cargo run --release -- dune.txt --exclude 0,23,39,51,52,53,54,55 --noise-word said --export-format csv
//! ```
//!
//! See `--help` for all available options.

use std::path::{Path, PathBuf};
use std::process;

use chapter_analysis::{
    AnalysisConfig, AnalysisError, ConfigFile, ExportFormat, LexiconScorer, analyze_path,
    load_config, load_word_list,
};
use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Text file to analyze
    path: PathBuf,

    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Regular expression separating chapters
    #[arg(long)]
    delimiter: Option<String>,

    /// Zero-based chapter positions to skip (titles, appendices), e.g. 0,23,39
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<usize>,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Do not fall back to the built-in English stopword list
    #[arg(long, default_value_t = false)]
    no_default_stopwords: bool,

    /// Extra word to drop everywhere (repeatable)
    #[arg(long = "noise-word")]
    noise_words: Vec<String>,

    /// Words kept per chapter
    #[arg(long)]
    top_k: Option<usize>,

    /// Words kept for the whole document
    #[arg(long)]
    top_x: Option<usize>,

    /// Sentiment lexicon (tab-separated: word, valence, ...)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Output format for export (txt, csv, tsv, json)
    #[arg(long, default_value = "csv")]
    export_format: ExportFormat,

    /// Directory for exported files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Analyze chapters in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig, AnalysisError> {
    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConfigFile::default(),
    };
    let mut config = file.into_config(!cli.no_default_stopwords);
    if let Some(delimiter) = &cli.delimiter {
        config.delimiter = delimiter.clone();
    }
    config.excluded_segments.extend(cli.exclude.iter().copied());
    if let Some(path) = &cli.stopwords {
        config.stopwords.extend(load_word_list(path)?);
    }
    config
        .noise_words
        .extend(cli.noise_words.iter().map(|w| w.to_lowercase()));
    if let Some(k) = cli.top_k {
        config.top_k = k;
    }
    if let Some(x) = cli.top_x {
        config.aggregate_top_x = x;
    }
    config.parallel |= cli.parallel;
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), AnalysisError> {
    let config = build_config(cli)?;
    let scorer = match &cli.lexicon {
        Some(path) => LexiconScorer::from_file(path)?,
        None => LexiconScorer::new(),
    };
    let report = analyze_path(
        Path::new(&cli.path),
        &config,
        &scorer,
        cli.export_format,
        &cli.out_dir,
    )?;
    println!("{}", report.result);
    for output in &report.outputs {
        info!("wrote {}", output.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error analyzing {}: {}", cli.path.display(), e);
        process::exit(1);
    }
}
