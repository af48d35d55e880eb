//! Command-line interface for querying a corpus file from the terminal.
//!
//! Exercises the same pipeline the in-page component runs: load → search →
//! aggregate → render.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::aggregate::Aggregator;
use crate::config::SearchConfig;
use crate::corpus::{FileSource, build_index};
use crate::error::Result;
use crate::render::{RenderSink, ResultList, WriteOutcome};
use crate::search::QueryEngine;
use crate::snippet::extract_snippet;
use crate::types::SearchSession;

#[derive(Parser)]
#[command(name = "sitesearch")]
#[command(about = "Ranked search over a static site's search_index.json", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a query and print the ranked result groups.
    Query {
        /// Path to the corpus file (search_index.json).
        #[arg(short, long)]
        corpus: PathBuf,
        query: String,
        #[arg(short = 'n', long, default_value = "30")]
        limit: usize,
        /// Emit the host result-list markup instead of plain text.
        #[arg(long)]
        html: bool,
    },
    /// Print corpus and index statistics.
    Inspect {
        #[arg(short, long)]
        corpus: PathBuf,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Query {
            corpus,
            query,
            limit,
            html,
        } => run_query(corpus, &query, limit, html).await,
        Commands::Inspect { corpus } => run_inspect(corpus).await,
    }
}

async fn run_query(corpus: PathBuf, query: &str, limit: usize, html: bool) -> Result<()> {
    let config = SearchConfig {
        hit_limit: limit,
        ..SearchConfig::default()
    };
    let source = FileSource::new(corpus);
    let index = std::sync::Arc::new(build_index(&source).await?);

    let engine = QueryEngine::new(&config);
    let Some(hits) = engine.search(Some(&index), query) else {
        println!("(empty query)");
        return Ok(());
    };
    let groups = Aggregator::new(&config).aggregate(&hits);

    if html {
        let list = StdoutList::default();
        let sink = RenderSink::new(config);
        let mut session = SearchSession::default();
        if let Err(e) = sink.render(&groups, hits.len(), query, &list, &mut session) {
            tracing::warn!("render failed: {e}");
        }
        return Ok(());
    }

    if groups.is_empty() {
        println!("No matching documents");
        return Ok(());
    }
    println!("{} pages, {} results\n", groups.len(), hits.len());
    for group in &groups {
        let mut line = String::new();
        write!(line, "{}  ({})", group.page_title, group.base_location)?;
        if group.is_index_page {
            write!(line, "  [listing]")?;
        }
        println!("{line}");
        if let Some(text) = &group.page_text {
            let teaser = extract_snippet(
                text,
                query,
                config.snippet_len,
                config.snippet_lead_in,
                config.snippet_tolerance,
            );
            println!("    {teaser}");
        }
        for section in &group.sections {
            println!("    - {}  ({})", section.title, section.location);
        }
        if group.hidden_sections > 0 {
            println!("    … {} more sections", group.hidden_sections);
        }
        println!();
    }
    Ok(())
}

async fn run_inspect(corpus: PathBuf) -> Result<()> {
    let source = FileSource::new(corpus);
    let index = build_index(&source).await?;
    println!("documents: {}", index.document_count());
    println!("unique terms: {}", index.term_count());
    let pages = index
        .documents()
        .iter()
        .filter(|d| !d.is_fragment())
        .count();
    println!("pages: {}", pages);
    println!("sections: {}", index.document_count() - pages);
    Ok(())
}

/// Result sink that prints markup to stdout.
#[derive(Default)]
struct StdoutList;

impl ResultList for StdoutList {
    fn write_results(&self, markup: &str) -> WriteOutcome {
        println!("{markup}");
        WriteOutcome::Changed
    }

    fn write_meta(&self, text: &str) -> bool {
        if !text.is_empty() {
            eprintln!("{text}");
        }
        true
    }
}
