//! Ingest command implementation.
//!
//! The pipeline is deliberately sequential: scrape, chunk, then embed and
//! upsert in batches.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use url::Url;

use crate::cli::output::{IngestStats, get_formatter};
use crate::models::{Config, Document, OutputFormat, Source};
use crate::services::{CourseScraper, HttpEmbedder, TextChunker, create_backend, process_batch};
use crate::utils::retry::RetryConfig;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Course listing page URL
    #[arg(required = true)]
    pub url: String,

    /// Clear the collection before ingesting
    #[arg(long)]
    pub reset: bool,

    /// List scraped courses without embedding or indexing
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn handle_ingest(args: IngestArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    config.validate()?;
    let formatter = get_formatter(format);
    let start_time = Instant::now();

    let url =
        Url::parse(&args.url).with_context(|| format!("invalid listing url: {}", args.url))?;

    let scraper = CourseScraper::new(&config.scraper)?;
    let outcome = scraper
        .scrape(&url)
        .await
        .with_context(|| format!("failed to scrape {}", url))?;

    if outcome.records.is_empty() {
        println!(
            "{}",
            formatter.format_message(&format!("No courses found at {}", url))
        );
        return Ok(());
    }

    if verbose {
        eprintln!(
            "Scraped {} courses ({} cards skipped)",
            outcome.records.len(),
            outcome.skipped
        );
    }

    if args.dry_run {
        print!("{}", formatter.format_courses(&outcome.records));
        return Ok(());
    }

    let embedder = HttpEmbedder::new(&config.embedding)?;
    let store = create_backend(
        &config.vector_store,
        u64::from(config.embedding.dimension),
    )
    .await?;

    if args.reset {
        store.clear_collection().await?;
    }
    store.create_collection().await?;

    let chunker = TextChunker::new(&config.chunking);
    let retry = RetryConfig::default();

    let pb = ProgressBar::new(outcome.records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut stats = IngestStats {
        courses_scraped: outcome.records.len() as u64,
        cards_skipped: u64::from(outcome.skipped),
        ..Default::default()
    };

    let batch_size = config.embedding.batch_size.max(1) as usize;
    let mut pending_chunks = Vec::new();
    let mut pending_texts = Vec::new();

    for (position, record) in outcome.records.iter().enumerate() {
        pb.inc(1);

        let source = Source::new(url.as_str(), position as u32);
        let document = Document::from_course(record, source);
        let chunks = chunker.chunk(&document);
        stats.chunks_created += chunks.len() as u64;

        for chunk in chunks {
            pending_texts.push(chunk.content.clone());
            pending_chunks.push(chunk);
        }

        if pending_texts.len() >= batch_size {
            process_batch(
                &embedder,
                store.as_ref(),
                &retry,
                &mut pending_chunks,
                &mut pending_texts,
            )
            .await?;
        }
    }

    if !pending_texts.is_empty() {
        process_batch(
            &embedder,
            store.as_ref(),
            &retry,
            &mut pending_chunks,
            &mut pending_texts,
        )
        .await?;
    }

    pb.finish_and_clear();
    stats.duration_ms = start_time.elapsed().as_millis() as u64;
    print!("{}", formatter.format_ingest_stats(&stats));

    Ok(())
}
