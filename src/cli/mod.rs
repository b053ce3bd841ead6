//! CLI module for coursebot.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::models::OutputFormat;

/// Course catalog scraping and retrieval prototype.
#[derive(Debug, Parser)]
#[command(name = "coursebot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text, json, or markdown"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check vector store connectivity and embedding configuration
    Status,

    /// Scrape a course listing page and index its courses
    Ingest(commands::IngestArgs),

    /// Search indexed course content
    Search(commands::SearchArgs),

    /// Run the chat HTTP server
    Serve(commands::ServeArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}

// FromStr for the format flag is implemented in models::chat
