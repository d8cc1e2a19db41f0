mod config;
mod db;
mod job;
mod listing;
mod page;
mod trigger;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::job::CrawlJob;
use crate::listing::ApartmentListings;
use crate::page::HtmlPage;

#[derive(Parser)]
#[command(
    name = "apartment-listings",
    about = "Craigslist NY apartment-listings crawl job"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the listing schema and home table
    Init,
    /// Extract a saved posting page and print the normalized row
    Extract {
        /// Path to a saved HTML page
        file: PathBuf,
        /// Persist the row after printing it
        #[arg(long)]
        save: bool,
    },
    /// Extract and persist a directory of saved posting pages
    Import {
        /// Directory of *.html page dumps
        dir: PathBuf,
        /// Max pages to import (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show listings table counts
    Stats,
    /// Fire the companion job invocation
    Trigger,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let pg = config::PostgresConfig::from_env();

    match cli.command {
        Commands::Init => {
            let pool = db::connect_lazy(&pg)?;
            db::init_schema(&pool).await?;
            println!("Created listing.home");
            Ok(())
        }
        Commands::Extract { file, save } => {
            let pool = db::connect_lazy(&pg)?;
            let job = ApartmentListings::new(pool.clone());
            let row = extract_file(&job, &file)?;
            println!("{}", serde_json::to_string_pretty(&row)?);
            if save {
                db::insert_listing(&pool, &row).await?;
                println!("Saved 1 listing");
            }
            Ok(())
        }
        Commands::Import { dir, limit } => import_pages(&pg, &dir, limit).await,
        Commands::Stats => {
            let pool = db::connect_lazy(&pg)?;
            let s = db::get_stats(&pool).await?;
            println!("Total:    {}", s.total);
            println!("Priced:   {}", s.priced);
            println!("Dated:    {}", s.dated);
            println!("Geocoded: {}", s.geocoded);
            Ok(())
        }
        Commands::Trigger => {
            let pool = db::connect_lazy(&pg)?;
            let job = ApartmentListings::new(pool);
            job.start().await;
            Ok(())
        }
    }
}

fn extract_file(job: &ApartmentListings, file: &Path) -> Result<db::ListingRow> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let page = HtmlPage::parse(&html);
    Ok(job.extract(&page))
}

async fn import_pages(pg: &config::PostgresConfig, dir: &Path, limit: Option<usize>) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    if files.is_empty() {
        println!("No .html pages in {}", dir.display());
        return Ok(());
    }

    println!("Importing {} pages...", files.len());

    // Parse + normalize is pure CPU work; run it in parallel, then persist
    let rows: Vec<(PathBuf, db::ListingRow)> = files
        .par_iter()
        .filter_map(|path| {
            let html = std::fs::read_to_string(path).ok()?;
            let page = HtmlPage::parse(&html);
            let raw = listing::extract::scrape_listing(&page);
            Some((path.clone(), listing::transform::transform(&raw)))
        })
        .collect();

    let pool = db::connect_lazy(pg)?;
    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let mut saved = 0usize;
    let mut errors = 0usize;
    for (path, row) in &rows {
        match db::insert_listing(&pool, row).await {
            Ok(()) => saved += 1,
            Err(e) => {
                errors += 1;
                tracing::warn!("Failed to persist {}: {}", path.display(), e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("Done: {} saved, {} errors.", saved, errors);
    Ok(())
}
