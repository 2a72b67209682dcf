use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::config::{load_config, AppConfig};
use crate::console::{Console, StdConsole};
use crate::load::load_data::load_data;
use crate::scraping::fetch_html_content::{Fetcher, HttpTransport};
use crate::scraping::get_fashion_data::Pager;
use crate::scraping::parse_product_details::CardParser;
use crate::transform::clean_and_transform::clean_and_transform;

// Import modules
mod config;
mod console;
mod load;
mod scraping;
mod transform;

const PREVIEW_ROWS: usize = 5;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration settings
    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {}", e).red());
            return Err(e.into());
        }
    };

    if let Err(e) = run_pipeline(&config).await {
        eprintln!("{}", format!("[ERROR] Pipeline failed: {:#}", e).red());
    }

    Ok(())
}

async fn run_pipeline(config: &AppConfig) -> Result<()> {
    println!("[INFO] Starting ETL run...");

    let scraper = &config.scraper;
    let transport = HttpTransport::new(&scraper.user_agent, scraper.timeout())?;
    let fetcher = Fetcher::new(transport, scraper.retries, scraper.retry_delay());
    let parser = CardParser::new()?;
    let pager = Pager::new(fetcher, parser, &scraper.base_url)?;

    let raw_items = pager
        .get_fashion_data(scraper.page_limit, scraper.page_pause())
        .await;

    if raw_items.is_empty() {
        StdConsole.warn("[WARNING] No data was scraped. Stopping ETL.");
        return Ok(());
    }

    println!("[INFO] Raw records: {}", raw_items.len());
    print_preview("Preview before transform", &raw_items)?;

    let cleaned = clean_and_transform(&raw_items, config.transform.exchange_rate);
    println!("[INFO] Records after transform: {}", cleaned.len());
    print_preview("Preview after transform", &cleaned)?;

    let report = load_data(&cleaned, &config.load).await;
    if report.failed.is_empty() {
        println!(
            "{}",
            format!("[SUCCESS] ETL run finished, saved to {:?}.", report.saved).green()
        );
    } else {
        StdConsole.warn(&format!(
            "[DONE] ETL run finished, failed sinks: {:?}",
            report.failed
        ));
    }

    Ok(())
}

fn print_preview<T: Serialize>(title: &str, rows: &[T]) -> Result<()> {
    println!("\n[INFO] {}:", title);
    for row in rows.iter().take(PREVIEW_ROWS) {
        println!(
            "{}",
            serde_json::to_string(row).context("Failed to serialize preview row")?
        );
    }
    Ok(())
}
