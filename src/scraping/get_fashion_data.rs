use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use tokio::time::{sleep, Duration};

use crate::console::{Console, StdConsole};
use crate::scraping::fetch_html_content::{FetchOutcome, Fetcher, Transport};
use crate::scraping::parse_product_details::{CardParser, ParseCard, ParseOutcome};
use crate::scraping::product_record::ProductRecord;

/// Anything that can hand back the raw content of a listing page.
pub trait PageSource {
    async fn fetch_page(&self, url: &str) -> FetchOutcome;
}

impl<T: Transport> PageSource for Fetcher<T> {
    async fn fetch_page(&self, url: &str) -> FetchOutcome {
        self.fetch_html_content(url).await
    }
}

/// Page 1 is the site root, later pages live under `/page{N}`.
pub fn page_url(base_url: &str, page: u32) -> String {
    let base_url = base_url.trim_end_matches('/');
    if page == 1 {
        format!("{}/", base_url)
    } else {
        format!("{}/page{}", base_url, page)
    }
}

pub struct Pager<S, P = CardParser, L = StdConsole> {
    source: S,
    parser: P,
    console: L,
    card_selector: Selector,
    base_url: String,
}

impl<S: PageSource, P: ParseCard> Pager<S, P> {
    pub fn new(source: S, parser: P, base_url: &str) -> Result<Self> {
        Self::with_console(source, parser, base_url, StdConsole)
    }
}

impl<S: PageSource, P: ParseCard, L: Console> Pager<S, P, L> {
    pub fn with_console(source: S, parser: P, base_url: &str, console: L) -> Result<Self> {
        let card_selector = Selector::parse(".collection-card")
            .map_err(|e| anyhow!("Failed to parse card selector: {}", e))?;

        Ok(Pager {
            source,
            parser,
            console,
            card_selector,
            base_url: base_url.to_string(),
        })
    }

    /// Walks pages `1..=page_limit` one at a time.
    ///
    /// An unavailable page or an empty body ends the walk (the fetcher
    /// already retried), while a page without product cards is skipped and
    /// the walk goes on.
    pub async fn get_fashion_data(&self, page_limit: u32, pause: Duration) -> Vec<ProductRecord> {
        let mut records = Vec::new();

        for page in 1..=page_limit {
            let url = page_url(&self.base_url, page);
            self.console.info(&format!("[SCRAPING] Fetching {}", url));

            let html = match self.source.fetch_page(&url).await {
                FetchOutcome::Content(html) if !html.is_empty() => html,
                _ => {
                    self.console
                        .error("[STOP] Content unavailable. Stopping scraping.");
                    break;
                }
            };

            match self.parse_page(&html) {
                Some(page_records) => records.extend(page_records),
                None => {
                    self.console
                        .info(&format!("[INFO] No product cards on page {}.", page));
                    continue;
                }
            }

            sleep(pause).await;
        }

        records
    }

    /// `None` when the page holds no product cards at all.
    fn parse_page(&self, html: &[u8]) -> Option<Vec<ProductRecord>> {
        let document = Html::parse_document(&String::from_utf8_lossy(html));
        let cards: Vec<_> = document.select(&self.card_selector).collect();

        if cards.is_empty() {
            return None;
        }

        Some(
            cards
                .iter()
                .filter_map(|card| match self.parser.parse_card(card) {
                    ParseOutcome::Record(record) => Some(record),
                    ParseOutcome::Invalid => None,
                })
                .collect(),
        )
    }
}
