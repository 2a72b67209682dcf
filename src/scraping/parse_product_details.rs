use anyhow::{Context, Result};
use chrono::Local;
use regex::Regex;
use scraper::ElementRef;

use crate::console::{Console, StdConsole};
use crate::scraping::card::Card;
use crate::scraping::product_record::{
    ProductRecord, INVALID_RATING, NO_COLORS, PRICE_UNAVAILABLE, UNKNOWN,
};

/// Outcome of parsing a single product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Record(ProductRecord),
    Invalid,
}

/// A labelled detail paragraph: the label selects candidate `<p>` texts, the
/// pattern's first capture group is the value, the fallback covers the rest.
struct DetailPattern {
    label: &'static str,
    pattern: Regex,
    fallback: &'static str,
}

impl DetailPattern {
    fn new(label: &'static str, pattern: &str, fallback: &'static str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Failed to compile regex for {}", label))?;

        Ok(DetailPattern {
            label,
            pattern,
            fallback,
        })
    }

    fn resolve(&self, paragraphs: &[String]) -> String {
        paragraphs
            .iter()
            .filter(|text| text.contains(self.label))
            .find_map(|text| {
                self.pattern
                    .captures(text)
                    .and_then(|caps| caps.get(1))
                    .map(|value| value.as_str().trim().to_string())
            })
            .unwrap_or_else(|| self.fallback.to_string())
    }
}

/// Per-card parse step used by the pager.
pub trait ParseCard {
    fn parse_card(&self, card: &ElementRef<'_>) -> ParseOutcome;
}

pub struct CardParser<L = StdConsole> {
    rating: DetailPattern,
    colors: DetailPattern,
    size: DetailPattern,
    gender: DetailPattern,
    console: L,
}

impl CardParser {
    pub fn new() -> Result<Self> {
        Self::with_console(StdConsole)
    }
}

impl<L: Console> CardParser<L> {
    pub fn with_console(console: L) -> Result<Self> {
        Ok(CardParser {
            rating: DetailPattern::new("Rating", r"Rating:\s*⭐\s*(\d+(?:\.\d+)?)", INVALID_RATING)?,
            colors: DetailPattern::new("Colors", r"(\d+)\s*Colors", NO_COLORS)?,
            size: DetailPattern::new("Size", r"Size:\s*(\w+)", UNKNOWN)?,
            gender: DetailPattern::new("Gender", r"Gender:\s*(\w+)", UNKNOWN)?,
            console,
        })
    }

    /// Turns a card into a fully populated record.
    ///
    /// A missing card yields `Invalid` silently; a card that cannot be
    /// traversed is logged and yields `Invalid` so the rest of the page
    /// still goes through.
    pub fn parse_product_details<C: Card>(&self, card: Option<&C>) -> ParseOutcome {
        let Some(card) = card else {
            return ParseOutcome::Invalid;
        };

        match self.extract(card) {
            Ok(record) => ParseOutcome::Record(record),
            Err(e) => {
                self.console.error(&format!("[PARSE ERROR] {:#}", e));
                ParseOutcome::Invalid
            }
        }
    }

    fn extract<C: Card>(&self, card: &C) -> Result<ProductRecord> {
        let title = card
            .select_one_text("h3.product-title")?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let price = card
            .find_text("div", "price-container")?
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string());

        let details = card.find_all_text("p")?;

        Ok(ProductRecord {
            title,
            price,
            rating: self.rating.resolve(&details),
            colors: self.colors.resolve(&details),
            size: self.size.resolve(&details),
            gender: self.gender.resolve(&details),
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        })
    }
}

impl<L: Console> ParseCard for CardParser<L> {
    fn parse_card(&self, card: &ElementRef<'_>) -> ParseOutcome {
        self.parse_product_details(Some(card))
    }
}
