use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use colored::Colorize;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::scraping::product_record::ProductRecord;

/// A scraped product with its numeric columns coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CleanProduct {
    pub title: String,
    pub price: f64,
    pub rating: f64,
    pub colors: i64,
    pub size: String,
    pub gender: String,
    pub timestamp: String,
}

pub const COLUMNS: [&str; 7] = ["Title", "Price", "Rating", "Colors", "Size", "Gender", "Timestamp"];

impl CleanProduct {
    /// Column values as text, in `COLUMNS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.price.to_string(),
            self.rating.to_string(),
            self.colors.to_string(),
            self.size.clone(),
            self.gender.clone(),
            self.timestamp.clone(),
        ]
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid price '{0}'")]
    InvalidPrice(String),
    #[error("no color count in '{0}'")]
    MissingColors(String),
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Same as `try_clean_and_transform`, but a failed batch is logged and
/// comes back empty.
pub fn clean_and_transform(records: &[ProductRecord], exchange_rate: f64) -> Vec<CleanProduct> {
    match try_clean_and_transform(records, exchange_rate) {
        Ok(products) => products,
        Err(e) => {
            eprintln!("{}", format!("[TRANSFORM ERROR] {}", e).red());
            Vec::new()
        }
    }
}

/// Filters sentinel, duplicate and incomplete rows, then coerces price,
/// rating and color count. Rows without a decimal rating are dropped; any
/// other coercion failure rejects the whole batch.
pub fn try_clean_and_transform(
    records: &[ProductRecord],
    exchange_rate: f64,
) -> Result<Vec<CleanProduct>, TransformError> {
    let rating_pattern = Regex::new(r"(\d+\.\d+)")?;
    let colors_pattern = Regex::new(r"(\d+)")?;

    let mut seen = HashSet::new();
    let mut products = Vec::new();

    for record in records {
        if record.has_sentinel() || !seen.insert(record) || record.has_empty_field() {
            continue;
        }

        let price = parse_price(&record.price)? * exchange_rate;

        let Some(rating) = first_capture(&rating_pattern, &record.rating)
            .and_then(|rating| rating.parse::<f64>().ok())
        else {
            continue;
        };

        let colors = first_capture(&colors_pattern, &record.colors)
            .and_then(|colors| colors.parse::<i64>().ok())
            .ok_or_else(|| TransformError::MissingColors(record.colors.clone()))?;

        products.push(CleanProduct {
            title: record.title.clone(),
            price,
            rating,
            colors,
            size: record.size.clone(),
            gender: record.gender.clone(),
            timestamp: normalize_timestamp(&record.timestamp)?,
        });
    }

    Ok(products)
}

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str())
}

fn parse_price(price: &str) -> Result<f64, TransformError> {
    price
        .replace(['$', ','], "")
        .trim()
        .parse::<f64>()
        .map_err(|_| TransformError::InvalidPrice(price.to_string()))
}

fn normalize_timestamp(timestamp: &str) -> Result<String, TransformError> {
    let parsed = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| DateTime::parse_from_rfc3339(timestamp).map(|dt| dt.naive_local()))
        .map_err(|_| TransformError::InvalidTimestamp(timestamp.to_string()))?;

    Ok(parsed.format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, price: &str, rating: &str, colors: &str) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            price: price.to_string(),
            rating: rating.to_string(),
            colors: colors.to_string(),
            size: "M".to_string(),
            gender: "Male".to_string(),
            timestamp: "2025-05-10T10:00:00".to_string(),
        }
    }

    #[test]
    fn valid_row_is_coerced() {
        let products =
            try_clean_and_transform(&[raw("Item A", "$20.00", "⭐ 4.5", "3 Colors")], 16000.0).unwrap();

        assert_eq!(
            products,
            vec![CleanProduct {
                title: "Item A".to_string(),
                price: 320000.0,
                rating: 4.5,
                colors: 3,
                size: "M".to_string(),
                gender: "Male".to_string(),
                timestamp: "2025-05-10T10:00:00".to_string(),
            }]
        );
    }

    #[test]
    fn extracted_record_values_are_accepted() {
        let mut record = raw("Cool Jacket", "$1,049.99", "4.7", "3");
        record.timestamp = "2025-05-10T10:00:00.123456".to_string();

        let products = try_clean_and_transform(&[record], 1.0).unwrap();

        assert_eq!(products[0].price, 1049.99);
        assert_eq!(products[0].rating, 4.7);
        assert_eq!(products[0].colors, 3);
        assert_eq!(products[0].timestamp, "2025-05-10T10:00:00");
    }

    #[test]
    fn sentinel_rows_are_dropped() {
        let records = [
            raw("Unknown", "$10.00", "4.5", "3"),
            raw("Item B", "$10.00", "Invalid", "3"),
            raw("Item C", "Unavailable", "4.5", "3"),
            raw("Item D", "$10.00", "4.5", "3"),
        ];

        let products = try_clean_and_transform(&records, 16000.0).unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Item D");
    }

    #[test]
    fn duplicates_are_dropped() {
        let record = raw("Item A", "$10.00", "4.5", "3");
        let mut other_time = record.clone();
        other_time.timestamp = "2025-05-10T10:00:01".to_string();

        let products =
            try_clean_and_transform(&[record.clone(), record, other_time], 16000.0).unwrap();

        assert_eq!(products.len(), 2);
    }

    #[test]
    fn rows_with_empty_fields_are_dropped() {
        let products = try_clean_and_transform(&[raw("Item A", "", "4.5", "3")], 16000.0).unwrap();

        assert!(products.is_empty());
    }

    #[test]
    fn empty_price_drops_only_that_row() {
        let records = vec![
            raw("Item A", "$20.00", "⭐ 4.5", "3 Colors"),
            raw("Item B", "", "⭐ 4.0", "2 Colors"),
        ];

        // An empty price never reaches the price parser, so the batch survives.
        let products = try_clean_and_transform(&records, 16000.0).unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Item A");
        assert_eq!(clean_and_transform(&records, 16000.0).len(), 1);
    }

    #[test]
    fn non_decimal_rating_drops_the_row() {
        let records = [
            raw("Item A", "$10.00", "Invalid Rating", "3 Colors"),
            raw("Item B", "$10.00", "5", "3 Colors"),
        ];

        assert!(try_clean_and_transform(&records, 16000.0).unwrap().is_empty());
    }

    #[test]
    fn invalid_price_fails_the_batch() {
        let records = [
            raw("Item A", "$10.00", "4.5", "3 Colors"),
            raw("Item B", "INVALID", "⭐ 4.5", "3 Colors"),
        ];

        assert!(matches!(
            try_clean_and_transform(&records, 16000.0),
            Err(TransformError::InvalidPrice(_))
        ));
        assert!(clean_and_transform(&records, 16000.0).is_empty());
    }

    #[test]
    fn missing_color_count_fails_the_batch() {
        let records = [raw("Item A", "$10.00", "4.5", "many")];

        assert!(matches!(
            try_clean_and_transform(&records, 16000.0),
            Err(TransformError::MissingColors(_))
        ));
    }

    #[test]
    fn bad_timestamp_fails_the_batch() {
        let mut record = raw("Item A", "$10.00", "4.5", "3");
        record.timestamp = "yesterday".to_string();

        assert!(matches!(
            try_clean_and_transform(&[record], 16000.0),
            Err(TransformError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn row_follows_column_order() {
        let product = CleanProduct {
            title: "Item A".to_string(),
            price: 160000.0,
            rating: 4.5,
            colors: 3,
            size: "M".to_string(),
            gender: "Male".to_string(),
            timestamp: "2025-05-10T10:00:00".to_string(),
        };

        assert_eq!(
            product.to_row(),
            vec!["Item A", "160000", "4.5", "3", "M", "Male", "2025-05-10T10:00:00"]
        );
    }
}
