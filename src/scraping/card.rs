use anyhow::{anyhow, Result};
use scraper::{ElementRef, Selector};

/// A product card fragment the detail parser can traverse.
///
/// Lookups return the text content of the located descendant. Traversal is
/// fallible so that a malformed fragment can be reported instead of aborting
/// the whole page.
pub trait Card {
    /// Text of the first descendant matching a CSS selector.
    fn select_one_text(&self, selector: &str) -> Result<Option<String>>;

    /// Text of the first descendant with the given tag name carrying `class`.
    fn find_text(&self, tag: &str, class: &str) -> Result<Option<String>>;

    /// Text of every descendant with the given tag name, in document order.
    fn find_all_text(&self, tag: &str) -> Result<Vec<String>>;
}

impl Card for ElementRef<'_> {
    fn select_one_text(&self, selector: &str) -> Result<Option<String>> {
        let selector = Selector::parse(selector)
            .map_err(|e| anyhow!("Invalid selector '{}': {}", selector, e))?;

        Ok(self.select(&selector).next().map(element_text))
    }

    fn find_text(&self, tag: &str, class: &str) -> Result<Option<String>> {
        Ok(self
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| {
                element.value().name() == tag && element.value().classes().any(|c| c == class)
            })
            .map(element_text))
    }

    fn find_all_text(&self, tag: &str) -> Result<Vec<String>> {
        Ok(self
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == tag)
            .map(element_text)
            .collect())
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join("")
}
