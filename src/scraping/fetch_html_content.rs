use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use tokio::time::{sleep, Duration};

/// Result of fetching one URL once the retry budget is spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Content(Vec<u8>),
    NotAvailable,
}

pub trait Transport {
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// Plain GET over reqwest with a browser User-Agent and a request timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("Invalid User-Agent header")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?
            .error_for_status()?;

        let body = response.bytes().await.context("Failed to read response body")?;

        Ok(body.to_vec())
    }
}

pub struct Fetcher<T> {
    transport: T,
    retries: u32,
    delay: Duration,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, retries: u32, delay: Duration) -> Self {
        Fetcher {
            transport,
            retries,
            delay,
        }
    }

    /// Fetches `url`, retrying up to `retries` attempts with a fixed delay.
    /// Failures are logged here and never reach the caller.
    pub async fn fetch_html_content(&self, url: &str) -> FetchOutcome {
        for attempt in 1..=self.retries {
            match self.transport.get(url).await {
                Ok(body) => return FetchOutcome::Content(body),
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("[FETCH ERROR] Attempt {} failed: {:#}", attempt, e).red()
                    );

                    if attempt < self.retries {
                        println!(
                            "{}",
                            format!(
                                "[RETRY] Waiting {:.1} seconds before retrying...",
                                self.delay.as_secs_f64()
                            )
                            .yellow()
                        );
                        sleep(self.delay).await;
                    }
                }
            }
        }

        eprintln!(
            "{}",
            format!(
                "[FAILED] Could not fetch {} after {} attempts.",
                url, self.retries
            )
            .red()
        );
        FetchOutcome::NotAvailable
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use anyhow::anyhow;

    use super::*;

    /// Replays a fixed script of responses, then keeps failing.
    struct ScriptedTransport {
        script: RefCell<Vec<Result<Vec<u8>>>>,
        calls: Cell<usize>,
    }

    impl ScriptedTransport {
        fn new(mut script: Vec<Result<Vec<u8>>>) -> Self {
            script.reverse();
            ScriptedTransport {
                script: RefCell::new(script),
                calls: Cell::new(0),
            }
        }

        fn always_failing() -> Self {
            Self::new(Vec::new())
        }
    }

    impl Transport for ScriptedTransport {
        async fn get(&self, _url: &str) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            self.script
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(anyhow!("Timeout")))
        }
    }

    #[tokio::test]
    async fn returns_body_on_first_success() {
        let transport = ScriptedTransport::new(vec![Ok(b"<html><body>Test Page</body></html>".to_vec())]);
        let fetcher = Fetcher::new(transport, 3, Duration::ZERO);

        let outcome = fetcher.fetch_html_content("https://example.com").await;

        assert_eq!(
            outcome,
            FetchOutcome::Content(b"<html><body>Test Page</body></html>".to_vec())
        );
        assert_eq!(fetcher.transport.calls.get(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_exactly_the_retry_budget() {
        let fetcher = Fetcher::new(ScriptedTransport::always_failing(), 2, Duration::ZERO);

        let outcome = fetcher.fetch_html_content("https://example.com").await;

        assert_eq!(outcome, FetchOutcome::NotAvailable);
        assert_eq!(fetcher.transport.calls.get(), 2);
    }

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds() {
        let transport = ScriptedTransport::new(vec![
            Err(anyhow!("Connection failed")),
            Ok(b"ok".to_vec()),
        ]);
        let fetcher = Fetcher::new(transport, 3, Duration::ZERO);

        let outcome = fetcher.fetch_html_content("https://example.com").await;

        assert_eq!(outcome, FetchOutcome::Content(b"ok".to_vec()));
        assert_eq!(fetcher.transport.calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_fixed_delay_between_attempts() {
        let fetcher = Fetcher::new(ScriptedTransport::always_failing(), 3, Duration::from_secs(3));
        let started = tokio::time::Instant::now();

        let outcome = fetcher.fetch_html_content("https://example.com").await;

        assert_eq!(outcome, FetchOutcome::NotAvailable);
        // Two sleeps between three attempts, none after the last one.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_secs(7));
    }

    #[tokio::test]
    async fn zero_retries_never_calls_the_transport() {
        let fetcher = Fetcher::new(ScriptedTransport::always_failing(), 0, Duration::ZERO);

        assert_eq!(
            fetcher.fetch_html_content("https://example.com").await,
            FetchOutcome::NotAvailable
        );
        assert_eq!(fetcher.transport.calls.get(), 0);
    }
}
