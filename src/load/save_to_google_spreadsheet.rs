use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::json;

use crate::transform::clean_and_transform::{CleanProduct, COLUMNS};

/// Google Sheets v4 values endpoint, authenticated with an already issued
/// OAuth access token.
pub struct SheetsAuth {
    api_url: String,
    access_token: String,
}

impl SheetsAuth {
    pub fn new(api_url: &str, access_token: &str) -> Self {
        SheetsAuth {
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    pub fn create_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.access_token))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.api_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        )
    }
}

/// Header row followed by one text row per product.
pub fn sheet_values(products: &[CleanProduct]) -> Vec<Vec<String>> {
    let mut values = Vec::with_capacity(products.len() + 1);
    values.push(COLUMNS.iter().map(|column| column.to_string()).collect());
    values.extend(products.iter().map(CleanProduct::to_row));
    values
}

/// Clears `range` and writes the products into it, header included.
pub async fn save_to_google_spreadsheet(
    auth: &SheetsAuth,
    products: &[CleanProduct],
    spreadsheet_id: &str,
    range: &str,
) -> Result<()> {
    let client = Client::new();
    let values_url = auth.values_url(spreadsheet_id, range);

    let response = client
        .post(format!("{}:clear", values_url))
        .headers(auth.create_headers()?)
        .json(&json!({}))
        .send()
        .await
        .context("Failed to send clear request")?;
    check_response(response, "clear").await?;

    let body = json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": sheet_values(products),
    });

    let response = client
        .put(&values_url)
        .query(&[("valueInputOption", "RAW")])
        .headers(auth.create_headers()?)
        .json(&body)
        .send()
        .await
        .context("Failed to send update request")?;
    check_response(response, "update").await?;

    Ok(())
}

/// Fails on a non-success status, with the response body in the error.
async fn check_response(response: Response, action: &str) -> Result<()> {
    let status_code = response.status();
    let response_body = response.text().await.context("Failed to read response body")?;

    if !status_code.is_success() {
        return Err(anyhow::anyhow!(
            "Failed to {} values with status {}: {}",
            action,
            status_code,
            response_body
        ));
    }

    Ok(())
}
