use anyhow::{Context, Result};
use csv_async::AsyncWriterBuilder;
use tokio::fs::File as AsyncFile;
use tokio::io::BufWriter;

use crate::transform::clean_and_transform::{CleanProduct, COLUMNS};

/// Writes the products to a comma-separated file, header first.
pub async fn save_to_csv(products: &[CleanProduct], path: &str) -> Result<()> {
    let file = AsyncFile::create(path)
        .await
        .with_context(|| format!("Failed to create CSV file {}", path))?;
    let writer = BufWriter::new(file);
    let mut csv_writer = AsyncWriterBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .create_writer(writer);

    csv_writer
        .write_record(&COLUMNS)
        .await
        .context("Failed to write CSV header")?;

    for product in products {
        csv_writer
            .write_record(product.to_row())
            .await
            .context("Failed to write CSV record")?;
    }

    csv_writer.flush().await.context("Failed to flush CSV file")?;

    Ok(())
}
