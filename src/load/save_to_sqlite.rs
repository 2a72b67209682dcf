use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::transform::clean_and_transform::CleanProduct;

/// Replaces `table` in the SQLite database at `db_path` with the products.
///
/// The drop, create and inserts run in one transaction, so a failure leaves
/// the previous table untouched.
pub fn save_to_sqlite(products: &[CleanProduct], db_path: &str, table: &str) -> Result<()> {
    let mut conn = Connection::open(db_path).context("Failed to open SQLite database")?;
    let table = quote_identifier(table);

    let tx = conn.transaction().context("Failed to start transaction")?;

    tx.execute(&format!("DROP TABLE IF EXISTS {}", table), [])
        .context("Failed to drop table")?;

    tx.execute(
        &format!(
            "CREATE TABLE {} (
                \"Title\" TEXT NOT NULL,
                \"Price\" REAL NOT NULL,
                \"Rating\" REAL NOT NULL,
                \"Colors\" INTEGER NOT NULL,
                \"Size\" TEXT NOT NULL,
                \"Gender\" TEXT NOT NULL,
                \"Timestamp\" TEXT NOT NULL
            )",
            table
        ),
        [],
    )
    .context("Failed to create table")?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} (\"Title\", \"Price\", \"Rating\", \"Colors\", \"Size\", \"Gender\", \"Timestamp\")
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            table
        ))?;

        for product in products {
            stmt.execute(params![
                product.title,
                product.price,
                product.rating,
                product.colors,
                product.size,
                product.gender,
                product.timestamp,
            ])
            .context("Failed to insert product")?;
        }
    }

    tx.commit().context("Failed to commit transaction")?;

    Ok(())
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
