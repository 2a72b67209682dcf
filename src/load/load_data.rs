use colored::Colorize;

use crate::config::LoadConfig;
use crate::load::save_to_csv::save_to_csv;
use crate::load::save_to_google_spreadsheet::{save_to_google_spreadsheet, SheetsAuth};
use crate::load::save_to_sqlite::save_to_sqlite;
use crate::transform::clean_and_transform::CleanProduct;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Csv,
    Sqlite,
    GoogleSheets,
}

/// Which sinks were written and which failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub saved: Vec<Sink>,
    pub failed: Vec<Sink>,
}

impl LoadReport {
    fn record(&mut self, sink: Sink, result: anyhow::Result<()>, success: String) {
        match result {
            Ok(()) => {
                println!("{}", success.green());
                self.saved.push(sink);
            }
            Err(e) => {
                let tag = match sink {
                    Sink::Csv => "[CSV ERROR]",
                    Sink::Sqlite => "[SQLITE ERROR]",
                    Sink::GoogleSheets => "[SHEETS ERROR]",
                };
                eprintln!("{}", format!("{} {:#}", tag, e).red());
                self.failed.push(sink);
            }
        }
    }
}

/// Writes the products to every configured sink. A failing sink is logged
/// and the remaining ones are still attempted.
pub async fn load_data(products: &[CleanProduct], config: &LoadConfig) -> LoadReport {
    let mut report = LoadReport::default();

    report.record(
        Sink::Csv,
        save_to_csv(products, &config.csv_path).await,
        format!("[CSV] Data saved to {}", config.csv_path),
    );

    if config.sqlite_enabled {
        report.record(
            Sink::Sqlite,
            save_to_sqlite(products, &config.sqlite_path, &config.sqlite_table),
            format!(
                "[SQLITE] Data saved to table {} in {}",
                config.sqlite_table, config.sqlite_path
            ),
        );
    }

    if let Some(spreadsheet_id) = config.spreadsheet_id.as_deref().filter(|id| !id.is_empty()) {
        let auth = SheetsAuth::new(&config.sheets_api_url, &config.sheets_access_token);
        report.record(
            Sink::GoogleSheets,
            save_to_google_spreadsheet(&auth, products, spreadsheet_id, &config.sheet_range).await,
            "[SHEETS] Data written to spreadsheet".to_string(),
        );
    }

    report
}
