pub mod load_data;
pub mod save_to_csv;
pub mod save_to_google_spreadsheet;
pub mod save_to_sqlite;
