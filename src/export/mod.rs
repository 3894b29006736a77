pub mod json;
pub mod xlsx;

pub use json::export_records_json;
pub use xlsx::export_records_xlsx;
