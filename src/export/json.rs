use crate::models::{FinalRecord, Result};

/// Pretty-printed JSON artifact next to the spreadsheet.
pub async fn export_records_json(records: &[FinalRecord], path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
