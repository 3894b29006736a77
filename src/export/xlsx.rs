use rust_xlsxwriter::Workbook;

use crate::models::{FinalRecord, Result, MAX_EMAIL_SLOTS};

/// Write one workbook with a header row and one row per record.
pub fn export_records_xlsx(records: &[FinalRecord], path: &str) -> Result<()> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(records: &[FinalRecord]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, 0, "Name")?;
    worksheet.write_string(0, 1, "Categories")?;
    worksheet.write_string(0, 2, "Website")?;
    for slot in 0..MAX_EMAIL_SLOTS {
        worksheet.write_string(0, (3 + slot) as u16, format!("Email {}", slot + 1))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &record.name)?;
        worksheet.write_string(row, 1, record.types.join(", "))?;
        worksheet.write_string(row, 2, &record.website)?;
        for (slot, email) in record.email_slots.iter().enumerate() {
            if let Some(email) = email {
                worksheet.write_string(row, (3 + slot) as u16, email)?;
            }
        }
    }

    Ok(workbook)
}
