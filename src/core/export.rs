use crate::core::{LeadPayload, Result};
use std::io::Write;

/// 以 CSV 匯出預約清單, 保持原本的送出順序
pub fn export_leads_csv<W: Write>(leads: &[LeadPayload], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["name", "email", "slot", "timestamp", "submitted_at"])?;

    for lead in leads {
        let submitted_at = lead
            .submitted_at()
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        let timestamp = lead.timestamp.to_string();
        csv_writer.write_record([
            lead.name.as_str(),
            lead.email.as_str(),
            lead.slot.as_str(),
            timestamp.as_str(),
            submitted_at.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(leads.len())
}
