//! Month export in the fixed CSV layout consumed by spreadsheets.

use crate::domain::{format_amount, Period, Transaction, UserId};
use crate::errors::TrackerError;
use crate::ledger::{LedgerStore, TransactionQuery};

use super::ServiceResult;

pub const CSV_HEADER: [&str; 6] = ["id", "type", "category", "amount", "comment", "created_at"];
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Rendered export ready to hand to the transport as a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content: Vec<u8>,
    pub rows: usize,
}

pub struct ExportService;

impl ExportService {
    pub fn file_name(user_id: UserId, period: Period) -> String {
        format!("finance_{user_id}_{}.csv", period.file_stem())
    }

    /// `None` when the month holds no operations.
    pub fn export_month(
        store: &LedgerStore,
        user_id: UserId,
        period: Period,
    ) -> ServiceResult<Option<ExportFile>> {
        let rows = store.query(user_id, &TransactionQuery::all().within(period.window()))?;
        if rows.is_empty() {
            return Ok(None);
        }
        let content = Self::write_csv(&rows)?;
        Ok(Some(ExportFile {
            file_name: Self::file_name(user_id, period),
            content,
            rows: rows.len(),
        }))
    }

    pub fn write_csv(rows: &[Transaction]) -> ServiceResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER).map_err(TrackerError::from)?;
        for txn in rows {
            writer
                .write_record([
                    txn.id.to_string(),
                    txn.kind.as_str().to_string(),
                    txn.category.clone().unwrap_or_default(),
                    format_amount(txn.amount),
                    txn.comment.clone().unwrap_or_default(),
                    txn.created_at.format(CREATED_AT_FORMAT).to_string(),
                ])
                .map_err(TrackerError::from)?;
        }
        let content = writer
            .into_inner()
            .map_err(|err| TrackerError::Csv(err.to_string()))?;
        Ok(content)
    }
}
