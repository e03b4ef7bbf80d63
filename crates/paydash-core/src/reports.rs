//! Summary structures for API responses

use paydash_utils::format_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::TransactionRecord;
use super::types::TransactionStatus;

/// Per-status counts over a set of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: usize,
    pub success: usize,
    pub pending: usize,
    pub failed: usize,
    pub initiated: usize,
    pub unknown: usize,
    /// Sum of transaction amounts over successful records
    pub collected_amount: Decimal,
}

impl StatusSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut summary = StatusSummary::default();
        for record in records {
            summary.total += 1;
            match record.status {
                TransactionStatus::Success => {
                    summary.success += 1;
                    summary.collected_amount += record.transaction_amount.unwrap_or_default();
                }
                TransactionStatus::Pending => summary.pending += 1,
                TransactionStatus::Failed => summary.failed += 1,
                TransactionStatus::Initiated => summary.initiated += 1,
                TransactionStatus::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    /// Share of successful records, 0.0 for an empty set
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64
        }
    }
}

/// Summary response for a table view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Counts over every loaded record
    pub all: StatusSummary,
    /// Counts over the records passing the current filter
    pub filtered: StatusSummary,
    pub collected_display: String,
    pub success_rate: f64,
}

impl SummaryResponse {
    pub fn new(all: StatusSummary, filtered: StatusSummary) -> Self {
        Self {
            collected_display: format_amount(all.collected_amount),
            success_rate: all.success_rate(),
            all,
            filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_collected_amount() {
        let records = vec![
            TransactionRecord::new("a")
                .with_status(TransactionStatus::Success)
                .with_amounts(None, Some(Decimal::from(1200))),
            TransactionRecord::new("b")
                .with_status(TransactionStatus::Success)
                .with_amounts(None, None),
            TransactionRecord::new("c").with_status(TransactionStatus::Failed),
            TransactionRecord::new("d").with_status(TransactionStatus::Initiated),
        ];
        let summary = StatusSummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.initiated, 1);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.collected_amount, Decimal::from(1200));
        assert!((summary.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = StatusSummary::from_records(std::iter::empty());
        assert_eq!(summary, StatusSummary::default());
        assert_eq!(summary.success_rate(), 0.0);

        let response = SummaryResponse::new(summary.clone(), summary);
        assert_eq!(response.collected_display, "0.00");
    }
}
