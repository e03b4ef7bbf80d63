//! Sort state and comparator for the transaction table

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::models::TransactionRecord;
use super::time::epoch_millis;
use super::types::{SortDirection, SortField};

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::PaymentTime,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header-click behaviour: same column flips, a new column starts ascending
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }

    /// Compare two records under this sort
    ///
    /// Payment time compares as epoch milliseconds with missing as 0. For
    /// every other column a missing value sorts last in both directions.
    pub fn compare(&self, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
        match self.field {
            SortField::PaymentTime => directed(
                epoch_millis(a.payment_time.as_ref()).cmp(&epoch_millis(b.payment_time.as_ref())),
                self.direction,
            ),
            SortField::OrderAmount => missing_last(a.order_amount, b.order_amount, self.direction),
            SortField::TransactionAmount => {
                missing_last(a.transaction_amount, b.transaction_amount, self.direction)
            }
            SortField::CollectId => missing_last(text(&a.collect_id), text(&b.collect_id), self.direction),
            SortField::SchoolId => missing_last(text(&a.school_id), text(&b.school_id), self.direction),
            SortField::Gateway => missing_last(text(&a.gateway), text(&b.gateway), self.direction),
            SortField::Status => {
                missing_last(Some(a.status.as_str()), Some(b.status.as_str()), self.direction)
            }
            SortField::CustomOrderId => missing_last(
                a.custom_order_id.as_deref().and_then(text),
                b.custom_order_id.as_deref().and_then(text),
                self.direction,
            ),
        }
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn text(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;
    use rust_decimal::Decimal;

    fn amount(id: &str, value: Option<i64>) -> TransactionRecord {
        TransactionRecord::new(id).with_amounts(value.map(Decimal::from), None)
    }

    fn sorted_ids(records: &[TransactionRecord], sort: SortState) -> Vec<String> {
        let mut rows: Vec<&TransactionRecord> = records.iter().collect();
        rows.sort_by(|a, b| sort.compare(a, b));
        rows.iter().map(|r| r.collect_id.clone()).collect()
    }

    #[test]
    fn test_toggle() {
        let mut sort = SortState::default();
        sort.toggle(SortField::OrderAmount);
        assert_eq!(sort, SortState::new(SortField::OrderAmount, SortDirection::Asc));
        sort.toggle(SortField::OrderAmount);
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.toggle(SortField::Gateway);
        assert_eq!(sort, SortState::new(SortField::Gateway, SortDirection::Asc));
    }

    #[test]
    fn test_amounts_compare_numerically() {
        let records = vec![amount("a", Some(100)), amount("b", Some(50)), amount("c", Some(75))];
        let asc = SortState::new(SortField::OrderAmount, SortDirection::Asc);
        assert_eq!(sorted_ids(&records, asc), vec!["b", "c", "a"]);
        let desc = SortState::new(SortField::OrderAmount, SortDirection::Desc);
        assert_eq!(sorted_ids(&records, desc), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_missing_amount_sorts_last_both_ways() {
        let records = vec![amount("x", None), amount("a", Some(9)), amount("b", Some(1))];
        let asc = SortState::new(SortField::OrderAmount, SortDirection::Asc);
        assert_eq!(sorted_ids(&records, asc), vec!["b", "a", "x"]);
        let desc = SortState::new(SortField::OrderAmount, SortDirection::Desc);
        assert_eq!(sorted_ids(&records, desc), vec!["a", "b", "x"]);
    }

    #[test]
    fn test_missing_timestamp_is_epoch() {
        let records = vec![
            TransactionRecord::new("late").with_payment_time(parse_timestamp("2024-01-02")),
            TransactionRecord::new("none"),
            TransactionRecord::new("early").with_payment_time(parse_timestamp("2024-01-01")),
        ];
        let asc = SortState::new(SortField::PaymentTime, SortDirection::Asc);
        assert_eq!(sorted_ids(&records, asc), vec!["none", "early", "late"]);
        let desc = SortState::new(SortField::PaymentTime, SortDirection::Desc);
        assert_eq!(sorted_ids(&records, desc), vec!["late", "early", "none"]);
    }

    #[test]
    fn test_text_is_case_sensitive_with_missing_last() {
        let records = vec![
            TransactionRecord::new("1").with_gateway("paytm"),
            TransactionRecord::new("2"),
            TransactionRecord::new("3").with_gateway("Razorpay"),
            TransactionRecord::new("4").with_gateway("PhonePe"),
        ];
        let asc = SortState::new(SortField::Gateway, SortDirection::Asc);
        assert_eq!(sorted_ids(&records, asc), vec!["4", "3", "1", "2"]);
        let desc = SortState::new(SortField::Gateway, SortDirection::Desc);
        assert_eq!(sorted_ids(&records, desc), vec!["1", "3", "4", "2"]);
    }

    #[test]
    fn test_reverse_direction_reverses_distinct_keys() {
        let records: Vec<TransactionRecord> = ["m", "c", "x", "a"]
            .iter()
            .map(|id| TransactionRecord::new(*id))
            .collect();
        let asc = sorted_ids(&records, SortState::new(SortField::CollectId, SortDirection::Asc));
        let mut desc = sorted_ids(&records, SortState::new(SortField::CollectId, SortDirection::Desc));
        desc.reverse();
        assert_eq!(asc, desc);
    }
}
