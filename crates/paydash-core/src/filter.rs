//! Filter state for the transaction table
//!
//! A record is visible when it passes every active predicate: free text,
//! status set, school set and the date bounds. Empty selections and unset
//! bounds let everything through.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::models::TransactionRecord;
use super::time::{day_end, day_start, parse_date};
use super::types::TransactionStatus;

/// User-selected narrowing criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text query, matched case-insensitively
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub statuses: BTreeSet<TransactionStatus>,
    #[serde(default)]
    pub schools: BTreeSet<String>,
    /// Inclusive from the start of this day
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    /// Inclusive through the end of this day
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl FilterState {
    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.statuses.is_empty()
            && self.schools.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Merge a partial update; fields absent from the patch are kept
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(statuses) = patch.statuses {
            self.statuses = statuses;
        }
        if let Some(schools) = patch.schools {
            self.schools = schools;
        }
        if let Some(date_from) = patch.date_from {
            self.date_from = date_from;
        }
        if let Some(date_to) = patch.date_to {
            self.date_to = date_to;
        }
    }

    /// Flip membership of a status in the selection
    pub fn toggle_status(&mut self, status: TransactionStatus) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    /// Flip membership of a school in the selection
    pub fn toggle_school(&mut self, school_id: &str) {
        if !self.schools.remove(school_id) {
            self.schools.insert(school_id.to_string());
        }
    }

    /// Whether a single record passes every active predicate
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.matcher().matches(record)
    }

    /// Indices of the matching records, in input order
    pub fn apply(&self, records: &[TransactionRecord]) -> Vec<usize> {
        let matcher = self.matcher();
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| matcher.matches(record))
            .map(|(i, _)| i)
            .collect()
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            needle: self.search.to_lowercase(),
            state: self,
        }
    }
}

/// Filter state with the search query lowercased once per pass
struct Matcher<'a> {
    needle: String,
    state: &'a FilterState,
}

impl Matcher<'_> {
    fn matches(&self, record: &TransactionRecord) -> bool {
        self.matches_text(record)
            && self.matches_status(record)
            && self.matches_school(record)
            && self.matches_dates(record)
    }

    fn matches_text(&self, record: &TransactionRecord) -> bool {
        self.needle.is_empty() || record.matches_text(&self.needle)
    }

    fn matches_status(&self, record: &TransactionRecord) -> bool {
        self.state.statuses.is_empty() || self.state.statuses.contains(&record.status)
    }

    fn matches_school(&self, record: &TransactionRecord) -> bool {
        self.state.schools.is_empty() || self.state.schools.contains(&record.school_id)
    }

    fn matches_dates(&self, record: &TransactionRecord) -> bool {
        if let Some(from) = self.state.date_from {
            match record.payment_time {
                Some(ts) if ts >= day_start(from) => {}
                _ => return false,
            }
        }
        if let Some(to) = self.state.date_to {
            match record.payment_time {
                Some(ts) if ts <= day_end(to) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Partial filter update
///
/// `None` leaves a field untouched. For the date bounds `Some(None)` clears
/// the bound; over JSON that is an explicit `null` or an empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterPatch {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub statuses: Option<BTreeSet<TransactionStatus>>,
    #[serde(default)]
    pub schools: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "date_bound")]
    pub date_from: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "date_bound")]
    pub date_to: Option<Option<NaiveDate>>,
}

impl FilterPatch {
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn statuses<I: IntoIterator<Item = TransactionStatus>>(mut self, statuses: I) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn schools<I, S>(mut self, schools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schools = Some(schools.into_iter().map(Into::into).collect());
        self
    }

    pub fn date_from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = Some(date);
        self
    }
}

fn date_bound<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(Some(value.as_deref().and_then(parse_date)))
}
