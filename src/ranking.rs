//! Frequency ranking of categorical fields.
//!
//! Every report ranks some string field of its records: the source name of
//! a NewsAPI article, the section of a Guardian result, the domain of a GDELT
//! article, the host of a feed item. [`top_n`] does that in one pass:
//!
//! 1. Build a [`FrequencyTable`] by applying the field selector to each record.
//! 2. Sort the distinct values by count, descending.
//! 3. Keep the first `n`.
//!
//! # Tie-break
//!
//! Values with equal counts are ordered lexicographically ascending, so the
//! same input always prints the same ranking.
//!
//! # Empty values
//!
//! A record whose field is empty or missing is counted under the empty-string
//! key. The table therefore always sums to the number of records fed to it.

use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Occurrence count per distinct field value.
pub type FrequencyTable = HashMap<String, usize>;

/// One `(value, count)` row of a ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub value: String,
    pub count: usize,
}

impl RankedEntry {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Count how often each field value occurs across `records`.
pub fn frequency_table<I, F, S>(records: I, field: F) -> FrequencyTable
where
    I: IntoIterator,
    F: FnMut(I::Item) -> S,
    S: AsRef<str>,
{
    records
        .into_iter()
        .map(field)
        .map(|value| value.as_ref().to_owned())
        .counts()
}

/// Order a table by descending count and keep the first `n` entries.
pub fn rank(table: FrequencyTable, n: usize) -> Vec<RankedEntry> {
    table
        .into_iter()
        .sorted_by(|(a_value, a_count), (b_value, b_count)| {
            by_count_then_value((a_value.as_str(), *a_count), (b_value.as_str(), *b_count))
        })
        .take(n)
        .map(|(value, count)| RankedEntry::new(value, count))
        .collect()
}

/// The `n` most frequent values of `field` across `records`.
///
/// # Examples
///
/// ```ignore
/// let sources = ["A", "B", "A", "C", "A", "B"];
/// let top = top_n(sources, |s| s, 2);
/// assert_eq!(top, vec![RankedEntry::new("A", 3), RankedEntry::new("B", 2)]);
/// ```
pub fn top_n<I, F, S>(records: I, field: F, n: usize) -> Vec<RankedEntry>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> S,
    S: AsRef<str>,
{
    if n == 0 {
        return Vec::new();
    }
    rank(frequency_table(records, field), n)
}

fn by_count_then_value(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}
