//! Item normalizer.
//!
//! Turns wire items into candidate posts. Items that cannot be stored are
//! dropped one at a time; the rest of the document is unaffected.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::document::RawItem;

/// Day names accepted as the leading field of a publish date.
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Format of a publish date after the weekday, e.g. `02 Jan 2006 15:04:05 -0700`.
const PUB_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S %z";

/// A post ready for insertion, before it is given an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePost {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Why an item was not turned into a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The publish date is not in RFC 1123 numeric-zone form.
    InvalidDate,
    /// The item has no link to key the post by.
    MissingLink,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::InvalidDate => write!(f, "unparsable publish date"),
            DropReason::MissingLink => write!(f, "missing link"),
        }
    }
}

/// Parse an RFC 1123 date with a numeric zone, such as
/// `Mon, 02 Jan 2006 15:04:05 -0700`.
///
/// The weekday must be a valid abbreviation but is not checked against the
/// date itself.
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    let (weekday, rest) = value.trim().split_once(", ")?;
    if !WEEKDAYS.iter().any(|day| day.eq_ignore_ascii_case(weekday)) {
        return None;
    }
    if !has_fixed_widths(rest) {
        return None;
    }

    DateTime::parse_from_str(rest, PUB_DATE_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check the field widths chrono would otherwise accept loosely: a two-digit
/// day, a four-digit year, `HH:MM:SS` and a `+hhmm` zone.
fn has_fixed_widths(rest: &str) -> bool {
    let fields: Vec<&str> = rest.split(' ').collect();
    let [day, month, year, time, zone] = *fields.as_slice() else {
        return false;
    };

    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());
    let time_ok = time.len() == 8
        && time.split(':').count() == 3
        && time.split(':').all(|part| digits(part, 2));
    let zone_ok = zone.len() == 5
        && matches!(zone.as_bytes()[0], b'+' | b'-')
        && digits(&zone[1..], 4);

    digits(day, 2) && month.len() == 3 && digits(year, 4) && time_ok && zone_ok
}

/// Normalize a single item.
pub fn normalize_item(item: &RawItem) -> Result<CandidatePost, DropReason> {
    let url = item.link.trim();
    if url.is_empty() {
        return Err(DropReason::MissingLink);
    }

    let published_at = parse_pub_date(&item.pub_date).ok_or(DropReason::InvalidDate)?;

    let description = if item.description.is_empty() {
        None
    } else {
        Some(item.description.clone())
    };

    Ok(CandidatePost {
        title: item.title.clone(),
        url: url.to_string(),
        description,
        published_at,
    })
}

/// Normalize every item of a document, keeping document order and skipping
/// items that cannot be stored.
pub fn normalize_items(items: &[RawItem]) -> Vec<CandidatePost> {
    items
        .iter()
        .filter_map(|item| match normalize_item(item) {
            Ok(candidate) => Some(candidate),
            Err(reason) => {
                debug!(
                    link = %item.link,
                    pub_date = %item.pub_date,
                    "Dropping item: {}",
                    reason
                );
                None
            }
        })
        .collect()
}
