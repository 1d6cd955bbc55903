//! Parsing of the `logs` date filter.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use regex::Regex;

use crate::error::{BotError, Result};

const USAGE: &str = "Invalid date format. Use: today, yesterday, 7days, or YYYY-MM-DD";

static DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*days$").expect("days pattern is valid"));
static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Half-open time range `[start, end)` with a human-readable title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl LogRange {
    /// Interpret `filter` relative to `now`. Days are UTC days.
    ///
    /// Accepts `today` (or nothing), `yesterday`, `<N>days` and `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` with usage help for anything else.
    pub fn parse(filter: Option<&str>, now: DateTime<Utc>) -> Result<Self> {
        let filter = filter.map(|f| f.trim().to_lowercase()).unwrap_or_default();
        let today = start_of_day(now.date_naive());

        if filter.is_empty() || filter == "today" {
            return Ok(Self {
                start: today,
                end: now,
                title: "Today's Logs".to_string(),
            });
        }

        if filter == "yesterday" {
            let start = today - TimeDelta::days(1);
            return Ok(Self {
                start,
                end: today,
                title: "Yesterday's Logs".to_string(),
            });
        }

        if let Some(caps) = DAYS.captures(&filter) {
            let days: i64 = caps[1]
                .parse()
                .map_err(|_| BotError::Validation(USAGE.to_string()))?;
            let start = TimeDelta::try_days(days)
                .filter(|span| *span > TimeDelta::zero())
                .and_then(|span| now.checked_sub_signed(span))
                .ok_or_else(|| {
                    BotError::Validation("The number of days must be at least 1.".to_string())
                })?;
            return Ok(Self {
                start,
                end: now,
                title: format!("Last {days} Days Logs"),
            });
        }

        if DATE.is_match(&filter) {
            let date = NaiveDate::parse_from_str(&filter, "%Y-%m-%d")
                .map_err(|_| BotError::Validation(format!("{filter} is not a valid date.")))?;
            let start = start_of_day(date);
            return Ok(Self {
                start,
                end: start + TimeDelta::days(1),
                title: format!("Logs for {filter}"),
            });
        }

        Err(BotError::Validation(USAGE.to_string()))
    }
}
