use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Deserializer, de};

/// Calendar day in the local timezone of the running process.
///
/// Day boundaries follow local midnight. Everything that needs "today" goes
/// through here so the whole service agrees on one policy.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_day(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Serde adapter that only accepts fixed-width `YYYY-MM-DD` days.
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_day(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a YYYY-MM-DD day, got {value:?}")))
}

/// `today`, `today - 1`, ... for `count` days, newest first.
pub fn days_back(today: NaiveDate, count: u32) -> impl Iterator<Item = NaiveDate> {
    (0..i64::from(count)).map(move |offset| today - Duration::days(offset))
}

/// The `len` days ending at `today`, oldest first.
pub fn window_ending(today: NaiveDate, len: u32) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = days_back(today, len).collect();
    days.reverse();
    days
}
