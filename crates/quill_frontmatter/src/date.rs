use chrono::NaiveDate;

/// Splits a stored date value into its calendar date and time of day.
///
/// Only ISO 8601 `T` separated values carry a time component; anything else
/// is returned whole as the date.
pub fn split_stored(value: &str) -> (&str, Option<&str>) {
    match value.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (value, None),
    }
}

/// Builds the value written back for an edited date.
///
/// A bare calendar date receives the original time of day when the stored
/// value had one, otherwise `default_time`. Values that already carry a time,
/// or are not calendar dates at all, are written as given.
pub fn resolve(date: &str, original_time: Option<&str>, default_time: &str) -> String {
    let date = date.trim();
    if date.contains('T') || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return date.to_string();
    }
    let time = original_time.unwrap_or(default_time);
    format!("{date}T{time}")
}
