//! Term length from "beginning <Month Year> ... ending <Month Year>"

use chrono::{Datelike, NaiveDate};

use super::patterns::DATE_RANGE;

/// Parse "January 2024" / "Jan 2024" / "Sept. 2024" into (year, month)
pub fn parse_month_year(raw: &str) -> Option<(i32, u32)> {
    let cleaned = raw.replace('.', "");
    let mut parts = cleaned.split_whitespace();
    let month = parts.next()?;
    let year = parts.next()?;

    // chrono's %b rejects "Sept"
    let month = if month.eq_ignore_ascii_case("sept") { "Sep" } else { month };

    let date = NaiveDate::parse_from_str(&format!("1 {month} {year}"), "%d %B %Y").ok()?;
    Some((date.year(), date.month()))
}

/// Contract length in months derived from a beginning/ending date pair
///
/// `None` when no pair is stated, a month name is not recognized, or the
/// range does not move forward.
pub fn term_from_date_range(text: &str) -> Option<u32> {
    let caps = DATE_RANGE.captures(text)?;
    let start = caps.get(1).map(|m| m.as_str())?;
    let end = caps.get(2).map(|m| m.as_str())?;

    let (Some((start_year, start_month)), Some((end_year, end_month))) =
        (parse_month_year(start), parse_month_year(end))
    else {
        tracing::debug!(start, end, "Unrecognized month in date range");
        return None;
    };

    let months = (end_year - start_year) * 12 + (end_month as i32 - start_month as i32);
    if months <= 0 {
        tracing::debug!(start, end, months, "Date range does not move forward");
        return None;
    }

    u32::try_from(months).ok()
}
