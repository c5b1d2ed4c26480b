//! Formatting helpers shared by the views.

use chrono::{DateTime, NaiveDate, Utc};

/// `"in_progress"` → `"In Progress"`.
pub fn enum_to_display_text(value: &str) -> String {
    value
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase initials for an avatar, e.g. `("ada", "Lovelace")` → `"AL"`.
pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .next()
        .into_iter()
        .chain(last_name.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Cut `text` to `max_chars` characters, appending `...` when something was removed.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{kept}...")
}

/// Rounded percentage; 0 when there is nothing to complete.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Accepts RFC 3339 timestamps (as the API sends them) and plain `YYYY-MM-DD`
/// dates (as date inputs produce them).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| value.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// `"2025-01-05T00:00:00Z"` → `"Jan 5, 2025"`. Unparseable input is returned as is.
pub fn format_date(value: &str) -> String {
    match parse_date(value) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => value.to_string(),
    }
}

/// `YYYY-MM-DD` prefix of a date, for prefilling date inputs.
pub fn date_input_value(value: &str) -> String {
    parse_date(value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole days from `today` to `value`; negative when it lies in the past.
pub fn days_until(value: &str, today: NaiveDate) -> Option<i64> {
    parse_date(value).map(|date| (date - today).num_days())
}

pub fn is_past(value: &str, today: NaiveDate) -> bool {
    days_until(value, today).is_some_and(|days| days < 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_enum_to_display_text() {
        assert_eq!(enum_to_display_text("in_progress"), "In Progress");
        assert_eq!(enum_to_display_text("TEAM_MEMBER"), "Team Member");
        assert_eq!(enum_to_display_text("todo"), "Todo");
        assert_eq!(enum_to_display_text(""), "");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ada", "Lovelace"), "AL");
        assert_eq!(initials("", "Lee"), "L");
        assert_eq!(initials("", ""), "");
    }

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(4, 4), 100);
    }

    #[test]
    fn test_parse_and_format_dates() {
        assert_eq!(parse_date("2025-01-05"), Some(day(2025, 1, 5)));
        assert_eq!(parse_date("2025-01-05T23:30:00.000Z"), Some(day(2025, 1, 5)));
        assert_eq!(parse_date("2025-01-05T10:00:00"), Some(day(2025, 1, 5)));
        assert_eq!(parse_date("soon"), None);
        assert_eq!(format_date("2025-01-05T00:00:00Z"), "Jan 5, 2025");
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(date_input_value("2025-03-09T00:00:00Z"), "2025-03-09");
    }

    #[test]
    fn test_days_until_and_past() {
        let today = day(2025, 1, 10);
        assert_eq!(days_until("2025-01-12", today), Some(2));
        assert_eq!(days_until("2025-01-09", today), Some(-1));
        assert!(is_past("2025-01-09", today));
        assert!(!is_past("2025-01-10", today));
        assert!(!is_past("", today));
    }
}
