pub mod counter;
pub mod countdown;
pub mod data;
pub mod premium;
pub mod theme;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tallykit_core::Event;

/// Print a core event as one JSON line on stdout. Scripts consume
/// these; human-facing messages go to stderr.
pub fn emit(event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to encode event: {e}"),
    }
}

/// Parse a target date from RFC 3339, `YYYY-MM-DD HH:MM`, or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(format!(
        "cannot parse date '{input}' (expected RFC 3339, 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD')"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_common_forms() {
        assert!(parse_date("2026-06-01T12:00:00Z").is_ok());
        assert!(parse_date("2026-06-01 12:30").is_ok());
        let midnight = parse_date("2026-06-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2026-06-01T00:00:00+00:00");
        assert!(parse_date("next tuesday").is_err());
    }
}
