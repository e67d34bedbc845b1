//! Danish wording for dates and missing values, as the booking pages show them.

use chrono::{Datelike, NaiveDate, Weekday};

/// Placeholder for a vehicle field the registry did not supply.
pub const NOT_AVAILABLE: &str = "Ikke tilgængelig";

const MONTHS: [&str; 12] = [
    "januar",
    "februar",
    "marts",
    "april",
    "maj",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "december",
];

/// Long Danish date, e.g. `"16. oktober 2026"`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{}. {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mandag",
        Weekday::Tue => "tirsdag",
        Weekday::Wed => "onsdag",
        Weekday::Thu => "torsdag",
        Weekday::Fri => "fredag",
        Weekday::Sat => "lørdag",
        Weekday::Sun => "søndag",
    }
}

/// The field's value, or [`NOT_AVAILABLE`] when absent or blank.
pub fn or_not_available(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_long_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(format_date(date), "16. oktober 2026");
        let date = NaiveDate::from_ymd_opt(2027, 1, 4).unwrap();
        assert_eq!(format_date(date), "4. januar 2027");
    }

    #[test]
    fn weekday_names() {
        assert_eq!(weekday_name(Weekday::Fri), "fredag");
        assert_eq!(weekday_name(Weekday::Sat), "lørdag");
    }

    #[test]
    fn blank_fields_are_not_available() {
        assert_eq!(or_not_available(None), NOT_AVAILABLE);
        assert_eq!(or_not_available(Some("  ")), NOT_AVAILABLE);
        assert_eq!(or_not_available(Some("Diesel")), "Diesel");
    }
}
