//! Issue date composition for certificates.

use chrono::NaiveDate;

/// Genitive Russian month names as printed in `Дата оформления "05" мая 2025`.
const MONTHS: [(&str, &str); 12] = [
    ("января", "01"),
    ("февраля", "02"),
    ("марта", "03"),
    ("апреля", "04"),
    ("мая", "05"),
    ("июня", "06"),
    ("июля", "07"),
    ("августа", "08"),
    ("сентября", "09"),
    ("октября", "10"),
    ("ноября", "11"),
    ("декабря", "12"),
];

/// Issue date split into the parts stored on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDate {
    /// `DD.MM.YYYY`.
    pub formatted: String,
    /// Zero-padded day.
    pub day: String,
    /// Month-name token exactly as printed.
    pub month_name: String,
}

impl IssueDate {
    /// Compose an issue date from its printed parts.
    ///
    /// A month name that is not one of the twelve known names is read as
    /// January.
    pub fn compose(day: &str, month_name: &str, year: &str) -> Self {
        let month = month_number(month_name).unwrap_or(FALLBACK_MONTH);
        let day = format!("{:0>2}", day.trim());
        Self {
            formatted: format!("{}.{}.{}", day, month, year.trim()),
            day,
            month_name: month_name.to_string(),
        }
    }
}

const FALLBACK_MONTH: &str = "01";

/// Two-digit month number for a genitive month name, case-insensitive.
pub fn month_number(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, number)| *number)
}

/// Parse a record date in `DD.MM.YYYY` form.
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d.%m.%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_pads_day() {
        let date = IssueDate::compose("5", "мая", "2025");
        assert_eq!(date.formatted, "05.05.2025");
        assert_eq!(date.day, "05");
        assert_eq!(date.month_name, "мая");
    }

    #[test]
    fn test_compose_keeps_month_token_case() {
        let date = IssueDate::compose("17", "Декабря", "2024");
        assert_eq!(date.formatted, "17.12.2024");
        assert_eq!(date.month_name, "Декабря");
    }

    #[test]
    fn test_every_month_maps() {
        for (i, (name, _)) in MONTHS.iter().enumerate() {
            assert_eq!(month_number(name), Some(format!("{:02}", i + 1).as_str()));
        }
    }

    #[test]
    fn test_unknown_month_falls_back_to_january() {
        assert_eq!(month_number("мартобря"), None);

        let date = IssueDate::compose("12", "мартобря", "2024");
        assert_eq!(date.formatted, "12.01.2024");
        assert_eq!(date.day, "12");
        assert_eq!(date.month_name, "мартобря");
    }

    #[test]
    fn test_composed_dates_parse_back() {
        let date = IssueDate::compose("29", "февраля", "2024");
        assert_eq!(
            parse_record_date(&date.formatted),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );

        let impossible = IssueDate::compose("31", "апреля", "2024");
        assert_eq!(impossible.formatted, "31.04.2024");
        assert!(parse_record_date(&impossible.formatted).is_none());
    }
}
