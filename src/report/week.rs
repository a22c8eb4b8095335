use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Monday-to-Sunday calendar week containing `today`.
    pub fn containing(today: NaiveDate) -> Self {
        let offset = i64::from(today.weekday().num_days_from_monday());
        let start = today - Duration::days(offset);

        Self {
            start,
            end: start + Duration::days(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WeekWindow;
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn midweek_day_maps_to_monday_through_sunday() {
        let window = WeekWindow::containing(date("2026-02-19"));
        assert_eq!(window.start, date("2026-02-16"));
        assert_eq!(window.end, date("2026-02-22"));
    }

    #[test]
    fn monday_and_sunday_stay_in_their_own_week() {
        assert_eq!(WeekWindow::containing(date("2026-02-16")).start, date("2026-02-16"));
        assert_eq!(WeekWindow::containing(date("2026-02-22")).start, date("2026-02-16"));
        assert_eq!(WeekWindow::containing(date("2026-02-23")).start, date("2026-02-23"));
    }

    #[test]
    fn window_crosses_year_boundary() {
        let window = WeekWindow::containing(date("2027-01-01"));
        assert_eq!(window.start, date("2026-12-28"));
        assert_eq!(window.end, date("2027-01-03"));
    }
}
