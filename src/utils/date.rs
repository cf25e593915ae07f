use chrono::{DateTime, Days, NaiveDate, Utc};

/// Midnight UTC at the start of `date`
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// Exclusive upper bound for a range ending on `date`
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date.checked_add_days(Days::new(1)).unwrap_or(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(day_start(d).to_rfc3339(), "2024-06-30T00:00:00+00:00");
        assert_eq!(day_end(d).to_rfc3339(), "2024-07-01T00:00:00+00:00");
    }
}
