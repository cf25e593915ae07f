use chrono::{DateTime, Utc};

/// `PED-YYYYMMDD-`, shared by every order placed that day
pub fn order_number_prefix(at: DateTime<Utc>) -> String {
    format!("PED-{}-", at.format("%Y%m%d"))
}

/// Order number: `PED-YYYYMMDD-NNNNNN`, counted per day from 1.
/// `last` is the highest number already issued that day.
pub fn next_order_number(at: DateTime<Utc>, last: Option<&str>) -> String {
    let prefix = order_number_prefix(at);
    let sequence = last
        .and_then(|number| number.strip_prefix(prefix.as_str()))
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .unwrap_or(0)
        + 1;
    format!("{prefix}{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_first_order_of_the_day() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
        assert_eq!(next_order_number(at, None), "PED-20240603-000001");
    }

    #[test]
    fn test_sequence_continues_within_the_day() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 18, 30, 0).unwrap();
        assert_eq!(
            next_order_number(at, Some("PED-20240603-000041")),
            "PED-20240603-000042"
        );
        // yesterday's numbers do not carry over
        assert_eq!(
            next_order_number(at, Some("PED-20240602-000900")),
            "PED-20240603-000001"
        );
    }
}
