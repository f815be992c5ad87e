//! Date parsing and comparison helpers
//!
//! Workflow snapshots arrive from callers that send either full RFC 3339
//! instants or plain calendar dates. Both are normalized to UTC instants.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Parse an RFC 3339 instant or a `YYYY-MM-DD` date (midnight UTC)
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected RFC 3339 or YYYY-MM-DD", s))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("Invalid date '{}'", s))?;

    Ok(Utc.from_utc_datetime(&midnight))
}

/// Serde helper for optional dates accepting both accepted input forms
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_datetime(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Compare two instants by calendar day (UTC), ignoring the time of day
pub fn compare_days(before: &DateTime<Utc>, after: &DateTime<Utc>) -> Ordering {
    before.date_naive().cmp(&after.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_datetime("2024-01-10").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_datetime("2024-01-10T20:30:00-05:00").unwrap();
        assert_eq!(dt.hour(), 1);
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_datetime("10/01/2024").is_err());
        assert!(parse_datetime("").is_err());
    }

    #[test]
    fn test_compare_days_ignores_time() {
        let morning = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 10, 22, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 1, 11, 1, 0, 0).unwrap();

        assert_eq!(compare_days(&morning, &evening), Ordering::Equal);
        assert_eq!(compare_days(&evening, &next_day), Ordering::Less);
        assert_eq!(compare_days(&next_day, &morning), Ordering::Greater);
    }
}
