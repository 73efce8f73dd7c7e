//! Custom serde helpers for backend wire formats.

/// Deserializes an ISO-8601 timestamp into `DateTime<Utc>`.
///
/// The backend emits naive datetimes (`"2026-02-07T18:00:00"`) for values it
/// stamps in Korea Standard Time, and offset-qualified ones for database
/// columns. Naive values are read as KST.
pub mod kst_timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use chrono_tz::Asia::Seoul;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()?;
        Seoul
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", raw)))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::kst_timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_naive_timestamp_is_kst() {
        let parsed = kst_timestamp::parse("2026-02-07T18:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 2, 7, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_timestamp_kept() {
        let parsed = kst_timestamp::parse("2026-02-07T18:00:00.123+00:00").unwrap();
        assert_eq!(parsed.timestamp_millis() % 1000, 123);
        assert_eq!(parsed.timestamp(), Utc.with_ymd_and_hms(2026, 2, 7, 18, 0, 0).unwrap().timestamp());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(kst_timestamp::parse("yesterday").is_none());
    }
}
