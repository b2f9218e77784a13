use chrono::SubsecRound;
use serde::{Deserialize, Deserializer};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Digits of sub-second precision a `TIMESTAMPTZ` column keeps.
pub const DB_SUBSEC_DIGITS: u16 = 6;

/// Drop precision the database cannot store, so a value compares equal to
/// what reading it back returns.
pub fn to_db_precision(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(DB_SUBSEC_DIGITS)
}

/// `deserialize_with` for an optional timestamp in a request body,
/// truncated to [`to_db_precision`].
pub fn deserialize_db_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Timestamp>::deserialize(deserializer).map(|ts| ts.map(to_db_precision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_precision_keeps_microseconds_only() {
        let ts: Timestamp = "2026-04-01T00:00:00.1234567Z".parse().unwrap();
        let truncated = to_db_precision(ts);
        assert_eq!(truncated.to_rfc3339(), "2026-04-01T00:00:00.123456+00:00");
        assert_eq!(to_db_precision(truncated), truncated);
    }
}
