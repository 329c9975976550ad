use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision Postgres stores (microseconds).
///
/// Rows built in memory compare equal to the same rows read back.
pub fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
