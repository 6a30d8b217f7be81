//! Time utilities.
//!
//! Record sequence numbers default to Unix epoch nanoseconds (u64).

/// Return the current time as nanoseconds since Unix epoch.
///
/// Clocks set before the epoch read as zero.
pub fn now_nanos() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Convert nanoseconds to an RFC 3339 string.
pub fn nanos_to_rfc3339(nanos: u64) -> String {
    let secs = (nanos / 1_000_000_000) as i64;
    let subsec = (nanos % 1_000_000_000) as u32;
    let dt = chrono::DateTime::from_timestamp(secs, subsec).unwrap_or(chrono::DateTime::UNIX_EPOCH);
    dt.to_rfc3339()
}
