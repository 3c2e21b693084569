/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC date formatted for backend-facing date fields (`YYYY-MM-DD`).
///
/// The order backend stores dates as plain strings; both the header and the
/// item writes carry the same formatted day.
pub fn today_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
