use time::OffsetDateTime;

/// Hard cap on submissions per uploader per accounting period.
pub const MONTHLY_UPLOAD_LIMIT: i32 = 10;

/// Accounting window token, e.g. `2026-08`. Takes the timestamp as input so
/// admission is testable without an ambient clock.
pub fn period_token(now: OffsetDateTime) -> String {
    format!("{:04}-{:02}", now.year(), u8::from(now.month()))
}

/// Counter key: uploader identity scoped by period.
pub fn counter_key(uploader_id: &str, now: OffsetDateTime) -> String {
    format!("{}:{}", uploader_id, period_token(now))
}
