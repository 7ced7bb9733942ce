use chrono::{DateTime, Local, TimeZone};

const LAST_EDITED_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

pub(crate) fn format_last_edited<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(LAST_EDITED_FORMAT).to_string()
}

/// Formats a server `updated_at` in local time; unparseable values pass through.
pub(crate) fn format_server_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => format_last_edited(&at.with_timezone(&Local)),
        Err(_) => raw.to_string(),
    }
}

pub(crate) fn format_epoch_ms(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(at) => format_last_edited(&at.with_timezone(&Local)),
        None => String::new(),
    }
}
