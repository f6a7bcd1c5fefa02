use chrono::{DateTime, Local, TimeZone, Utc};

const DISPLAY_FORMAT: &str = "%b %-d, %Y %H:%M";

pub fn format_timestamp_in<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

/// Formats a server timestamp in the browser's local time zone.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    format_timestamp_in(at, &Local)
}
