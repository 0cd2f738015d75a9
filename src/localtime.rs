//! Bucketing of instants into Europe/London calendar dates.

use time::{
    format_description::well_known::Rfc3339,
    macros::{format_description, offset},
    Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

/// Label stored alongside every daily total.
pub const TZ_LABEL: &str = "Europe/London";

const GMT: UtcOffset = offset!(UTC);
const BST: UtcOffset = offset!(+1);

/// Calendar date of `instant` as observed in London.
pub fn local_date(instant: OffsetDateTime) -> Date {
    instant.to_offset(london_offset(instant)).date()
}

/// The London date for the given "now".
pub fn today(now: OffsetDateTime) -> Date {
    local_date(now)
}

/// Parses an event timestamp. Accepts RFC 3339 and the looser ISO 8601
/// forms clients commonly send: `T` or space between date and time, seconds
/// optional, and an offset with or without a colon. A timestamp without an
/// offset (or ending in `Z`) is read as UTC.
pub fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }
    let raw = &raw.replacen(' ', "T", 1);
    let with_offset = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]][offset_hour sign:mandatory][optional [:]][offset_minute]"
    );
    if let Ok(dt) = OffsetDateTime::parse(raw, with_offset) {
        return Some(dt);
    }
    let naive = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    );
    let raw = raw.strip_suffix(['Z', 'z']).unwrap_or(raw.as_str());
    PrimitiveDateTime::parse(raw, naive)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

// Summer time runs from 01:00 UTC on the last Sunday of March to 01:00 UTC
// on the last Sunday of October.
fn london_offset(instant: OffsetDateTime) -> UtcOffset {
    let utc = instant.to_offset(GMT);
    match summer_time_bounds(utc.year()) {
        Some((start, end)) if utc >= start && utc < end => BST,
        _ => GMT,
    }
}

fn summer_time_bounds(year: i32) -> Option<(OffsetDateTime, OffsetDateTime)> {
    let start = last_sunday(year, Month::March)?;
    let end = last_sunday(year, Month::October)?;
    let at_one = |d: Date| d.midnight().assume_utc() + Duration::hours(1);
    Some((at_one(start), at_one(end)))
}

fn last_sunday(year: i32, month: Month) -> Option<Date> {
    let last = Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .ok()?;
    let back = last.weekday().number_days_from_sunday();
    last.checked_sub(Duration::days(back.into()))
}
