//! Calendar helpers for week views. Weeks start on Monday and every value is
//! interpreted in the offset of the `OffsetDateTime` it is derived from.

use serde::Serialize;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Duration,
    OffsetDateTime, Time,
};

const DAY_KEY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Monday 00:00 through Sunday 23:59:59.999 of one calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBounds {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

impl WeekBounds {
    pub fn first_day(&self) -> Date {
        self.start.date()
    }

    pub fn last_day(&self) -> Date {
        self.end.date()
    }

    /// Monday through Sunday. Total, since `current_week` only builds weeks whose
    /// Sunday exists.
    pub fn days(&self) -> [Date; 7] {
        let monday = self.first_day();
        std::array::from_fn(|i| monday + Duration::days(i as i64))
    }

    /// Monday 00:00 of the following week.
    pub fn end_exclusive(&self) -> OffsetDateTime {
        self.start + Duration::weeks(1)
    }
}

fn monday_of(date: Date) -> Option<Date> {
    date.checked_sub(Duration::days(date.weekday().number_days_from_monday() as i64))
}

/// `None` when the week runs past the representable calendar.
pub fn current_week(at: OffsetDateTime) -> Option<WeekBounds> {
    let monday = monday_of(at.date())?;
    let sunday = monday.checked_add(Duration::days(6))?;
    let end_of_day = Time::from_hms_milli(23, 59, 59, 999).unwrap_or(Time::MIDNIGHT);
    Some(WeekBounds {
        start: monday.midnight().assume_offset(at.offset()),
        end: sunday.with_time(end_of_day).assume_offset(at.offset()),
    })
}

/// Start of the calendar day containing `at` and the start of the next one.
pub fn day_bounds(at: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = at.date().midnight().assume_offset(at.offset());
    (start, start + Duration::days(1))
}

/// Shifts `at` by whole weeks; negative offsets go back in time.
pub fn shift_weeks(at: OffsetDateTime, weeks: i64) -> Option<OffsetDateTime> {
    let seconds = weeks.checked_mul(7 * 86_400)?;
    at.checked_add(Duration::seconds(seconds))
}

/// Number of whole weeks between the week of `now` and the week holding `day`.
pub fn week_offset(day: Date, now: OffsetDateTime) -> Option<i64> {
    let target = monday_of(day)?;
    let current = monday_of(now.date())?;
    Some((target - current).whole_days() / 7)
}

/// "Today", "Tomorrow", or a short form such as "Mon, Jan 8".
pub fn display_date(date: OffsetDateTime, now: OffsetDateTime) -> String {
    let day = date.to_offset(now.offset()).date();
    let today = now.date();
    if day == today {
        return "Today".to_string();
    }
    if today.next_day() == Some(day) {
        return "Tomorrow".to_string();
    }
    day.format(format_description!(
        "[weekday repr:short], [month repr:short] [day padding:none]"
    ))
    .unwrap_or_else(|_| day_key(day))
}

/// `YYYY-MM-DD`, used as the bucketing key for a calendar day.
pub fn day_key(date: Date) -> String {
    date.format(DAY_KEY).unwrap_or_else(|_| date.to_string())
}

pub fn parse_day_key(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), DAY_KEY)
}

/// Full English weekday name ("Monday").
pub fn day_name(date: Date) -> String {
    date.weekday().to_string()
}

/// Serde adapter writing a `Date` as its day key.
pub mod day_key_serde {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::day_key(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_day_key(&raw).map_err(de::Error::custom)
    }
}
