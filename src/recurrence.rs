use serde::{Deserialize, Deserializer, Serialize};
use time::{util::days_in_year_month, Date, Duration, Month, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "recurring_frequency", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Custom,
}

impl Frequency {
    /// Unrecognised labels fall back to `Custom`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "BIWEEKLY" => Frequency::Biweekly,
            "MONTHLY" => Frequency::Monthly,
            _ => Frequency::Custom,
        }
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Ok(Frequency::from_label(&raw))
    }
}

/// Next occurrence after `from`. `None` only when the result leaves the
/// representable calendar range.
pub fn next_occurrence(
    from: OffsetDateTime,
    frequency: Frequency,
    interval: u32,
) -> Option<OffsetDateTime> {
    let interval = i64::from(interval);
    match frequency {
        Frequency::Daily => from.checked_add(Duration::days(interval)),
        Frequency::Weekly => from.checked_add(Duration::weeks(interval)),
        Frequency::Biweekly => from.checked_add(Duration::weeks(interval * 2)),
        Frequency::Monthly => {
            let date = add_months(from.date(), interval)?;
            Some(from.replace_date(date))
        }
        Frequency::Custom => from.checked_add(Duration::days(1)),
    }
}

/// Calendar-month addition; the day is clamped to the end of a shorter month.
pub fn add_months(date: Date, months: i64) -> Option<Date> {
    let index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1 + months;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}
