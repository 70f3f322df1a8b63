use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicI32, Ordering},
    },
};

const DAY_FORMAT: &str = "%Y-%m-%d";
const NEVER_LABEL: &str = "never";

/// One calendar date with no time-of-day attached.
///
/// Ordering is lexicographic on (year, month, day), which is exactly the
/// ordering of the wrapped `NaiveDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid calendar day `{input}`, expected YYYY-MM-DD")]
pub struct DayParseError {
    pub input: String,
}

impl CalendarDay {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Days since 0001-01-01 of the proleptic Gregorian calendar. Only the
    /// calendar value feeds this, so time zones never enter the picture.
    pub fn day_number(self) -> i32 {
        self.0.num_days_from_ce()
    }

    pub fn offset(self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(magnitude)
        } else {
            self.0.checked_sub_days(magnitude)
        };
        shifted.map(Self)
    }

    fn from_day_number(number: i32) -> Option<Self> {
        NaiveDate::from_num_days_from_ce_opt(number).map(Self)
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // chrono accepts unpadded fields; the stored form is always padded.
        let well_formed = trimmed.len() == 10
            && trimmed
                .char_indices()
                .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
        if !well_formed {
            return Err(DayParseError { input: s.to_string() });
        }
        NaiveDate::parse_from_str(trimmed, DAY_FORMAT)
            .map(Self)
            .map_err(|_| DayParseError { input: s.to_string() })
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Source of "today". Handlers and the engine only ever see this trait.
pub trait Clock: Send + Sync {
    fn today(&self) -> CalendarDay;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> CalendarDay {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> CalendarDay {
        (**self).today()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDay {
        CalendarDay(Local::now().date_naive())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    day_number: AtomicI32,
}

impl ManualClock {
    pub fn new(day: CalendarDay) -> Self {
        Self {
            day_number: AtomicI32::new(day.day_number()),
        }
    }

    pub fn set(&self, day: CalendarDay) {
        self.day_number.store(day.day_number(), Ordering::SeqCst);
    }

    pub fn advance(&self, days: i32) {
        self.day_number.fetch_add(days, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> CalendarDay {
        let number = self.day_number.load(Ordering::SeqCst);
        CalendarDay::from_day_number(number).unwrap_or(CalendarDay(NaiveDate::MIN))
    }
}

/// Human label such as "Jan 5, 2024", or "never" when there is no day.
pub fn format_day(day: Option<CalendarDay>) -> String {
    match day {
        Some(day) => day.0.format("%b %-d, %Y").to_string(),
        None => NEVER_LABEL.to_string(),
    }
}

/// `b - a` in whole calendar days. Negative when `b` precedes `a`.
pub fn days_between(a: CalendarDay, b: CalendarDay) -> i64 {
    i64::from(b.day_number()) - i64::from(a.day_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> CalendarDay {
        s.parse().expect("valid day")
    }

    #[test]
    fn parses_and_prints_canonical_form() {
        let d = day("2024-01-05");
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 5));
        assert_eq!(d.to_string(), "2024-01-05");
    }

    #[test]
    fn rejects_non_canonical_text() {
        for input in ["", "2024-1-5", "2024/01/05", "2024-02-30", "05-01-2024", "2024-01-05T10:00"] {
            assert!(input.parse::<CalendarDay>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn ordering_follows_calendar_value() {
        assert!(day("2023-12-31") < day("2024-01-01"));
        assert!(day("2024-02-09") < day("2024-02-10"));
        assert_eq!(day("2024-03-10"), CalendarDay::from_ymd(2024, 3, 10).expect("valid"));
    }

    #[test]
    fn formats_pretty_label() {
        assert_eq!(format_day(Some(day("2024-01-05"))), "Jan 5, 2024");
        assert_eq!(format_day(Some(day("2023-12-25"))), "Dec 25, 2023");
        assert_eq!(format_day(None), "never");
    }

    #[test]
    fn days_between_handles_boundaries() {
        assert_eq!(days_between(day("2024-01-01"), day("2024-01-02")), 1);
        assert_eq!(days_between(day("2023-12-31"), day("2024-01-01")), 1);
        assert_eq!(days_between(day("2024-02-28"), day("2024-03-01")), 2);
        assert_eq!(days_between(day("2023-02-28"), day("2023-03-01")), 1);
        assert_eq!(days_between(day("2024-01-01"), day("2025-01-01")), 366);
        assert_eq!(days_between(day("2024-01-10"), day("2024-01-03")), -7);
    }

    #[test]
    fn days_between_ignores_dst_transitions() {
        // US and EU spring-forward / fall-back dates.
        assert_eq!(days_between(day("2024-03-09"), day("2024-03-10")), 1);
        assert_eq!(days_between(day("2024-03-10"), day("2024-03-11")), 1);
        assert_eq!(days_between(day("2024-03-30"), day("2024-03-31")), 1);
        assert_eq!(days_between(day("2024-10-27"), day("2024-10-28")), 1);
        assert_eq!(days_between(day("2024-11-03"), day("2024-11-04")), 1);
    }

    #[test]
    fn days_between_is_antisymmetric() {
        let start = day("2023-11-01");
        for i in 0..500 {
            let a = start.offset(i).expect("in range");
            let b = start.offset(i * 7 % 131).expect("in range");
            assert_eq!(days_between(a, b), -days_between(b, a));
            assert_eq!(days_between(a, a), 0);
        }
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(day("2024-12-31"));
        assert_eq!(clock.today(), day("2024-12-31"));
        clock.advance(1);
        assert_eq!(clock.today(), day("2025-01-01"));
        clock.set(day("2024-06-01"));
        assert_eq!(clock.today(), day("2024-06-01"));
        clock.advance(-1);
        assert_eq!(clock.today(), day("2024-05-31"));
    }
}
