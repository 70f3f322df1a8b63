//! Display preferences kept next to the streak: name, theme and the
//! reminder time handed to the notification collaborator.

use crate::store::{KeyValueStore, keys, read_parsed, write_display};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DEFAULT_NAME: &str = "Streak Tracker";
const MAX_NAME_CHARS: usize = 80;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Type a name first.")]
    EmptyName,
    #[error("Name must be at most 80 characters.")]
    NameTooLong,
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
    #[error("reminder time `{0}` must be HH:MM")]
    InvalidTime(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// The toggle shows the mode you would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀️",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(PreferenceError::UnknownTheme(other.to_string())),
        }
    }
}

/// Local wall-clock reminder time, stored as zero padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PreferenceError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour = hour.parse().map_err(|_| invalid())?;
        let minute = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

pub fn name<S: KeyValueStore + ?Sized>(store: &S) -> String {
    store
        .get(keys::NAME)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

pub fn save_name<S: KeyValueStore + ?Sized>(store: &mut S, raw: &str) -> Result<String, PreferenceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(PreferenceError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(PreferenceError::NameTooLong);
    }
    store.set(keys::NAME, name.to_string());
    Ok(name.to_string())
}

pub fn theme<S: KeyValueStore + ?Sized>(store: &S) -> Theme {
    read_parsed(store, keys::THEME).unwrap_or_default()
}

pub fn toggle_theme<S: KeyValueStore + ?Sized>(store: &mut S) -> Theme {
    let next = theme(&*store).toggled();
    write_display(store, keys::THEME, &next);
    next
}

pub fn reminder_time<S: KeyValueStore + ?Sized>(store: &S) -> Option<ReminderTime> {
    read_parsed(store, keys::REMIND_TIME)
}

pub fn save_reminder_time<S: KeyValueStore + ?Sized>(
    store: &mut S,
    raw: &str,
) -> Result<ReminderTime, PreferenceError> {
    let time: ReminderTime = raw.parse()?;
    write_display(store, keys::REMIND_TIME, &time);
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn name_defaults_and_trims() {
        let mut store = MemoryStore::new();
        assert_eq!(name(&store), DEFAULT_NAME);
        assert_eq!(save_name(&mut store, "  Running  "), Ok("Running".to_string()));
        assert_eq!(name(&store), "Running");
        assert_eq!(save_name(&mut store, "   "), Err(PreferenceError::EmptyName));
        assert_eq!(name(&store), "Running");
        assert_eq!(
            save_name(&mut store, &"x".repeat(81)),
            Err(PreferenceError::NameTooLong)
        );
    }

    #[test]
    fn theme_toggles_and_survives_garbage() {
        let mut store = MemoryStore::new();
        assert_eq!(theme(&store), Theme::Light);
        assert_eq!(toggle_theme(&mut store), Theme::Dark);
        assert_eq!(store.get(keys::THEME).as_deref(), Some("dark"));
        assert_eq!(Theme::Dark.toggle_icon(), "☀️");
        assert_eq!(toggle_theme(&mut store), Theme::Light);

        store.set(keys::THEME, "sepia".to_string());
        assert_eq!(theme(&store), Theme::Light);
    }

    #[test]
    fn reminder_time_requires_hh_mm() {
        let mut store = MemoryStore::new();
        assert_eq!(reminder_time(&store), None);
        let saved = save_reminder_time(&mut store, "07:30").expect("valid time");
        assert_eq!((saved.hour(), saved.minute()), (7, 30));
        assert_eq!(store.get(keys::REMIND_TIME).as_deref(), Some("07:30"));

        for bad in ["7:30", "+7:30", "24:00", "12:60", "noon", "12-30", ""] {
            assert!(save_reminder_time(&mut store, bad).is_err(), "accepted {bad:?}");
        }
        assert_eq!(reminder_time(&store).map(|t| t.to_string()).as_deref(), Some("07:30"));
    }
}
