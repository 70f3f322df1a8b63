use crate::clock::CalendarDay;
use crate::store::{KeyValueStore, keys, read_parsed, write_display};
use serde::{Deserialize, Serialize};

/// The persisted streak record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StreakState {
    pub count: u32,
    pub last_check_in: Option<CalendarDay>,
    pub highest_milestone_acknowledged: u32,
}

impl StreakState {
    /// Loads the record, substituting defaults for anything unreadable.
    ///
    /// `count == 0` and a missing day always travel together: if one side is
    /// lost the other is dropped too.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let count = read_parsed::<u32, _>(store, keys::COUNT).unwrap_or(0);
        let last_check_in = read_parsed::<CalendarDay, _>(store, keys::LAST_CHECK_IN);
        let highest_milestone_acknowledged =
            read_parsed::<u32, _>(store, keys::HIGHEST_MILESTONE).unwrap_or(0);

        let (count, last_check_in) = match last_check_in {
            Some(day) if count > 0 => (count, Some(day)),
            _ => (0, None),
        };

        Self {
            count,
            last_check_in,
            highest_milestone_acknowledged,
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        write_display(store, keys::COUNT, &self.count);
        match self.last_check_in {
            Some(day) => write_display(store, keys::LAST_CHECK_IN, &day),
            None => store.remove(keys::LAST_CHECK_IN),
        }
        write_display(store, keys::HIGHEST_MILESTONE, &self.highest_milestone_acknowledged);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInOutcome {
    AlreadyCheckedIn,
    Started,
    Continued,
    Reset,
}

impl CheckInOutcome {
    pub fn status_message(self) -> &'static str {
        match self {
            Self::AlreadyCheckedIn => "Already checked in today ✅",
            Self::Started => "Started! Nice 👏",
            Self::Continued => "Kept the streak going 🔥",
            Self::Reset => "Missed a day — reset to 1 💪",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInResult {
    pub outcome: CheckInOutcome,
    pub count: u32,
    pub milestone_reached: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakView {
    pub name: String,
    pub theme: String,
    pub theme_icon: String,
    pub count: u32,
    pub last_check_in: Option<String>,
    pub last_checked_label: String,
    pub checked_in_today: bool,
    pub check_in_label: String,
    pub remind_time: Option<String>,
    pub highest_milestone_acknowledged: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckInResponse {
    pub outcome: CheckInOutcome,
    pub count: u32,
    pub milestone_reached: Option<u32>,
    pub celebration: Option<String>,
    pub message: String,
    pub view: StreakView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub view: StreakView,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ReminderTimeRequest {
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub ok: bool,
    pub message: String,
}
