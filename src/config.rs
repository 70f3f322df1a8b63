use crate::clock::CalendarDay;
use crate::milestone::MilestoneTable;
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_NOTIFY_WAIT_MS: u64 = 2000;

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub milestones: MilestoneTable,
    /// Pins "today" instead of reading the local clock.
    pub fake_today: Option<CalendarDay>,
    pub notifications: bool,
    pub notify_wait: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            milestones: MilestoneTable::default(),
            fake_today: None,
            notifications: true,
            notify_wait: Duration::from_millis(DEFAULT_NOTIFY_WAIT_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Values that do not parse are
    /// logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port);
        let data_path = lookup("APP_DATA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let milestones = parse_or(&lookup, "STREAK_MILESTONES", defaults.milestones);
        let fake_today = lookup("STREAK_FAKE_TODAY").and_then(|raw| match raw.parse() {
            Ok(day) => Some(day),
            Err(err) => {
                warn!("ignoring STREAK_FAKE_TODAY: {err}");
                None
            }
        });
        let notifications = !matches!(
            lookup("STREAK_NOTIFICATIONS").as_deref().map(str::trim),
            Some("off" | "false" | "0")
        );
        let notify_wait = Duration::from_millis(parse_or(
            &lookup,
            "STREAK_NOTIFY_TIMEOUT_MS",
            DEFAULT_NOTIFY_WAIT_MS,
        ));

        Self {
            port,
            data_path,
            milestones,
            fake_today,
            notifications,
            notify_wait,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(err) => {
                warn!(key, value = %raw, "invalid setting, using default: {err}");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.data_path, PathBuf::from("data/state.json"));
        assert_eq!(cfg.milestones, MilestoneTable::default());
        assert_eq!(cfg.fake_today, None);
        assert!(cfg.notifications);
        assert_eq!(cfg.notify_wait, Duration::from_millis(2000));
    }

    #[test]
    fn reads_every_setting() {
        let cfg = config(&[
            ("PORT", "9001"),
            ("APP_DATA_PATH", "/tmp/streak.json"),
            ("STREAK_MILESTONES", "3,7"),
            ("STREAK_FAKE_TODAY", "2024-03-10"),
            ("STREAK_NOTIFICATIONS", "off"),
            ("STREAK_NOTIFY_TIMEOUT_MS", "50"),
        ]);
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/streak.json"));
        assert_eq!(cfg.milestones.values(), &[3, 7]);
        assert_eq!(cfg.fake_today, "2024-03-10".parse().ok());
        assert!(!cfg.notifications);
        assert_eq!(cfg.notify_wait, Duration::from_millis(50));
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = config(&[
            ("PORT", "http"),
            ("STREAK_MILESTONES", "a,b"),
            ("STREAK_FAKE_TODAY", "tomorrow"),
        ]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.milestones, MilestoneTable::default());
        assert_eq!(cfg.fake_today, None);
    }
}
