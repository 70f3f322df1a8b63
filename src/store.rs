use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};
use tracing::warn;

/// Stable key names. These match what earlier versions of the widget wrote,
/// so existing data files keep loading.
pub mod keys {
    pub const COUNT: &str = "streak_count";
    pub const LAST_CHECK_IN: &str = "streak_last_checked";
    pub const NAME: &str = "streak_name";
    pub const THEME: &str = "theme";
    pub const HIGHEST_MILESTONE: &str = "streak_highest_milestone";
    pub const REMIND_TIME: &str = "remind_time_local";
}

/// Durable string key/value storage. Not transactional.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Reads and parses `key`. A value that fails to parse is reported and
/// treated as absent.
pub fn read_parsed<T, S>(store: &S, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, value = %raw, "malformed persisted value, using default: {err}");
            None
        }
    }
}

pub fn write_display<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Display + ?Sized,
    S: KeyValueStore + ?Sized,
{
    store.set(key, value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set(keys::COUNT, "3".to_string());
        assert_eq!(store.get(keys::COUNT).as_deref(), Some("3"));
        store.set(keys::COUNT, "4".to_string());
        assert_eq!(store.len(), 1);
        store.remove(keys::COUNT);
        assert_eq!(store.get(keys::COUNT), None);
        store.remove(keys::COUNT);
    }

    #[test]
    fn read_parsed_falls_back_on_garbage() {
        let store: MemoryStore = [(keys::COUNT, "seven")].into_iter().collect();
        assert_eq!(read_parsed::<u32, _>(&store, keys::COUNT), None);

        let store: MemoryStore = [(keys::COUNT, " 7 ")].into_iter().collect();
        assert_eq!(read_parsed::<u32, _>(&store, keys::COUNT), Some(7));

        assert_eq!(read_parsed::<u32, _>(&MemoryStore::new(), keys::COUNT), None);
    }

    #[test]
    fn serializes_as_flat_object() {
        let store: MemoryStore = [(keys::COUNT, "2"), (keys::THEME, "dark")].into_iter().collect();
        let json = serde_json::to_value(&store).expect("serialize");
        assert_eq!(json, serde_json::json!({ "streak_count": "2", "theme": "dark" }));
    }
}
