use crate::errors::AppError;
use crate::store::MemoryStore;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

/// Loads the persisted store. A missing or unreadable file yields an empty
/// store so the tracker always starts.
pub async fn load_store(path: &Path) -> MemoryStore {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse data file: {err}");
                MemoryStore::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file yet");
            MemoryStore::default()
        }
        Err(err) => {
            error!("failed to read data file: {err}");
            MemoryStore::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &MemoryStore) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, keys};

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("streak_storage_{}_{tag}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_is_empty_store() {
        let store = load_store(&temp_path("missing")).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_empty_store() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{ not json").await.unwrap();
        assert!(load_store(&path).await.is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persisted_store_loads_back() {
        let path = temp_path("roundtrip");
        let mut store = MemoryStore::new();
        store.set(keys::COUNT, "3".to_string());
        store.set(keys::LAST_CHECK_IN, "2024-03-10".to_string());
        persist_store(&path, &store).await.unwrap();

        assert_eq!(load_store(&path).await, store);
        let _ = fs::remove_file(&path).await;
    }
}
