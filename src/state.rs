use crate::clock::Clock;
use crate::engine::StreakEngine;
use crate::milestone::MilestoneTable;
use crate::notify::NotifierHandle;
use crate::store::MemoryStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handler state. The single store mutex serializes every
/// read-modify-write, so concurrent requests never interleave a check-in.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<MemoryStore>>,
    pub clock: Arc<dyn Clock>,
    pub milestones: Arc<MilestoneTable>,
    pub notifier: NotifierHandle,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        store: MemoryStore,
        clock: Arc<dyn Clock>,
        milestones: MilestoneTable,
        notifier: NotifierHandle,
    ) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
            clock,
            milestones: Arc::new(milestones),
            notifier,
        }
    }

    pub fn engine<'a>(&'a self, store: &'a mut MemoryStore) -> StreakEngine<'a, &'a mut MemoryStore, &'a dyn Clock> {
        StreakEngine::new(store, self.clock.as_ref(), &self.milestones)
    }
}
