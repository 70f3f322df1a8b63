//! Seam to the push-notification collaborator.
//!
//! Delivery lives entirely on the other side of [`Notifier`]. This module only
//! waits for the collaborator to become ready and forwards the permission
//! request and the reminder-time tag.

use crate::preferences::ReminderTime;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, time::timeout};
use tracing::{info, warn};

pub const REMIND_TIME_TAG: &str = "remind_time";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Notifications not available in this browser.")]
    Unavailable,
    #[error("notification service rejected the request: {0}")]
    Rejected(String),
}

pub trait Notifier: Send + Sync {
    fn request_permission(&self) -> Result<Permission, NotifyError>;
    fn add_tag(&self, key: &str, value: &str) -> Result<(), NotifyError>;
}

type Slot = Option<Arc<dyn Notifier>>;

/// Producer half of the readiness signal. Dropping it without calling
/// [`NotifierSlot::ready`] tells every waiter the collaborator is absent.
pub struct NotifierSlot {
    tx: watch::Sender<Slot>,
}

impl NotifierSlot {
    pub fn ready(self, notifier: Arc<dyn Notifier>) {
        self.tx.send_replace(Some(notifier));
    }
}

#[derive(Clone)]
pub struct NotifierHandle {
    rx: watch::Receiver<Slot>,
    wait: Duration,
}

pub fn channel(wait: Duration) -> (NotifierSlot, NotifierHandle) {
    let (tx, rx) = watch::channel(None);
    (NotifierSlot { tx }, NotifierHandle { rx, wait })
}

impl NotifierHandle {
    pub fn unavailable() -> Self {
        let (_, handle) = channel(Duration::ZERO);
        handle
    }

    pub fn ready_now(notifier: Arc<dyn Notifier>) -> Self {
        let (slot, handle) = channel(Duration::ZERO);
        slot.ready(notifier);
        handle
    }

    /// Resolves once the collaborator is ready, or fails after the configured
    /// wait (immediately if the producer is already gone).
    pub async fn ready(&self) -> Result<Arc<dyn Notifier>, NotifyError> {
        let mut rx = self.rx.clone();
        let current: Slot = match timeout(self.wait, rx.wait_for(Option::is_some)).await {
            Ok(Ok(slot)) => slot.clone(),
            // producer dropped, or never became ready in time
            Ok(Err(_)) | Err(_) => None,
        };
        current.ok_or(NotifyError::Unavailable)
    }

    pub async fn enable(&self) -> Result<Permission, NotifyError> {
        let notifier = self.ready().await?;
        let permission = notifier.request_permission()?;
        info!(?permission, "notification permission requested");
        Ok(permission)
    }

    pub async fn forward_reminder_time(&self, time: ReminderTime) -> Result<(), NotifyError> {
        let notifier = self.ready().await?;
        notifier.add_tag(REMIND_TIME_TAG, &time.to_string())?;
        info!(%time, "reminder time forwarded");
        Ok(())
    }
}

/// Stand-in collaborator that accepts everything and records it in the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn request_permission(&self) -> Result<Permission, NotifyError> {
        info!("notification permission granted");
        Ok(Permission::Granted)
    }

    fn add_tag(&self, key: &str, value: &str) -> Result<(), NotifyError> {
        if key.is_empty() {
            warn!("refusing empty notification tag");
            return Err(NotifyError::Rejected("empty tag key".to_string()));
        }
        info!(key, value, "notification tag stored");
        Ok(())
    }
}

pub fn permission_message(permission: Permission) -> &'static str {
    match permission {
        Permission::Granted => "Reminders are enabled ✅",
        Permission::Denied => "Notifications are blocked for this site.",
        Permission::Default => "If you clicked Allow, reminders are enabled ✅",
    }
}
