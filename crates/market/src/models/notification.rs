//! Notification domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use terracotta_core::{ArtisanId, NotificationId, NotificationKind};

/// One entry in an artisan's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub artisan_id: ArtisanId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Display name of whoever triggered the event, when known.
    pub sender: Option<String>,
    /// Relative link to the relevant page (order detail, conversation, ...).
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Parameters for appending a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub artisan_id: ArtisanId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub sender: Option<String>,
    pub link: Option<String>,
}
