use derive_new::new;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{now, Timestamp};

/// A named point-in-time marker within a lesson's timeline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct VideoBookmark {
    #[new(value = "BookmarkId::generate()")]
    pub id: BookmarkId,
    #[new(value = "now()")]
    pub created_at: Timestamp,

    /// Seconds offset into the video, clamped into `[0, duration]` at
    /// creation by the tracker.
    pub timestamp: f64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(Uuid);

impl BookmarkId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
