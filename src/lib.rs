pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod tracker;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::InitError;
    pub use crate::model::{
        BookmarkId, LessonId, Timestamp, VideoBookmark, VideoLesson, VideoProgress,
    };
    pub use crate::store::{FileStore, MemoryStore, Store};
    pub use crate::tracker::{PlaybackTracker, VideoStats};
}
