use chrono::{DateTime, Utc};

pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}

pub use bookmark::*;
pub use lesson::*;
pub use progress::*;

mod bookmark;
mod lesson;
mod progress;
