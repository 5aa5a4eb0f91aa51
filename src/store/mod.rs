use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use snafu::{ensure, Location, ResultExt as _, Snafu};

use crate::model::LessonId;

pub use file::FileStore;
pub use memory::MemoryStore;

mod file;
mod memory;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Layout version stamped into every persisted record. Bump whenever a
/// record's shape changes; readers treat a mismatch as corruption.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("failed to read store file `{}` at {location}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to write store file `{}` at {location}: {source}", path.display()))]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("store file `{}` is corrupt at {location}: {source}", path.display()))]
    CorruptFile {
        path: PathBuf,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to encode record `{key}` at {location}: {source}"))]
    Encode {
        key: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to decode record `{key}` at {location}: {source}"))]
    Decode {
        key: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display(
        "record `{key}` has schema version {found}, expected {expected} at {location}"
    ))]
    SchemaVersion {
        key: String,
        found: u32,
        expected: u32,
        #[snafu(implicit)]
        location: Location,
    },
}

/// A durable string-keyed store that survives across viewing sessions.
///
/// Records are last-write-wins and partitioned by lesson id; nothing is ever
/// deleted.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&mut self, key: &str, value: String) -> Result<()>;
}

/// Versioned wrapper around every persisted record, so a layout change reads
/// back as a clean decode failure instead of silently defaulted fields.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    payload: T,
}

/// Reads and unwraps a versioned record. `Ok(None)` means the key was never
/// written; any malformed or version-mismatched record is an error the
/// caller decides how to absorb.
pub fn read_record<T: DeserializeOwned>(store: &impl Store, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    let envelope: Envelope<T> = serde_json::from_str(&raw).context(DecodeSnafu { key })?;
    ensure!(
        envelope.version == SCHEMA_VERSION,
        SchemaVersionSnafu {
            key,
            found: envelope.version,
            expected: SCHEMA_VERSION,
        }
    );

    Ok(Some(envelope.payload))
}

/// Wraps a record in the versioned envelope and writes it through.
pub fn write_record<T: Serialize>(store: &mut impl Store, key: &str, payload: &T) -> Result<()> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        payload,
    };
    let raw = serde_json::to_string(&envelope).context(EncodeSnafu { key })?;
    store.put(key, raw)
}

pub fn progress_key(id: &LessonId) -> String {
    format!("video_progress_{id}")
}

pub fn notes_key(id: &LessonId) -> String {
    format!("video_notes_{id}")
}

pub fn bookmarks_key(id: &LessonId) -> String {
    format!("video_bookmarks_{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let store = MemoryStore::new();
        let record: Option<Vec<i64>> = read_record(&store, "video_progress_x").unwrap();
        assert_eq!(record, None);
    }

    #[test]
    fn record_round_trip() {
        let mut store = MemoryStore::new();
        write_record(&mut store, "video_notes_x", &"rudder check at 12:30".to_string()).unwrap();

        let notes: Option<String> = read_record(&store, "video_notes_x").unwrap();
        assert_eq!(notes.as_deref(), Some("rudder check at 12:30"));
    }

    #[test]
    fn garbage_record_is_a_decode_error() {
        let mut store = MemoryStore::new();
        store.put("video_progress_x", "{not json".to_string()).unwrap();

        let result = read_record::<String>(&store, "video_progress_x");
        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }

    #[test]
    fn future_schema_version_is_rejected() {
        let mut store = MemoryStore::new();
        let raw = format!(r#"{{"version":{},"payload":"x"}}"#, SCHEMA_VERSION + 1);
        store.put("video_notes_x", raw).unwrap();

        let result = read_record::<String>(&store, "video_notes_x");
        assert!(
            matches!(result, Err(StoreError::SchemaVersion { .. })),
            "a record written by a newer layout must not be half-decoded"
        );
    }
}
