use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use snafu::ResultExt;

use crate::error::{ConfigLoadSnafu, InitError, OpenStoreSnafu};
use crate::store::FileStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the durable store backing file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory the rolling log files are written to.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Minimum time between two progress writes for the same viewing session.
    /// Zero means write-through on every time update.
    #[serde(
        default = "default_flush_interval",
        deserialize_with = "flush_interval"
    )]
    pub flush_interval: Duration,
}

impl Config {
    /// Loads the configuration from `DECKLOG_`-prefixed environment
    /// variables, reading a `.env` file first if one exists.
    pub fn from_env() -> Result<Config, InitError> {
        dotenvy::dotenv().ok();
        envy::prefixed("DECKLOG_").from_env().context(ConfigLoadSnafu)
    }

    /// Opens the durable store under [Config::data_dir].
    pub fn store(&self) -> Result<FileStore, InitError> {
        FileStore::open(self.data_dir.join("records.json")).context(OpenStoreSnafu)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
            flush_interval: default_flush_interval(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("decklog-data")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_flush_interval() -> Duration {
    Duration::from_secs(1)
}

fn flush_interval<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}
