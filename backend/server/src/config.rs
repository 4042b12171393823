use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Result, anyhow};
use ledger::DEFAULT_UTC_OFFSET_HOURS;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub utc_offset_hours: i32,
    pub missions_file: Option<PathBuf>,
    pub export_encoding: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            data_file: PathBuf::from("data.json"),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            missions_file: None,
            export_encoding: "euc-kr".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            data_file: try_load("DATA_FILE", "data.json")?,
            utc_offset_hours: try_load("UTC_OFFSET_HOURS", &DEFAULT_UTC_OFFSET_HOURS.to_string())?,
            missions_file: var("MISSIONS_FILE").ok().map(PathBuf::from),
            export_encoding: try_load("EXPORT_ENCODING", "euc-kr")?,
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let config = Config::default();
        assert_eq!(config.port, 1111);
        assert_eq!(config.data_file, PathBuf::from("data.json"));
        assert_eq!(config.utc_offset_hours, 9);
        assert!(config.missions_file.is_none());
        assert_eq!(config.export_encoding, "euc-kr");
    }

    #[test]
    fn unset_keys_fall_back_to_default() {
        let port: u16 = try_load("MISSION_TEST_SURELY_UNSET_PORT", "2222").unwrap();
        assert_eq!(port, 2222);

        let bad: Result<u16> = try_load("MISSION_TEST_SURELY_UNSET_PORT", "not-a-port");
        assert!(bad.is_err());
    }
}
