use std::sync::Arc;

use anyhow::{Context, Result};
use ledger::{
    ExportEncoding, Mission, RecordStore, default_missions, load_missions, offset_from_hours,
};
use tracing::info;

use super::config::Config;

pub struct AppState {
    pub config: Config,
    pub store: RecordStore,
    pub missions: Vec<Mission>,
    pub encoding: ExportEncoding,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let offset = offset_from_hours(config.utc_offset_hours)?;

        let missions = match &config.missions_file {
            Some(path) => load_missions(path).context("Failed to load mission list")?,
            None => {
                info!("No mission file configured, using built-in missions");
                default_missions()
            }
        };

        let encoding = ExportEncoding::from_label(&config.export_encoding)?;
        info!("Exports encoded as {}", encoding.name());

        let store = RecordStore::new(&config.data_file, offset);
        info!("Records stored in {}", store.path().display());

        Ok(Arc::new(Self {
            config,
            store,
            missions,
            encoding,
        }))
    }
}
