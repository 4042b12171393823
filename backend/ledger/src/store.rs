//! # Record Store
//!
//! Whole-file JSON persistence for submitted records.
//!
//! ## Layout
//!
//! - One JSON array, pretty printed with a 4 space indent, non-ASCII written as is
//! - Field order per record: `name`, `checks`, `time`
//! - A missing file reads as an empty store, it is created on the first write
//!
//! ## Writes
//!
//! Every mutation rewrites the entire array. The new contents go to a sibling
//! temp file which is then renamed over the store, so a reader only ever sees
//! a fully written version.
//!
//! Mutations through one store are serialized by its writer gate. Every write
//! gets its own temp file name, so two stores (or two processes) pointed at the
//! same file never share a temp file. They can still race, last writer wins.
//!
//! ## Identity
//!
//! A record is addressed by its position in the array. Deleting a record shifts
//! every later record down by one.
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use chrono::FixedOffset;
use serde::Serialize;
use serde_json::{Serializer, ser::PrettyFormatter};
use tracing::{debug, info};

use crate::{
    clock::{Clock, SystemClock, stamp},
    error::{Result, StoreError},
    record::{Checks, Record},
};

const INDENT: &[u8] = b"    ";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

pub struct RecordStore {
    path: PathBuf,
    offset: FixedOffset,
    clock: Arc<dyn Clock>,
    write_gate: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self {
            path: path.into(),
            offset,
            clock: Arc::new(SystemClock),
            write_gate: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> Result<Vec<Record>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the whole store with `records`.
    pub fn save_all(&self, records: &[Record]) -> Result<()> {
        let _gate = self.lock();
        self.write(records)
    }

    pub fn append(&self, name: &str, checks: impl Into<Checks>) -> Result<Record> {
        let record = Record::new(name, checks, Some(stamp(self.clock.now(), self.offset)));

        let _gate = self.lock();
        let mut records = self.load_all()?;
        records.push(record.clone());
        self.write(&records)?;

        info!("Appended record #{} for {}", records.len() - 1, record.name);
        Ok(record)
    }

    /// Renames the record at `index`. A blank `new_name` leaves the store
    /// untouched and returns `false`.
    pub fn edit_name(&self, index: usize, new_name: &str) -> Result<bool> {
        let _gate = self.lock();
        let mut records = self.load_all()?;

        let len = records.len();
        let record = records
            .get_mut(index)
            .ok_or(StoreError::NotFound { index, len })?;

        let new_name = new_name.trim();
        if new_name.is_empty() {
            debug!("Blank name for record #{index}, skipping edit");
            return Ok(false);
        }

        info!("Renaming record #{index} from {} to {new_name}", record.name);
        record.name = new_name.to_string();

        self.write(&records)?;
        Ok(true)
    }

    pub fn delete(&self, index: usize) -> Result<Record> {
        let _gate = self.lock();
        let mut records = self.load_all()?;

        if index >= records.len() {
            return Err(StoreError::NotFound {
                index,
                len: records.len(),
            });
        }

        let removed = records.remove(index);
        self.write(&records)?;

        info!("Deleted record #{index} ({})", removed.name);
        Ok(removed)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The gate guards no data, a panicked writer leaves nothing to repair.
        self.write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, records: &[Record]) -> Result<()> {
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        records.serialize(&mut serializer)?;

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
        }

        let tmp_path = temp_path(&self.path);
        let written = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(&buf)?;
            file.sync_all()
        });

        if let Err(source) = written.and_then(|_| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(source));
        }

        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Sibling temp file, unique per process and per write.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("records"));
    name.push(format!(
        ".tmp.{}.{}",
        std::process::id(),
        TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
    ));

    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_sits_next_to_store() {
        let tmp = temp_path(Path::new("/var/lib/missions/data.json"));
        assert_eq!(tmp.parent(), Some(Path::new("/var/lib/missions")));
        assert!(
            tmp.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("data.json.tmp.")
        );
    }

    #[test]
    fn every_write_gets_its_own_temp_file() {
        let path = Path::new("/var/lib/missions/data.json");
        assert_ne!(temp_path(path), temp_path(path));
    }

    #[test]
    fn two_stores_on_one_file_write_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let first = Arc::new(RecordStore::new(&path, FixedOffset::east_opt(0).unwrap()));
        let second = Arc::new(RecordStore::new(&path, FixedOffset::east_opt(0).unwrap()));

        let handles: Vec<_> = [first.clone(), second.clone()]
            .into_iter()
            .map(|store| {
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        store.append("Kim", "간식").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = first.load_all().unwrap();
        assert!(!records.is_empty() && records.len() <= 40);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn writes_four_space_indent_and_raw_korean() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            RecordStore::new(dir.path().join("data.json"), FixedOffset::east_opt(0).unwrap());

        store
            .save_all(&[Record::new("김", ["간식"], Some("2024-05-01 09:00:00".into()))])
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\n    {\n        \"name\": \"김\""));
        assert!(raw.contains("\"간식\""));
        assert!(!raw.contains("\\u"));
    }

    #[test]
    fn whitespace_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "  \n").unwrap();

        let store = RecordStore::new(path, FixedOffset::east_opt(0).unwrap());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let store = RecordStore::new(&path, FixedOffset::east_opt(0).unwrap());

        store.append("Kim", "간식").unwrap();
        assert!(path.exists());
    }
}
