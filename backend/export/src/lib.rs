//! # Export
//!
//! Offline CSV export of a record store, same table as the admin download.
//!
//! ```sh
//! cargo run -p export -- data.json --name kim --sort name --out kim.csv
//! ```
use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use ledger::{
    DEFAULT_UTC_OFFSET_HOURS, ExportEncoding, RecordStore, Selection, SortMode, default_missions,
    export_table, load_missions, offset_from_hours,
};
use tracing::info;

pub struct ExportOptions {
    pub data_file: PathBuf,
    pub missions_file: Option<PathBuf>,
    pub encoding: String,
    pub name: Option<String>,
    pub date: Option<String>,
    pub sort: String,
    pub out: PathBuf,
}

/// Writes the selected records to `options.out`, returns how many rows were written.
pub fn export_file(options: &ExportOptions) -> Result<usize> {
    let encoding = ExportEncoding::from_label(&options.encoding)?;

    let missions = match &options.missions_file {
        Some(path) => load_missions(path)?,
        None => default_missions(),
    };

    let store = RecordStore::new(&options.data_file, offset_from_hours(DEFAULT_UTC_OFFSET_HOURS)?);
    let records = store
        .load_all()
        .with_context(|| format!("Failed to read {}", options.data_file.display()))?;
    info!("Loaded {} records", records.len());

    let selection = Selection::new(
        options.name.as_deref(),
        options.date.as_deref(),
        SortMode::from_param(Some(&options.sort)),
    );
    let entries = selection.apply(&records);

    let csv = export_table(&entries, &missions).to_csv();
    fs::write(&options.out, encoding.encode(&csv))
        .with_context(|| format!("Failed to write {}", options.out.display()))?;

    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn options(dir: &TempDir, encoding: &str) -> ExportOptions {
        let data_file = dir.path().join("data.json");
        fs::write(
            &data_file,
            r#"[
                {"name": "Lee", "checks": ["간식"], "time": "2024-05-02 09:00:00"},
                {"name": "Kim", "checks": "편지", "time": "2024-05-01 18:30:00"},
                {"name": "kim", "checks": [], "time": "2024-05-02 07:00:00"}
            ]"#,
        )
        .unwrap();

        ExportOptions {
            data_file,
            missions_file: None,
            encoding: encoding.to_string(),
            name: None,
            date: None,
            sort: "time".to_string(),
            out: dir.path().join("out.csv"),
        }
    }

    #[test]
    fn exports_every_record_in_time_order() {
        let dir = tempdir().unwrap();
        let options = options(&dir, "utf-8");

        assert_eq!(export_file(&options).unwrap(), 3);

        let bytes = fs::read(&options.out).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "#,name,간식,편지,청소,칭찬,도움,time");
        assert_eq!(lines[1], "1,Kim,-,O,-,-,-,2024-05-01 18:30:00");
        assert_eq!(lines[2], "2,kim,-,-,-,-,-,2024-05-02 07:00:00");
        assert_eq!(lines[3], "3,Lee,O,-,-,-,-,2024-05-02 09:00:00");
    }

    #[test]
    fn applies_name_and_date_filters() {
        let dir = tempdir().unwrap();
        let mut options = options(&dir, "euc-kr");
        options.name = Some("KIM".to_string());
        options.date = Some("2024-05-02".to_string());

        assert_eq!(export_file(&options).unwrap(), 1);

        let bytes = fs::read(&options.out).unwrap();
        let (text, _, had_errors) = encoding_rs::EUC_KR.decode(&bytes);
        assert!(!had_errors);
        assert!(text.ends_with("1,kim,-,-,-,-,-,2024-05-02 07:00:00"));
    }

    #[test]
    fn unknown_encoding_fails_before_writing() {
        let dir = tempdir().unwrap();
        let options = options(&dir, "no-such-codepage");

        assert!(export_file(&options).is_err());
        assert!(!options.out.exists());
    }
}
