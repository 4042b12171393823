//! # Tabular Export
//!
//! Spreadsheet download of a query result.
//!
//! - Header: `#`, `name`, one column per mission label, `time`
//! - `#` is the 1-based row number in presentation order
//! - Mission cells hold [`PRESENT`] or [`ABSENT`]
//! - Name and time cells starting with `=`, `+`, `-` or `@` get a leading `'`
//!
//! Korean spreadsheet tools open CSV files in the legacy Korean codepage by
//! default, so the bytes are produced in a configurable [`ExportEncoding`].
use std::borrow::Cow;

use encoding_rs::{EUC_KR, Encoding, UTF_8};
use tracing::warn;

use crate::{
    error::{Result, StoreError},
    mission::Mission,
    query::Indexed,
};

pub const PRESENT: &str = "O";
pub const ABSENT: &str = "-";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn export_table(entries: &[Indexed<'_>], missions: &[Mission]) -> Table {
    let mut header = Vec::with_capacity(missions.len() + 3);
    header.push("#".to_string());
    header.push("name".to_string());
    header.extend(missions.iter().map(|mission| mission.label.clone()));
    header.push("time".to_string());

    let rows = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let record = entry.record;

            let mut row = Vec::with_capacity(header.len());
            row.push((position + 1).to_string());
            row.push(neutralize_formula(&record.name));
            row.extend(missions.iter().map(|mission| {
                if record.has_check(&mission.label) {
                    PRESENT.to_string()
                } else {
                    ABSENT.to_string()
                }
            }));
            row.push(neutralize_formula(record.time.as_deref().unwrap_or_default()));
            row
        })
        .collect();

    Table { header, rows }
}

impl Table {
    pub fn to_csv(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| {
                row.iter()
                    .map(|field| escape_field(field))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

/// Prefixes user text that a spreadsheet would evaluate as a formula with `'`.
fn neutralize_formula(value: &str) -> String {
    let trimmed = value.trim_start();
    if trimmed.starts_with(['=', '+', '-', '@']) {
        format!("'{value}")
    } else {
        value.to_string()
    }
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Character encoding of exported bytes, resolved from a WHATWG label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportEncoding(&'static Encoding);

impl Default for ExportEncoding {
    fn default() -> Self {
        Self(EUC_KR)
    }
}

impl ExportEncoding {
    pub fn from_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self(encoding.output_encoding()))
            .ok_or_else(|| StoreError::UnknownEncoding(label.to_string()))
    }

    /// Canonical name, usable as an HTTP `charset`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.0 == UTF_8 {
            let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
            bytes.extend_from_slice(UTF8_BOM);
            bytes.extend_from_slice(text.as_bytes());
            return bytes;
        }

        let (bytes, _, unmappable) = self.0.encode(text);
        if unmappable {
            warn!(
                "Export contains characters outside {}, written as numeric references",
                self.name()
            );
        }

        bytes.into_owned()
    }
}
