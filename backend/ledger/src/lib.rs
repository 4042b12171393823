//! # Ledger
//!
//! Storage and queries for secret mission submissions.
//!
//! A participant submits a name plus the missions they completed. Each submission
//! becomes one [`Record`], appended to a single JSON file owned by [`RecordStore`].
//!
//! ## Queries
//!
//! The admin pages never touch the file directly. They load everything, then
//! narrow and order it for presentation:
//! - [`filter_by_name`]: case-insensitive exact name match
//! - [`filter_by_date_prefix`]: `time` prefix match, `"2024-05-01"` selects a whole day
//! - [`sort`]: by time (default) or by name
//!
//! Every result element is an [`Indexed`] record, so the original position stays
//! available for edit and delete.
//!
//! ## Export
//!
//! [`export_table`] renders a result as a presence grid against the mission list,
//! [`ExportEncoding`] turns it into bytes a spreadsheet will open.
pub mod clock;
pub mod error;
pub mod export;
pub mod mission;
pub mod query;
pub mod record;
pub mod store;

pub use clock::{Clock, DEFAULT_UTC_OFFSET_HOURS, SystemClock, TIME_FORMAT, offset_from_hours};
pub use error::{Result, StoreError};
pub use export::{ABSENT, ExportEncoding, PRESENT, Table, export_table};
pub use mission::{Mission, default_missions, load_missions};
pub use query::{
    Indexed, Selection, SortMode, filter_by_date_prefix, filter_by_name, indexed, sort, sorted,
};
pub use record::{Checks, Record};
pub use store::RecordStore;
