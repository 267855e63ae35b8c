pub mod history_store;
pub mod snapshot_file;

pub use history_store::{HistoryStore, IngestReport, SharedHistory};
pub use snapshot_file::SnapshotFile;
