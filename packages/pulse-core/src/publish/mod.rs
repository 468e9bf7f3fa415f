//! Build-time artifacts.
//!
//! The publication carries frozen rows and baselines to the live view; the
//! table exports are the stable CSV/JSON files read downstream.

mod artifact;
mod export;

pub use artifact::{BaselineBook, Publication, PublishedRow};
pub use export::{
    export_build, write_snapshot, write_table, ExportPaths, SnapshotRecord, TableRecord, COLUMNS,
    LEADERBOARD_STEM, PUBLICATION_FILE, SNAPSHOT_FILE, WATCHLIST_STEM,
};
