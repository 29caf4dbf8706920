//! File system operations used by the driver.
//!
//! Every write of a generated script goes through [`atomic_write`], so a
//! reader sees either the previous file or the complete new one.

pub mod atomic;
pub mod backup;
pub mod discovery;

pub use atomic::atomic_write;
pub use backup::{BackupOutcome, CleanOutcome, backup_script, clean_script, restore_backup};
pub use discovery::find_documents;
