//! JSON persistence layer.
//!
//! RULE: Only store.rs touches the filesystem.
//! The ledger calls store methods - nothing else reads or writes the
//! backing document.
//!
//! The whole ledger lives in one JSON document. A save goes through a
//! temp file, an fsync, and an atomic rename, so a crash mid-write
//! leaves the previous document intact. A missing or corrupt document
//! loads as empty; it is logged and replaced on the next save, never a
//! startup failure.

use crate::account::{Account, GlobalStats};
use crate::error::CasinoResult;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

/// Everything the process persists, in one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerDocument {
    pub users: BTreeMap<UserId, Account>,
    pub global_stats: GlobalStats,
}

pub struct JsonStore {
    path: Option<PathBuf>,
}

impl JsonStore {
    /// A store backed by the document at `path`, created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// A store with no backing file (used in tests). Saves succeed and
    /// durability is a no-op.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    /// Load the document, or an empty one when the file is missing or
    /// unreadable.
    pub fn load(&self) -> LedgerDocument {
        let Some(path) = &self.path else {
            return LedgerDocument::default();
        };
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(doc) => doc,
                Err(err) => {
                    log::warn!(
                        "corrupt ledger document at {}: {err}; starting empty",
                        path.display()
                    );
                    LedgerDocument::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => LedgerDocument::default(),
            Err(err) => {
                log::warn!(
                    "unreadable ledger document at {}: {err}; starting empty",
                    path.display()
                );
                LedgerDocument::default()
            }
        }
    }

    /// Durably replace the document. Returns only after the bytes are
    /// synced and the new document is in place.
    pub fn save(&self, doc: &LedgerDocument) -> CasinoResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(doc)?;
        let tmp = path.with_extension("json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(raw.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Write a timestamped copy next to the live document. Returns the
    /// backup path, or None for an in-memory store.
    pub fn backup(&self, doc: &LedgerDocument, stamp: &str) -> CasinoResult<Option<PathBuf>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("ledger");
        let backup_path = path.with_file_name(format!("{stem}_backup_{stamp}.json"));
        let raw = serde_json::to_string_pretty(doc)?;
        fs::write(&backup_path, raw)?;
        log::info!("ledger backup written to {}", backup_path.display());
        Ok(Some(backup_path))
    }
}
