//! Block document storage.
//!
//! Each block persists as `<identity-hex>.json` under `pending/` while it
//! collects signatures and under `blocks/` once finalized. Writes go through a
//! temp file and a rename so a crash never leaves a half-written document
//! behind.

use crate::core::block::{Block, BlockRecord};
use crate::types::hash::Hash;
use quorumchain_derive::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from the block store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(String),

    /// Document did not encode or parse as a block record.
    #[error("malformed block document: {0}")]
    Malformed(String),

    /// No document stored for the requested hash.
    #[error("no stored block {0}")]
    Missing(Hash),
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

/// Filesystem store for block documents.
pub struct BlockStore {
    pending_dir: PathBuf,
    finalized_dir: PathBuf,
}

impl BlockStore {
    /// Opens (and creates, if needed) the store under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        let pending_dir = data_dir.join("pending");
        let finalized_dir = data_dir.join("blocks");
        fs::create_dir_all(&pending_dir)?;
        fs::create_dir_all(&finalized_dir)?;
        Ok(Self {
            pending_dir,
            finalized_dir,
        })
    }

    fn document_path(dir: &Path, hash: Hash) -> PathBuf {
        dir.join(format!("{hash}.json"))
    }

    /// Persists the block under the location matching its status.
    ///
    /// Saving a finalized block removes its pending document, completing the
    /// pending-to-finalized promotion.
    pub fn save(&self, block: &Block) -> Result<PathBuf, StoreError> {
        let record = block.to_record();
        let dir = if record.finalized {
            &self.finalized_dir
        } else {
            &self.pending_dir
        };

        let path = Self::document_path(dir, record.hash);
        let data = serde_json::to_vec_pretty(&record)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &path)?;

        if record.finalized {
            let stale = Self::document_path(&self.pending_dir, record.hash);
            match fs::remove_file(&stale) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(path)
    }

    /// Loads a block record by identity hash, checking the finalized location
    /// first.
    pub fn load(&self, hash: Hash) -> Result<BlockRecord, StoreError> {
        for dir in [&self.finalized_dir, &self.pending_dir] {
            let path = Self::document_path(dir, hash);
            if !path.exists() {
                continue;
            }
            let data = fs::read(&path)?;
            return serde_json::from_slice(&data)
                .map_err(|e| StoreError::Malformed(e.to_string()));
        }
        Err(StoreError::Missing(hash))
    }

    /// Loads and reconstructs a block by identity hash.
    pub fn load_block(&self, hash: Hash) -> Result<Block, StoreError> {
        self.load(hash).map(Block::from_record)
    }

    /// Returns `true` if a document exists for this hash in either location.
    pub fn contains(&self, hash: Hash) -> bool {
        Self::document_path(&self.finalized_dir, hash).exists()
            || Self::document_path(&self.pending_dir, hash).exists()
    }

    /// Returns `true` if the hash has a document in the finalized location.
    pub fn is_finalized(&self, hash: Hash) -> bool {
        Self::document_path(&self.finalized_dir, hash).exists()
    }
}
