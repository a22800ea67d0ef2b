//! Placement persistence.
//!
//! The construction engine never talks to a database directly. It writes
//! through a [`PlacementStore`], which must provide transactional
//! semantics: everything between [`begin`](PlacementStore::begin) and
//! [`commit`](PlacementStore::commit) becomes visible atomically, and
//! [`rollback`](PlacementStore::rollback) restores the state seen at
//! `begin`.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::Placement;

/// Store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No transaction in progress")]
    NoTransaction,

    #[error("A transaction is already in progress")]
    TransactionInProgress,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Transactional sink for placements.
pub trait PlacementStore {
    /// Opens a transaction.
    fn begin(&mut self) -> Result<(), StoreError>;

    /// Deletes every placement of the given sections. Returns the count removed.
    fn delete_for_sections(&mut self, section_ids: &HashSet<String>) -> Result<usize, StoreError>;

    /// Appends a placement.
    fn insert(&mut self, placement: Placement) -> Result<(), StoreError>;

    /// Publishes the transaction.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Discards the transaction. A no-op when none is open.
    fn rollback(&mut self);
}

/// In-memory store with a staged copy per transaction.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    committed: Vec<Placement>,
    staged: Option<Vec<Placement>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with committed placements.
    pub fn with_placements(placements: Vec<Placement>) -> Self {
        Self {
            committed: placements,
            staged: None,
        }
    }

    /// Committed placements.
    pub fn placements(&self) -> &[Placement] {
        &self.committed
    }

    /// Whether a transaction is open.
    pub fn in_transaction(&self) -> bool {
        self.staged.is_some()
    }

    fn staged_mut(&mut self) -> Result<&mut Vec<Placement>, StoreError> {
        self.staged.as_mut().ok_or(StoreError::NoTransaction)
    }
}

impl PlacementStore for InMemoryStore {
    fn begin(&mut self) -> Result<(), StoreError> {
        if self.staged.is_some() {
            return Err(StoreError::TransactionInProgress);
        }
        self.staged = Some(self.committed.clone());
        Ok(())
    }

    fn delete_for_sections(&mut self, section_ids: &HashSet<String>) -> Result<usize, StoreError> {
        let staged = self.staged_mut()?;
        let before = staged.len();
        staged.retain(|p| !section_ids.contains(&p.section_id));
        Ok(before - staged.len())
    }

    fn insert(&mut self, placement: Placement) -> Result<(), StoreError> {
        self.staged_mut()?.push(placement);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let staged = self.staged.take().ok_or(StoreError::NoTransaction)?;
        self.committed = staged;
        Ok(())
    }

    fn rollback(&mut self) {
        self.staged = None;
    }
}
