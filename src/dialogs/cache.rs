//! Per-instance cache of resolved custom dialogs

use super::{command::Command, registry::VisualHandle, types::ViewModelId};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A view-model's resolved visual and the close command wired to it
#[derive(Debug, Clone)]
pub struct CachedDialog {
    pub visual: VisualHandle,
    pub close_command: Command,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Maps view-model identity to its resolved dialog.
///
/// Only successful resolutions are stored, so a view-model whose template
/// was missing is looked up again on its next use.
#[derive(Debug, Default)]
pub struct CustomDialogCache {
    entries: HashMap<ViewModelId, CachedDialog>,
    hits: u64,
    misses: u64,
}

impl CustomDialogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, id: &ViewModelId) -> Option<&CachedDialog> {
        match self.entries.get(id) {
            Some(entry) => {
                trace!("Custom dialog cache hit for view-model {}", id);
                self.hits += 1;
                Some(entry)
            }
            None => {
                trace!("Custom dialog cache miss for view-model {}", id);
                self.misses += 1;
                None
            }
        }
    }

    /// Look up without touching the statistics
    pub fn peek(&self, id: &ViewModelId) -> Option<&CachedDialog> {
        self.entries.get(id)
    }

    /// Store the dialog for `id`. An existing entry wins, keeping the
    /// one-visual-per-instance guarantee.
    pub fn insert(&mut self, id: ViewModelId, dialog: CachedDialog) -> &CachedDialog {
        self.entries.entry(id).or_insert_with(|| {
            debug!("Cached custom dialog {} for view-model {}", dialog.visual.id(), id);
            dialog
        })
    }

    pub fn remove(&mut self, id: &ViewModelId) -> Option<CachedDialog> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &ViewModelId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        debug!("Clearing custom dialog cache ({} entries)", self.entries.len());
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
