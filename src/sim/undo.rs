//! Undo history: one snapshot per accepted action, no redo

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::level::{ItemState, Renderable};

/// Everything needed to put a turn back exactly as it was
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Segment positions, head first (directions are always zero at save time)
    pub chain: Vec<IVec2>,
    pub items: ItemState,
    pub renderables: Vec<Renderable>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UndoStack {
    snapshots: Vec<Snapshot>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a deep copy of the given state
    pub fn save(&mut self, chain: &[IVec2], items: &ItemState, renderables: &[Renderable]) {
        self.snapshots.push(Snapshot {
            chain: chain.to_vec(),
            items: items.clone(),
            renderables: renderables.to_vec(),
        });
    }

    /// Pop the most recent snapshot, `None` when empty
    pub fn undo(&mut self) -> Option<Snapshot> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
