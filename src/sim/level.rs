//! Grid/level state: static layout, item registry and renderables
//!
//! The layout is never mutated after `load`. Collecting an item removes it
//! from the item registry and the renderable list, never from the layout.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::tile::{ItemKind, Tile};

/// A drawable non-player tile still present in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub pos: IVec2,
    pub tile: Tile,
}

/// Remaining consumable items, kept in scan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    pub grow: Vec<IVec2>,
    pub shrink: Vec<IVec2>,
}

impl ItemState {
    fn set(&self, kind: ItemKind) -> &Vec<IVec2> {
        match kind {
            ItemKind::Grow => &self.grow,
            ItemKind::Shrink => &self.shrink,
        }
    }

    fn set_mut(&mut self, kind: ItemKind) -> &mut Vec<IVec2> {
        match kind {
            ItemKind::Grow => &mut self.grow,
            ItemKind::Shrink => &mut self.shrink,
        }
    }
}

/// Static layout plus dynamic item state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    width: i32,
    height: i32,
    /// Row-major tiles
    cells: Vec<Tile>,
    items: ItemState,
    renderables: Vec<Renderable>,
    win_tile: Option<IVec2>,
}

impl Level {
    pub fn new(layout: &[Vec<Tile>]) -> Self {
        let mut level = Self::default();
        level.load(layout);
        level
    }

    /// Replace the layout and rebuild items/renderables with a single scan.
    /// Assumes a rectangular layout.
    pub fn load(&mut self, layout: &[Vec<Tile>]) {
        self.height = layout.len() as i32;
        self.width = layout.first().map_or(0, |row| row.len() as i32);
        self.cells = layout.iter().flat_map(|row| row.iter().copied()).collect();
        self.items = ItemState::default();
        self.renderables.clear();
        self.win_tile = None;

        for (y, row) in layout.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                if let Some(kind) = tile.item_kind() {
                    self.items.set_mut(kind).push(pos);
                }
                if tile == Tile::Win {
                    self.win_tile = Some(pos);
                }
                if tile.is_drawable() {
                    self.renderables.push(Renderable { pos, tile });
                }
            }
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn win_tile(&self) -> Option<IVec2> {
        self.win_tile
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Layout tile at `pos`, `None` when out of bounds
    pub fn tile(&self, pos: IVec2) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells.get((pos.y * self.width + pos.x) as usize).copied()
    }

    /// Out of bounds or static terrain
    pub fn is_blocking(&self, pos: IVec2) -> bool {
        self.tile(pos).is_none_or(Tile::is_static)
    }

    pub fn is_win(&self, pos: IVec2) -> bool {
        self.tile(pos) == Some(Tile::Win)
    }

    pub fn is_lose(&self, pos: IVec2) -> bool {
        self.tile(pos) == Some(Tile::Lose)
    }

    pub fn is_item(&self, kind: ItemKind, pos: IVec2) -> bool {
        self.items.set(kind).contains(&pos)
    }

    /// Either kind of item at `pos`
    pub fn item_at(&self, pos: IVec2) -> Option<ItemKind> {
        [ItemKind::Grow, ItemKind::Shrink]
            .into_iter()
            .find(|&kind| self.is_item(kind, pos))
    }

    /// Remove an item and its renderable; no-op if absent
    pub fn collect_item(&mut self, kind: ItemKind, pos: IVec2) {
        self.items.set_mut(kind).retain(|&p| p != pos);
        let tile = kind.tile();
        self.renderables.retain(|r| !(r.pos == pos && r.tile == tile));
    }

    pub fn all_collected(&self, kind: ItemKind) -> bool {
        self.items.set(kind).is_empty()
    }

    pub fn items(&self) -> &ItemState {
        &self.items
    }

    pub fn grow_items(&self) -> &[IVec2] {
        &self.items.grow
    }

    pub fn shrink_items(&self) -> &[IVec2] {
        &self.items.shrink
    }

    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }

    /// Wholesale replace of dynamic state (undo)
    pub fn restore(&mut self, items: ItemState, renderables: Vec<Renderable>) {
        self.items = items;
        self.renderables = renderables;
    }
}
