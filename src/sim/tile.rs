//! Tile and item kinds

use serde::{Deserialize, Serialize};

/// A single grid cell in level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    /// Impassable terrain (four cosmetic variants)
    Static1,
    Static2,
    Static3,
    Static4,
    /// Goal tile
    Win,
    /// Hazard tile
    Lose,
    GrowItem,
    ShrinkItem,
    /// Initial head position (only meaningful in level data)
    PlayerHead,
    /// Initial body position (only meaningful in level data)
    PlayerBody,
}

impl Tile {
    /// Numeric code used by the level interchange format
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Tile::Empty,
            1 => Tile::Static1,
            2 => Tile::Static2,
            3 => Tile::Static3,
            4 => Tile::Static4,
            5 => Tile::Win,
            6 => Tile::Lose,
            7 => Tile::GrowItem,
            8 => Tile::ShrinkItem,
            9 => Tile::PlayerHead,
            10 => Tile::PlayerBody,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Static1 => 1,
            Tile::Static2 => 2,
            Tile::Static3 => 3,
            Tile::Static4 => 4,
            Tile::Win => 5,
            Tile::Lose => 6,
            Tile::GrowItem => 7,
            Tile::ShrinkItem => 8,
            Tile::PlayerHead => 9,
            Tile::PlayerBody => 10,
        }
    }

    /// ASCII symbol used by built-in levels and the headless board dump
    pub fn from_symbol(ch: char) -> Option<Self> {
        Some(match ch {
            '.' => Tile::Empty,
            '_' => Tile::Static1,
            'X' => Tile::Static2,
            'Y' => Tile::Static3,
            '#' => Tile::Static4,
            'W' => Tile::Win,
            'L' => Tile::Lose,
            'G' => Tile::GrowItem,
            'S' => Tile::ShrinkItem,
            'P' => Tile::PlayerHead,
            'B' => Tile::PlayerBody,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Static1 => '_',
            Tile::Static2 => 'X',
            Tile::Static3 => 'Y',
            Tile::Static4 => '#',
            Tile::Win => 'W',
            Tile::Lose => 'L',
            Tile::GrowItem => 'G',
            Tile::ShrinkItem => 'S',
            Tile::PlayerHead => 'P',
            Tile::PlayerBody => 'B',
        }
    }

    /// Terrain that blocks movement and supports against gravity
    pub fn is_static(self) -> bool {
        matches!(self, Tile::Static1 | Tile::Static2 | Tile::Static3 | Tile::Static4)
    }

    pub fn is_player(self) -> bool {
        matches!(self, Tile::PlayerHead | Tile::PlayerBody)
    }

    /// Item kind for consumable tiles
    pub fn item_kind(self) -> Option<ItemKind> {
        match self {
            Tile::GrowItem => Some(ItemKind::Grow),
            Tile::ShrinkItem => Some(ItemKind::Shrink),
            _ => None,
        }
    }

    /// Whether the tile produces a renderable (player tiles are drawn by the chain)
    pub fn is_drawable(self) -> bool {
        !matches!(self, Tile::Empty | Tile::PlayerHead | Tile::PlayerBody)
    }
}

/// Consumable item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Grow,
    Shrink,
}

impl ItemKind {
    pub fn tile(self) -> Tile {
        match self {
            ItemKind::Grow => Tile::GrowItem,
            ItemKind::Shrink => Tile::ShrinkItem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_cover_every_tile() {
        for code in 0..=10u8 {
            let tile = Tile::from_code(code).unwrap();
            assert_eq!(tile.code(), code);
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_code(11), None);
        assert_eq!(Tile::from_symbol('?'), None);
    }

    #[test]
    fn test_static_variants() {
        assert!(Tile::Static1.is_static());
        assert!(Tile::Static4.is_static());
        assert!(!Tile::Win.is_static());
        assert!(!Tile::GrowItem.is_static());
    }

    #[test]
    fn test_item_kind_roundtrip() {
        assert_eq!(Tile::GrowItem.item_kind(), Some(ItemKind::Grow));
        assert_eq!(ItemKind::Shrink.tile(), Tile::ShrinkItem);
        assert_eq!(Tile::Lose.item_kind(), None);
    }
}
