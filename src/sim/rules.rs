//! Win/lose and gravity predicates over the chain and the level

use glam::IVec2;

use super::chain::Chain;
use super::level::Level;
use super::tile::ItemKind;

/// Head on the win tile and every grow item collected
pub fn is_win(level: &Level, chain: &Chain) -> bool {
    level.is_win(chain.head()) && level.all_collected(ItemKind::Grow)
}

/// Any segment on a lose tile
pub fn is_lose(level: &Level, chain: &Chain) -> bool {
    chain.segments().iter().any(|s| level.is_lose(s.pos))
}

/// Every segment has a free, item-free cell below it
pub fn should_fall(level: &Level, chain: &Chain) -> bool {
    chain.segments().iter().all(|s| {
        let below = s.pos + IVec2::Y;
        !level.is_blocking(below) && level.item_at(below).is_none()
    })
}
