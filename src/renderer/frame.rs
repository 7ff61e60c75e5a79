//! Frame building: game state to triangles in grid units
//!
//! Cell `(x, y)` covers `[x, x+1] x [y, y+1]` with y growing downwards.
//! The pipeline flips y when mapping to NDC.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::input::{Button, ButtonSet, touch_pad};
use crate::progress::Progress;
use crate::scene::SELECT_COLUMNS;
use crate::settings::Settings;
use crate::sim::{GameState, Tile};
use crate::there_and_back;

/// How far the chain leans into a blocked direction (cells)
const NUDGE_DISTANCE: f32 = 0.15;
const BODY_WIDTH: f32 = 0.6;
const HEAD_SIZE: f32 = 0.8;
const PARTICLE_RADIUS: f32 = 0.08;

/// Fill color for a layout tile
pub fn tile_color(tile: Tile) -> Option<[f32; 4]> {
    match tile {
        Tile::Static1 => Some(colors::STATIC_1),
        Tile::Static2 => Some(colors::STATIC_2),
        Tile::Static3 => Some(colors::STATIC_3),
        Tile::Static4 => Some(colors::STATIC_4),
        Tile::Win => Some(colors::WIN),
        Tile::Lose => Some(colors::LOSE),
        Tile::GrowItem => Some(colors::GROW_ITEM),
        Tile::ShrinkItem => Some(colors::SHRINK_ITEM),
        Tile::Empty | Tile::PlayerHead | Tile::PlayerBody => None,
    }
}

/// Board extent in grid units
pub fn board_extent(state: &GameState) -> Vec2 {
    Vec2::new(state.level.width() as f32, state.level.height() as f32)
}

/// All triangles for the playing scene
pub fn build_frame(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = shapes::rect(Vec2::ZERO, board_extent(state), colors::GRID);

    for r in state.renderables() {
        let Some(color) = tile_color(r.tile) else {
            continue;
        };
        let center = r.pos.as_vec2() + Vec2::splat(0.5);
        match r.tile {
            Tile::GrowItem | Tile::ShrinkItem => {
                vertices.extend(shapes::circle(center, 0.3, color, 16))
            }
            Tile::Win => vertices.extend(shapes::square(center, 0.8, color)),
            Tile::Lose => {
                vertices.extend(shapes::rect(
                    r.pos.as_vec2() + Vec2::new(0.0, 0.5),
                    Vec2::new(1.0, 0.5),
                    color,
                ));
            }
            _ => vertices.extend(shapes::square(center, 1.0, color)),
        }
    }

    if !state.is_hidden() {
        vertices.extend(chain_vertices(state, settings));
    }

    if settings.particles {
        for p in state.particles.particles() {
            let mut color = colors::PARTICLE;
            color[3] = p.alpha();
            vertices.extend(shapes::circle(p.pos, PARTICLE_RADIUS, color, 8));
        }
    }

    vertices
}

/// Segment centers as drawn this frame, including the blocked nudge
pub fn chain_centers(state: &GameState, settings: &Settings) -> Vec<Vec2> {
    let mut positions = if settings.effective_easing() {
        state.render_positions()
    } else {
        state.chain.interpolated(state.move_progress())
    };

    let nudge = match state.blocked {
        Some(b) if settings.effective_nudge() => {
            b.dir.as_vec2() * there_and_back(b.progress.clamp(0.0, 1.0)) * NUDGE_DISTANCE
        }
        _ => Vec2::ZERO,
    };
    for p in &mut positions {
        *p += Vec2::splat(0.5) + nudge;
    }
    positions
}

fn chain_vertices(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let centers = chain_centers(state, settings);
    let mut vertices = shapes::polyline(&centers, BODY_WIDTH, colors::CAT_BODY);

    if let Some(&head) = centers.first() {
        vertices.extend(shapes::square(head, HEAD_SIZE, colors::CAT_HEAD));
        // Eyes sit across the head's facing axis
        let facing = state.segments()[0].dir.as_vec2();
        let across = if facing.y != 0.0 { Vec2::X } else { Vec2::Y };
        let forward = facing * 0.15;
        for side in [-1.0, 1.0] {
            let eye = head + forward + across * side * 0.18 - Vec2::new(0.0, 0.1);
            vertices.extend(shapes::circle(eye, 0.07, colors::CAT_EYE, 8));
        }
    }

    vertices
}

/// Layout of the level-select grid: box origin for level `i`
pub fn select_slot(index: usize) -> Vec2 {
    let col = (index % SELECT_COLUMNS) as f32;
    let row = (index / SELECT_COLUMNS) as f32;
    Vec2::new(col * 1.25, row * 1.25)
}

/// Extent of the level-select grid in grid units
pub fn select_extent(level_count: usize) -> Vec2 {
    let rows = level_count.div_ceil(SELECT_COLUMNS).max(1) as f32;
    let cols = level_count.clamp(1, SELECT_COLUMNS) as f32;
    Vec2::new(cols * 1.25 - 0.25, rows * 1.25 - 0.25)
}

/// Level boxes colored by state, cursor outlined
pub fn build_level_select(level_count: usize, cursor: usize, progress: &Progress) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for i in 0..level_count {
        let origin = select_slot(i);
        if i == cursor {
            vertices.extend(shapes::rect(
                origin - Vec2::splat(0.1),
                Vec2::splat(1.2),
                colors::CAT_HEAD,
            ));
        }
        let color = if progress.is_completed(i) {
            colors::GROW_ITEM
        } else if progress.is_level_available(i) {
            colors::WIN
        } else {
            colors::STATIC_4
        };
        vertices.extend(shapes::rect(origin, Vec2::ONE, color));
    }
    vertices
}

/// Full-screen fade quad over an area of `extent`
pub fn fade_overlay(extent: Vec2, alpha: f32) -> Vec<Vertex> {
    if alpha <= 0.0 {
        return Vec::new();
    }
    let mut color = colors::FADE;
    color[3] = alpha.min(1.0);
    // Generous margin so letterboxing is covered too
    shapes::rect(-extent, extent * 3.0, color)
}

/// On-screen pad in viewport fractions (0..1, y down), held buttons lit
pub fn build_touch_pad(viewport: Vec2, held: ButtonSet) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for pad in touch_pad(viewport) {
        let color = if held.contains(pad.button) {
            colors::TOUCH_PRESSED
        } else {
            colors::TOUCH_BUTTON
        };
        let min = pad.min / viewport;
        let size = Vec2::splat(pad.size) / viewport;
        vertices.extend(shapes::rect(min, size, color));

        let center = min + size * 0.5;
        let glyph = match pad.button {
            Button::Up => Vec2::NEG_Y,
            Button::Down => Vec2::Y,
            Button::Left => Vec2::NEG_X,
            Button::Right => Vec2::X,
            _ => {
                vertices.extend(shapes::thick_segment(
                    center - size * Vec2::new(0.25, 0.0),
                    center + size * Vec2::new(0.25, 0.0),
                    size.y * 0.12,
                    colors::CAT_EYE,
                ));
                continue;
            }
        };
        // Arrow head pointing along the button's direction
        let tip = center + glyph * size * 0.25;
        let base = center - glyph * size * 0.15;
        let side = glyph.perp() * size * 0.2;
        for p in [tip, base + side, base - side] {
            vertices.push(Vertex::new(p.x, p.y, colors::CAT_EYE));
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelData;
    use crate::sim::{TickInput, tick};

    fn state(rows: &[&str]) -> GameState {
        GameState::new(0, &LevelData::parse(&rows.join("\n")).unwrap(), 7)
    }

    #[test]
    fn test_every_tile_color_is_opaque() {
        for code in 0..=10 {
            let tile = Tile::from_code(code).unwrap();
            if let Some(color) = tile_color(tile) {
                assert_eq!(color[3], 1.0);
            }
        }
        assert_eq!(tile_color(Tile::Empty), None);
    }

    #[test]
    fn test_frame_contains_board_and_chain() {
        let s = state(&["BP.G", "____"]);
        let settings = Settings::default();
        let vertices = build_frame(&s, &settings);
        // Board + 4 static + item + chain
        assert!(vertices.len() > 6 + 4 * 6 + 16 * 3);
        assert_eq!(vertices.len() % 3, 0);
    }

    #[test]
    fn test_hidden_chain_not_drawn() {
        let mut s = state(&["PL.", "___"]);
        let settings = Settings::default();
        let visible = build_frame(&s, &settings).len();

        tick(&mut s, &TickInput { right: true, ..Default::default() }, 0.0);
        for _ in 0..20 {
            tick(&mut s, &TickInput::default(), 1.0 / 60.0);
        }
        assert!(s.is_hidden());
        let mut quiet = settings.clone();
        quiet.particles = false;
        assert!(build_frame(&s, &quiet).len() < visible);
    }

    #[test]
    fn test_chain_centers_offset_to_cell_middle() {
        let s = state(&["BP.", "___"]);
        let centers = chain_centers(&s, &Settings::default());
        assert_eq!(centers, vec![Vec2::new(1.5, 0.5), Vec2::new(0.5, 0.5)]);
    }

    #[test]
    fn test_nudge_respects_reduced_motion() {
        let mut s = state(&["BP#", "___"]);
        tick(&mut s, &TickInput { right: true, ..Default::default() }, 0.0);
        tick(&mut s, &TickInput::default(), 0.05);
        assert!(s.blocked.is_some());

        let nudged = chain_centers(&s, &Settings::default());
        assert!(nudged[0].x > 1.5);

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(chain_centers(&s, &calm)[0], Vec2::new(1.5, 0.5));
    }

    #[test]
    fn test_level_select_boxes() {
        let mut progress = Progress::new();
        progress.mark_completed(0);
        let vertices = build_level_select(9, 2, &progress);
        // 9 boxes plus the cursor outline
        assert_eq!(vertices.len(), 10 * 6);
        assert_eq!(select_slot(SELECT_COLUMNS), Vec2::new(0.0, 1.25));
        assert_eq!(select_extent(9), Vec2::new(6.0, 2.25));
    }

    #[test]
    fn test_touch_pad_stays_on_screen() {
        let viewport = Vec2::new(390.0, 844.0);
        let mut held = ButtonSet::default();
        held.set(Button::Undo, true);
        let vertices = build_touch_pad(viewport, held);
        // Five squares, four arrow heads, one undo bar
        assert_eq!(vertices.len(), 5 * 6 + 4 * 3 + 6);
        for v in &vertices {
            assert!((0.0..=1.0).contains(&v.position[0]));
            assert!((0.0..=1.0).contains(&v.position[1]));
        }
        assert!(vertices.iter().any(|v| v.color == colors::TOUCH_PRESSED));
    }

    #[test]
    fn test_fade_overlay() {
        assert!(fade_overlay(Vec2::ONE, 0.0).is_empty());
        let v = fade_overlay(Vec2::ONE, 0.5);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].color[3], 0.5);
    }
}
