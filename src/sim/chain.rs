//! The player chain: head-first segments with pending move directions

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// One body cell of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub pos: IVec2,
    /// Delta applied at the next commit (zero at rest)
    pub dir: IVec2,
}

impl Segment {
    pub fn at(pos: IVec2) -> Self {
        Self {
            pos,
            dir: IVec2::ZERO,
        }
    }
}

/// Ordered segments, `segments[0]` is the head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    segments: Vec<Segment>,
}

impl Chain {
    /// Build a chain at rest. An empty list gets a single segment at the origin.
    pub fn new(positions: &[IVec2]) -> Self {
        let mut segments: Vec<Segment> = positions.iter().copied().map(Segment::at).collect();
        if segments.is_empty() {
            segments.push(Segment::at(IVec2::ZERO));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> IVec2 {
        self.segments[0].pos
    }

    pub fn positions(&self) -> Vec<IVec2> {
        self.segments.iter().map(|s| s.pos).collect()
    }

    /// Any segment currently (pre-move) at `pos`
    pub fn occupies(&self, pos: IVec2) -> bool {
        self.segments.iter().any(|s| s.pos == pos)
    }

    /// Queue a follow-the-leader move: the head steps by `dir`, every other
    /// segment steps onto its predecessor's current cell.
    pub fn begin_move(&mut self, dir: IVec2) {
        self.segments[0].dir = dir;
        for i in 1..self.segments.len() {
            self.segments[i].dir = self.segments[i - 1].pos - self.segments[i].pos;
        }
    }

    /// Queue a grow: a new head appears at the old head's cell and steps by
    /// `dir`; the rest of the chain stays put.
    pub fn expand(&mut self, dir: IVec2) {
        let head = self.head();
        self.segments.insert(0, Segment { pos: head, dir });
    }

    /// Drop the tail segment. Refuses to empty the chain.
    pub fn shrink(&mut self) -> bool {
        if self.segments.len() <= 1 {
            return false;
        }
        self.segments.pop();
        true
    }

    /// Queue a one-cell fall for every segment
    pub fn begin_fall(&mut self) {
        for segment in &mut self.segments {
            segment.dir = IVec2::Y;
        }
    }

    /// Apply pending directions and return to rest
    pub fn commit(&mut self) {
        for segment in &mut self.segments {
            segment.pos += segment.dir;
            segment.dir = IVec2::ZERO;
        }
    }

    /// Cancel any pending directions
    pub fn clear_directions(&mut self) {
        for segment in &mut self.segments {
            segment.dir = IVec2::ZERO;
        }
    }

    /// Replace all positions (undo / reload); directions reset to zero
    pub fn set_positions(&mut self, positions: &[IVec2]) {
        *self = Self::new(positions);
    }

    /// Interpolated segment centers in grid units for a progress fraction
    pub fn interpolated(&self, t: f32) -> Vec<Vec2> {
        self.segments
            .iter()
            .map(|s| s.pos.as_vec2() + s.dir.as_vec2() * t)
            .collect()
    }
}
