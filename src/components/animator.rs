//! Frame sequencing and per-sprite driver state.
//!
//! [`FrameSequence`] is the flat list of sheet cells an animator cycles
//! through. It is built from picked range entries and optionally reshaped by
//! the idle-hold or ping-pong transforms. [`MemaoAnimator`] is the driver
//! component attached to every character sprite that uses a Memao sheet.

use bevy_ecs::prelude::Component;

use crate::components::animation::AnimCategory;
use crate::resources::rangetable::RangeEntry;

/// Extra copies of the first idle cell added by [`idle_hold`].
pub const IDLE_HOLD_REPEATS: usize = 3;

/// Cell used when nothing in the table resolves.
pub const FALLBACK_CELL: Cell = Cell { row: 1, col: 1 };

/// 1-based sheet coordinates of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Concatenate each entry's `(row, column)` cells in order.
pub fn expand_ranges(ranges: &[&RangeEntry]) -> Vec<Cell> {
    ranges
        .iter()
        .flat_map(|r| r.frames.iter().map(move |c| Cell::new(r.row, *c)))
        .collect()
}

/// Hold the first pose longer: repeat the first cell three extra times.
pub fn idle_hold(mut cells: Vec<Cell>) -> Vec<Cell> {
    if let Some(first) = cells.first().copied() {
        cells.splice(0..0, std::iter::repeat_n(first, IDLE_HOLD_REPEATS));
    }
    cells
}

/// Forward then back: `a b c d` becomes `a b c d c b`, so wrapping to index 0
/// continues the reverse pass without repeating an end pose.
pub fn ping_pong(mut cells: Vec<Cell>) -> Vec<Cell> {
    let n = cells.len();
    if n < 2 {
        return cells;
    }
    let back: Vec<Cell> = cells[1..n - 1].iter().rev().copied().collect();
    cells.extend(back);
    cells
}

/// Which transforms to apply when building a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceTransform {
    pub ping_pong: bool,
    pub idle_hold: bool,
}

/// Ordered, non-empty list of cells. Rebuilt, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    cells: Vec<Cell>,
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self {
            cells: vec![FALLBACK_CELL],
        }
    }
}

impl FrameSequence {
    /// Expand `ranges` and apply `transform`. Empty input yields the fallback
    /// cell.
    pub fn build(ranges: &[&RangeEntry], transform: SequenceTransform) -> Self {
        let mut cells = expand_ranges(ranges);
        if transform.idle_hold {
            cells = idle_hold(cells);
        }
        if transform.ping_pong {
            cells = ping_pong(cells);
        }
        Self::from_cells(cells)
    }

    pub fn from_cells(cells: Vec<Cell>) -> Self {
        if cells.is_empty() {
            Self::default()
        } else {
            Self { cells }
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index % self.cells.len()]
    }
}

/// Driver state for one Memao sprite.
#[derive(Component, Debug, Clone)]
pub struct MemaoAnimator {
    pub sequence: FrameSequence,
    pub frame_index: usize,
    /// Ticks since the last frame advance.
    pub timer: u32,
    /// Category the current sequence was built for.
    pub key: Option<AnimCategory>,
    pub fps: u32,
    /// Ticks left before a stopped character is treated as idle.
    pub move_hold: u32,
    /// Wraps back to frame 0 since the animator was attached.
    pub wraps: u32,
}

impl Default for MemaoAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemaoAnimator {
    pub fn new() -> Self {
        Self {
            sequence: FrameSequence::default(),
            frame_index: 0,
            timer: 0,
            key: None,
            fps: 0,
            move_hold: 0,
            wraps: 0,
        }
    }

    pub fn current_cell(&self) -> Cell {
        self.sequence.cell(self.frame_index)
    }

    /// Swap in a new sequence and restart playback.
    pub fn reset_to(&mut self, key: AnimCategory, fps: u32, sequence: FrameSequence) {
        self.key = Some(key);
        self.fps = fps;
        self.sequence = sequence;
        self.frame_index = 0;
        self.timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(n: u32) -> Vec<Cell> {
        (1..=n).map(|c| Cell::new(1, c)).collect()
    }

    #[test]
    fn expand_concatenates_in_input_order() {
        let a = RangeEntry { row: 3, frames: vec![7, 8] };
        let b = RangeEntry { row: 4, frames: vec![1, 2, 3, 4] };
        let out = expand_ranges(&[&a, &b]);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], Cell::new(3, 7));
        assert_eq!(out[2], Cell::new(4, 1));
        assert_eq!(out[5], Cell::new(4, 4));
    }

    #[test]
    fn idle_hold_adds_three_copies_of_first() {
        let out = idle_hold(cells(4));
        assert_eq!(out.len(), 7);
        assert!(out[..4].iter().all(|c| *c == Cell::new(1, 1)));
        assert_eq!(&out[4..], &cells(4)[1..]);
        assert!(idle_hold(Vec::new()).is_empty());
    }

    #[test]
    fn ping_pong_reflects_interior() {
        for n in 2..=8u32 {
            let input = cells(n);
            let out = ping_pong(input.clone());
            let n = n as usize;
            assert_eq!(out.len(), 2 * n - 2);
            assert_eq!(&out[..n], &input[..]);
            assert_eq!(out[n - 1], input[n - 1]);
            for k in 1..n - 1 {
                assert_eq!(out[n - 1 + k], out[n - 1 - k]);
            }
        }
        assert_eq!(ping_pong(cells(1)), cells(1));
    }

    #[test]
    fn build_empty_gives_fallback_cell() {
        let seq = FrameSequence::build(&[], SequenceTransform::default());
        assert_eq!(seq.cells(), &[FALLBACK_CELL]);
    }

    #[test]
    fn reset_to_restarts_playback() {
        let mut anim = MemaoAnimator::new();
        anim.frame_index = 3;
        anim.timer = 5;
        let e = RangeEntry { row: 2, frames: vec![1, 2] };
        anim.reset_to(
            AnimCategory::Idle(crate::components::character::Direction::Left),
            3,
            FrameSequence::build(&[&e], SequenceTransform::default()),
        );
        assert_eq!(anim.frame_index, 0);
        assert_eq!(anim.timer, 0);
        assert_eq!(anim.current_cell(), Cell::new(2, 1));
    }
}
