//! Chain resolution - the clear → compact → refill loop
//!
//! After a transform the board is driven to a fixed point: detect matches,
//! turn every matched cell into a hole, let the cells above fall, refill the
//! exposed top of each touched column, and detect again. One command can
//! cascade through many cycles; the resolver runs them all synchronously and
//! appends every observable mutation to the caller's step log in order.
//!
//! There is no structural bound on chain depth. Termination comes from the
//! palette: with a sanely sized palette relative to the board, refills stop
//! producing matches quickly. A one- or two-color palette can chain
//! arbitrarily long; that is a configuration concern of the caller.

use gridspin_types::{MutationStep, Position};

use crate::board::Board;
use crate::detector::{Match, MatchDetector};
use crate::rng::ColorPicker;

/// Totals for one resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainSummary {
    /// Clear→compact→refill cycles executed.
    pub cycles: u32,
    /// Cells cleared across all cycles.
    pub cleared: u32,
    /// Cells spawned across all cycles. Always equals `cleared`: every hole
    /// a clear opens is filled again before the next detection pass.
    pub spawned: u32,
}

/// Resolution phases. A run enters at `Detecting` and only `Idle` leaves it;
/// no steps are ever emitted after `Idle` is reached.
enum Phase {
    Detecting,
    Clearing,
    Compacting,
    Refilling,
    Idle,
}

/// Drives a board to its match-free fixed point.
#[derive(Debug, Clone, Copy)]
pub struct ChainResolver {
    detector: MatchDetector,
}

impl ChainResolver {
    pub fn new(min_match_len: u8) -> Self {
        Self {
            detector: MatchDetector::new(min_match_len),
        }
    }

    pub fn detector(&self) -> &MatchDetector {
        &self.detector
    }

    /// Resolve all chains, appending every mutation to `steps`.
    pub fn resolve<C: ColorPicker>(
        &self,
        board: &mut Board,
        colors: &mut C,
        steps: &mut Vec<MutationStep>,
    ) -> ChainSummary {
        let mut summary = ChainSummary::default();
        let mut pending: Vec<Match> = Vec::new();
        // Columns touched by the current cycle's clears, as a bitmask.
        let mut affected: u16 = 0;
        let mut phase = Phase::Detecting;

        loop {
            phase = match phase {
                Phase::Detecting => {
                    pending = self.detector.find_matches(board);
                    if pending.is_empty() {
                        Phase::Idle
                    } else {
                        Phase::Clearing
                    }
                }
                Phase::Clearing => {
                    // All matches of one pass clear simultaneously; the cell
                    // just becomes a hole, gravity is driven by occupancy.
                    let mut cleared = Vec::new();
                    affected = 0;
                    for matched in &pending {
                        for &pos in &matched.positions {
                            board.set_unchecked(pos, None);
                            affected |= 1 << pos.col;
                            cleared.push(pos);
                        }
                    }
                    summary.cleared += cleared.len() as u32;
                    steps.push(MutationStep::Cleared(cleared));
                    Phase::Compacting
                }
                Phase::Compacting => {
                    for col in 0..board.width() {
                        if affected & (1 << col) != 0 {
                            compact_column(board, col, steps);
                        }
                    }
                    Phase::Refilling
                }
                Phase::Refilling => {
                    for col in 0..board.width() {
                        if affected & (1 << col) != 0 {
                            summary.spawned += refill_column(board, col, colors, steps);
                        }
                    }
                    summary.cycles += 1;
                    Phase::Detecting
                }
                Phase::Idle => return summary,
            };
        }
    }
}

/// Stable downward compaction of one column. Scanning up from the gravity
/// floor, the shift equals the holes seen so far; it never decreases, so no
/// two sources can write the same destination.
fn compact_column(board: &mut Board, col: u8, steps: &mut Vec<MutationStep>) {
    let mut shift = 0u8;
    for row in 0..board.height() {
        let from = Position::new(col, row);
        match board.cell_unchecked(from) {
            None => shift += 1,
            Some(color) if shift > 0 => {
                let to = Position::new(col, row - shift);
                board.set_unchecked(to, Some(color));
                board.set_unchecked(from, None);
                steps.push(MutationStep::Shifted { from, to });
            }
            Some(_) => {}
        }
    }
}

/// Fill the unoccupied top of a column, topmost cell first.
fn refill_column<C: ColorPicker>(
    board: &mut Board,
    col: u8,
    colors: &mut C,
    steps: &mut Vec<MutationStep>,
) -> u32 {
    let mut spawned = 0;
    for row in (0..board.height()).rev() {
        let at = Position::new(col, row);
        if board.cell_unchecked(at).is_some() {
            break;
        }
        let color = colors.next_color();
        board.set_unchecked(at, Some(color));
        steps.push(MutationStep::Spawned { at, color });
        spawned += 1;
    }
    spawned
}

/// Deal a fresh board: fill every cell from the color source, then re-draw
/// matched cells in place until no matches remain. Used for board setup
/// only, before any command runs, so no steps are logged and no gravity is
/// involved; play always starts from a stable, fully occupied board.
pub fn deal_board<C: ColorPicker>(
    board: &mut Board,
    detector: &MatchDetector,
    colors: &mut C,
) {
    let positions: Vec<Position> = board.positions().collect();
    for &pos in &positions {
        board.set_unchecked(pos, Some(colors.next_color()));
    }

    loop {
        let matches = detector.find_matches(board);
        if matches.is_empty() {
            return;
        }
        for matched in &matches {
            for &pos in &matched.positions {
                board.set_unchecked(pos, Some(colors.next_color()));
            }
        }
    }
}
