//! Match detection - flood-fill grouping and straight-run validation
//!
//! Detection is a pure function of board contents: positions are scanned in
//! column-major order, each unvisited occupied cell seeds a breadth-first
//! flood fill over orthogonal same-color neighbors, and the resulting region
//! is kept only where it overlaps a straight run. Holes never group.

use std::collections::VecDeque;

use gridspin_types::{Color, Position, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};

use crate::board::{Board, MAX_CELLS};

/// A set of same-colored positions to be cleared in one pass.
///
/// Matches found in the same pass are disjoint: every position belongs to at
/// most one reported match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub color: Color,
    pub positions: Vec<Position>,
}

/// Finds clearable cell groups on a board snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MatchDetector {
    min_run: u8,
}

impl MatchDetector {
    pub fn new(min_run: u8) -> Self {
        Self { min_run }
    }

    pub fn min_run(&self) -> u8 {
        self.min_run
    }

    /// All matches on the board, in detection order.
    ///
    /// Identical board contents always produce identical output.
    pub fn find_matches(&self, board: &Board) -> Vec<Match> {
        let mut visited = [false; MAX_CELLS];
        let mut matches = Vec::new();

        for pos in board.positions() {
            let idx = flat(board, pos);
            if visited[idx] {
                continue;
            }
            let Some(color) = board.cell_unchecked(pos) else {
                visited[idx] = true;
                continue;
            };

            let region = flood_fill(board, &mut visited, pos, color);
            if let Some(positions) = self.validate_region(&region) {
                matches.push(Match { color, positions });
            }
        }

        matches
    }

    /// Straight-run validation: group the region's members by column and by
    /// row; a member is kept if any of its lines holds at least `min_run`
    /// region members. L- and plus-shaped regions can qualify through both a
    /// row and a column, so the result can be smaller than the region but
    /// never contains duplicates.
    fn validate_region(&self, region: &[Position]) -> Option<Vec<Position>> {
        if region.len() < self.min_run as usize {
            return None;
        }

        let mut col_counts = [0u8; MAX_BOARD_WIDTH as usize];
        let mut row_counts = [0u8; MAX_BOARD_HEIGHT as usize];
        for pos in region {
            col_counts[pos.col as usize] += 1;
            row_counts[pos.row as usize] += 1;
        }

        let qualifying: Vec<Position> = region
            .iter()
            .copied()
            .filter(|pos| {
                col_counts[pos.col as usize] >= self.min_run
                    || row_counts[pos.row as usize] >= self.min_run
            })
            .collect();

        if qualifying.is_empty() {
            None
        } else {
            Some(qualifying)
        }
    }
}

#[inline(always)]
fn flat(board: &Board, pos: Position) -> usize {
    pos.col as usize * board.height() as usize + pos.row as usize
}

/// Breadth-first flood fill over orthogonal neighbors of equal color.
/// Marks cells visited as they are enqueued so no cell is taken twice.
fn flood_fill(
    board: &Board,
    visited: &mut [bool; MAX_CELLS],
    start: Position,
    color: Color,
) -> Vec<Position> {
    let mut region = Vec::new();
    let mut queue = VecDeque::new();

    visited[flat(board, start)] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        region.push(pos);

        // Neighbors are in bounds by construction.
        if let Ok(neighbors) = board.neighbors4(pos) {
            for neighbor in neighbors {
                let idx = flat(board, neighbor);
                if !visited[idx] && board.cell_unchecked(neighbor) == Some(color) {
                    visited[idx] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    region
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Option<Color> = Some(Color::Red);
    const B: Option<Color> = Some(Color::Blue);
    const C: Option<Color> = Some(Color::Green);

    fn detector() -> MatchDetector {
        MatchDetector::new(3)
    }

    #[test]
    fn bottom_row_run_is_the_only_match() {
        // Row 0 (bottom) holds three A's; the rows above alternate.
        let board = Board::from_rows(vec![
            vec![A, A, A],
            vec![B, C, B],
            vec![C, B, C],
        ]);

        let matches = detector().find_matches(&board);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].color, Color::Red);
        let mut positions = matches[0].positions.clone();
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn region_below_threshold_is_silently_discarded() {
        let board = Board::from_rows(vec![
            vec![A, A, B],
            vec![B, C, C],
            vec![C, B, A],
        ]);
        assert!(detector().find_matches(&board).is_empty());
    }

    #[test]
    fn connected_region_without_a_straight_run_does_not_match() {
        // Four A's in a 2x2 block: region size 4, but no line of 3.
        let board = Board::from_rows(vec![
            vec![A, A, B],
            vec![A, A, C],
            vec![B, C, B],
        ]);
        assert!(detector().find_matches(&board).is_empty());
    }

    #[test]
    fn dangling_member_of_a_qualifying_region_is_excluded() {
        // Column 0 holds a vertical run of three A's; (1, 2) is connected to
        // the region but sits on no qualifying line.
        let board = Board::from_rows(vec![
            vec![A, B, C],
            vec![A, C, B],
            vec![A, A, C],
        ]);

        let matches = detector().find_matches(&board);

        assert_eq!(matches.len(), 1);
        let mut positions = matches[0].positions.clone();
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(0, 2),
            ]
        );
    }

    #[test]
    fn l_shaped_region_clears_both_arms_without_duplicates() {
        // Row 0 and column 0 are both A-runs sharing the corner (0, 0).
        let board = Board::from_rows(vec![
            vec![A, A, A],
            vec![A, B, C],
            vec![A, C, B],
        ]);

        let matches = detector().find_matches(&board);

        assert_eq!(matches.len(), 1);
        let mut positions = matches[0].positions.clone();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 5, "corner reported once, both arms kept");
    }

    #[test]
    fn matches_are_disjoint() {
        let board = Board::from_rows(vec![
            vec![A, A, A],
            vec![C, B, C],
            vec![B, B, B],
        ]);

        let matches = detector().find_matches(&board);

        assert_eq!(matches.len(), 2);
        let mut seen = Vec::new();
        for m in &matches {
            for pos in &m.positions {
                assert!(!seen.contains(pos), "{:?} reported twice", pos);
                seen.push(*pos);
            }
        }
    }

    #[test]
    fn holes_never_group() {
        let board = Board::from_rows(vec![
            vec![None, None, None],
            vec![A, None, A],
            vec![None, None, None],
        ]);
        assert!(detector().find_matches(&board).is_empty());
    }

    #[test]
    fn detection_is_deterministic() {
        let board = Board::from_rows(vec![
            vec![A, A, A, B],
            vec![B, C, B, B],
            vec![C, B, C, B],
        ]);
        let first = detector().find_matches(&board);
        let second = detector().find_matches(&board);
        assert_eq!(first, second);
    }

    #[test]
    fn longer_minimum_run_is_respected() {
        let board = Board::from_rows(vec![
            vec![A, A, A, B],
            vec![B, C, B, C],
            vec![C, B, C, B],
        ]);
        assert!(MatchDetector::new(4).find_matches(&board).is_empty());
        assert_eq!(MatchDetector::new(3).find_matches(&board).len(), 1);
    }
}
