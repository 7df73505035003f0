//! Board transforms - whole-grid rotation and column-stack reversal
//!
//! Both gestures are pure permutations of board contents: colors relocate
//! between fixed position slots, nothing is created or destroyed, and both
//! report the permutation as `(from, to)` pairs for the animation layer.
//!
//! Rotation only turns the largest centered square sub-block of size
//! min(W, H); rows and columns outside that core, and the odd center cell,
//! stay put. On a non-square board the remainder is deliberately untouched.

use gridspin_types::{Direction, Position};

use crate::board::{Board, OutOfBounds};

/// Rotate the board's square core 90° in the given direction, ring by ring.
///
/// Returns the permutation as `(from, to)` pairs, one per relocated cell.
/// For `Direction::Right` a source cell at core coordinates (c, r) lands at
/// (n−1−r, c); `Direction::Left` is the exact inverse.
pub fn rotate_core(board: &mut Board, direction: Direction) -> Vec<(Position, Position)> {
    let n = board.width().min(board.height());
    let col_off = (board.width() - n) / 2;
    let row_off = (board.height() - n) / 2;
    let at = |col: u8, row: u8| Position::new(col_off + col, row_off + row);

    let mut moved = Vec::new();
    if n < 2 {
        return moved;
    }

    for i in 0..n / 2 {
        for j in i..(n - 1 - i) {
            // The four positions of one 4-cycle on the current ring.
            let p0 = at(i, j);
            let p1 = at(j, n - 1 - i);
            let p2 = at(n - 1 - i, n - 1 - j);
            let p3 = at(n - 1 - j, i);

            let (c0, c1, c2, c3) = (
                board.cell_unchecked(p0),
                board.cell_unchecked(p1),
                board.cell_unchecked(p2),
                board.cell_unchecked(p3),
            );

            match direction {
                Direction::Right => {
                    // Contents advance p1 -> p0 -> p3 -> p2 -> p1.
                    board.set_unchecked(p0, c1);
                    board.set_unchecked(p3, c0);
                    board.set_unchecked(p2, c3);
                    board.set_unchecked(p1, c2);
                    moved.push((p1, p0));
                    moved.push((p2, p1));
                    moved.push((p3, p2));
                    moved.push((p0, p3));
                }
                Direction::Left => {
                    // Contents advance p0 -> p1 -> p2 -> p3 -> p0.
                    board.set_unchecked(p1, c0);
                    board.set_unchecked(p2, c1);
                    board.set_unchecked(p3, c2);
                    board.set_unchecked(p0, c3);
                    moved.push((p0, p1));
                    moved.push((p1, p2));
                    moved.push((p2, p3));
                    moved.push((p3, p0));
                }
            }
        }
    }

    moved
}

/// Reverse the vertical order of the cells from the tapped row to the top of
/// its column: row `tapped.row + k` pairs with row `H−1−k`.
///
/// Returns the swapped pairs in pairing order. When the span is odd the
/// middle cell pairs with itself; the no-op swap is still reported so the
/// animation layer can flash the whole touched span.
///
/// Fails only when the tapped position is off the board; the board is
/// untouched in that case.
pub fn reverse_column_stack(
    board: &mut Board,
    tapped: Position,
) -> Result<Vec<(Position, Position)>, OutOfBounds> {
    if !board.in_bounds(tapped) {
        return Err(OutOfBounds(tapped));
    }

    let height = board.height();
    let span = height - tapped.row;
    let mut touched = Vec::new();

    for k in 0..span.div_ceil(2) {
        let low = Position::new(tapped.col, tapped.row + k);
        let high = Position::new(tapped.col, height - 1 - k);

        let (a, b) = (board.cell_unchecked(low), board.cell_unchecked(high));
        board.set_unchecked(low, b);
        board.set_unchecked(high, a);

        touched.push((low, high));
        if low != high {
            touched.push((high, low));
        }
    }

    Ok(touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridspin_types::Color;

    const A: Option<Color> = Some(Color::Red);
    const B: Option<Color> = Some(Color::Blue);
    const C: Option<Color> = Some(Color::Green);
    const D: Option<Color> = Some(Color::Yellow);

    #[test]
    fn rotate_right_on_two_by_two() {
        let mut board = Board::from_rows(vec![vec![A, B], vec![C, D]]);

        let moved = rotate_core(&mut board, Direction::Right);

        assert_eq!(board.to_rows(), vec![vec![C, A], vec![D, B]]);
        assert_eq!(moved.len(), 4);
        assert!(moved.contains(&(Position::new(0, 0), Position::new(1, 0))));
    }

    #[test]
    fn rotate_left_on_two_by_two() {
        let mut board = Board::from_rows(vec![vec![A, B], vec![C, D]]);

        rotate_core(&mut board, Direction::Left);

        assert_eq!(board.to_rows(), vec![vec![B, D], vec![A, C]]);
    }

    #[test]
    fn left_then_right_restores_the_board() {
        let mut board = Board::from_rows(vec![
            vec![A, B, C],
            vec![D, A, B],
            vec![C, D, A],
        ]);
        let original = board.clone();

        rotate_core(&mut board, Direction::Left);
        assert_ne!(board, original);
        rotate_core(&mut board, Direction::Right);
        assert_eq!(board, original);
    }

    #[test]
    fn four_rotations_restore_the_board() {
        let mut board = Board::from_rows(vec![
            vec![A, B, C, D],
            vec![B, C, D, A],
            vec![C, D, A, B],
            vec![D, A, B, C],
        ]);
        let original = board.clone();

        for _ in 0..4 {
            rotate_core(&mut board, Direction::Right);
        }
        assert_eq!(board, original);
    }

    #[test]
    fn odd_center_cell_stays_put() {
        let mut board = Board::from_rows(vec![
            vec![A, B, C],
            vec![D, A, B],
            vec![C, D, B],
        ]);

        let moved = rotate_core(&mut board, Direction::Right);

        assert_eq!(
            board.get(Position::new(1, 1)),
            Ok(A),
            "center of an odd core never moves"
        );
        assert!(moved.iter().all(|(from, to)| {
            *from != Position::new(1, 1) && *to != Position::new(1, 1)
        }));
    }

    #[test]
    fn non_square_remainder_is_untouched() {
        // 2-wide, 4-tall: the centered 2x2 core covers rows 1..=2 only.
        let mut board = Board::from_rows(vec![
            vec![A, B],
            vec![C, D],
            vec![A, C],
            vec![D, B],
        ]);

        rotate_core(&mut board, Direction::Right);

        assert_eq!(
            board.to_rows()[0],
            vec![A, B],
            "bottom remainder row left as-is"
        );
        assert_eq!(
            board.to_rows()[3],
            vec![D, B],
            "top remainder row left as-is"
        );
        // The core itself did rotate.
        assert_eq!(board.to_rows()[1], vec![A, C]);
        assert_eq!(board.to_rows()[2], vec![C, D]);
    }

    #[test]
    fn single_cell_core_is_a_no_op() {
        let mut board = Board::from_rows(vec![vec![A], vec![B], vec![C]]);
        let original = board.clone();

        let moved = rotate_core(&mut board, Direction::Right);

        assert!(moved.is_empty());
        assert_eq!(board, original);
    }

    #[test]
    fn tap_at_bottom_reverses_whole_column() {
        let mut board = Board::from_rows(vec![vec![A], vec![B], vec![C], vec![D]]);

        let touched = reverse_column_stack(&mut board, Position::new(0, 0)).unwrap();

        assert_eq!(
            board.to_rows(),
            vec![vec![D], vec![C], vec![B], vec![A]]
        );
        assert_eq!(touched.len(), 4);
    }

    #[test]
    fn tap_mid_column_reverses_the_span_above() {
        // Tap row 1 of a 4-tall column: rows 1..=3 reverse, row 0 stays.
        let mut board = Board::from_rows(vec![vec![A], vec![B], vec![C], vec![D]]);

        let touched = reverse_column_stack(&mut board, Position::new(0, 1)).unwrap();

        assert_eq!(
            board.to_rows(),
            vec![vec![A], vec![D], vec![C], vec![B]]
        );
        // Pairs (1,3) and the self-paired middle row 2.
        assert_eq!(
            touched,
            vec![
                (Position::new(0, 1), Position::new(0, 3)),
                (Position::new(0, 3), Position::new(0, 1)),
                (Position::new(0, 2), Position::new(0, 2)),
            ]
        );
    }

    #[test]
    fn tap_at_top_row_is_a_reported_no_op() {
        let mut board = Board::from_rows(vec![vec![A], vec![B], vec![C]]);
        let original = board.clone();

        let touched = reverse_column_stack(&mut board, Position::new(0, 2)).unwrap();

        assert_eq!(board, original);
        assert_eq!(touched, vec![(Position::new(0, 2), Position::new(0, 2))]);
    }

    #[test]
    fn double_reversal_restores_the_column() {
        let mut board = Board::from_rows(vec![
            vec![A, B],
            vec![C, D],
            vec![B, A],
            vec![D, C],
            vec![A, D],
        ]);
        let original = board.clone();
        let tap = Position::new(1, 1);

        reverse_column_stack(&mut board, tap).unwrap();
        assert_ne!(board, original);
        reverse_column_stack(&mut board, tap).unwrap();
        assert_eq!(board, original);
    }

    #[test]
    fn tap_off_the_board_is_rejected_without_mutation() {
        let mut board = Board::from_rows(vec![vec![A, B], vec![C, D]]);
        let original = board.clone();

        let err = reverse_column_stack(&mut board, Position::new(2, 0)).unwrap_err();

        assert_eq!(err, OutOfBounds(Position::new(2, 0)));
        assert_eq!(board, original);
    }

    #[test]
    fn touched_cells_only_within_tapped_column() {
        let mut board = Board::from_rows(vec![
            vec![A, B, C],
            vec![D, A, B],
            vec![C, D, A],
        ]);

        let touched = reverse_column_stack(&mut board, Position::new(1, 0)).unwrap();

        assert!(touched.iter().all(|(from, to)| from.col == 1 && to.col == 1));
        // Other columns untouched.
        assert_eq!(board.column(0), &[A, D, C]);
        assert_eq!(board.column(2), &[C, B, A]);
    }
}
