//! Read-only board snapshot for render handoff.

use gridspin_types::{Color, Position};

use crate::board::Board;

/// A flat u8-coded copy of the board: 0 = empty, `k + 1` = color index `k`.
/// Cells are column-major, matching the board's own layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<u8>,
}

impl BoardSnapshot {
    pub fn cell_code(&self, col: u8, row: u8) -> u8 {
        self.cells[col as usize * self.height as usize + row as usize]
    }

    pub fn color_at(&self, pos: Position) -> Option<Color> {
        match self.cell_code(pos.col, pos.row) {
            0 => None,
            code => Color::from_index(code - 1),
        }
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            cells: board
                .cells()
                .iter()
                .map(|cell| match cell {
                    None => 0,
                    Some(color) => color.index() + 1,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_encodes_holes_and_colors() {
        let mut board = Board::new(2, 2);
        board
            .set(Position::new(0, 1), Some(Color::Orange))
            .unwrap();
        board.set(Position::new(1, 0), Some(Color::Red)).unwrap();

        let snapshot = BoardSnapshot::from(&board);

        assert_eq!(snapshot.width, 2);
        assert_eq!(snapshot.height, 2);
        assert_eq!(snapshot.cell_code(0, 0), 0);
        assert_eq!(snapshot.cell_code(0, 1), Color::Orange.index() + 1);
        assert_eq!(snapshot.color_at(Position::new(1, 0)), Some(Color::Red));
        assert_eq!(snapshot.color_at(Position::new(1, 1)), None);
    }
}
