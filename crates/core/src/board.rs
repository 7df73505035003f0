//! Board module - manages the puzzle grid
//!
//! The board is a W×H grid (at most 12×12) where each cell is either empty
//! or holds a color. Storage is a flat column-major array for cache locality
//! and zero allocation; per-column gravity then works on contiguous slices.
//! Coordinates: (col, row) where col ranges 0..W (left to right) and row
//! ranges 0..H (bottom to top). Row 0 is the gravity floor.
//!
//! Cells are value slots: transforms and compaction copy colors between
//! positions, they never move cell objects, so no position can ever alias
//! or dangle mid-mutation.

use arrayvec::ArrayVec;

use gridspin_types::{Cell, Position, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};

/// Upper bound on cell count, for fixed-capacity storage.
pub const MAX_CELLS: usize = (MAX_BOARD_WIDTH as usize) * (MAX_BOARD_HEIGHT as usize);

/// A position outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds(pub Position);

impl std::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position ({}, {}) is off the board", self.0.col, self.0.row)
    }
}

impl std::error::Error for OutOfBounds {}

/// The puzzle board - W columns x H rows using flat column-major storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, column-major order (col * height + row)
    cells: ArrayVec<Cell, MAX_CELLS>,
}

impl Board {
    /// Create a new empty board. Dimensions must already be validated
    /// (1..=12 per axis); see `BoardConfig::validate`.
    pub fn new(width: u8, height: u8) -> Self {
        debug_assert!(width >= 1 && width <= MAX_BOARD_WIDTH);
        debug_assert!(height >= 1 && height <= MAX_BOARD_HEIGHT);

        let mut cells = ArrayVec::new();
        for _ in 0..(width as usize * height as usize) {
            cells.push(None);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.col >= self.width || pos.row >= self.height {
            return None;
        }
        Some(pos.col as usize * self.height as usize + pos.row as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Check whether a position is on the board.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    /// Get the cell at a position.
    pub fn get(&self, pos: Position) -> Result<Cell, OutOfBounds> {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .ok_or(OutOfBounds(pos))
    }

    /// Set the cell at a position.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<(), OutOfBounds> {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                Ok(())
            }
            None => Err(OutOfBounds(pos)),
        }
    }

    /// Exchange the contents of two positions. The positions themselves are
    /// fixed slots; only colors/occupancy move.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), OutOfBounds> {
        let ia = self.index(a).ok_or(OutOfBounds(a))?;
        let ib = self.index(b).ok_or(OutOfBounds(b))?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Orthogonal in-bounds neighbors of a position (up to 4).
    pub fn neighbors4(&self, pos: Position) -> Result<ArrayVec<Position, 4>, OutOfBounds> {
        if !self.in_bounds(pos) {
            return Err(OutOfBounds(pos));
        }

        let mut neighbors = ArrayVec::new();
        if pos.col > 0 {
            neighbors.push(Position::new(pos.col - 1, pos.row));
        }
        if pos.col + 1 < self.width {
            neighbors.push(Position::new(pos.col + 1, pos.row));
        }
        if pos.row > 0 {
            neighbors.push(Position::new(pos.col, pos.row - 1));
        }
        if pos.row + 1 < self.height {
            neighbors.push(Position::new(pos.col, pos.row + 1));
        }
        Ok(neighbors)
    }

    /// All positions in column-major order (the detection scan order).
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        let height = self.height;
        (0..width).flat_map(move |col| (0..height).map(move |row| Position::new(col, row)))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// A settled board has no holes anywhere.
    pub fn is_fully_occupied(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Internal read for positions the simulation computed itself.
    pub(crate) fn cell_unchecked(&self, pos: Position) -> Cell {
        debug_assert!(self.in_bounds(pos));
        self.index(pos).map(|idx| self.cells[idx]).unwrap_or(None)
    }

    /// Internal write for positions the simulation computed itself.
    pub(crate) fn set_unchecked(&mut self, pos: Position, cell: Cell) {
        debug_assert!(self.in_bounds(pos));
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = cell;
        }
    }

    /// One column as a contiguous slice, rows bottom to top.
    pub fn column(&self, col: u8) -> &[Cell] {
        let start = col as usize * self.height as usize;
        &self.cells[start..start + self.height as usize]
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Create from per-row lists for testing. `rows[0]` is the bottom row,
    /// each row listed left to right.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let height = rows.len() as u8;
        let width = rows[0].len() as u8;
        assert!(rows.iter().all(|row| row.len() == width as usize));

        let mut board = Self::new(width, height);
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                board
                    .set(Position::new(col as u8, row as u8), *cell)
                    .unwrap();
            }
        }
        board
    }

    /// Convert to per-row lists for testing/display (bottom row first).
    #[cfg(test)]
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.get(Position::new(col, row)).unwrap())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridspin_types::Color;

    #[test]
    fn index_is_column_major() {
        let board = Board::new(4, 6);
        assert_eq!(board.index(Position::new(0, 0)), Some(0));
        assert_eq!(board.index(Position::new(0, 5)), Some(5));
        assert_eq!(board.index(Position::new(1, 0)), Some(6));
        assert_eq!(board.index(Position::new(3, 5)), Some(23));
        assert_eq!(board.index(Position::new(4, 0)), None);
        assert_eq!(board.index(Position::new(0, 6)), None);
    }

    #[test]
    fn get_set_and_bounds() {
        let mut board = Board::new(3, 3);

        board.set(Position::new(0, 0), Some(Color::Red)).unwrap();
        board.set(Position::new(2, 1), Some(Color::Blue)).unwrap();

        assert_eq!(board.get(Position::new(0, 0)), Ok(Some(Color::Red)));
        assert_eq!(board.get(Position::new(2, 1)), Ok(Some(Color::Blue)));
        assert_eq!(board.get(Position::new(1, 1)), Ok(None));

        let off = Position::new(3, 0);
        assert_eq!(board.get(off), Err(OutOfBounds(off)));
        assert_eq!(board.set(off, None), Err(OutOfBounds(off)));
    }

    #[test]
    fn swap_exchanges_contents_only() {
        let mut board = Board::new(2, 2);
        let a = Position::new(0, 0);
        let b = Position::new(1, 1);
        board.set(a, Some(Color::Green)).unwrap();

        board.swap(a, b).unwrap();

        assert_eq!(board.get(a), Ok(None));
        assert_eq!(board.get(b), Ok(Some(Color::Green)));
        assert!(board.swap(a, Position::new(2, 2)).is_err());
    }

    #[test]
    fn neighbors_respect_edges() {
        let board = Board::new(3, 3);

        let corner = board.neighbors4(Position::new(0, 0)).unwrap();
        assert_eq!(corner.len(), 2);
        assert!(corner.contains(&Position::new(1, 0)));
        assert!(corner.contains(&Position::new(0, 1)));

        let center = board.neighbors4(Position::new(1, 1)).unwrap();
        assert_eq!(center.len(), 4);

        assert!(board.neighbors4(Position::new(5, 5)).is_err());
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        let board = Board::new(1, 1);
        assert!(board.neighbors4(Position::new(0, 0)).unwrap().is_empty());
    }

    #[test]
    fn from_rows_roundtrip() {
        let rows = vec![
            vec![Some(Color::Red), Some(Color::Blue)],
            vec![None, Some(Color::Green)],
        ];
        let board = Board::from_rows(rows.clone());

        assert_eq!(board.width(), 2);
        assert_eq!(board.height(), 2);
        assert_eq!(board.get(Position::new(1, 1)), Ok(Some(Color::Green)));
        assert_eq!(board.to_rows(), rows);
        assert_eq!(board.occupied_count(), 3);
        assert!(!board.is_fully_occupied());
    }

    #[test]
    fn column_slice_is_bottom_to_top() {
        let board = Board::from_rows(vec![
            vec![Some(Color::Red), Some(Color::Green)],
            vec![Some(Color::Blue), Some(Color::Yellow)],
        ]);
        assert_eq!(board.column(0), &[Some(Color::Red), Some(Color::Blue)]);
        assert_eq!(board.column(1), &[Some(Color::Green), Some(Color::Yellow)]);
    }
}
