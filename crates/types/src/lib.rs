//! Core types shared across the workspace.
//!
//! This crate contains pure data types with no external dependencies:
//! the palette, board coordinates, configuration, and the mutation-step
//! vocabulary consumed by animation/adapter layers.

/// Board dimension limits (cells per axis).
pub const MAX_BOARD_WIDTH: u8 = 12;
pub const MAX_BOARD_HEIGHT: u8 = 12;

/// Number of distinct colors the engine can draw from.
pub const PALETTE_CAPACITY: u8 = 8;

/// Default board configuration.
pub const DEFAULT_BOARD_WIDTH: u8 = 8;
pub const DEFAULT_BOARD_HEIGHT: u8 = 8;
pub const DEFAULT_PALETTE_SIZE: u8 = 5;

/// Minimum straight-run length for a region to qualify as a match.
pub const DEFAULT_MIN_MATCH_LEN: u8 = 3;

/// Tile colors
///
/// The full palette has [`PALETTE_CAPACITY`] entries; a board configured with
/// `palette_size = k` only ever draws the first `k` variants. Colors are
/// equality-comparable identifiers with no ordering semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl Color {
    /// All palette entries, in draw-index order.
    pub const ALL: [Color; PALETTE_CAPACITY as usize] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Purple,
        Color::Pink,
    ];

    /// Palette index of this color.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridspin_types::Color;
    ///
    /// assert_eq!(Color::Red.index(), 0);
    /// assert_eq!(Color::Pink.index(), 7);
    /// ```
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Color for a palette index, `None` if the index is past the palette.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Parse a color from its lowercase name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "cyan" => Some(Color::Cyan),
            "blue" => Some(Color::Blue),
            "purple" => Some(Color::Purple),
            "pink" => Some(Color::Pink),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }
}

/// Board rotation direction, as seen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// The inverse rotation.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridspin_types::Direction;
    ///
    /// assert_eq!(Direction::Left.opposite(), Direction::Right);
    /// assert_eq!(Direction::Right.opposite(), Direction::Left);
    /// ```
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// A cell coordinate: `col` ranges `0..width` left to right, `row` ranges
/// `0..height` bottom to top. Row 0 is the gravity floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: u8,
    pub row: u8,
}

impl Position {
    pub fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

/// A cell on the board (`None` = transient hole, `Some` = occupied)
///
/// Holes only exist mid-resolution; a settled board has no `None` cells.
pub type Cell = Option<Color>;

/// One externally observable board mutation.
///
/// A command returns an ordered list of these; replaying them in order
/// reproduces the final board from the pre-command board exactly. Steps are
/// immutable once returned and are never emitted after resolution settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStep {
    /// Cells relocated by a permutation, as `(from, to)` pairs. Emitted for
    /// whole-board rotation and for column-stack reversal (the latter is
    /// animated as a 180-degree turn of the touched span, so a self-paired
    /// middle cell appears as `(p, p)`).
    Rotated(Vec<(Position, Position)>),
    /// Matched cells that became holes, all cleared simultaneously.
    Cleared(Vec<Position>),
    /// One cell falling from `from` to `to` during compaction.
    Shifted { from: Position, to: Position },
    /// A fresh cell drawn at `at` during refill.
    Spawned { at: Position, color: Color },
}

/// Board construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub palette_size: u8,
    pub min_match_len: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            palette_size: DEFAULT_PALETTE_SIZE,
            min_match_len: DEFAULT_MIN_MATCH_LEN,
        }
    }
}

impl BoardConfig {
    /// Validate all parameters. Construction must be rejected on any error;
    /// a failed validation never leaves partial state behind.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.width > MAX_BOARD_WIDTH {
            return Err(ConfigError::WidthOutOfRange(self.width));
        }
        if self.height == 0 || self.height > MAX_BOARD_HEIGHT {
            return Err(ConfigError::HeightOutOfRange(self.height));
        }
        if self.palette_size == 0 || self.palette_size > PALETTE_CAPACITY {
            return Err(ConfigError::PaletteOutOfRange(self.palette_size));
        }
        if self.min_match_len < 2 || self.min_match_len > MAX_BOARD_WIDTH.max(MAX_BOARD_HEIGHT) {
            return Err(ConfigError::MatchLenOutOfRange(self.min_match_len));
        }
        Ok(())
    }
}

/// Rejected board configuration, carrying the offending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    WidthOutOfRange(u8),
    HeightOutOfRange(u8),
    PaletteOutOfRange(u8),
    MatchLenOutOfRange(u8),
}

impl ConfigError {
    pub fn message(&self) -> &'static str {
        match self {
            ConfigError::WidthOutOfRange(_) => "board width must be in 1..=12",
            ConfigError::HeightOutOfRange(_) => "board height must be in 1..=12",
            ConfigError::PaletteOutOfRange(_) => "palette size must be in 1..=8",
            ConfigError::MatchLenOutOfRange(_) => "minimum match length must be in 2..=12",
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            ConfigError::WidthOutOfRange(v)
            | ConfigError::HeightOutOfRange(v)
            | ConfigError::PaletteOutOfRange(v)
            | ConfigError::MatchLenOutOfRange(v) => v,
        };
        write!(f, "{} (got {})", self.message(), value)
    }
}

impl std::error::Error for ConfigError {}
