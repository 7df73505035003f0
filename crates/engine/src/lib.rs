//! Board engine facade - the command surface of the puzzle core
//!
//! [`BoardEngine`] owns the board exclusively and exposes the two player
//! gestures plus a read-only snapshot. Each command validates, applies its
//! transform, resolves all chains, and returns the full ordered mutation log
//! in one synchronous batch; the caller replays it at its own pace and
//! acknowledges with [`BoardEngine::command_completed`] before the next
//! command is admitted. A rejected command never mutates anything.

use gridspin_core::resolver::deal_board;
use gridspin_core::{
    reverse_column_stack, rotate_core, Board, BoardSnapshot, ChainResolver, PaletteSource,
};
use gridspin_types::{BoardConfig, ConfigError, Direction, MutationStep, Position};

/// Why a command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Position outside the board; re-validate input and retry.
    OutOfBounds,
    /// The previous command's step log has not been acknowledged yet.
    Busy,
    /// Board construction parameters are unusable; fatal until fixed.
    InvalidConfiguration(ConfigError),
}

impl EngineError {
    pub fn code(self) -> &'static str {
        match self {
            EngineError::OutOfBounds => "out_of_bounds",
            EngineError::Busy => "busy",
            EngineError::InvalidConfiguration(_) => "invalid_configuration",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EngineError::OutOfBounds => "position is off the board",
            EngineError::Busy => "previous command has not been acknowledged",
            EngineError::InvalidConfiguration(err) => err.message(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for EngineError {}

/// The puzzle engine: one exclusively owned board, command-at-a-time.
#[derive(Debug, Clone)]
pub struct BoardEngine {
    config: BoardConfig,
    board: Board,
    colors: PaletteSource,
    resolver: ChainResolver,
    busy: bool,
}

impl BoardEngine {
    /// Build an engine with a freshly dealt board.
    ///
    /// The board is filled uniformly at random and any starting matches are
    /// re-drawn in place until none remain, so play begins on a stable,
    /// fully occupied board with no step log owed to anyone.
    pub fn new(config: BoardConfig, seed: u32) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(EngineError::InvalidConfiguration)?;

        let mut board = Board::new(config.width, config.height);
        let mut colors = PaletteSource::new(seed, config.palette_size);
        let resolver = ChainResolver::new(config.min_match_len);
        deal_board(&mut board, resolver.detector(), &mut colors);

        Ok(Self {
            config,
            board,
            colors,
            resolver,
            busy: false,
        })
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// Current RNG state; restarting from it replays the same refills.
    pub fn seed(&self) -> u32 {
        self.colors.seed()
    }

    /// Whether the previous command still awaits acknowledgement.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Acknowledge that the last returned step log has been fully consumed.
    pub fn command_completed(&mut self) {
        self.busy = false;
    }

    /// Read-only snapshot of the board for rendering.
    pub fn current_state(&self) -> BoardSnapshot {
        BoardSnapshot::from(&self.board)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Rotate the board's square core 90° and resolve all resulting chains.
    ///
    /// Returns the ordered step log: the rotation permutation first, then
    /// every clear/shift/spawn until the board is stable again.
    pub fn rotate(&mut self, direction: Direction) -> Result<Vec<MutationStep>, EngineError> {
        if self.busy {
            return Err(EngineError::Busy);
        }

        let permutation = rotate_core(&mut self.board, direction);
        let mut steps = vec![MutationStep::Rotated(permutation)];
        self.resolver
            .resolve(&mut self.board, &mut self.colors, &mut steps);
        self.busy = true;
        Ok(steps)
    }

    /// Reverse the stack of cells above the tapped cell and resolve chains.
    ///
    /// The reversal is logged as a `Rotated` permutation of the touched
    /// column span (it animates as a half-turn of that span).
    pub fn tap(&mut self, pos: Position) -> Result<Vec<MutationStep>, EngineError> {
        if self.busy {
            return Err(EngineError::Busy);
        }

        let touched =
            reverse_column_stack(&mut self.board, pos).map_err(|_| EngineError::OutOfBounds)?;
        let mut steps = vec![MutationStep::Rotated(touched)];
        self.resolver
            .resolve(&mut self.board, &mut self.colors, &mut steps);
        self.busy = true;
        Ok(steps)
    }

    /// Deal a completely new board in place (no step log; the caller should
    /// re-render from [`BoardEngine::current_state`]).
    pub fn new_board(&mut self) -> Result<(), EngineError> {
        if self.busy {
            return Err(EngineError::Busy);
        }

        deal_board(
            &mut self.board,
            self.resolver.detector(),
            &mut self.colors,
        );
        Ok(())
    }

    /// True when detection finds nothing on the current board. Holds after
    /// every completed command (the fixed-point invariant).
    pub fn detector_reports_stable(&self) -> bool {
        self.resolver.detector().find_matches(&self.board).is_empty()
    }
}
