//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the whole simulation: the grid, match detection,
//! board transforms, and chained resolution. It has **zero dependencies**
//! on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: the same seed and command sequence produce identical
//!   boards and step logs (for replay and for driving tests)
//! - **Testable**: every rule is exercised by unit tests
//! - **Portable**: runs anywhere (headless, server, embedded in a renderer)
//!
//! # Module Structure
//!
//! - [`board`]: the W×H grid with bounds-checked cell access
//! - [`detector`]: flood-fill match grouping and straight-run validation
//! - [`transform`]: 90° board rotation and column-stack reversal
//! - [`resolver`]: the clear → compact → refill chain loop
//! - [`rng`]: seedable LCG color source
//! - [`snapshot`]: read-only board snapshot for render handoff
//!
//! # Rules
//!
//! - A connected monochrome region qualifies only through a straight run:
//!   some column or row of the region must hold at least `min_match_len`
//!   of its members. Qualifying members are cleared; the rest stay.
//! - Gravity pulls toward row 0. Every hole created by a clear is filled by
//!   compaction from above plus fresh spawns at the top, then detection runs
//!   again, until the board reaches a fixed point with no matches.

pub mod board;
pub mod detector;
pub mod resolver;
pub mod rng;
pub mod snapshot;
pub mod transform;

pub use gridspin_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, OutOfBounds};
pub use detector::{Match, MatchDetector};
pub use resolver::{ChainResolver, ChainSummary};
pub use rng::{ColorPicker, PaletteSource, SimpleRng};
pub use snapshot::BoardSnapshot;
pub use transform::{reverse_column_stack, rotate_core};
