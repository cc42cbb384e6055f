//! Wargrid Core Library
//!
//! This crate contains the engine for a turn-based territorial war game:
//! countries command pieces on a rectangular grid, queue attacks that are
//! resolved in randomized one-on-one duels, and see the world through a
//! per-country fog of war.
//!
//! # Design Principles
//!
//! - **No I/O dependencies**: This crate is purely game logic
//! - **Deterministic**: Same state, orders and seed always produce the
//!   same turn
//! - **Serializable**: All state can be saved/loaded via serde
//! - **Thoroughly tested**: Comprehensive test coverage

// Core modules
pub mod constants;
pub mod coords;
pub mod country;
pub mod piece;
pub mod tile;

// Game state and turn resolution
pub mod command;
pub mod game;

// Battle resolution
mod battle;

// Visibility and fog of war
pub mod visibility;

// Wire formats
pub mod state;

// Seeded randomness
pub mod rng;

// Re-exports for convenience
pub use command::{Command, CommandError};
pub use coords::Coord;
pub use country::Country;
pub use game::{Game, GameError};
pub use piece::{Piece, PieceId, PieceKind, PieceStats};
pub use rng::SeededRng;
pub use state::{CountryView, GameSnapshot, PieceSnapshot, TileSnapshot};
pub use tile::Tile;
pub use visibility::VisibilityLevel;
