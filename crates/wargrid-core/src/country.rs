//! Countries and their owned-entity bookkeeping.

use crate::coords::Coord;
use crate::piece::PieceId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A country taking part in the game.
///
/// The tile and piece sets mirror the back-references held by
/// [`Tile`](crate::tile::Tile) and [`Piece`](crate::piece::Piece); all mutation goes
/// through [`Game`](crate::game::Game) methods so the two sides never drift
/// apart. Countries are created at setup and never destroyed, but may end
/// up eliminated (no tiles, no pieces).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Country {
    /// Unique country name.
    pub name: String,
    /// Tiles this country owns.
    pub tiles: BTreeSet<Coord>,
    /// Pieces this country owns.
    pub pieces: BTreeSet<PieceId>,
}

impl Country {
    /// Create a new country with no holdings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiles: BTreeSet::new(),
            pieces: BTreeSet::new(),
        }
    }

    /// Check if the country has been wiped off the map.
    pub fn is_eliminated(&self) -> bool {
        self.tiles.is_empty() && self.pieces.is_empty()
    }
}
