//! Map tiles: money, ownership and the pieces standing on them.

use crate::coords::Coord;
use crate::piece::PieceId;
use crate::visibility::VisibilityLevel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A single tile on the map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    /// Position on the map, fixed at creation.
    pub coord: Coord,
    /// Money lying on the tile. Never negative.
    pub money: i64,
    /// Name of the owning country, if any. Mirrored by
    /// [`Country::tiles`](crate::country::Country::tiles).
    pub owner: Option<String>,
    /// Pieces currently located on this tile.
    pub pieces: BTreeSet<PieceId>,
    /// Per-country visibility level, recomputed at the end of every turn.
    #[serde(skip)]
    pub visibility: HashMap<String, VisibilityLevel>,
}

impl Tile {
    /// Create a new empty, unowned tile.
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            money: 0,
            owner: None,
            pieces: BTreeSet::new(),
            visibility: HashMap::new(),
        }
    }

    /// Visibility level of this tile for the given country.
    pub fn visibility_for(&self, country: &str) -> VisibilityLevel {
        self.visibility
            .get(country)
            .copied()
            .unwrap_or(VisibilityLevel::None)
    }
}
