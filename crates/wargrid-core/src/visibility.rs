//! Fog of war: per-country tile visibility.
//!
//! Visibility is recomputed from scratch at the end of every turn and
//! stamped onto the tiles; serialization filters each country's view
//! through it.

use crate::constants::{SATELLITE_SIGHTING_RANGE, TOWER_SIGHTING_RANGE};
use crate::coords::Coord;
use crate::game::Game;
use crate::piece::PieceKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How much of a tile a country can see.
///
/// Levels are ordered from blind to omniscient, so `max` picks the
/// stronger of two sightings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityLevel {
    /// No sight: only the tile's owner is known, no pieces, no money.
    #[default]
    None,
    /// Satellite sighting. Currently never granted to a tile; reserved
    /// for aerial reconnaissance.
    Satellite,
    /// Money and piece presence, but foreign covert pieces stay hidden.
    Partial,
    /// Everything on the tile, covert pieces included.
    Full,
}

/// Recompute every tile's per-country visibility map from piece positions
/// and tile ownership.
pub(crate) fn recompute(game: &mut Game) {
    let mut sighted: BTreeMap<String, BTreeSet<Coord>> = BTreeMap::new();
    let mut satellite_sighted: BTreeMap<String, BTreeSet<Coord>> = BTreeMap::new();
    let mut spy_tiles: BTreeMap<String, BTreeSet<Coord>> = BTreeMap::new();

    for piece in game.pieces() {
        match piece.kind {
            PieceKind::Satellite => {
                satellite_sighted
                    .entry(piece.country.clone())
                    .or_default()
                    .extend(game.neighbors(piece.position, SATELLITE_SIGHTING_RANGE));
            }
            PieceKind::Tower => {
                sighted
                    .entry(piece.country.clone())
                    .or_default()
                    .extend(game.neighbors(piece.position, TOWER_SIGHTING_RANGE));
            }
            PieceKind::Spy => {
                spy_tiles
                    .entry(piece.country.clone())
                    .or_default()
                    .insert(piece.position);
                sighted
                    .entry(piece.country.clone())
                    .or_default()
                    .extend(game.neighbors(piece.position, 1));
            }
            _ => {
                sighted
                    .entry(piece.country.clone())
                    .or_default()
                    .extend(game.neighbors(piece.position, 1));
            }
        }
    }
    // TODO: grant VisibilityLevel::Satellite for tiles in satellite_sighted
    // that have no stronger sighting, and extend the view filter to show
    // piece presence without identity at that level.

    let names: Vec<String> = game.countries().map(|c| c.name.clone()).collect();
    let coords: Vec<Coord> = game.tiles().map(|t| t.coord).collect();
    for coord in coords {
        let owner = game
            .tile(coord)
            .expect("recompute iterates grid coords")
            .owner
            .clone();
        let mut levels: HashMap<String, VisibilityLevel> = HashMap::new();
        for name in &names {
            let has_spy = spy_tiles.get(name).is_some_and(|s| s.contains(&coord));
            let level = if has_spy {
                VisibilityLevel::Full
            } else if owner.as_deref() == Some(name.as_str())
                || sighted.get(name).is_some_and(|s| s.contains(&coord))
            {
                VisibilityLevel::Partial
            } else {
                VisibilityLevel::None
            };
            if level != VisibilityLevel::None {
                levels.insert(name.clone(), level);
            }
        }
        game.tile_mut(coord)
            .expect("recompute iterates grid coords")
            .visibility = levels;
    }
}
