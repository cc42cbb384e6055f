//! Wire-format snapshots of the game state.
//!
//! [`GameSnapshot`] is the omniscient state used for persistence and by
//! the map tool; [`CountryView`] is what a single country is shown each
//! turn, filtered through the fog of war. Field names follow the JSON
//! protocol (camelCase, piece `type`, tile `country`).

use crate::coords::Coord;
use crate::game::{Game, GameError};
use crate::piece::{Piece, PieceId, PieceKind};
use crate::visibility::VisibilityLevel;
use serde::{Deserialize, Serialize};

/// One piece on the wire. Kind-specific fields are omitted for kinds
/// that do not carry them, and `timeInAir` is omitted while grounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSnapshot {
    pub id: PieceId,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_air: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_air: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_defending: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<i64>,
}

impl PieceSnapshot {
    fn of(piece: &Piece) -> Self {
        Self {
            id: piece.id,
            kind: piece.kind,
            country: piece.country.clone(),
            in_air: piece.kind.is_flying().then_some(piece.in_air),
            time_in_air: piece.time_in_air,
            is_defending: (piece.kind == PieceKind::IronDome).then_some(piece.is_defending),
            money: (piece.kind == PieceKind::Builder).then_some(piece.money),
        }
    }
}

/// One tile on the wire. `money` is null and `pieces` empty on tiles the
/// viewing country cannot see; the owning country is always disclosed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub coordinate: Coord,
    pub money: Option<i64>,
    pub country: Option<String>,
    pub pieces: Vec<PieceSnapshot>,
}

/// The complete game state on the wire. Tiles are a 2D array indexed
/// `[x][y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub countries: Vec<String>,
    pub tiles: Vec<Vec<TileSnapshot>>,
    pub width: u32,
    pub height: u32,
}

/// One country's fogged view of the game, sent out every turn. Tiles
/// are a flat list covering the whole grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryView {
    pub tiles: Vec<TileSnapshot>,
    pub country: String,
    pub all_countries: Vec<String>,
    pub width: u32,
    pub height: u32,
}

impl Game {
    /// Omniscient snapshot of the whole game.
    pub fn snapshot(&self) -> GameSnapshot {
        let mut tiles: Vec<Vec<TileSnapshot>> = Vec::with_capacity(self.width() as usize);
        let mut column: Vec<TileSnapshot> = Vec::with_capacity(self.height() as usize);
        for tile in self.tiles() {
            column.push(TileSnapshot {
                coordinate: tile.coord,
                money: Some(tile.money),
                country: tile.owner.clone(),
                pieces: tile
                    .pieces
                    .iter()
                    .map(|id| PieceSnapshot::of(self.piece(*id).expect("tile piece in registry")))
                    .collect(),
            });
            if column.len() == self.height() as usize {
                tiles.push(std::mem::take(&mut column));
            }
        }
        GameSnapshot {
            countries: self.countries().map(|c| c.name.clone()).collect(),
            tiles,
            width: self.width(),
            height: self.height(),
        }
    }

    /// The given country's fogged view of the game.
    pub fn snapshot_for(&self, country: &str) -> CountryView {
        let tiles = self
            .tiles()
            .map(|tile| {
                let level = tile.visibility_for(country);
                if level < VisibilityLevel::Partial {
                    // The owner is public knowledge even on unseen tiles;
                    // only money and pieces are fogged.
                    return TileSnapshot {
                        coordinate: tile.coord,
                        money: None,
                        country: tile.owner.clone(),
                        pieces: Vec::new(),
                    };
                }
                let pieces = tile
                    .pieces
                    .iter()
                    .map(|id| self.piece(*id).expect("tile piece in registry"))
                    .filter(|piece| {
                        // Covert pieces of other countries only show up
                        // under full sight.
                        level == VisibilityLevel::Full
                            || piece.country == country
                            || !matches!(piece.kind, PieceKind::Spy | PieceKind::Satellite)
                    })
                    .map(PieceSnapshot::of)
                    .collect();
                TileSnapshot {
                    coordinate: tile.coord,
                    money: Some(tile.money),
                    country: tile.owner.clone(),
                    pieces,
                }
            })
            .collect();
        CountryView {
            tiles,
            country: country.to_string(),
            all_countries: self.countries().map(|c| c.name.clone()).collect(),
            width: self.width(),
            height: self.height(),
        }
    }

    /// Rebuild a game from an omniscient snapshot.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, GameError> {
        if snapshot.width == 0 || snapshot.height == 0 {
            return Err(GameError::Malformed("zero-sized grid".to_string()));
        }
        if snapshot.tiles.len() != snapshot.width as usize
            || snapshot.tiles.iter().any(|c| c.len() != snapshot.height as usize)
        {
            return Err(GameError::Malformed(
                "tile array does not match the grid dimensions".to_string(),
            ));
        }
        let mut game = Game::new(snapshot.width, snapshot.height);
        for name in &snapshot.countries {
            game.add_country(name)?;
        }
        for column in snapshot.tiles {
            for tile in column {
                let coord = tile.coordinate;
                if !game.in_bounds(coord) {
                    return Err(GameError::OutOfBounds(coord));
                }
                game.set_tile_owner(coord, tile.country.as_deref())?;
                game.set_tile_money(coord, tile.money.unwrap_or(0))?;
                for piece in tile.pieces {
                    if game.country(&piece.country).is_none() {
                        return Err(GameError::UnknownCountry(piece.country));
                    }
                    let mut rebuilt =
                        Piece::new(piece.id, piece.kind, piece.country, coord);
                    if piece.in_air == Some(true) {
                        rebuilt.take_off();
                        rebuilt.time_in_air = Some(piece.time_in_air.unwrap_or(0));
                    }
                    if piece.is_defending == Some(true) {
                        rebuilt.protection_on();
                    }
                    if let Some(money) = piece.money {
                        rebuilt.money = money;
                    }
                    game.insert_piece(rebuilt);
                }
            }
        }
        Ok(game)
    }
}
