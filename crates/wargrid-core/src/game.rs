//! Game state: the entity arena and the per-turn resolution pipeline.
//!
//! [`Game`] owns every tile, country and piece, and is the only place the
//! mutual back-references between them (tile ↔ country, tile ↔ piece,
//! country ↔ piece) are mutated, so they can never drift apart. External
//! callers change the game exclusively through commands handed to
//! [`Game::apply_turn`] and the documented setup/serialization entry points.

use crate::battle;
use crate::command::{Command, CommandError};
use crate::constants::*;
use crate::coords::Coord;
use crate::country::Country;
use crate::piece::{Piece, PieceId, PieceKind};
use crate::rng::SeededRng;
use crate::tile::Tile;
use crate::visibility;
use std::collections::{BTreeMap, BTreeSet};

/// Errors from game setup and state loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate outside the grid.
    OutOfBounds(Coord),
    /// No country with that name exists.
    UnknownCountry(String),
    /// A country with that name already exists.
    DuplicateCountry(String),
    /// No piece with that id exists.
    UnknownPiece(PieceId),
    /// A serialized game state that does not describe a valid game.
    Malformed(String),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::OutOfBounds(coord) => write!(f, "Coordinate {} is outside the map", coord),
            GameError::UnknownCountry(name) => write!(f, "Unknown country {:?}", name),
            GameError::DuplicateCountry(name) => write!(f, "Country {:?} already exists", name),
            GameError::UnknownPiece(id) => write!(f, "Unknown piece {}", id),
            GameError::Malformed(reason) => write!(f, "Malformed game state: {}", reason),
        }
    }
}

impl std::error::Error for GameError {}

/// The complete game state.
#[derive(Clone, Debug)]
pub struct Game {
    width: u32,
    height: u32,
    /// Column-major tile storage: index = x * height + y.
    tiles: Vec<Tile>,
    countries: BTreeMap<String, Country>,
    /// Canonical piece registry; every piece reachable from a tile or a
    /// country is present here and vice versa.
    pieces: BTreeMap<PieceId, Piece>,
    /// Tiles with queued attackers, in attack order per tile.
    pub(crate) pending_attacks: BTreeMap<Coord, Vec<PieceId>>,
    next_piece_id: PieceId,
    turn: u32,
}

impl Game {
    /// Create a new game with an empty, unowned grid. Dimensions are fixed
    /// for the lifetime of the game.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Grid dimensions must be positive");
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                tiles.push(Tile::new(Coord::new(x, y)));
            }
        }
        Self {
            width,
            height,
            tiles,
            countries: BTreeMap::new(),
            pieces: BTreeMap::new(),
            pending_attacks: BTreeMap::new(),
            next_piece_id: 1,
            turn: 0,
        }
    }

    /// Map width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Completed turn count.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    fn index(&self, coord: Coord) -> usize {
        coord.x as usize * self.height as usize + coord.y as usize
    }

    /// Check if a coordinate is on the grid.
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.in_bounds(self.width, self.height)
    }

    /// Get the tile at the given coordinate.
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        if self.in_bounds(coord) {
            Some(&self.tiles[self.index(coord)])
        } else {
            None
        }
    }

    pub(crate) fn tile_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        if self.in_bounds(coord) {
            let idx = self.index(coord);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Iterate over all tiles in column-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Get a country by name.
    pub fn country(&self, name: &str) -> Option<&Country> {
        self.countries.get(name)
    }

    /// Iterate over all countries in name order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }

    /// Get a piece by id.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// Iterate over all pieces in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// All grid coordinates within `dist` (Manhattan) of `coord`, clipped to
    /// the grid. Includes `coord` itself.
    pub fn neighbors(&self, coord: Coord, dist: u32) -> Vec<Coord> {
        let d = dist as i32;
        let mut result = Vec::new();
        for x in (coord.x - d).max(0)..=(coord.x + d).min(self.width as i32 - 1) {
            for y in (coord.y - d).max(0)..=(coord.y + d).min(self.height as i32 - 1) {
                let candidate = Coord::new(x, y);
                if coord.distance(&candidate) <= dist {
                    result.push(candidate);
                }
            }
        }
        result
    }

    // ---------------------------------------------------------------------
    // Setup entry points
    // ---------------------------------------------------------------------

    /// Register a new country.
    pub fn add_country(&mut self, name: &str) -> Result<(), GameError> {
        if self.countries.contains_key(name) {
            return Err(GameError::DuplicateCountry(name.to_string()));
        }
        self.countries.insert(name.to_string(), Country::new(name));
        Ok(())
    }

    /// Assign a tile to a country (or clear its owner). Keeps the previous
    /// owner's tile set consistent.
    pub fn set_tile_owner(&mut self, coord: Coord, owner: Option<&str>) -> Result<(), GameError> {
        if !self.in_bounds(coord) {
            return Err(GameError::OutOfBounds(coord));
        }
        if let Some(name) = owner {
            if !self.countries.contains_key(name) {
                return Err(GameError::UnknownCountry(name.to_string()));
            }
        }
        let idx = self.index(coord);
        if let Some(old) = self.tiles[idx].owner.take() {
            if let Some(country) = self.countries.get_mut(&old) {
                country.tiles.remove(&coord);
            }
        }
        if let Some(name) = owner {
            self.tiles[idx].owner = Some(name.to_string());
            self.countries
                .get_mut(name)
                .expect("owner checked above")
                .tiles
                .insert(coord);
        }
        Ok(())
    }

    /// Put money on a tile.
    pub fn set_tile_money(&mut self, coord: Coord, money: i64) -> Result<(), GameError> {
        assert!(money >= 0, "Tile money must be non-negative");
        self.tile_mut(coord)
            .ok_or(GameError::OutOfBounds(coord))?
            .money = money;
        Ok(())
    }

    /// Create a new piece and register it with its tile and country.
    pub fn spawn_piece(
        &mut self,
        kind: PieceKind,
        country: &str,
        coord: Coord,
    ) -> Result<PieceId, GameError> {
        if !self.in_bounds(coord) {
            return Err(GameError::OutOfBounds(coord));
        }
        if !self.countries.contains_key(country) {
            return Err(GameError::UnknownCountry(country.to_string()));
        }
        let id = self.next_piece_id;
        self.next_piece_id += 1;
        self.insert_piece(Piece::new(id, kind, country.to_string(), coord));
        Ok(id)
    }

    /// Register a fully built piece. Used by spawning and state loading;
    /// the caller guarantees country and coordinate are valid.
    pub(crate) fn insert_piece(&mut self, piece: Piece) {
        let idx = self.index(piece.position);
        self.tiles[idx].pieces.insert(piece.id);
        self.countries
            .get_mut(&piece.country)
            .expect("piece country must exist")
            .pieces
            .insert(piece.id);
        self.next_piece_id = self.next_piece_id.max(piece.id + 1);
        self.pieces.insert(piece.id, piece);
    }

    // ---------------------------------------------------------------------
    // Piece operations (the command layer dispatches to these)
    // ---------------------------------------------------------------------

    fn piece_checked(&self, id: PieceId) -> Result<&Piece, CommandError> {
        self.pieces.get(&id).ok_or(CommandError::UnknownPiece(id))
    }

    /// Move a piece to a destination tile. Fails if the destination is off
    /// the grid or farther than the piece's current maximum speed; both
    /// sides of the tile back-reference are updated atomically.
    pub fn move_piece(&mut self, id: PieceId, dest: Coord) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if !self.in_bounds(dest) {
            return Err(CommandError::OutOfBounds(dest));
        }
        if piece.position.distance(&dest) > piece.max_speed {
            return Err(CommandError::InvalidMove { piece: id, to: dest });
        }
        let from = piece.position;
        let from_idx = self.index(from);
        let dest_idx = self.index(dest);
        self.tiles[from_idx].pieces.remove(&id);
        self.tiles[dest_idx].pieces.insert(id);
        self.pieces.get_mut(&id).expect("checked above").position = dest;
        Ok(())
    }

    /// Queue a melee attack on the piece's own tile.
    pub fn melee_attack(&mut self, id: PieceId) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if !piece.kind.melee_capable() {
            return Err(CommandError::UnsupportedCommand(id));
        }
        if piece.is_attacking {
            return Err(CommandError::AlreadyAttacking(id));
        }
        if piece.kind.is_flying() && !piece.in_air {
            return Err(CommandError::Grounded(id));
        }
        let tile = piece.position;
        self.enqueue_attack(tile, id);
        Ok(())
    }

    /// Queue a remote attack on a destination tile within the piece's
    /// attack range.
    pub fn remote_attack(&mut self, id: PieceId, dest: Coord) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        let range = piece
            .kind
            .attack_range()
            .ok_or(CommandError::UnsupportedCommand(id))?;
        if piece.is_attacking {
            return Err(CommandError::AlreadyAttacking(id));
        }
        if piece.kind.is_flying() && !piece.in_air {
            return Err(CommandError::Grounded(id));
        }
        if !self.in_bounds(dest) {
            return Err(CommandError::OutOfBounds(dest));
        }
        if piece.position.distance(&dest) > range {
            return Err(CommandError::OutOfRange { piece: id, to: dest });
        }
        self.enqueue_attack(dest, id);
        Ok(())
    }

    fn enqueue_attack(&mut self, tile: Coord, id: PieceId) {
        self.pending_attacks.entry(tile).or_default().push(id);
        self.pieces.get_mut(&id).expect("attacker exists").is_attacking = true;
    }

    /// Send a flying piece into the air. No-op while already airborne.
    pub fn take_off(&mut self, id: PieceId) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if !piece.kind.is_flying() {
            return Err(CommandError::UnsupportedCommand(id));
        }
        self.pieces.get_mut(&id).expect("checked above").take_off();
        Ok(())
    }

    /// Land a flying piece. No-op while already grounded.
    pub fn land(&mut self, id: PieceId) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if !piece.kind.is_flying() {
            return Err(CommandError::UnsupportedCommand(id));
        }
        self.land_piece(id);
        Ok(())
    }

    /// Ground an airborne piece. Landing on a tile owned by a different
    /// country hands the piece over to that country.
    pub(crate) fn land_piece(&mut self, id: PieceId) {
        let piece = self.pieces.get(&id).expect("landing piece exists");
        if !piece.in_air {
            return;
        }
        let tile_owner = self.tiles[self.index(piece.position)].owner.clone();
        if let Some(owner) = tile_owner {
            if owner != piece.country {
                self.set_piece_country(id, &owner);
            }
        }
        self.pieces.get_mut(&id).expect("landing piece exists").ground();
    }

    /// Toggle iron dome protection.
    pub fn set_protection(&mut self, id: PieceId, active: bool) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if piece.kind != PieceKind::IronDome {
            return Err(CommandError::UnsupportedCommand(id));
        }
        let piece = self.pieces.get_mut(&id).expect("checked above");
        if active {
            piece.protection_on();
        } else {
            piece.protection_off();
        }
        Ok(())
    }

    /// Builder collects money from its own country's tile.
    pub fn collect_money(&mut self, id: PieceId, amount: i64) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if piece.kind != PieceKind::Builder {
            return Err(CommandError::UnsupportedCommand(id));
        }
        if amount < 0 {
            return Err(CommandError::NegativeAmount(amount));
        }
        if amount > BUILDER_MAX_COLLECTION_IN_TURN {
            return Err(CommandError::CollectionCapExceeded(amount));
        }
        let tile = &self.tiles[self.index(piece.position)];
        if tile.owner.as_deref() != Some(piece.country.as_str()) {
            return Err(CommandError::ForeignTile(id));
        }
        if tile.money < amount {
            return Err(CommandError::InsufficientTileMoney(amount));
        }
        if piece.money + amount > BUILDER_MAX_MONEY {
            return Err(CommandError::BuilderCapExceeded(amount));
        }
        let idx = self.index(piece.position);
        self.tiles[idx].money -= amount;
        self.pieces.get_mut(&id).expect("checked above").money += amount;
        Ok(())
    }

    /// Builder drops money onto its tile.
    pub fn throw_money(&mut self, id: PieceId, amount: i64) -> Result<(), CommandError> {
        let piece = self.piece_checked(id)?;
        if piece.kind != PieceKind::Builder {
            return Err(CommandError::UnsupportedCommand(id));
        }
        if amount < 0 {
            return Err(CommandError::NegativeAmount(amount));
        }
        if piece.money < amount {
            return Err(CommandError::InsufficientFunds(amount));
        }
        let idx = self.index(piece.position);
        self.pieces.get_mut(&id).expect("checked above").money -= amount;
        self.tiles[idx].money += amount;
        Ok(())
    }

    /// Builder constructs a new piece on its own tile for its own country.
    pub fn build_piece(&mut self, id: PieceId, kind: PieceKind) -> Result<PieceId, CommandError> {
        let piece = self.piece_checked(id)?;
        if piece.kind != PieceKind::Builder {
            return Err(CommandError::UnsupportedCommand(id));
        }
        let price = kind.stats().price;
        if piece.money < price {
            return Err(CommandError::InsufficientFunds(price));
        }
        let country = piece.country.clone();
        let position = piece.position;
        self.pieces.get_mut(&id).expect("checked above").money -= price;
        let new_id = self.next_piece_id;
        self.next_piece_id += 1;
        self.insert_piece(Piece::new(new_id, kind, country, position));
        Ok(new_id)
    }

    /// Re-assign a piece to a new country, updating both countries' sets.
    pub(crate) fn set_piece_country(&mut self, id: PieceId, country: &str) {
        let piece = self.pieces.get_mut(&id).expect("piece exists");
        let old = std::mem::replace(&mut piece.country, country.to_string());
        self.countries
            .get_mut(&old)
            .expect("old country exists")
            .pieces
            .remove(&id);
        self.countries
            .get_mut(country)
            .expect("new country exists")
            .pieces
            .insert(id);
    }

    /// Destroy a piece: removed from the registry, its tile and its
    /// country. Final.
    pub(crate) fn kill_piece(&mut self, id: PieceId) {
        let Some(piece) = self.pieces.remove(&id) else {
            return;
        };
        let idx = self.index(piece.position);
        self.tiles[idx].pieces.remove(&id);
        self.countries
            .get_mut(&piece.country)
            .expect("piece country exists")
            .pieces
            .remove(&id);
    }

    // ---------------------------------------------------------------------
    // Turn resolution
    // ---------------------------------------------------------------------

    /// Apply one full turn: each country's ordered command batch, then
    /// battle resolution, per-piece end-of-turn ticks, visibility
    /// recomputation, and the turn counter.
    ///
    /// A failing command aborts the remainder of its own country's batch
    /// only; the failure is logged and other countries are unaffected.
    /// Countries are processed in name order, and with a fixed `rng` seed
    /// the whole turn is reproducible.
    pub fn apply_turn(&mut self, orders: &BTreeMap<String, Vec<Command>>, rng: &mut SeededRng) {
        let mut commanded: BTreeSet<PieceId> = BTreeSet::new();
        for (country, batch) in orders {
            if !self.countries.contains_key(country) {
                tracing::warn!(country = %country, "Orders from unknown country, skipping batch");
                continue;
            }
            if let Err(err) = self.apply_batch(country, batch, &mut commanded) {
                tracing::warn!(
                    country = %country,
                    error = %err,
                    protocol_violation = err.is_protocol_violation(),
                    "Command failed, skipping rest of batch"
                );
            }
        }
        battle::resolve_pending(self, rng);
        self.end_of_turn_ticks();
        visibility::recompute(self);
        self.turn += 1;
    }

    fn apply_batch(
        &mut self,
        country: &str,
        batch: &[Command],
        commanded: &mut BTreeSet<PieceId>,
    ) -> Result<(), CommandError> {
        for command in batch {
            let id = command.piece_id();
            if !commanded.insert(id) {
                return Err(CommandError::DuplicateCommand(id));
            }
            let piece = self.piece_checked(id)?;
            if piece.country != country {
                return Err(CommandError::ForeignPiece(id));
            }
            command.apply(self)?;
        }
        Ok(())
    }

    fn end_of_turn_ticks(&mut self) {
        let ids: Vec<PieceId> = self.pieces.keys().copied().collect();
        for id in ids {
            let forced_landing = match self.pieces.get_mut(&id) {
                Some(piece) => piece.end_turn(),
                None => continue,
            };
            if forced_landing {
                self.land_piece(id);
            }
        }
    }

    /// Internal consistency check: every piece referenced by a tile or a
    /// country is in the registry and vice versa. Used by tests; a failure
    /// is an engine bug.
    #[doc(hidden)]
    pub fn assert_consistent(&self) {
        for piece in self.pieces.values() {
            let tile = self.tile(piece.position).expect("piece tile in bounds");
            assert!(tile.pieces.contains(&piece.id), "tile missing piece");
            let country = self.countries.get(&piece.country).expect("piece country");
            assert!(country.pieces.contains(&piece.id), "country missing piece");
        }
        for tile in &self.tiles {
            for id in &tile.pieces {
                let piece = self.pieces.get(id).expect("registry missing tile piece");
                assert_eq!(piece.position, tile.coord, "piece position mismatch");
            }
            if let Some(owner) = &tile.owner {
                let country = self.countries.get(owner).expect("tile owner exists");
                assert!(country.tiles.contains(&tile.coord), "owner missing tile");
            }
        }
        for country in self.countries.values() {
            for coord in &country.tiles {
                let tile = self.tile(*coord).expect("country tile in bounds");
                assert_eq!(tile.owner.as_deref(), Some(country.name.as_str()));
            }
            for id in &country.pieces {
                let piece = self.pieces.get(id).expect("registry missing country piece");
                assert_eq!(piece.country, country.name);
            }
        }
    }
}
