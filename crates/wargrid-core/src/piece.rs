//! Piece system - the units countries move and fight with.

use crate::constants::*;
use crate::coords::Coord;
use serde::{Deserialize, Serialize};

/// Unique identifier for a piece.
pub type PieceId = u64;

/// A piece on the game map.
///
/// All kinds share one flat struct; kind-specific state (`in_air`,
/// `is_defending`, `hits_this_turn`, `money`) is only meaningful for the
/// kinds that use it and stays at its default for everything else.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Piece {
    /// Unique identifier.
    pub id: PieceId,
    /// Kind of piece.
    pub kind: PieceKind,
    /// Name of the owning country.
    pub country: String,
    /// Current position on the map.
    pub position: Coord,
    /// Current maximum movement distance. Zero while a flying piece is
    /// grounded or an iron dome is defending.
    pub max_speed: u32,
    /// Has the piece already queued an attack this turn?
    pub is_attacking: bool,
    /// Is the piece airborne? (flying kinds only)
    pub in_air: bool,
    /// Turns spent airborne; `None` while grounded.
    pub time_in_air: Option<u32>,
    /// Is protection active? (iron dome only)
    pub is_defending: bool,
    /// Hits absorbed so far this turn (bunker only, reset every turn).
    pub hits_this_turn: u32,
    /// Money carried (builder only).
    pub money: i64,
}

impl Piece {
    /// Create a new piece of the given kind.
    pub fn new(id: PieceId, kind: PieceKind, country: String, position: Coord) -> Self {
        // Flying pieces start grounded and cannot move until they take off.
        let max_speed = if kind.is_flying() { 0 } else { kind.stats().speed };
        Self {
            id,
            kind,
            country,
            position,
            max_speed,
            is_attacking: false,
            in_air: false,
            time_in_air: None,
            is_defending: false,
            hits_this_turn: 0,
            money: 0,
        }
    }

    /// The kind's nominal speed, ignoring grounded/defending modifiers.
    pub fn nominal_speed(&self) -> u32 {
        self.kind.stats().speed
    }

    /// Transition a flying piece to the airborne state. No-op while already
    /// airborne.
    pub fn take_off(&mut self) {
        self.in_air = true;
        self.time_in_air = Some(self.time_in_air.unwrap_or(0));
        self.max_speed = self.nominal_speed();
    }

    /// Transition a flying piece to the grounded state. Country transfer on
    /// landing is handled by the game, which owns the tile.
    pub fn ground(&mut self) {
        self.in_air = false;
        self.time_in_air = None;
        self.max_speed = 0;
    }

    /// Activate iron dome protection. Defending and moving are mutually
    /// exclusive.
    pub fn protection_on(&mut self) {
        self.is_defending = true;
        self.max_speed = 0;
    }

    /// Deactivate iron dome protection.
    pub fn protection_off(&mut self) {
        self.is_defending = false;
        self.max_speed = self.nominal_speed();
    }

    /// Per-turn cleanup tick. Returns `true` if the piece exceeded its
    /// airborne limit and must be forced to land.
    pub fn end_turn(&mut self) -> bool {
        self.is_attacking = false;
        self.hits_this_turn = 0;
        if self.in_air {
            let time = self.time_in_air.map_or(0, |t| t + 1);
            self.time_in_air = Some(time);
            if let Some(cap) = self.kind.max_time_in_air() {
                return time > cap;
            }
        }
        false
    }

    /// Check whether this piece defends the given tile this turn.
    pub fn can_defend(&self, tile: Coord) -> bool {
        let dist = self.position.distance(&tile);
        match self.kind {
            PieceKind::Tank => tile == self.position && !self.is_attacking,
            PieceKind::Artillery => {
                dist <= ARTILLERY_DEFEND_RANGE && tile != self.position && !self.is_attacking
            }
            PieceKind::Antitank | PieceKind::Bunker => tile == self.position,
            PieceKind::IronDome => self.is_defending && dist <= IRONDOME_DEFEND_RANGE,
            _ => false,
        }
    }
}

/// Kinds of pieces available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Tank,
    Airplane,
    Helicopter,
    Artillery,
    Antitank,
    IronDome,
    Bunker,
    Spy,
    Tower,
    Satellite,
    Builder,
}

impl PieceKind {
    /// Get the stats for this piece kind.
    pub const fn stats(&self) -> PieceStats {
        match self {
            PieceKind::Tank => PieceStats::new(TANK_SPEED, TANK_PRICE),
            PieceKind::Airplane => PieceStats::new(AIRPLANE_SPEED, AIRPLANE_PRICE),
            PieceKind::Helicopter => PieceStats::new(HELICOPTER_SPEED, HELICOPTER_PRICE),
            PieceKind::Artillery => PieceStats::new(ARTILLERY_SPEED, ARTILLERY_PRICE),
            PieceKind::Antitank => PieceStats::new(ANTITANK_SPEED, ANTITANK_PRICE),
            PieceKind::IronDome => PieceStats::new(IRONDOME_SPEED, IRONDOME_PRICE),
            PieceKind::Bunker => PieceStats::new(0, BUNKER_PRICE),
            PieceKind::Spy => PieceStats::new(SPY_SPEED, SPY_PRICE),
            PieceKind::Tower => PieceStats::new(0, TOWER_PRICE),
            PieceKind::Satellite => PieceStats::new(SATELLITE_SPEED, SATELLITE_PRICE),
            PieceKind::Builder => PieceStats::new(BUILDER_SPEED, BUILDER_PRICE),
        }
    }

    /// Check if this kind flies (take off / land state machine).
    pub const fn is_flying(&self) -> bool {
        matches!(self, PieceKind::Airplane | PieceKind::Helicopter)
    }

    /// Turns this kind may stay airborne, if it flies.
    pub const fn max_time_in_air(&self) -> Option<u32> {
        match self {
            PieceKind::Airplane => Some(AIRPLANE_MAX_TIME_IN_AIR),
            PieceKind::Helicopter => Some(HELICOPTER_MAX_TIME_IN_AIR),
            _ => None,
        }
    }

    /// Maximum distance of a remote attack, if this kind has one.
    pub const fn attack_range(&self) -> Option<u32> {
        match self {
            PieceKind::Artillery => Some(ARTILLERY_ATTACK_RANGE),
            PieceKind::Helicopter => Some(HELICOPTER_ATTACK_RANGE),
            _ => None,
        }
    }

    /// Check if this kind can queue a melee attack on its own tile.
    pub const fn melee_capable(&self) -> bool {
        matches!(self, PieceKind::Tank | PieceKind::Airplane)
    }

    /// Check if this kind takes part in battles at all. Spies, satellites
    /// and builders never fight and are never killed by a battle.
    pub const fn fights_in_battles(&self) -> bool {
        !matches!(
            self,
            PieceKind::Spy | PieceKind::Satellite | PieceKind::Builder
        )
    }

    /// Get all piece kind variants.
    pub const fn all() -> &'static [PieceKind] {
        &[
            PieceKind::Tank,
            PieceKind::Airplane,
            PieceKind::Helicopter,
            PieceKind::Artillery,
            PieceKind::Antitank,
            PieceKind::IronDome,
            PieceKind::Bunker,
            PieceKind::Spy,
            PieceKind::Tower,
            PieceKind::Satellite,
            PieceKind::Builder,
        ]
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Tank => "tank",
            PieceKind::Airplane => "airplane",
            PieceKind::Helicopter => "helicopter",
            PieceKind::Artillery => "artillery",
            PieceKind::Antitank => "antitank",
            PieceKind::IronDome => "irondome",
            PieceKind::Bunker => "bunker",
            PieceKind::Spy => "spy",
            PieceKind::Tower => "tower",
            PieceKind::Satellite => "satellite",
            PieceKind::Builder => "builder",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for PieceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::all()
            .iter()
            .copied()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| format!("Unknown piece kind {:?}", s))
    }
}

/// Stats for a piece kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceStats {
    /// Nominal movement distance per turn.
    pub speed: u32,
    /// Build price.
    pub price: i64,
}

impl PieceStats {
    const fn new(speed: u32, price: i64) -> Self {
        Self { speed, price }
    }
}
