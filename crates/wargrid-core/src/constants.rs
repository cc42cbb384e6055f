//! Game balance constants: piece speeds, prices, ranges and caps.

/// Tank movement range per turn.
pub const TANK_SPEED: u32 = 1;
/// Tank build price.
pub const TANK_PRICE: i64 = 8;

/// Airplane movement range per turn while airborne.
pub const AIRPLANE_SPEED: u32 = 8;
/// Airplane build price.
pub const AIRPLANE_PRICE: i64 = 20;
/// Turns an airplane may stay airborne before being forced down.
pub const AIRPLANE_MAX_TIME_IN_AIR: u32 = 4;

/// Helicopter movement range per turn while airborne.
pub const HELICOPTER_SPEED: u32 = 5;
/// Helicopter build price.
pub const HELICOPTER_PRICE: i64 = 16;
/// Turns a helicopter may stay airborne before being forced down.
pub const HELICOPTER_MAX_TIME_IN_AIR: u32 = 6;
/// Maximum distance of a helicopter remote attack.
pub const HELICOPTER_ATTACK_RANGE: u32 = 2;

/// Artillery movement range per turn.
pub const ARTILLERY_SPEED: u32 = 1;
/// Artillery build price.
pub const ARTILLERY_PRICE: i64 = 8;
/// Maximum distance of an artillery remote attack.
pub const ARTILLERY_ATTACK_RANGE: u32 = 3;
/// Artillery defends tiles up to this distance away (excluding its own).
pub const ARTILLERY_DEFEND_RANGE: u32 = 2;

/// Antitank movement range per turn.
pub const ANTITANK_SPEED: u32 = 1;
/// Antitank build price.
pub const ANTITANK_PRICE: i64 = 10;

/// Iron dome movement range per turn while not defending.
pub const IRONDOME_SPEED: u32 = 1;
/// Iron dome build price.
pub const IRONDOME_PRICE: i64 = 32;
/// Iron dome defends tiles up to this distance away while active.
pub const IRONDOME_DEFEND_RANGE: u32 = 4;

/// Bunker build price.
pub const BUNKER_PRICE: i64 = 10;
/// Hits a bunker absorbs in one turn; it also counts as this many
/// defender slots in battle.
pub const BUNKER_DEFEND_MULTIPLIER: u32 = 4;

/// Spy movement range per turn.
pub const SPY_SPEED: u32 = 3;
/// Spy build price.
pub const SPY_PRICE: i64 = 20;

/// Tower build price.
pub const TOWER_PRICE: i64 = 16;
/// Towers grant partial sight of tiles up to this distance away.
pub const TOWER_SIGHTING_RANGE: u32 = 3;

/// Satellite movement range per turn.
pub const SATELLITE_SPEED: u32 = 1;
/// Satellite build price.
pub const SATELLITE_PRICE: i64 = 64;
/// Satellites sight tiles up to this distance away.
pub const SATELLITE_SIGHTING_RANGE: u32 = 6;

/// Builder movement range per turn.
pub const BUILDER_SPEED: u32 = 1;
/// Builder build price.
pub const BUILDER_PRICE: i64 = 20;
/// Maximum money a builder can carry.
pub const BUILDER_MAX_MONEY: i64 = 1000;
/// Maximum money a builder can collect from its tile in one turn.
pub const BUILDER_MAX_COLLECTION_IN_TURN: i64 = 5;

/// Radius scanned for defenders of an attacked tile. Must cover every
/// kind-specific defend range.
pub const MAX_DEFENDER_RANGE: u32 = 4;
