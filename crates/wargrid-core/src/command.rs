//! Player commands and their wire format.
//!
//! Each turn a country submits an ordered batch of commands, one target
//! piece per command. Commands arrive as JSON objects tagged by `name`:
//!
//! ```json
//! {"name": "move", "pieceId": 3, "newLocation": {"x": 2, "y": 4}}
//! ```

use crate::coords::Coord;
use crate::game::Game;
use crate::piece::{PieceId, PieceKind};
use serde::{Deserialize, Serialize};

/// A single command for a single piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Move a piece up to its current maximum speed.
    Move { piece_id: PieceId, new_location: Coord },
    /// Attack the piece's own tile (tanks and airborne airplanes).
    MeleeAttack { piece_id: PieceId },
    /// Attack a tile at range (artillery and airborne helicopters).
    RemoteAttack { piece_id: PieceId, destination: Coord },
    /// Send a flying piece into the air.
    TakeOff { piece_id: PieceId },
    /// Ground a flying piece.
    Land { piece_id: PieceId },
    /// Activate iron dome protection.
    TurnOnProtection { piece_id: PieceId },
    /// Deactivate iron dome protection.
    TurnOffProtection { piece_id: PieceId },
    /// Builder collects money from its tile.
    TakeMoney { piece_id: PieceId, amount: i64 },
    /// Builder drops money onto its tile.
    ThrowMoney { piece_id: PieceId, amount: i64 },
    /// Builder constructs a new piece.
    Build { piece_id: PieceId, new_piece_type: PieceKind },
}

impl Command {
    /// The piece this command targets.
    pub fn piece_id(&self) -> PieceId {
        match *self {
            Command::Move { piece_id, .. }
            | Command::MeleeAttack { piece_id }
            | Command::RemoteAttack { piece_id, .. }
            | Command::TakeOff { piece_id }
            | Command::Land { piece_id }
            | Command::TurnOnProtection { piece_id }
            | Command::TurnOffProtection { piece_id }
            | Command::TakeMoney { piece_id, .. }
            | Command::ThrowMoney { piece_id, .. }
            | Command::Build { piece_id, .. } => piece_id,
        }
    }

    /// Execute the command against the game. Piece existence and ownership
    /// have already been checked by the batch loop.
    pub(crate) fn apply(&self, game: &mut Game) -> Result<(), CommandError> {
        match *self {
            Command::Move { piece_id, new_location } => game.move_piece(piece_id, new_location),
            Command::MeleeAttack { piece_id } => game.melee_attack(piece_id),
            Command::RemoteAttack { piece_id, destination } => {
                game.remote_attack(piece_id, destination)
            }
            Command::TakeOff { piece_id } => game.take_off(piece_id),
            Command::Land { piece_id } => game.land(piece_id),
            Command::TurnOnProtection { piece_id } => game.set_protection(piece_id, true),
            Command::TurnOffProtection { piece_id } => game.set_protection(piece_id, false),
            Command::TakeMoney { piece_id, amount } => game.collect_money(piece_id, amount),
            Command::ThrowMoney { piece_id, amount } => game.throw_money(piece_id, amount),
            Command::Build { piece_id, new_piece_type } => {
                game.build_piece(piece_id, new_piece_type).map(|_| ())
            }
        }
    }
}

/// Why a command was rejected.
///
/// Protocol violations mean the sender broke the rules of the protocol
/// (commanding a foreign piece, commanding the same piece twice, ordering
/// an action the piece's state forbids outright); the rest are requests
/// that are well formed but impossible in the current state. Either way
/// the command fails and the rest of the sender's batch is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// No piece with this id exists.
    UnknownPiece(PieceId),
    /// The piece belongs to another country.
    ForeignPiece(PieceId),
    /// The piece already received a command this turn.
    DuplicateCommand(PieceId),
    /// The piece already queued an attack this turn.
    AlreadyAttacking(PieceId),
    /// A flying piece was ordered to act while grounded.
    Grounded(PieceId),
    /// A builder tried to collect from a tile its country does not own.
    ForeignTile(PieceId),
    /// Target coordinate is off the grid.
    OutOfBounds(Coord),
    /// Destination farther than the piece's current maximum speed.
    InvalidMove { piece: PieceId, to: Coord },
    /// Attack destination farther than the piece's attack range.
    OutOfRange { piece: PieceId, to: Coord },
    /// Money amounts must be non-negative.
    NegativeAmount(i64),
    /// Collected amount exceeds the per-turn collection cap.
    CollectionCapExceeded(i64),
    /// The tile holds less money than requested.
    InsufficientTileMoney(i64),
    /// Collection would push the builder past its carrying cap.
    BuilderCapExceeded(i64),
    /// The builder does not carry enough money.
    InsufficientFunds(i64),
    /// This piece kind cannot perform the requested command.
    UnsupportedCommand(PieceId),
}

impl CommandError {
    /// Protocol violations are sender misbehavior rather than merely
    /// impossible requests; callers may want to flag them louder.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            CommandError::UnknownPiece(_)
                | CommandError::ForeignPiece(_)
                | CommandError::DuplicateCommand(_)
                | CommandError::AlreadyAttacking(_)
                | CommandError::Grounded(_)
                | CommandError::ForeignTile(_)
        )
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::UnknownPiece(id) => write!(f, "No piece with id {}", id),
            CommandError::ForeignPiece(id) => {
                write!(f, "Piece {} belongs to another country", id)
            }
            CommandError::DuplicateCommand(id) => {
                write!(f, "Piece {} was already commanded this turn", id)
            }
            CommandError::AlreadyAttacking(id) => {
                write!(f, "Piece {} already queued an attack this turn", id)
            }
            CommandError::Grounded(id) => write!(f, "Piece {} is grounded", id),
            CommandError::ForeignTile(id) => {
                write!(f, "Piece {} stands on a tile its country does not own", id)
            }
            CommandError::OutOfBounds(coord) => {
                write!(f, "Coordinate {} is outside the map", coord)
            }
            CommandError::InvalidMove { piece, to } => {
                write!(f, "Piece {} cannot reach {}", piece, to)
            }
            CommandError::OutOfRange { piece, to } => {
                write!(f, "Piece {} cannot attack {}", piece, to)
            }
            CommandError::NegativeAmount(amount) => {
                write!(f, "Amount {} is negative", amount)
            }
            CommandError::CollectionCapExceeded(amount) => {
                write!(f, "Cannot collect {} in one turn", amount)
            }
            CommandError::InsufficientTileMoney(amount) => {
                write!(f, "Tile holds less than {}", amount)
            }
            CommandError::BuilderCapExceeded(amount) => {
                write!(f, "Collecting {} would exceed the builder's cap", amount)
            }
            CommandError::InsufficientFunds(amount) => {
                write!(f, "Builder carries less than {}", amount)
            }
            CommandError::UnsupportedCommand(id) => {
                write!(f, "Piece {} cannot perform this command", id)
            }
        }
    }
}

impl std::error::Error for CommandError {}
