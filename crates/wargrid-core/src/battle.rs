//! Battle resolution.
//!
//! Attacks queued during the command phase are resolved tile by tile.
//! Every battle gathers its participants (the queued attackers, every
//! piece defending the tile, and the fighting pieces standing on it),
//! shuffles them, groups them by country in first-seen order and splits
//! them into one-on-one duels; each duel slot pairs position-wise across
//! the country groups, padded with empty slots when the groups are
//! uneven. Deaths are decided per duel from piece kinds and roles alone.
//!
//! A tank that attacks a tile where no other country fights at all
//! conquers it; conquest flips the tile's owner and makes the slow
//! pieces standing on it defect while covert ones are destroyed.

use crate::constants::{BUNKER_DEFEND_MULTIPLIER, MAX_DEFENDER_RANGE};
use crate::coords::Coord;
use crate::game::Game;
use crate::piece::{PieceId, PieceKind};
use crate::rng::SeededRng;
use std::collections::{BTreeSet, HashSet};

/// What a piece is doing in a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    /// Queued an attack on the battle tile.
    Attacker,
    /// Defends the battle tile this turn.
    Defender,
    /// Stands on the tile without attacking or defending.
    Passive,
}

/// Resolve every queued attack, in a random battle order.
pub(crate) fn resolve_pending(game: &mut Game, rng: &mut SeededRng) {
    let pending = std::mem::take(&mut game.pending_attacks);
    let mut battles: Vec<(Coord, Vec<(PieceId, Role)>)> = Vec::new();
    for (tile, attackers) in pending {
        let participants = gather_participants(game, tile, &attackers, rng);
        battles.push((tile, participants));
    }
    rng.shuffle(&mut battles);
    for (tile, participants) in battles {
        tracing::debug!(tile = %tile, participants = participants.len(), "Resolving battle");
        resolve_battle(game, tile, participants);
    }
}

/// Collect and shuffle everyone taking part in the battle for `tile`.
fn gather_participants(
    game: &Game,
    tile: Coord,
    attackers: &[PieceId],
    rng: &mut SeededRng,
) -> Vec<(PieceId, Role)> {
    let attacker_set: BTreeSet<PieceId> = attackers.iter().copied().collect();
    let mut participants: Vec<(PieceId, Role)> =
        attackers.iter().map(|&id| (id, Role::Attacker)).collect();

    // Defenders may sit off-tile; every defense rule fits inside
    // MAX_DEFENDER_RANGE so pieces beyond it are skipped wholesale.
    let mut defender_set: BTreeSet<PieceId> = BTreeSet::new();
    for piece in game.pieces() {
        if attacker_set.contains(&piece.id) || piece.position.distance(&tile) > MAX_DEFENDER_RANGE
        {
            continue;
        }
        if piece.can_defend(tile) {
            defender_set.insert(piece.id);
            let copies = if piece.kind == PieceKind::Bunker {
                BUNKER_DEFEND_MULTIPLIER
            } else {
                1
            };
            for _ in 0..copies {
                participants.push((piece.id, Role::Defender));
            }
        }
    }

    if let Some(tile_state) = game.tile(tile) {
        for &id in &tile_state.pieces {
            if attacker_set.contains(&id) || defender_set.contains(&id) {
                continue;
            }
            let piece = game.piece(id).expect("tile piece in registry");
            if piece.kind.fights_in_battles() {
                participants.push((id, Role::Passive));
            }
        }
    }

    rng.shuffle(&mut participants);
    participants
}

/// Resolve one battle: bucket by country, duel position-wise, apply
/// deaths, then conquest.
fn resolve_battle(game: &mut Game, tile: Coord, participants: Vec<(PieceId, Role)>) {
    // Pieces may have died in an earlier battle this turn.
    let mut buckets: Vec<(String, Vec<(PieceId, Role)>)> = Vec::new();
    for (id, role) in participants {
        let Some(piece) = game.piece(id) else { continue };
        let country = piece.country.clone();
        match buckets.iter_mut().find(|(name, _)| *name == country) {
            Some((_, bucket)) => bucket.push((id, role)),
            None => buckets.push((country, vec![(id, role)])),
        }
    }
    if buckets.is_empty() {
        return;
    }

    let rounds = buckets.iter().map(|(_, b)| b.len()).max().unwrap_or(0);
    let mut kill: HashSet<PieceId> = HashSet::new();
    let mut conqueror: Option<PieceId> = None;
    for round in 0..rounds {
        let members: Vec<(PieceId, Role)> = buckets
            .iter()
            .filter_map(|(_, bucket)| bucket.get(round).copied())
            .collect();
        for (index, &(id, role)) in members.iter().enumerate() {
            let others: Vec<(PieceId, Role)> = members
                .iter()
                .enumerate()
                .filter(|(other_index, _)| *other_index != index)
                .map(|(_, &member)| member)
                .collect();
            if should_die(game, id, role, &others) {
                kill.insert(id);
            }
        }
    }

    // Conquest only happens when no other country fights over the tile;
    // an outnumbered defense still denies it through the padded duels.
    if buckets.len() == 1 {
        conqueror = buckets[0]
            .1
            .iter()
            .copied()
            .find(|&(id, role)| {
                role == Role::Attacker && game.piece(id).map(|p| p.kind) == Some(PieceKind::Tank)
            })
            .map(|(id, _)| id);
    }

    let mut kills: Vec<PieceId> = kill.into_iter().collect();
    kills.sort_unstable();
    for id in kills {
        tracing::debug!(piece = id, tile = %tile, "Piece destroyed in battle");
        game.kill_piece(id);
    }

    if let Some(id) = conqueror {
        let country = game
            .piece(id)
            .expect("conqueror had no opponents to die to")
            .country
            .clone();
        conquer_tile(game, tile, &country);
    }
}

/// Decide whether `id` dies against the other members of its duel.
/// Bunker hit counting mutates the bunker, so this takes the game
/// mutably; everything else is a pure function of kinds, roles and
/// positions.
pub(crate) fn should_die(
    game: &mut Game,
    id: PieceId,
    role: Role,
    others: &[(PieceId, Role)],
) -> bool {
    let piece = game.piece(id).expect("duel member in registry");
    let kind = piece.kind;
    let in_air = piece.in_air;
    let position = piece.position;
    let others: Vec<(PieceKind, Role, Coord)> = others
        .iter()
        .filter_map(|&(other_id, other_role)| {
            game.piece(other_id)
                .map(|other| (other.kind, other_role, other.position))
        })
        .collect();

    match kind {
        PieceKind::Tank => {
            // Tanks either attack their own tile or defend it.
            debug_assert!(role != Role::Passive, "tank cannot be passive");
            others.iter().any(|&(other, other_role, _)| {
                (other_role == Role::Attacker
                    && matches!(
                        other,
                        PieceKind::Tank
                            | PieceKind::Airplane
                            | PieceKind::Helicopter
                            | PieceKind::Artillery
                    ))
                    || other == PieceKind::Antitank
                    || (role == Role::Attacker
                        && (other == PieceKind::Tank
                            || (other == PieceKind::Artillery && other_role == Role::Defender)))
            })
        }
        PieceKind::Airplane => {
            // Airplanes never defend, and only attack from the air.
            debug_assert!(role != Role::Defender, "airplane cannot defend");
            debug_assert!(role != Role::Attacker || in_air);
            others.iter().any(|&(other, other_role, _)| {
                (other == PieceKind::IronDome && other_role == Role::Defender && in_air)
                    || (other_role == Role::Attacker
                        && matches!(
                            other,
                            PieceKind::Airplane | PieceKind::Helicopter | PieceKind::Artillery
                        ))
                    || (role == Role::Passive
                        && other == PieceKind::Tank
                        && other_role == Role::Attacker
                        && !in_air)
                    || (role == Role::Attacker
                        && other == PieceKind::Artillery
                        && other_role != Role::Passive)
            })
        }
        PieceKind::Helicopter => others.iter().any(|&(other, other_role, _)| {
            (other == PieceKind::IronDome && other_role == Role::Defender && in_air)
                || (other_role == Role::Attacker
                    && matches!(other, PieceKind::Airplane | PieceKind::Helicopter))
                || (role == Role::Passive
                    && other == PieceKind::Tank
                    && other_role == Role::Attacker
                    && !in_air)
                || (role == Role::Passive
                    && other == PieceKind::Artillery
                    && other_role == Role::Attacker)
        }),
        PieceKind::Artillery => others.iter().any(|&(other, other_role, _)| {
            (role == Role::Passive
                && other_role == Role::Attacker
                && matches!(
                    other,
                    PieceKind::Tank | PieceKind::Airplane | PieceKind::Artillery
                ))
                || (other == PieceKind::Helicopter && other_role == Role::Attacker)
        }),
        PieceKind::Antitank => {
            debug_assert!(role != Role::Attacker, "antitank cannot attack");
            others.iter().any(|&(other, other_role, _)| {
                other_role == Role::Attacker
                    && matches!(other, PieceKind::Airplane | PieceKind::Helicopter)
            })
        }
        PieceKind::IronDome => {
            debug_assert!(role != Role::Attacker, "iron dome cannot attack");
            match role {
                Role::Defender => others.iter().any(|&(other, other_role, other_position)| {
                    other == PieceKind::Tank
                        && other_role == Role::Attacker
                        && other_position == position
                }),
                _ => others.iter().any(|&(other, other_role, _)| {
                    other_role == Role::Attacker
                        && matches!(
                            other,
                            PieceKind::Tank
                                | PieceKind::Airplane
                                | PieceKind::Helicopter
                                | PieceKind::Artillery
                        )
                }),
            }
        }
        PieceKind::Bunker => {
            let hits = others
                .iter()
                .filter(|&&(other, other_role, _)| {
                    other_role == Role::Attacker
                        && matches!(
                            other,
                            PieceKind::Tank
                                | PieceKind::Airplane
                                | PieceKind::Helicopter
                                | PieceKind::Artillery
                        )
                })
                .count() as u32;
            let bunker = game.piece_mut(id).expect("duel member in registry");
            bunker.hits_this_turn += hits;
            bunker.hits_this_turn > BUNKER_DEFEND_MULTIPLIER
        }
        PieceKind::Spy | PieceKind::Tower | PieceKind::Satellite | PieceKind::Builder => false,
    }
}

/// Flip the tile to the conqueror's country. Slow pieces standing on it
/// defect, covert pieces are destroyed, tanks and airborne flyers are
/// left alone.
fn conquer_tile(game: &mut Game, tile: Coord, country: &str) {
    tracing::info!(tile = %tile, country = %country, "Tile conquered");
    game.set_tile_owner(tile, Some(country))
        .expect("conquered tile and country exist");
    let on_tile: Vec<PieceId> = game
        .tile(tile)
        .expect("conquered tile exists")
        .pieces
        .iter()
        .copied()
        .collect();
    for id in on_tile {
        let piece = game.piece(id).expect("tile piece in registry");
        if piece.country == country {
            continue;
        }
        let (kind, in_air) = (piece.kind, piece.in_air);
        match kind {
            PieceKind::Artillery
            | PieceKind::Bunker
            | PieceKind::Builder
            | PieceKind::Tower => game.set_piece_country(id, country),
            PieceKind::Airplane | PieceKind::Helicopter if !in_air => {
                game.set_piece_country(id, country)
            }
            PieceKind::Antitank | PieceKind::IronDome | PieceKind::Spy => game.kill_piece(id),
            _ => {}
        }
    }
}
