//! Integration tests for fog of war: what each country's per-turn view
//! reveals and hides.

use std::collections::BTreeMap;
use wargrid_core::{Command, Coord, Game, PieceKind, SeededRng, TileSnapshot};

fn two_country_game() -> Game {
    let mut game = Game::new(10, 10);
    game.add_country("Alpha").unwrap();
    game.add_country("Beta").unwrap();
    game
}

fn turn(game: &mut Game, orders: BTreeMap<String, Vec<Command>>) {
    let mut rng = SeededRng::from_u64(3);
    game.apply_turn(&orders, &mut rng);
}

fn view_tile(game: &Game, country: &str, coord: Coord) -> TileSnapshot {
    game.snapshot_for(country)
        .tiles
        .into_iter()
        .find(|t| t.coordinate == coord)
        .unwrap()
}

#[test]
fn test_unseen_tile_shows_owner_but_nothing_else() {
    let mut game = two_country_game();
    game.set_tile_owner(Coord::new(8, 8), Some("Beta")).unwrap();
    game.set_tile_money(Coord::new(8, 8), 50).unwrap();
    game.spawn_piece(PieceKind::Tank, "Beta", Coord::new(8, 8)).unwrap();
    turn(&mut game, BTreeMap::new());

    // Alpha has no sight of the tile: the owner is still public, but the
    // money and the garrison are fogged.
    let tile = view_tile(&game, "Alpha", Coord::new(8, 8));
    assert_eq!(tile.country.as_deref(), Some("Beta"));
    assert_eq!(tile.money, None);
    assert!(tile.pieces.is_empty());
    // An unowned unseen tile stays fully blank.
    let tile = view_tile(&game, "Alpha", Coord::new(0, 0));
    assert_eq!(tile.country, None);
    assert_eq!(tile.money, None);
    // Beta sees its own tile in full.
    let tile = view_tile(&game, "Beta", Coord::new(8, 8));
    assert_eq!(tile.money, Some(50));
    assert_eq!(tile.country.as_deref(), Some("Beta"));
    assert_eq!(tile.pieces.len(), 1);
}

#[test]
fn test_pieces_sight_one_tile_around() {
    let mut game = two_country_game();
    game.set_tile_money(Coord::new(5, 6), 25).unwrap();
    game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(5, 5)).unwrap();
    turn(&mut game, BTreeMap::new());

    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 6)).money, Some(25));
    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 7)).money, None);
    assert_eq!(view_tile(&game, "Alpha", Coord::new(6, 6)).money, None);
}

#[test]
fn test_moving_updates_sight() {
    let mut game = two_country_game();
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(5, 5)).unwrap();
    turn(&mut game, BTreeMap::new());
    assert!(!view_tile(&game, "Alpha", Coord::new(5, 5)).pieces.is_empty());

    let mut orders = BTreeMap::new();
    orders.insert(
        "Alpha".to_string(),
        vec![Command::Move { piece_id: tank, new_location: Coord::new(5, 6) }],
    );
    turn(&mut game, orders);
    // The old position is still adjacent, but two tiles back has gone dark.
    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 7)).money, Some(0));
    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 4)).money, None);
}

#[test]
fn test_enemy_pieces_visible_under_partial_sight() {
    let mut game = two_country_game();
    game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(5, 5)).unwrap();
    let enemy = game.spawn_piece(PieceKind::Tank, "Beta", Coord::new(5, 6)).unwrap();
    turn(&mut game, BTreeMap::new());

    let tile = view_tile(&game, "Alpha", Coord::new(5, 6));
    assert_eq!(tile.pieces.len(), 1);
    assert_eq!(tile.pieces[0].id, enemy);
    assert_eq!(tile.pieces[0].country, "Beta");
}

#[test]
fn test_foreign_spy_hidden_under_partial_sight() {
    let mut game = two_country_game();
    game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(5, 5)).unwrap();
    game.spawn_piece(PieceKind::Spy, "Beta", Coord::new(5, 6)).unwrap();
    game.spawn_piece(PieceKind::Satellite, "Beta", Coord::new(5, 6)).unwrap();
    let visible_tank = game.spawn_piece(PieceKind::Tank, "Beta", Coord::new(5, 6)).unwrap();
    turn(&mut game, BTreeMap::new());

    let tile = view_tile(&game, "Alpha", Coord::new(5, 6));
    let ids: Vec<u64> = tile.pieces.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![visible_tank]);
}

#[test]
fn test_own_spy_reveals_foreign_covert_pieces() {
    let mut game = two_country_game();
    let spy = game.spawn_piece(PieceKind::Spy, "Alpha", Coord::new(5, 5)).unwrap();
    let enemy_spy = game.spawn_piece(PieceKind::Spy, "Beta", Coord::new(5, 5)).unwrap();
    turn(&mut game, BTreeMap::new());

    // Both countries have a spy on the tile, so both get full sight of it.
    let tile = view_tile(&game, "Alpha", Coord::new(5, 5));
    let ids: Vec<u64> = tile.pieces.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![spy, enemy_spy]);
    let tile = view_tile(&game, "Beta", Coord::new(5, 5));
    let ids: Vec<u64> = tile.pieces.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![spy, enemy_spy]);
}

#[test]
fn test_tower_sights_at_range() {
    let mut game = two_country_game();
    game.spawn_piece(PieceKind::Tower, "Alpha", Coord::new(5, 5)).unwrap();
    game.set_tile_money(Coord::new(5, 8), 10).unwrap();
    game.set_tile_money(Coord::new(5, 9), 10).unwrap();
    turn(&mut game, BTreeMap::new());

    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 8)).money, Some(10));
    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 9)).money, None);
}

#[test]
fn test_satellite_sightings_not_granted() {
    let mut game = two_country_game();
    game.spawn_piece(PieceKind::Satellite, "Alpha", Coord::new(5, 5)).unwrap();
    game.set_tile_money(Coord::new(5, 6), 10).unwrap();
    turn(&mut game, BTreeMap::new());

    // Satellites gather sightings for a tier the views do not grant yet;
    // even the adjacent tile stays dark.
    assert_eq!(view_tile(&game, "Alpha", Coord::new(5, 6)).money, None);
}

#[test]
fn test_view_carries_grid_metadata() {
    let mut game = two_country_game();
    turn(&mut game, BTreeMap::new());
    let view = game.snapshot_for("Alpha");
    assert_eq!(view.country, "Alpha");
    assert_eq!(view.all_countries, vec!["Alpha", "Beta"]);
    assert_eq!(view.width, 10);
    assert_eq!(view.height, 10);
    assert_eq!(view.tiles.len(), 100);
}
