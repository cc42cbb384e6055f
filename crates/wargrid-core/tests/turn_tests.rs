//! Integration tests for full-turn resolution: command batches, battle
//! outcomes, end-of-turn ticks and error isolation between countries.

use std::collections::BTreeMap;
use wargrid_core::{Command, Coord, Game, PieceKind, SeededRng};

fn two_country_game() -> Game {
    let mut game = Game::new(10, 10);
    game.add_country("Alpha").unwrap();
    game.add_country("Beta").unwrap();
    for y in 0..10 {
        for x in 0..5 {
            game.set_tile_owner(Coord::new(x, y), Some("Alpha")).unwrap();
            game.set_tile_owner(Coord::new(x + 5, y), Some("Beta")).unwrap();
        }
    }
    game
}

fn turn(game: &mut Game, orders: BTreeMap<String, Vec<Command>>) {
    let mut rng = SeededRng::from_u64(7);
    game.apply_turn(&orders, &mut rng);
}

fn orders_for(country: &str, commands: Vec<Command>) -> BTreeMap<String, Vec<Command>> {
    let mut orders = BTreeMap::new();
    orders.insert(country.to_string(), commands);
    orders
}

#[test]
fn test_move_via_turn() {
    let mut game = two_country_game();
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    turn(
        &mut game,
        orders_for("Alpha", vec![Command::Move { piece_id: tank, new_location: Coord::new(2, 3) }]),
    );
    assert_eq!(game.piece(tank).unwrap().position, Coord::new(2, 3));
    assert_eq!(game.turn(), 1);
    game.assert_consistent();
}

#[test]
fn test_failed_command_aborts_rest_of_batch() {
    let mut game = two_country_game();
    let first = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    let second = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(3, 3)).unwrap();
    turn(
        &mut game,
        orders_for(
            "Alpha",
            vec![
                // Tanks move one tile per turn; this is out of reach.
                Command::Move { piece_id: first, new_location: Coord::new(2, 9) },
                Command::Move { piece_id: second, new_location: Coord::new(3, 4) },
            ],
        ),
    );
    assert_eq!(game.piece(first).unwrap().position, Coord::new(2, 2));
    assert_eq!(game.piece(second).unwrap().position, Coord::new(3, 3));
}

#[test]
fn test_commands_before_failure_stick() {
    let mut game = two_country_game();
    let first = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    let second = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(3, 3)).unwrap();
    turn(
        &mut game,
        orders_for(
            "Alpha",
            vec![
                Command::Move { piece_id: first, new_location: Coord::new(2, 3) },
                Command::Move { piece_id: second, new_location: Coord::new(3, 9) },
            ],
        ),
    );
    assert_eq!(game.piece(first).unwrap().position, Coord::new(2, 3));
    assert_eq!(game.piece(second).unwrap().position, Coord::new(3, 3));
}

#[test]
fn test_failure_does_not_leak_across_countries() {
    let mut game = two_country_game();
    let alpha = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    let beta = game.spawn_piece(PieceKind::Tank, "Beta", Coord::new(7, 7)).unwrap();
    let mut orders = BTreeMap::new();
    orders.insert(
        "Alpha".to_string(),
        vec![Command::Move { piece_id: alpha, new_location: Coord::new(2, 9) }],
    );
    orders.insert(
        "Beta".to_string(),
        vec![Command::Move { piece_id: beta, new_location: Coord::new(7, 8) }],
    );
    turn(&mut game, orders);
    assert_eq!(game.piece(alpha).unwrap().position, Coord::new(2, 2));
    assert_eq!(game.piece(beta).unwrap().position, Coord::new(7, 8));
}

#[test]
fn test_duplicate_command_rejected() {
    let mut game = two_country_game();
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    turn(
        &mut game,
        orders_for(
            "Alpha",
            vec![
                Command::Move { piece_id: tank, new_location: Coord::new(2, 3) },
                Command::Move { piece_id: tank, new_location: Coord::new(2, 4) },
            ],
        ),
    );
    // The first command sticks, the duplicate drops the rest.
    assert_eq!(game.piece(tank).unwrap().position, Coord::new(2, 3));
}

#[test]
fn test_foreign_piece_marks_it_commanded() {
    let mut game = two_country_game();
    let beta_tank = game.spawn_piece(PieceKind::Tank, "Beta", Coord::new(7, 7)).unwrap();
    let mut orders = BTreeMap::new();
    // Alpha is processed first (name order) and tries to steal Beta's
    // tank. The attempt fails, but it still burns the piece's one command
    // for the turn, so Beta's own order bounces as a duplicate.
    orders.insert(
        "Alpha".to_string(),
        vec![Command::Move { piece_id: beta_tank, new_location: Coord::new(7, 8) }],
    );
    orders.insert(
        "Beta".to_string(),
        vec![Command::Move { piece_id: beta_tank, new_location: Coord::new(7, 6) }],
    );
    turn(&mut game, orders);
    assert_eq!(game.piece(beta_tank).unwrap().position, Coord::new(7, 7));
}

#[test]
fn test_orders_parsed_from_json() {
    let mut game = two_country_game();
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    let json = format!(
        r#"[{{"name": "move", "pieceId": {}, "newLocation": {{"x": 2, "y": 3}}}},
            {{"name": "meleeAttack", "pieceId": {}}}]"#,
        tank, tank
    );
    let commands: Vec<Command> = serde_json::from_str(&json).unwrap();
    turn(&mut game, orders_for("Alpha", commands));
    // Duplicate piece in one batch: the move lands, the attack is dropped.
    assert_eq!(game.piece(tank).unwrap().position, Coord::new(2, 3));
    assert!(!game.piece(tank).unwrap().is_attacking);
}

#[test]
fn test_mutual_tank_battle_via_turn() {
    let mut game = two_country_game();
    let contested = Coord::new(5, 5);
    let alpha = game.spawn_piece(PieceKind::Tank, "Alpha", contested).unwrap();
    let beta = game.spawn_piece(PieceKind::Tank, "Beta", contested).unwrap();
    let mut orders = BTreeMap::new();
    orders.insert("Alpha".to_string(), vec![Command::MeleeAttack { piece_id: alpha }]);
    orders.insert("Beta".to_string(), vec![Command::MeleeAttack { piece_id: beta }]);
    turn(&mut game, orders);
    assert!(game.piece(alpha).is_none());
    assert!(game.piece(beta).is_none());
    // Mutual destruction conquers nothing.
    assert_eq!(game.tile(contested).unwrap().owner.as_deref(), Some("Beta"));
    game.assert_consistent();
}

#[test]
fn test_conquest_via_turn() {
    let mut game = two_country_game();
    let contested = Coord::new(5, 5);
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", contested).unwrap();
    turn(&mut game, orders_for("Alpha", vec![Command::MeleeAttack { piece_id: tank }]));
    assert_eq!(game.tile(contested).unwrap().owner.as_deref(), Some("Alpha"));
    assert!(!game.piece(tank).unwrap().is_attacking);
    assert!(game.country("Alpha").unwrap().tiles.contains(&contested));
    assert!(!game.country("Beta").unwrap().tiles.contains(&contested));
}

#[test]
fn test_attack_flag_resets_each_turn() {
    let mut game = two_country_game();
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    turn(&mut game, orders_for("Alpha", vec![Command::MeleeAttack { piece_id: tank }]));
    assert!(!game.piece(tank).unwrap().is_attacking);
    // The same piece may attack again next turn.
    turn(&mut game, orders_for("Alpha", vec![Command::MeleeAttack { piece_id: tank }]));
    assert!(game.piece(tank).is_some());
    assert_eq!(game.turn(), 2);
}

#[test]
fn test_helicopter_forced_landing_defects() {
    let mut game = two_country_game();
    let heli = game.spawn_piece(PieceKind::Helicopter, "Alpha", Coord::new(4, 4)).unwrap();
    turn(&mut game, orders_for("Alpha", vec![Command::TakeOff { piece_id: heli }]));
    turn(
        &mut game,
        orders_for("Alpha", vec![Command::Move { piece_id: heli, new_location: Coord::new(7, 6) }]),
    );
    // The take-off and move turns already consumed air time; idle until
    // the cap runs out.
    let cap = PieceKind::Helicopter.max_time_in_air().unwrap();
    for _ in 0..cap {
        if !game.piece(heli).unwrap().in_air {
            break;
        }
        turn(&mut game, BTreeMap::new());
    }
    // Out of air time over Beta territory: the helicopter is forced down
    // and changes sides.
    let heli_piece = game.piece(heli).unwrap();
    assert!(!heli_piece.in_air);
    assert_eq!(heli_piece.country, "Beta");
    game.assert_consistent();
}

#[test]
fn test_builder_collects_and_builds_over_turns() {
    let mut game = two_country_game();
    let home = Coord::new(1, 1);
    game.set_tile_money(home, 100).unwrap();
    let builder = game.spawn_piece(PieceKind::Builder, "Alpha", home).unwrap();
    for _ in 0..2 {
        turn(
            &mut game,
            orders_for("Alpha", vec![Command::TakeMoney { piece_id: builder, amount: 5 }]),
        );
    }
    assert_eq!(game.piece(builder).unwrap().money, 10);
    assert_eq!(game.tile(home).unwrap().money, 90);
    turn(
        &mut game,
        orders_for(
            "Alpha",
            vec![Command::Build { piece_id: builder, new_piece_type: PieceKind::Tank }],
        ),
    );
    let tanks = game
        .pieces()
        .filter(|p| p.kind == PieceKind::Tank && p.country == "Alpha")
        .count();
    assert_eq!(tanks, 1);
    assert_eq!(game.piece(builder).unwrap().money, 10 - PieceKind::Tank.stats().price);
    game.assert_consistent();
}

#[test]
fn test_unknown_country_orders_ignored() {
    let mut game = two_country_game();
    let tank = game.spawn_piece(PieceKind::Tank, "Alpha", Coord::new(2, 2)).unwrap();
    let mut orders = BTreeMap::new();
    orders.insert(
        "Atlantis".to_string(),
        vec![Command::Move { piece_id: tank, new_location: Coord::new(2, 3) }],
    );
    turn(&mut game, orders);
    assert_eq!(game.piece(tank).unwrap().position, Coord::new(2, 2));
    assert_eq!(game.turn(), 1);
}

#[test]
fn test_whole_turns_reproducible_with_same_seed() {
    let build = || {
        let mut game = two_country_game();
        let contested = Coord::new(4, 4);
        let mut orders: BTreeMap<String, Vec<Command>> = BTreeMap::new();
        let mut alpha = Vec::new();
        let mut beta = Vec::new();
        for _ in 0..4 {
            let a = game.spawn_piece(PieceKind::Tank, "Alpha", contested).unwrap();
            let b = game.spawn_piece(PieceKind::Tank, "Beta", contested).unwrap();
            alpha.push(Command::MeleeAttack { piece_id: a });
            beta.push(Command::MeleeAttack { piece_id: b });
        }
        orders.insert("Alpha".to_string(), alpha);
        orders.insert("Beta".to_string(), beta);
        (game, orders)
    };
    let (mut first, orders_first) = build();
    let (mut second, orders_second) = build();
    let mut rng_first = SeededRng::from_u64(1234);
    let mut rng_second = SeededRng::from_u64(1234);
    first.apply_turn(&orders_first, &mut rng_first);
    second.apply_turn(&orders_second, &mut rng_second);
    assert_eq!(first.snapshot(), second.snapshot());
}
