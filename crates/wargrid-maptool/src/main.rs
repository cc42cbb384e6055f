//! Wargrid map tool - authors game state files for the engine.
//!
//! Usage:
//!   wargrid-maptool new map.json --width 10 --height 10
//!   wargrid-maptool add-country map.json UK
//!   wargrid-maptool claim map.json UK --from 0 0 --to 4 4
//!   wargrid-maptool fill-money map.json 10
//!   wargrid-maptool set-tile map.json 9 0 --money 60
//!   wargrid-maptool add-piece map.json builder UK 0 0
//!   wargrid-maptool sample map.json
//!   wargrid-maptool show map.json

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use wargrid_core::{Coord, Game, GameSnapshot, PieceKind};

#[derive(Parser)]
#[command(name = "wargrid-maptool")]
#[command(about = "Author and inspect Wargrid game state files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty map file
    New {
        file: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Countries to register, repeatable
        #[arg(long = "country")]
        countries: Vec<String>,
    },
    /// Register a country
    AddCountry { file: PathBuf, name: String },
    /// Assign a rectangle of tiles to a country
    Claim {
        file: PathBuf,
        country: String,
        /// Bottom-left corner of the rectangle
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"])]
        from: Vec<i32>,
        /// Top-right corner of the rectangle (inclusive)
        #[arg(long, required = true, num_args = 2, value_names = ["X", "Y"])]
        to: Vec<i32>,
    },
    /// Put the same amount of money on every tile
    FillMoney { file: PathBuf, amount: i64 },
    /// Change a single tile
    SetTile {
        file: PathBuf,
        x: i32,
        y: i32,
        #[arg(long)]
        money: Option<i64>,
        #[arg(long, conflicts_with = "clear_owner")]
        owner: Option<String>,
        #[arg(long)]
        clear_owner: bool,
    },
    /// Place a piece on the map
    AddPiece {
        file: PathBuf,
        kind: PieceKind,
        country: String,
        x: i32,
        y: i32,
    },
    /// Write a ready-to-play two-country sample map
    Sample { file: PathBuf },
    /// Print a summary of a map file
    Show { file: PathBuf },
}

fn load(path: &Path) -> anyhow::Result<Game> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let snapshot: GameSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Game::from_snapshot(snapshot).context("loading game state")
}

fn save(path: &Path, game: &Game) -> anyhow::Result<()> {
    let text = serde_json::to_string(&game.snapshot()).context("serializing game state")?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::New { file, width, height, countries } => {
            let game = new_map(width, height, &countries)?;
            save(&file, &game)?;
            println!("Created {}x{} map at {}", width, height, file.display());
        }
        Commands::AddCountry { file, name } => {
            let mut game = load(&file)?;
            game.add_country(&name)?;
            save(&file, &game)?;
            println!("Added country {}", name);
        }
        Commands::Claim { file, country, from, to } => {
            let mut game = load(&file)?;
            let (x0, y0) = (from[0], from[1]);
            let (x1, y1) = (to[0], to[1]);
            if x1 < x0 || y1 < y0 {
                bail!("--to corner must not be below --from corner");
            }
            let mut claimed = 0u32;
            for x in x0..=x1 {
                for y in y0..=y1 {
                    game.set_tile_owner(Coord::new(x, y), Some(&country))?;
                    claimed += 1;
                }
            }
            save(&file, &game)?;
            println!("{} now owns {} tiles", country, claimed);
        }
        Commands::FillMoney { file, amount } => {
            let mut game = load(&file)?;
            let coords: Vec<Coord> = game.tiles().map(|t| t.coord).collect();
            for coord in coords {
                game.set_tile_money(coord, amount)?;
            }
            save(&file, &game)?;
            println!("Every tile now holds {}", amount);
        }
        Commands::SetTile { file, x, y, money, owner, clear_owner } => {
            let mut game = load(&file)?;
            let coord = Coord::new(x, y);
            if let Some(money) = money {
                game.set_tile_money(coord, money)?;
            }
            if let Some(owner) = &owner {
                game.set_tile_owner(coord, Some(owner))?;
            } else if clear_owner {
                game.set_tile_owner(coord, None)?;
            }
            save(&file, &game)?;
            println!("Updated tile {}", coord);
        }
        Commands::AddPiece { file, kind, country, x, y } => {
            let mut game = load(&file)?;
            let id = game.spawn_piece(kind, &country, Coord::new(x, y))?;
            save(&file, &game)?;
            println!("Placed {} {} for {} at {}", kind, id, country, Coord::new(x, y));
        }
        Commands::Sample { file } => {
            let game = sample_map()?;
            save(&file, &game)?;
            println!("Wrote sample map to {}", file.display());
        }
        Commands::Show { file } => {
            let game = load(&file)?;
            show(&game);
        }
    }
    Ok(())
}

fn new_map(width: u32, height: u32, countries: &[String]) -> anyhow::Result<Game> {
    if width == 0 || height == 0 {
        bail!("map dimensions must be at least 1x1, got {}x{}", width, height);
    }
    let mut game = Game::new(width, height);
    for name in countries {
        game.add_country(name)?;
    }
    Ok(game)
}

/// Two mirrored countries on a 10x10 map: opposing quadrants, a builder
/// and a spy in each home corner, tanks and antitanks on the frontier,
/// and money piles worth racing for.
fn sample_map() -> anyhow::Result<Game> {
    let mut game = Game::new(10, 10);
    game.add_country("cobrastan")?;
    game.add_country("absurdistan")?;
    for x in 0..10 {
        for y in 0..10 {
            game.set_tile_money(Coord::new(x, y), 5)?;
        }
    }
    game.set_tile_money(Coord::new(9, 0), 60)?;
    game.set_tile_money(Coord::new(0, 9), 60)?;
    game.set_tile_money(Coord::new(5, 4), 30)?;
    game.set_tile_money(Coord::new(4, 5), 30)?;
    for x in 0..5 {
        for y in 0..5 {
            game.set_tile_owner(Coord::new(x, y), Some("cobrastan"))?;
            game.set_tile_owner(Coord::new(x + 5, y + 5), Some("absurdistan"))?;
        }
    }
    game.spawn_piece(PieceKind::Builder, "cobrastan", Coord::new(0, 0))?;
    game.spawn_piece(PieceKind::Builder, "absurdistan", Coord::new(9, 9))?;
    game.spawn_piece(PieceKind::Tank, "cobrastan", Coord::new(0, 4))?;
    game.spawn_piece(PieceKind::Tank, "cobrastan", Coord::new(4, 0))?;
    game.spawn_piece(PieceKind::Tank, "absurdistan", Coord::new(5, 9))?;
    game.spawn_piece(PieceKind::Tank, "absurdistan", Coord::new(9, 5))?;
    game.spawn_piece(PieceKind::Antitank, "cobrastan", Coord::new(4, 4))?;
    game.spawn_piece(PieceKind::Antitank, "absurdistan", Coord::new(5, 5))?;
    game.spawn_piece(PieceKind::Spy, "cobrastan", Coord::new(0, 0))?;
    game.spawn_piece(PieceKind::Spy, "absurdistan", Coord::new(9, 9))?;
    Ok(game)
}

fn show(game: &Game) {
    println!("{}x{} map, turn {}", game.width(), game.height(), game.turn());
    for country in game.countries() {
        println!(
            "  {}: {} tiles, {} pieces",
            country.name,
            country.tiles.len(),
            country.pieces.len()
        );
    }
    for tile in game.tiles() {
        if tile.money == 0 && tile.pieces.is_empty() {
            continue;
        }
        let owner = tile.owner.as_deref().unwrap_or("-");
        let pieces: Vec<String> = tile
            .pieces
            .iter()
            .filter_map(|id| game.piece(*id))
            .map(|p| format!("{} {} ({})", p.kind, p.id, p.country))
            .collect();
        println!(
            "  {} owner={} money={} [{}]",
            tile.coord,
            owner,
            tile.money,
            pieces.join(", ")
        );
    }
}
