use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use broadside::{
    init_logging, CellView, Codec, Difficulty, FileStore, GameConfig, GameSession, Mark,
    SessionStore, TurnOutcome, BOARD_SIZE,
};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer in the terminal.
    Play {
        #[arg(long, value_enum, default_value_t = Difficulty::Easy)]
        difficulty: Difficulty,
        #[arg(long, default_value_t = BOARD_SIZE as u8, value_parser = clap::value_parser!(u8).range(2..=26))]
        size: u8,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Directory to keep the session in between runs")]
        save_dir: Option<PathBuf>,
        #[arg(long, default_value = "default")]
        session: String,
    },
    /// Delete a saved session.
    Reset {
        #[arg(long)]
        save_dir: PathBuf,
        #[arg(long, default_value = "default")]
        session: String,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            difficulty,
            size,
            seed,
            save_dir,
            session,
        } => {
            let mut rng = match seed {
                Some(s) => {
                    println!("Using fixed seed: {} (game will be reproducible)", s);
                    SmallRng::seed_from_u64(s)
                }
                None => SmallRng::from_rng(&mut rand::rng()),
            };
            let config = GameConfig::with_size(size as usize)
                .context("standard fleet does not fit on this board")?;
            let mut store = save_dir.map(FileStore::new);
            let game = match store.as_mut() {
                Some(store) => GameSession::load_or_new(
                    store,
                    &session,
                    Codec::Json,
                    config,
                    difficulty,
                    &mut rng,
                )?,
                None => GameSession::new(config, difficulty, &mut rng)?,
            };
            play(game, &mut rng, store.as_mut().map(|s| (s, session.as_str())))?;
        }
        Commands::Reset { save_dir, session } => {
            FileStore::new(save_dir).destroy(&session)?;
            println!("Session '{}' removed.", session);
        }
    }
    Ok(())
}

fn play(
    mut game: GameSession,
    rng: &mut SmallRng,
    mut store: Option<(&mut FileStore, &str)>,
) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_view(&game);
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        match input.to_ascii_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(),
            "restart" => game = game.restart(rng)?,
            cmd => {
                if let Ok(difficulty) = cmd.parse::<Difficulty>() {
                    game.set_difficulty(difficulty);
                    println!("Computer difficulty set to {}.", difficulty);
                } else {
                    match parse_coord(input, game.grid().size()) {
                        Ok((r, c)) => {
                            let index = game.grid().to_index(r, c);
                            if game.fire_shot(index, rng)? == TurnOutcome::Ignored {
                                println!("{} cannot be fired on right now.", coord_to_string(r, c));
                            }
                        }
                        Err(e) => println!("{}", e),
                    }
                }
            }
        }

        if let Some((store, id)) = store.as_mut() {
            game.save(&mut **store, id, Codec::Json)?;
        }
    }
    Ok(())
}

fn coord_to_string(r: usize, c: usize) -> String {
    let col = (b'A' + c as u8) as char;
    format!("{}{}", col, r + 1)
}

fn parse_coord(input: &str, size: usize) -> Result<(usize, usize), String> {
    let last_col = (b'A' + (size - 1) as u8) as char;
    let mut chars = input.chars();
    let col_ch = chars
        .next()
        .ok_or("Empty input")?
        .to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-{}", col_ch, last_col));
    }
    let col = (col_ch as u8 - b'A') as usize;
    if col >= size {
        return Err(format!("Column '{}' out of bounds - must be A-{}", col_ch, last_col));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, size))?;
    if row == 0 || row > size {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, size));
    }
    Ok((row - 1, col))
}

fn print_board(cells: &[CellView], size: usize) {
    let bar = "═".repeat(2 * size + 4);
    println!("    ╔{}╗", bar);
    print!("    ║   ");
    for c in 0..size {
        print!(" {}", (b'A' + c as u8) as char);
    }
    println!(" ║");
    println!("    ╠{}╣", bar);
    for r in 0..size {
        print!("    ║ {:2}", r + 1);
        for cell in &cells[r * size..(r + 1) * size] {
            let ch = match (cell.mark, cell.ship) {
                (Some(Mark::Hit), _) => 'X',
                (Some(Mark::Miss), _) => 'o',
                (None, Some(true)) => 'S',
                _ => '.',
            };
            print!(" {}", ch);
        }
        println!(" ║");
    }
    println!("    ╚{}╝", bar);
}

fn print_view(game: &GameSession) {
    let size = game.grid().size();
    println!("\nYour fleet:");
    print_board(&game.player_board(), size);
    for ship in game.player_fleet().ships() {
        let status = if ship.is_sunk() { "SUNK" } else { "Active" };
        println!("      {} ({}): {}", ship.name(), ship.length(), status);
    }
    println!(
        "\nEnemy waters ({} ships afloat, computer: {}):",
        game.opponent_fleet().remaining(),
        game.difficulty()
    );
    print_board(&game.target_board(), size);
    println!("    Legend: S=Ship  X=Hit  o=Miss  .=Water");
    println!();
    for line in game.log().iter() {
        println!("  {}", line);
    }
    println!("{}", game.status_line());
}

fn print_help() {
    println!("\nCommands:");
    println!("  A5                 fire at column A, row 5");
    println!("  easy|medium|hard   change the computer's difficulty");
    println!("  restart            start a new game");
    println!("  quit               leave (the session is kept with --save-dir)");
}
