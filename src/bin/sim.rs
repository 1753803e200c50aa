use broadside::{
    init_logging, Difficulty, GameConfig, GameSession, RandomAi, Side, Strategy, TurnOutcome,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Plays a full game with a random-firing autopilot in the player's seat.
fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed> <easy|medium|hard>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let difficulty: Difficulty = args[2].parse().map_err(anyhow::Error::msg)?;

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut pilot_rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
    let mut game = GameSession::new(GameConfig::default(), difficulty, &mut rng)?;
    let mut pilot = RandomAi;

    let mut turns = 0usize;
    while !game.is_over() {
        let Some(index) = pilot.pick_shot(&mut pilot_rng, game.player_shots(), game.grid()) else {
            break;
        };
        if game.fire_shot(index, &mut rng)? != TurnOutcome::Ignored {
            turns += 1;
        }
    }

    let winner = game.winner().map(|w| match w {
        Side::Player => "player",
        Side::Opponent => "computer",
    });
    let result = json!({
        "difficulty": difficulty.as_str(),
        "winner": winner,
        "turns": turns,
        "opponent_shots": game.opponent_shots().len(),
        "opponent_hits": game.opponent_shots().hits(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
