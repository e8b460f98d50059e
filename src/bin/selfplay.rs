//! Random mover vs random mover, for smoke-testing the rules.
//!
//! Usage: `selfplay [games] [seed]`. Set `RUST_LOG=debug` to see every move.

use env_logger::Env;
use log::{error, info};

use fidget_chess::{Color, Game, GameCompletionState, RandomMover, BUILD_TIMESTAMP};

/// Random games can shuffle pieces forever without a fifty-move rule.
const MAX_PLIES: usize = 400;

fn main() {
    env_logger::Builder::from_env(Env::default().filter_or("RUST_LOG", "info")).init();

    let mut args = std::env::args().skip(1);
    let games: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    info!("selfplay (built {BUILD_TIMESTAMP}): {games} game(s), seed {seed}");

    let (mut white_wins, mut black_wins, mut draws, mut unfinished) = (0, 0, 0, 0);
    let mut last = None;

    for i in 0..games {
        let white = RandomMover::seeded(seed.wrapping_add(2 * u64::from(i)));
        let black = RandomMover::seeded(seed.wrapping_add(2 * u64::from(i) + 1));
        let mut game = Game::new(Box::new(white), Box::new(black));

        while !game.completion_state().is_over() && game.move_history().len() < MAX_PLIES {
            if let Err(err) = game.play_turn() {
                error!("game {i}: random mover produced a rejected move: {err}");
                std::process::exit(1);
            }
        }

        match game.completion_state() {
            GameCompletionState::GameOver(reason) => {
                info!("game {i}: {reason} after {} plies", game.move_history().len());
                match reason.winner() {
                    Some(Color::White) => white_wins += 1,
                    Some(Color::Black) => black_wins += 1,
                    None => draws += 1,
                }
            }
            GameCompletionState::AwaitingMove => {
                info!("game {i}: stopped after {MAX_PLIES} plies");
                unfinished += 1;
            }
        }
        last = Some(game);
    }

    info!("white {white_wins}, black {black_wins}, stalemate {draws}, unfinished {unfinished}");
    if let Some(game) = last {
        match serde_json::to_string_pretty(&game.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => error!("could not serialise snapshot: {err}"),
        }
    }
}
