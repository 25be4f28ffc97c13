use crate::error::{PfResult, PinfallError};
use crate::notation::ThrowMark;
use crate::scorer::{RollUpdate, ScoreCard};
use crate::simulator::{PinKnockdownSimulator, Skill};
use crate::store::GameRecord;
use fastrand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

/// One simulated game and the seed that reproduces it.
#[derive(Debug, Clone)]
pub struct SimulatedGame {
    pub index: usize,
    pub seed: u64,
    pub card: ScoreCard,
}

/// Service: Simulate a full game for one bowler into a fresh card.
pub fn simulate_game(
    bowler_id: &str,
    skill: Skill,
    simulator: &PinKnockdownSimulator,
    rng: &mut Rng,
) -> PfResult<ScoreCard> {
    let mut card = ScoreCard::new(bowler_id);
    for (frame_idx, rolls) in simulator.generate_game(skill, rng).iter().enumerate() {
        let frame_number = frame_idx as u8 + 1;
        for (roll_idx, roll) in rolls.iter().enumerate() {
            let roll_number = roll_idx as u8 + 1;
            if let RollUpdate::Ignored(violation) =
                card.record_simulated(frame_number, roll_number, roll)?
            {
                return Err(PinfallError::Validation(format!(
                    "simulated roll rejected: {}",
                    violation
                )));
            }
        }
    }
    debug!("Simulated game for {}: {}", bowler_id, card.final_score());
    Ok(card)
}

/// Service: Simulate `games` independent games in parallel.
///
/// Game `i` draws from its own stream seeded with `base_seed + i`, so results
/// do not depend on thread scheduling.
pub fn simulate_games(
    bowler_id: &str,
    skill: Skill,
    simulator: &PinKnockdownSimulator,
    base_seed: u64,
    games: usize,
) -> PfResult<Vec<SimulatedGame>> {
    info!(
        "Simulating {} game(s) at skill {:.2} from seed {}",
        games,
        skill.value(),
        base_seed
    );
    (0..games)
        .into_par_iter()
        .map(|index| {
            let seed = base_seed.wrapping_add(index as u64);
            let mut rng = Rng::with_seed(seed);
            let card = simulate_game(bowler_id, skill, simulator, &mut rng)?;
            Ok(SimulatedGame { index, seed, card })
        })
        .collect()
}

/// Service: Feed balls through the card's current frame/roll cursor.
///
/// Extra balls after the card is complete are rejected.
pub fn score_marks(bowler_id: &str, marks: &[ThrowMark]) -> PfResult<ScoreCard> {
    let mut card = ScoreCard::new(bowler_id);
    for (i, mark) in marks.iter().enumerate() {
        let (Some(frame), Some(roll)) = (card.current_frame(), card.current_roll()) else {
            return Err(PinfallError::Validation(format!(
                "ball {} comes after the game is over",
                i + 1
            )));
        };
        let update = if mark.foul {
            card.set_foul(frame, roll, None)?
        } else {
            card.set_score(frame, roll, mark.pins, None, None)?
        };
        if let RollUpdate::Ignored(violation) = update {
            return Err(PinfallError::Validation(format!(
                "ball {}: {}",
                i + 1,
                violation
            )));
        }
    }
    Ok(card)
}

/// Service: Rebuild the live cards of a stored game.
pub fn restore_cards(game: &GameRecord) -> Vec<ScoreCard> {
    game.scorecards.iter().map(|c| c.to_card()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_game;

    #[test]
    fn test_score_marks_perfect_game() {
        let marks = parse_game("XXXXXXXXXXXX").unwrap();
        let card = score_marks("p", &marks).unwrap();
        assert_eq!(card.final_score(), 300);
    }

    #[test]
    fn test_score_marks_rejects_thirteenth_strike() {
        let marks = parse_game("XXXXXXXXXXXXX").unwrap();
        assert!(score_marks("p", &marks).is_err());
    }

    #[test]
    fn test_simulated_games_complete() {
        let sim = PinKnockdownSimulator::default();
        let games = simulate_games("sim", Skill::clamped(0.7), &sim, 42, 8).unwrap();
        assert_eq!(games.len(), 8);
        for game in &games {
            assert_eq!(game.seed, 42 + game.index as u64);
            assert!(game.card.is_complete());
            assert!(game.card.final_score() <= 300);
        }
    }
}
