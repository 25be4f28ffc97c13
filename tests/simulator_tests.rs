use fastrand::Rng;
use pinfall::api;
use pinfall::config::SimulationWeights;
use pinfall::roster::KnownBowler;
use pinfall::simulator::{PinKnockdownSimulator, SimulatedRoll, Skill};
use rstest::rstest;

fn skill(v: f32) -> Skill {
    Skill::new(v).unwrap()
}

#[test]
fn test_same_seed_same_game() {
    let sim = PinKnockdownSimulator::default();
    let a = sim.generate_game(skill(0.75), &mut Rng::with_seed(1234));
    let b = sim.generate_game(skill(0.75), &mut Rng::with_seed(1234));
    assert_eq!(a, b);

    let c = sim.generate_game(skill(0.75), &mut Rng::with_seed(1235));
    assert_ne!(a, c);
}

#[test]
fn test_parallel_results_match_sequential() {
    let sim = PinKnockdownSimulator::default();
    let parallel = api::simulate_games("p", skill(0.6), &sim, 900, 16).unwrap();
    for game in &parallel {
        let mut rng = Rng::with_seed(game.seed);
        let card = api::simulate_game("p", skill(0.6), &sim, &mut rng).unwrap();
        assert_eq!(card, game.card, "game {}", game.index);
    }
}

#[rstest]
#[case(KnownBowler::Alice)]
#[case(KnownBowler::Carol)]
#[case(KnownBowler::Dave)]
#[case(KnownBowler::Mallory)]
fn test_generated_rolls_are_consistent(#[case] bowler: KnownBowler) {
    let sim = PinKnockdownSimulator::default();
    let mut rng = Rng::with_seed(77);
    for _ in 0..50 {
        for rolls in sim.generate_game(bowler.skill(), &mut rng) {
            for roll in &rolls {
                assert!(roll.pins <= 10);
                if roll.foul {
                    assert_eq!(roll.pins, 0);
                }
            }
            check_first_ball(&rolls[0]);
        }
    }
}

fn check_first_ball(roll: &SimulatedRoll) {
    let expected = if roll.foul { 0 } else { roll.pins };
    assert_eq!(roll.config.down_count(), expected);
}

#[test]
fn test_every_simulated_game_scores() {
    let sim = PinKnockdownSimulator::default();
    for bowler in [KnownBowler::Alice, KnownBowler::Eve] {
        let games = api::simulate_games("b", bowler.skill(), &sim, 5, 40).unwrap();
        for game in games {
            assert!(game.card.is_complete());
            assert!(game.card.final_score() <= 300);
        }
    }
}

#[test]
fn test_skill_moves_the_mean() {
    let sim = PinKnockdownSimulator::default();
    let mean = |s: f32| {
        let games = api::simulate_games("b", skill(s), &sim, 10, 200).unwrap();
        games.iter().map(|g| g.card.final_score()).sum::<u32>() as f64 / games.len() as f64
    };
    let strong = mean(0.9);
    let weak = mean(0.1);
    assert!(strong > weak + 40.0, "strong {} vs weak {}", strong, weak);
}

#[test]
fn test_custom_weights_are_used() {
    let weights = SimulationWeights {
        foul_chance_pro: 1.0,
        ..Default::default()
    };
    let sim = PinKnockdownSimulator::new(weights);
    let game = sim.generate_game(skill(0.95), &mut Rng::with_seed(3));
    assert!(game.iter().flatten().all(|r| r.foul));
    assert_eq!(game.iter().map(Vec::len).sum::<usize>(), 20);
}
