use fastrand::Rng;
use pinfall::api;
use pinfall::consts::PERFECT_GAME;
use pinfall::notation;
use pinfall::pins::{PinConfiguration, SplitDetector};
use pinfall::scorer::ScoreCard;
use pinfall::simulator::{PinKnockdownSimulator, Skill};
use proptest::prelude::*;

// --- STRATEGIES ---

prop_compose! {
    fn arb_config()(standing in prop::collection::vec(any::<bool>(), 10)) -> PinConfiguration {
        PinConfiguration::from_standing(&standing).unwrap()
    }
}

/// Bowls wishes in order, capping each at what is standing.
fn bowl_capped(wishes: &[u8]) -> ScoreCard {
    bowl_capped_with(wishes, |_| {})
}

/// Same as `bowl_capped`, calling `after_roll` once each roll is recorded.
fn bowl_capped_with(wishes: &[u8], mut after_roll: impl FnMut(&ScoreCard)) -> ScoreCard {
    let mut card = ScoreCard::new("prop");
    for &wish in wishes {
        let Some((frame, roll)) = card.current_slot() else {
            break;
        };
        let standing = card.frame(frame).unwrap().rack_before(roll).standing();
        card.set_score(frame, roll, wish.min(standing), None, None)
            .unwrap();
        after_roll(&card);
    }
    card
}

proptest! {
    #[test]
    fn prop_card_totals_are_well_formed(wishes in prop::collection::vec(0u8..=10, 0..24)) {
        let card = bowl_capped(&wishes);
        let totals = card.cumulative_scores();

        // Known totals form a non-decreasing prefix.
        let known: Vec<u32> = totals.iter().map_while(|t| *t).collect();
        prop_assert!(totals[known.len()..].iter().all(Option::is_none));
        prop_assert!(known.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(card.final_score() <= PERFECT_GAME);
        prop_assert_eq!(card.final_score(), known.last().copied().unwrap_or(0));

        for (frame, total) in card.frames().iter().zip(totals) {
            prop_assert_eq!(frame.frame_score(), total);
        }
    }

    #[test]
    fn prop_known_totals_never_change(wishes in prop::collection::vec(0u8..=10, 0..24)) {
        let mut history = Vec::new();
        bowl_capped_with(&wishes, |card| history.push(card.cumulative_scores()));

        for pair in history.windows(2) {
            for (before, after) in pair[0].iter().zip(pair[1].iter()) {
                if before.is_some() {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn prop_complete_card_is_fully_scored(wishes in prop::collection::vec(0u8..=10, 24)) {
        let card = bowl_capped(&wishes);
        prop_assert!(card.is_complete());
        prop_assert!(card.cumulative_scores().iter().all(Option::is_some));
    }

    #[test]
    fn prop_marks_round_trip_scores(wishes in prop::collection::vec(0u8..=10, 24)) {
        let card = bowl_capped(&wishes);
        let sheet = notation::card_marks(&card);
        prop_assert_eq!(sheet.chars().count(), 21);

        let marks = notation::parse_game(&sheet).unwrap();
        let replayed = api::score_marks("prop", &marks).unwrap();
        prop_assert_eq!(replayed.final_score(), card.final_score());
    }

    #[test]
    fn prop_split_needs_headpin_down(config in arb_config()) {
        if SplitDetector::is_split(&config) {
            prop_assert!(!config.is_standing(1));
            prop_assert!((2..=8).contains(&config.down_count()));
            prop_assert!(SplitDetector::standing_groups(&config).len() >= 2);
        }
    }

    #[test]
    fn prop_simulated_games_complete(seed in any::<u64>(), rating in 0.0f32..=1.0) {
        let sim = PinKnockdownSimulator::default();
        let mut rng = Rng::with_seed(seed);
        let card = api::simulate_game("prop", Skill::new(rating).unwrap(), &sim, &mut rng).unwrap();
        prop_assert!(card.is_complete());
        prop_assert!(card.final_score() <= PERFECT_GAME);
    }
}
