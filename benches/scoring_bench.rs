use criterion::{criterion_group, criterion_main, Criterion};
use fastrand::Rng;
use pinfall::notation::parse_game;
use pinfall::pins::{PinConfiguration, SplitDetector};
use pinfall::scorer::ScoreCard;
use pinfall::simulator::{PinKnockdownSimulator, Skill};
use std::hint::black_box;

fn setup_card() -> ScoreCard {
    let mut card = ScoreCard::new("bench");
    for mark in parse_game("X7/9-X-88/-6XXX81").unwrap_or_default() {
        if let Some((frame, roll)) = card.current_slot() {
            let _ = card.set_score(frame, roll, mark.pins, None, None);
        }
    }
    card
}

fn criterion_benchmark(c: &mut Criterion) {
    let card = setup_card();
    c.bench_function("cumulative_scores (full card)", |b| {
        b.iter(|| black_box(&card).cumulative_scores())
    });

    let leaves: Vec<PinConfiguration> = [&[7, 10][..], &[4, 6, 7, 10], &[2, 4, 5, 8], &[3, 5, 6, 9, 10]]
        .iter()
        .filter_map(|pins| PinConfiguration::from_standing_pins(pins).ok())
        .collect();
    c.bench_function("split detection (4 leaves)", |b| {
        b.iter(|| {
            leaves
                .iter()
                .filter(|l| SplitDetector::is_split(black_box(l)))
                .count()
        })
    });

    let sim = PinKnockdownSimulator::default();
    let skill = Skill::clamped(0.7);
    let mut rng = Rng::with_seed(42);
    c.bench_function("generate_frame (tenth)", |b| {
        b.iter(|| sim.generate_frame(black_box(skill), true, &mut rng))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
