use crate::pins::{pin_distance, PinConfiguration};
use fastrand::Rng;

/// Knocks `target` pins off `rack` and returns the rack left standing.
///
/// The headpin goes first with `headpin_hit_chance`. Other pins are drawn
/// without replacement from a ticket pool weighted towards pins near those
/// already down; any shortfall is filled uniformly from what still stands.
pub fn knock_down(
    rack: &PinConfiguration,
    target: u8,
    skill: f32,
    headpin_hit_chance: f32,
    rng: &mut Rng,
) -> PinConfiguration {
    let standing = rack.standing_count();
    let mut remaining = target.min(standing);
    if remaining == 0 {
        return *rack;
    }
    if remaining == standing {
        return PinConfiguration::cleared();
    }

    let mut config = *rack;
    if config.is_standing(1) && rng.f32() < headpin_hit_chance {
        config.knock_down(1);
        remaining -= 1;
    }

    let mut pool: Vec<(usize, u32)> = config
        .standing_pins()
        .filter(|&p| p != 1)
        .map(|p| (p, pin_tickets(&config, p, skill)))
        .collect();

    while remaining > 0 && !pool.is_empty() {
        let total: u32 = pool.iter().map(|&(_, t)| t).sum();
        let mut draw = rng.u32(0..total);
        let mut chosen = pool.len() - 1;
        for (i, &(_, tickets)) in pool.iter().enumerate() {
            if draw < tickets {
                chosen = i;
                break;
            }
            draw -= tickets;
        }
        let (pin, _) = pool.swap_remove(chosen);
        config.knock_down(pin);
        remaining -= 1;
    }

    while remaining > 0 {
        let still: Vec<usize> = config.standing_pins().collect();
        if still.is_empty() {
            break;
        }
        config.knock_down(still[rng.usize(0..still.len())]);
        remaining -= 1;
    }

    config
}

/// Draw weight of a standing pin: closer to a fallen pin and higher skill
/// both raise it.
pub fn pin_tickets(config: &PinConfiguration, pin: usize, skill: f32) -> u32 {
    let nearest = config
        .down_pins()
        .map(|d| pin_distance(pin, d))
        .fold(f32::INFINITY, f32::min);
    let proximity = if nearest.is_finite() {
        1.0 / (nearest * 2.0)
    } else {
        1.0
    };
    (((proximity + skill) * 10.0).ceil() as u32).max(1)
}
