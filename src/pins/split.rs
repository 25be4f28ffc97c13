use super::{adjacent, PinConfiguration};
use crate::consts::PIN_COUNT;

/// Decides whether a rack left standing is a split.
///
/// A split needs the headpin down, between 2 and 8 pins down, and at least
/// two groups of standing pins with no chain of standing neighbours between
/// them.
pub struct SplitDetector;

impl SplitDetector {
    pub fn is_split(config: &PinConfiguration) -> bool {
        if config.is_standing(1) {
            return false;
        }
        let down = config.down_count();
        if !(2..=8).contains(&down) || config.standing_count() < 2 {
            return false;
        }

        let groups = Self::standing_groups(config);
        groups.len() > 1
    }

    /// Connected groups of standing pins, each sorted ascending.
    pub fn standing_groups(config: &PinConfiguration) -> Vec<Vec<usize>> {
        let mut visited = [false; PIN_COUNT + 1];
        let mut groups = Vec::new();

        for start in config.standing_pins() {
            if visited[start] {
                continue;
            }
            let mut group = Vec::new();
            let mut stack = vec![start];
            visited[start] = true;

            while let Some(pin) = stack.pop() {
                group.push(pin);
                for &next in adjacent(pin) {
                    if !visited[next] && config.is_standing(next) {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
            group.sort_unstable();
            groups.push(group);
        }
        groups
    }
}

pub fn is_split(config: &PinConfiguration) -> bool {
    SplitDetector::is_split(config)
}
