use crate::consts::DEFAULT_SIMULATION_SKILL;
use crate::simulator::Skill;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Virtual bowlers with a fixed skill rating.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum KnownBowler {
    Alice,
    Bob,
    Carol,
    Dave,
    Eve,
    Mallory,
}

impl KnownBowler {
    pub fn rating(&self) -> f32 {
        match self {
            Self::Alice => 0.9,
            Self::Bob => 0.8,
            Self::Carol => 0.6,
            Self::Dave => 0.4,
            Self::Eve => 0.2,
            Self::Mallory => 0.0,
        }
    }

    pub fn skill(&self) -> Skill {
        Skill::clamped(self.rating())
    }
}

/// Skill used when a bowler has no rating of their own.
pub fn default_skill() -> Skill {
    Skill::clamped(DEFAULT_SIMULATION_SKILL)
}

pub fn get_all_bowlers() -> HashMap<KnownBowler, Skill> {
    KnownBowler::iter().map(|b| (b, b.skill())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(KnownBowler::from_str("alice").unwrap(), KnownBowler::Alice);
        assert_eq!(KnownBowler::from_str("Mallory").unwrap().rating(), 0.0);
        assert!(KnownBowler::from_str("zed").is_err());
    }

    #[test]
    fn test_ratings_descend() {
        let ratings: Vec<f32> = KnownBowler::iter().map(|b| b.rating()).collect();
        assert!(ratings.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(get_all_bowlers().len(), 6);
    }
}
