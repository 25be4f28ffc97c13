use crate::error::{PfResult, PinfallError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub session: SessionParams,
    #[command(flatten)]
    pub weights: SimulationWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionParams {
    /// Number of games to simulate.
    #[arg(long, default_value_t = 1)]
    pub games: usize,
    /// Base seed; game `i` uses `seed + i`.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            games: 1,
            seed: None,
        }
    }
}

/// Constants of the knockdown model.
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationWeights {
    // === SKILL TIERS ===
    #[arg(long, default_value_t = 0.8)]
    pub pro_threshold: f32,
    #[arg(long, default_value_t = 0.5)]
    pub intermediate_threshold: f32,

    // === FOULS ===
    #[arg(long, default_value_t = 0.001)]
    pub foul_chance_pro: f32,
    #[arg(long, default_value_t = 0.01)]
    pub foul_chance_intermediate: f32,
    #[arg(long, default_value_t = 0.05)]
    pub foul_chance_novice: f32,

    // === FIRST BALL ===
    #[arg(long, default_value_t = 0.40)]
    pub strike_chance_pro: f32,
    #[arg(long, default_value_t = 0.25)]
    pub strike_chance_intermediate: f32,
    #[arg(long, default_value_t = 0.8)]
    pub headpin_hit_chance: f32,

    // === SPARE CONVERSION ===
    // Clean-up chance is conversion_floor + skill * (1 - conversion_floor).
    #[arg(long, default_value_t = 0.3)]
    pub conversion_floor: f32,
}

impl Default for SimulationWeights {
    fn default() -> Self {
        Self {
            pro_threshold: 0.8,
            intermediate_threshold: 0.5,
            foul_chance_pro: 0.001,
            foul_chance_intermediate: 0.01,
            foul_chance_novice: 0.05,
            strike_chance_pro: 0.40,
            strike_chance_intermediate: 0.25,
            headpin_hit_chance: 0.8,
            conversion_floor: 0.3,
        }
    }
}

impl SimulationWeights {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let weights: Self = serde_json::from_str(&content)?;
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> PfResult<()> {
        let chances = [
            ("pro_threshold", self.pro_threshold),
            ("intermediate_threshold", self.intermediate_threshold),
            ("foul_chance_pro", self.foul_chance_pro),
            ("foul_chance_intermediate", self.foul_chance_intermediate),
            ("foul_chance_novice", self.foul_chance_novice),
            ("strike_chance_pro", self.strike_chance_pro),
            ("strike_chance_intermediate", self.strike_chance_intermediate),
            ("headpin_hit_chance", self.headpin_hit_chance),
            ("conversion_floor", self.conversion_floor),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(PinfallError::Config(format!(
                    "{} must be within 0..=1, got {}",
                    name, value
                )));
            }
        }
        if self.intermediate_threshold > self.pro_threshold {
            return Err(PinfallError::Config(format!(
                "intermediate_threshold ({}) is above pro_threshold ({})",
                self.intermediate_threshold, self.pro_threshold
            )));
        }
        // Fixed band widths: pro 45% for 7-9, intermediate 35% + 30%.
        if self.strike_chance_pro > 0.55 {
            return Err(PinfallError::Config(format!(
                "strike_chance_pro ({}) leaves no room for the 7-9 band",
                self.strike_chance_pro
            )));
        }
        if self.strike_chance_intermediate > 0.35 {
            return Err(PinfallError::Config(format!(
                "strike_chance_intermediate ({}) leaves no room for the lower bands",
                self.strike_chance_intermediate
            )));
        }
        Ok(())
    }

    pub fn merge_from_cli(&mut self, cli_weights: &SimulationWeights, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_weights.$field;
                }
            };
        }

        update_if_present!(pro_threshold, "pro_threshold");
        update_if_present!(intermediate_threshold, "intermediate_threshold");

        update_if_present!(foul_chance_pro, "foul_chance_pro");
        update_if_present!(foul_chance_intermediate, "foul_chance_intermediate");
        update_if_present!(foul_chance_novice, "foul_chance_novice");

        update_if_present!(strike_chance_pro, "strike_chance_pro");
        update_if_present!(strike_chance_intermediate, "strike_chance_intermediate");
        update_if_present!(headpin_hit_chance, "headpin_hit_chance");

        update_if_present!(conversion_floor, "conversion_floor");
    }
}
