//! Persisted bowlers, games and score cards.
//!
//! Loading is tolerant: a corrupt record is skipped with a warning and the
//! rest of the file still loads. Only a file that is not a state at all
//! resets to empty.

use crate::consts::{AVERAGE_WINDOW, DEFAULT_BOWLER_SKILL};
use crate::error::PfResult;
use crate::pins::PinConfiguration;
use crate::scorer::{Roll, RollInput, RollUpdate, SavedMarks, ScoreCard};
use crate::simulator::Skill;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub bowlers: Vec<BowlerRecord>,
    pub games: Vec<GameRecord>,
    /// Id of the game in progress.
    #[serde(default)]
    pub current_game: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerRecord {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub games: Vec<String>,
    #[serde(default)]
    pub skill: Option<Skill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub name: String,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default)]
    pub bowler_ids: Vec<String>,
    #[serde(default)]
    pub scorecards: Vec<ScoreCardRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCardRecord {
    pub bowler_id: String,
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_number: u8,
    #[serde(default)]
    pub rolls: Vec<RollRecord>,
    #[serde(default)]
    pub frame_score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    pub roll_number: u8,
    #[serde(default)]
    pub pins: Option<u8>,
    /// Marks left out of a saved file are worked out from the pins.
    #[serde(default)]
    pub strike: Option<bool>,
    #[serde(default)]
    pub spare: Option<bool>,
    #[serde(default)]
    pub split: Option<bool>,
    #[serde(default)]
    pub foul: bool,
    /// Ten `0`/`1` flags, `1` = standing.
    #[serde(default)]
    pub pin_data: Option<PinConfiguration>,
}

fn default_color() -> String {
    "red".to_string()
}

impl RollRecord {
    pub fn from_roll(roll: &Roll) -> Self {
        let flags = roll.flags();
        Self {
            roll_number: roll.roll_number(),
            pins: roll.pins(),
            strike: Some(flags.strike),
            spare: Some(flags.spare),
            split: Some(flags.split),
            foul: roll.is_foul(),
            pin_data: roll.config().copied(),
        }
    }

    /// Scorer input for this record. Saved marks are only consulted when
    /// there is no pin configuration to derive them from.
    pub fn to_input(&self) -> RollInput {
        let input = RollInput {
            pins: self.pins.unwrap_or(0),
            foul: self.foul,
            ..Default::default()
        };
        match self.pin_data {
            Some(config) => input.with_config(config),
            None => input.with_saved_marks(SavedMarks {
                strike: self.strike,
                spare: self.spare,
                split: self.split,
            }),
        }
    }
}

impl ScoreCardRecord {
    pub fn from_card(card: &ScoreCard) -> Self {
        Self {
            bowler_id: card.bowler_id().to_string(),
            frames: card
                .frames()
                .iter()
                .map(|f| FrameRecord {
                    frame_number: f.frame_number(),
                    rolls: f.rolls().iter().map(RollRecord::from_roll).collect(),
                    frame_score: f.frame_score(),
                })
                .collect(),
        }
    }

    /// Rebuilds the card in frame order. Frames that no longer validate are
    /// left empty.
    pub fn to_card(&self) -> ScoreCard {
        let mut card = ScoreCard::new(self.bowler_id.clone());
        let mut frames: Vec<&FrameRecord> = self.frames.iter().collect();
        frames.sort_by_key(|f| f.frame_number);
        for frame in frames {
            if let Err(e) = card.restore_frame(frame) {
                warn!(
                    bowler = %self.bowler_id,
                    frame = frame.frame_number,
                    "Skipping frame: {}",
                    e
                );
            }
        }
        card
    }
}

impl SavedState {
    /// Reads a state file. A missing file is an empty state.
    pub fn load<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No saved state at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> PfResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Parses record by record, dropping whatever is corrupt.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                error!("Saved state is not JSON, starting empty: {}", e);
                Self::default()
            }
        }
    }

    fn from_value(value: &Value) -> Self {
        let (Some(bowlers), Some(games)) = (
            value.get("bowlers").and_then(Value::as_array),
            value.get("games").and_then(Value::as_array),
        ) else {
            error!("Saved state has no bowlers/games lists, starting empty");
            return Self::default();
        };

        let mut state = Self {
            bowlers: parse_each(bowlers, "bowler"),
            ..Default::default()
        };

        for (i, raw) in games.iter().enumerate() {
            match serde_json::from_value::<RawGame>(raw.clone()) {
                Ok(game) => {
                    let game = state.restore_game(game);
                    state.games.push(game);
                }
                Err(e) => warn!("Skipping game #{}: {}", i, e),
            }
        }

        state.current_game = value
            .get("current_game")
            .and_then(|g| g.as_str().or_else(|| g.get("id").and_then(Value::as_str)))
            .filter(|id| state.game(id).is_some())
            .map(str::to_string);

        debug!(
            "Loaded {} bowlers, {} games",
            state.bowlers.len(),
            state.games.len()
        );
        state
    }

    fn restore_game(&self, raw: RawGame) -> GameRecord {
        let scorecards = if raw.scorecards.is_empty() {
            raw.bowler_ids
                .iter()
                .filter(|id| self.bowler(id).is_some())
                .map(|id| ScoreCardRecord::from_card(&ScoreCard::new(id.clone())))
                .collect()
        } else {
            let cards: Vec<RawCard> = parse_each(&raw.scorecards, "score card");
            cards
                .into_iter()
                .map(|c| ScoreCardRecord {
                    frames: parse_each(&c.frames, "frame"),
                    bowler_id: c.bowler_id,
                })
                .filter(|c| {
                    let known = self.bowler(&c.bowler_id).is_some();
                    if !known {
                        warn!(
                            game = %raw.id,
                            "Skipping score card of unknown bowler {}",
                            c.bowler_id
                        );
                    }
                    known
                })
                // Re-derive so only validated frames and fresh totals survive.
                .map(|c| ScoreCardRecord::from_card(&c.to_card()))
                .collect()
        };

        GameRecord {
            id: raw.id,
            name: raw.name,
            timestamp: raw.timestamp,
            bowler_ids: raw.bowler_ids,
            scorecards,
        }
    }

    pub fn bowler(&self, id: &str) -> Option<&BowlerRecord> {
        self.bowlers.iter().find(|b| b.id == id)
    }

    pub fn game(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn current_game(&self) -> Option<&GameRecord> {
        self.current_game.as_deref().and_then(|id| self.game(id))
    }

    pub fn add_bowler(&mut self, name: impl Into<String>) -> &BowlerRecord {
        let id = next_id("bowler", self.bowlers.iter().map(|b| b.id.as_str()));
        self.bowlers.push(BowlerRecord {
            id,
            name: name.into(),
            color: "primary".to_string(),
            games: Vec::new(),
            skill: Some(Skill::clamped(DEFAULT_BOWLER_SKILL)),
        });
        &self.bowlers[self.bowlers.len() - 1]
    }

    /// Removes the bowler and every trace of them in stored games.
    pub fn remove_bowler(&mut self, id: &str) -> bool {
        let before = self.bowlers.len();
        self.bowlers.retain(|b| b.id != id);
        if self.bowlers.len() == before {
            return false;
        }
        for game in &mut self.games {
            game.bowler_ids.retain(|b| b != id);
            game.scorecards.retain(|c| c.bowler_id != id);
        }
        true
    }

    /// Starts a game for the known bowlers among `bowler_ids` and makes it
    /// current.
    pub fn start_new_game(&mut self, bowler_ids: &[String], name: impl Into<String>) -> String {
        let id = next_id("game", self.games.iter().map(|g| g.id.as_str()));
        let bowler_ids: Vec<String> = bowler_ids
            .iter()
            .filter(|b| self.bowler(b).is_some())
            .cloned()
            .collect();
        for bowler in self.bowlers.iter_mut().filter(|b| bowler_ids.contains(&b.id)) {
            bowler.games.push(id.clone());
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.games.push(GameRecord {
            id: id.clone(),
            name: name.into(),
            timestamp,
            scorecards: bowler_ids
                .iter()
                .map(|b| ScoreCardRecord::from_card(&ScoreCard::new(b.clone())))
                .collect(),
            bowler_ids,
        });
        self.current_game = Some(id.clone());
        id
    }

    pub fn end_current_game(&mut self) {
        self.current_game = None;
    }

    /// Scores `pins` at the bowler's next open slot in the current game.
    /// `None` without a current game, a card for the bowler, or an open slot.
    pub fn add_roll(&mut self, bowler_id: &str, pins: u8) -> PfResult<Option<RollUpdate>> {
        let Some(record) = self
            .current_game
            .as_deref()
            .and_then(|id| self.games.iter_mut().find(|g| g.id == id))
            .and_then(|g| g.scorecards.iter_mut().find(|c| c.bowler_id == bowler_id))
        else {
            debug!("No current card for bowler {}", bowler_id);
            return Ok(None);
        };

        let mut card = record.to_card();
        let Some((frame, roll)) = card.current_slot() else {
            return Ok(None);
        };
        let update = card.set_score(frame, roll, pins, None, None)?;
        *record = ScoreCardRecord::from_card(&card);
        Ok(Some(update))
    }

    /// Mean of the bowler's non-zero final scores over their last twelve
    /// games, to two decimals; 0 when there are none.
    pub fn bowler_average(&self, bowler_id: &str) -> f64 {
        let scores: Vec<u32> = self
            .games
            .iter()
            .rev()
            .filter(|g| g.bowler_ids.iter().any(|b| b == bowler_id))
            .take(AVERAGE_WINDOW)
            .filter_map(|g| g.scorecards.iter().find(|c| c.bowler_id == bowler_id))
            .map(|c| c.to_card().final_score())
            .filter(|&s| s > 0)
            .collect();

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
        (mean * 100.0).round() / 100.0
    }
}

/// A game as stored, with its cards still unparsed.
#[derive(Deserialize)]
struct RawGame {
    id: String,
    name: String,
    #[serde(default)]
    timestamp: u64,
    #[serde(default)]
    bowler_ids: Vec<String>,
    #[serde(default)]
    scorecards: Vec<Value>,
}

#[derive(Deserialize)]
struct RawCard {
    bowler_id: String,
    #[serde(default)]
    frames: Vec<Value>,
}

fn parse_each<T: DeserializeOwned>(values: &[Value], what: &str) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value::<T>(v.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping {} #{}: {}", what, i, e);
                None
            }
        })
        .collect()
}

fn next_id<'a>(prefix: &str, taken: impl Iterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.collect();
    (taken.len() + 1..)
        .map(|n| format!("{}_{}", prefix, n))
        .find(|id| !taken.contains(&id.as_str()))
        .unwrap_or_else(|| prefix.to_string())
}
