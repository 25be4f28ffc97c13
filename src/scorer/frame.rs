use super::roll::{Roll, RollInput, SavedMarks};
use crate::consts::{FINAL_FRAME_SLOTS, FRAME_COUNT, OPEN_FRAME_SLOTS, PIN_COUNT};
use crate::error::{PfResult, PinfallError, StructuralViolation};
use crate::pins::{is_split, PinConfiguration};
use crate::store::RollRecord;
use tracing::debug;

/// Outcome of a roll mutation that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollUpdate {
    Recorded,
    Ignored(StructuralViolation),
}

impl RollUpdate {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Pins on the deck just before a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rack {
    pub fresh: bool,
    pub down: u8,
    pub layout: Option<PinConfiguration>,
}

impl Rack {
    pub fn fresh() -> Self {
        Self {
            fresh: true,
            down: 0,
            layout: Some(PinConfiguration::full_rack()),
        }
    }

    pub fn standing(&self) -> u8 {
        PIN_COUNT as u8 - self.down
    }
}

/// One of the ten scoring units of a game.
///
/// Frames 1-9 hold two roll slots; the tenth holds three, the last of which
/// only becomes legal after a strike or spare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    frame_number: u8,
    rolls: Vec<Roll>,
    frame_score: Option<u32>,
}

impl Frame {
    pub fn new(frame_number: u8) -> Self {
        let slots = if frame_number as usize == FRAME_COUNT {
            FINAL_FRAME_SLOTS
        } else {
            OPEN_FRAME_SLOTS
        };
        Self {
            frame_number,
            rolls: (1..=slots as u8).map(Roll::new).collect(),
            frame_score: None,
        }
    }

    pub fn frame_number(&self) -> u8 {
        self.frame_number
    }

    pub fn is_final(&self) -> bool {
        self.frame_number as usize == FRAME_COUNT
    }

    /// All roll slots, recorded or not.
    pub fn rolls(&self) -> &[Roll] {
        &self.rolls
    }

    pub fn roll(&self, roll_number: u8) -> Option<&Roll> {
        roll_number
            .checked_sub(1)
            .and_then(|i| self.rolls.get(i as usize))
    }

    fn recorded(&self, roll_number: u8) -> Option<&Roll> {
        self.roll(roll_number).filter(|r| r.is_recorded())
    }

    /// Running total through this frame, once it can be determined.
    pub fn frame_score(&self) -> Option<u32> {
        self.frame_score
    }

    pub(crate) fn set_frame_score(&mut self, score: Option<u32>) {
        self.frame_score = score;
    }

    pub fn is_strike(&self) -> bool {
        self.recorded(1).is_some_and(Roll::is_strike)
    }

    pub fn is_spare(&self) -> bool {
        self.recorded(2).is_some_and(Roll::is_spare)
    }

    pub fn bonus_earned(&self) -> bool {
        self.is_final() && (self.is_strike() || self.is_spare())
    }

    /// Roll slots that can legally hold a roll given what is recorded so far.
    pub fn allowed_slots(&self) -> u8 {
        if self.is_final() {
            if self.bonus_earned() {
                3
            } else {
                2
            }
        } else if self.is_strike() {
            1
        } else {
            2
        }
    }

    /// First legal slot without a recorded pin count.
    pub fn next_roll(&self) -> Option<u8> {
        (1..=self.allowed_slots()).find(|&n| !self.rolls[(n - 1) as usize].is_recorded())
    }

    pub fn is_complete(&self) -> bool {
        self.next_roll().is_none()
    }

    /// Pins scored by the frame's own rolls, fouls excluded.
    pub fn pinfall(&self) -> u32 {
        self.rolls.iter().map(Roll::scoring_pins).sum()
    }

    /// Rack state just before `roll_number` is thrown.
    pub fn rack_before(&self, roll_number: u8) -> Rack {
        if roll_number <= 1 {
            return Rack::fresh();
        }
        let Some(prev) = self.rolls.get((roll_number - 2) as usize) else {
            return Rack::fresh();
        };
        if self.is_final() && (prev.is_strike() || prev.is_spare()) {
            return Rack::fresh();
        }
        let before = self.rack_before(roll_number - 1);
        let down = (before.down as u32 + prev.scoring_pins()).min(PIN_COUNT as u32) as u8;
        Rack {
            fresh: false,
            down,
            layout: prev.config().copied(),
        }
    }

    pub fn set_roll_score(
        &mut self,
        roll_number: u8,
        pins: u8,
        config: Option<PinConfiguration>,
        split_override: Option<bool>,
    ) -> PfResult<RollUpdate> {
        self.apply(
            roll_number,
            RollInput {
                pins,
                config,
                split: split_override,
                ..Default::default()
            },
        )
    }

    /// Records a foul: zero pins, rack left as it was.
    pub fn record_foul(
        &mut self,
        roll_number: u8,
        config: Option<PinConfiguration>,
    ) -> PfResult<RollUpdate> {
        self.apply(
            roll_number,
            RollInput {
                config,
                foul: true,
                ..Default::default()
            },
        )
    }

    /// Re-applies a persisted roll. Without a stored pin configuration the
    /// saved strike/spare marks are checked against the rack and a saved
    /// split mark is kept.
    pub fn restore_roll(&mut self, record: &RollRecord) -> PfResult<RollUpdate> {
        if record.pins.is_none() {
            return Err(PinfallError::Validation(format!(
                "frame {} roll {} has no pin count to restore",
                self.frame_number, record.roll_number
            )));
        }
        self.apply(record.roll_number, record.to_input())
    }

    /// Validates, records and classifies one roll.
    ///
    /// Validation failures return `Err` and leave the frame untouched.
    /// Slots that cannot exist yet are reported as `RollUpdate::Ignored`.
    pub fn apply(&mut self, roll_number: u8, input: RollInput) -> PfResult<RollUpdate> {
        if input.pins as usize > PIN_COUNT {
            return Err(PinfallError::Validation(format!(
                "{} pins is outside 0..={}",
                input.pins, PIN_COUNT
            )));
        }
        if input.foul && input.pins != 0 {
            return Err(PinfallError::Validation(format!(
                "foul on frame {} roll {} must score 0 pins, got {}",
                self.frame_number, roll_number, input.pins
            )));
        }

        if let Some(violation) = self.slot_violation(roll_number) {
            debug!(
                frame = self.frame_number,
                roll = roll_number,
                "Ignoring roll: {}",
                violation
            );
            return Ok(RollUpdate::Ignored(violation));
        }

        let rack = self.rack_before(roll_number);
        if input.pins > rack.standing() {
            return Err(PinfallError::Validation(format!(
                "frame {} roll {}: {} pins down but only {} standing",
                self.frame_number,
                roll_number,
                input.pins,
                rack.standing()
            )));
        }

        let idx = (roll_number - 1) as usize;
        let existing = &self.rolls[idx];

        let config = match input.config {
            Some(cfg) => {
                check_layout(&cfg, &rack, input.pins)?;
                Some(cfg)
            }
            None => match existing.config() {
                Some(prev) if existing.pins() == Some(input.pins) && existing.is_foul() == input.foul => {
                    Some(*prev)
                }
                Some(_) => {
                    return Err(PinfallError::Validation(format!(
                        "frame {} roll {} already has a pin configuration; supply a matching one",
                        self.frame_number, roll_number
                    )))
                }
                None => None,
            },
        };

        if let (None, Some(saved)) = (&config, &input.saved) {
            check_saved_marks(saved, &rack, &input)?;
        }

        let manual_split = input.split.or(input.saved.and_then(|m| m.split));
        let split = match (&config, manual_split) {
            (Some(cfg), _) => is_split(cfg),
            (None, Some(s)) => s,
            (None, None) if existing.pins() == Some(input.pins) => existing.is_split(),
            (None, None) => false,
        };

        let mut candidate = self.clone();
        candidate.rolls[idx].record(input.pins, input.foul, config, split);
        candidate.classify();

        if candidate.strands_later_roll(roll_number) {
            let violation = StructuralViolation::WouldStrandLaterRoll {
                frame: self.frame_number,
                roll: roll_number,
            };
            debug!(
                frame = self.frame_number,
                roll = roll_number,
                "Ignoring roll: {}",
                violation
            );
            return Ok(RollUpdate::Ignored(violation));
        }

        *self = candidate;
        Ok(RollUpdate::Recorded)
    }

    fn slot_violation(&self, roll_number: u8) -> Option<StructuralViolation> {
        let frame = self.frame_number;
        if roll_number == 0 || roll_number as usize > self.rolls.len() {
            return Some(StructuralViolation::NoSuchSlot {
                frame,
                roll: roll_number,
            });
        }
        if roll_number > 1 && !self.rolls[(roll_number - 2) as usize].is_recorded() {
            return Some(StructuralViolation::PreviousRollMissing {
                frame,
                roll: roll_number,
            });
        }
        if !self.is_final() && roll_number == 2 && self.is_strike() {
            return Some(StructuralViolation::FrameClosedByStrike { frame });
        }
        if self.is_final() && roll_number == 3 && !self.bonus_earned() {
            return Some(StructuralViolation::BonusNotEarned);
        }
        None
    }

    /// Re-derives strike/spare marks from the rack each roll was thrown at.
    fn classify(&mut self) {
        for i in 0..self.rolls.len() {
            let roll = &self.rolls[i];
            if !roll.is_recorded() {
                continue;
            }
            let rack = self.rack_before(i as u8 + 1);
            let pins = roll.pins().unwrap_or(0) as usize;
            let (strike, spare) = if roll.is_foul() {
                (false, false)
            } else if rack.fresh {
                (pins == PIN_COUNT, false)
            } else {
                (false, rack.down as usize + pins == PIN_COUNT)
            };
            self.rolls[i].set_marks(strike, spare);
        }
    }

    fn strands_later_roll(&self, roll_number: u8) -> bool {
        for later in (roll_number + 1)..=(self.rolls.len() as u8) {
            let roll = &self.rolls[(later - 1) as usize];
            let Some(pins) = roll.pins() else {
                continue;
            };
            if self.slot_violation(later).is_some() {
                return true;
            }
            let rack = self.rack_before(later);
            if pins > rack.standing() {
                return true;
            }
            if let Some(cfg) = roll.config() {
                if check_layout(cfg, &rack, pins).is_err() {
                    return true;
                }
            }
        }
        false
    }
}

fn check_layout(config: &PinConfiguration, rack: &Rack, pins: u8) -> PfResult<()> {
    let expected = rack.down + pins;
    if config.down_count() != expected {
        return Err(PinfallError::Validation(format!(
            "pin configuration shows {} pins down, expected {}",
            config.down_count(),
            expected
        )));
    }
    if let Some(before) = rack.layout {
        if let Some(pin) = config.resurrected_pin(&before) {
            return Err(PinfallError::Validation(format!(
                "pin {} was already down before this roll",
                pin
            )));
        }
    }
    Ok(())
}

fn check_saved_marks(saved: &SavedMarks, rack: &Rack, input: &RollInput) -> PfResult<()> {
    let cleared = rack.down as usize + input.pins as usize == PIN_COUNT && !input.foul;
    let strike = rack.fresh && cleared;
    let spare = !rack.fresh && cleared;
    if saved.strike.is_some_and(|s| s != strike) {
        return Err(PinfallError::Validation(format!(
            "saved strike mark does not match {} pins",
            input.pins
        )));
    }
    if saved.spare.is_some_and(|s| s != spare) {
        return Err(PinfallError::Validation(format!(
            "saved spare mark does not match {} pins",
            input.pins
        )));
    }
    Ok(())
}
