use super::frame::{Frame, RollUpdate};
use super::roll::{Roll, RollInput};
use crate::consts::FRAME_COUNT;
use crate::error::{PfResult, PinfallError, StructuralViolation};
use crate::pins::PinConfiguration;
use crate::simulator::SimulatedRoll;
use crate::store::{FrameRecord, RollRecord};
use tracing::debug;

/// Running totals per frame; `None` while bonus rolls are outstanding.
pub type CumulativeScores = [Option<u32>; FRAME_COUNT];

/// Ten frames for one bowler in one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    bowler_id: String,
    frames: [Frame; FRAME_COUNT],
}

impl ScoreCard {
    pub fn new(bowler_id: impl Into<String>) -> Self {
        Self {
            bowler_id: bowler_id.into(),
            frames: std::array::from_fn(|i| Frame::new(i as u8 + 1)),
        }
    }

    pub fn bowler_id(&self) -> &str {
        &self.bowler_id
    }

    pub fn frames(&self) -> &[Frame; FRAME_COUNT] {
        &self.frames
    }

    pub fn frame(&self, frame_number: u8) -> Option<&Frame> {
        frame_number
            .checked_sub(1)
            .and_then(|i| self.frames.get(i as usize))
    }

    pub fn set_score(
        &mut self,
        frame_number: u8,
        roll_number: u8,
        pins: u8,
        config: Option<PinConfiguration>,
        split_override: Option<bool>,
    ) -> PfResult<RollUpdate> {
        self.apply(
            frame_number,
            roll_number,
            RollInput {
                pins,
                config,
                split: split_override,
                ..Default::default()
            },
        )
    }

    pub fn set_foul(
        &mut self,
        frame_number: u8,
        roll_number: u8,
        config: Option<PinConfiguration>,
    ) -> PfResult<RollUpdate> {
        self.apply(
            frame_number,
            roll_number,
            RollInput {
                config,
                foul: true,
                ..Default::default()
            },
        )
    }

    pub fn record_simulated(
        &mut self,
        frame_number: u8,
        roll_number: u8,
        roll: &SimulatedRoll,
    ) -> PfResult<RollUpdate> {
        if roll.foul {
            self.set_foul(frame_number, roll_number, Some(roll.config))
        } else {
            self.set_score(frame_number, roll_number, roll.pins, Some(roll.config), None)
        }
    }

    pub fn apply(
        &mut self,
        frame_number: u8,
        roll_number: u8,
        input: RollInput,
    ) -> PfResult<RollUpdate> {
        let Some(frame) = frame_number
            .checked_sub(1)
            .and_then(|i| self.frames.get_mut(i as usize))
        else {
            let violation = StructuralViolation::NoSuchSlot {
                frame: frame_number,
                roll: roll_number,
            };
            debug!("Ignoring roll: {}", violation);
            return Ok(RollUpdate::Ignored(violation));
        };

        let update = frame.apply(roll_number, input)?;
        if update.is_recorded() {
            self.refresh_frame_scores();
        }
        Ok(update)
    }

    /// Replaces a whole frame from a stored record, all or nothing.
    ///
    /// Rolls are applied in roll order whatever order they are stored in;
    /// slots never thrown are skipped.
    pub fn restore_frame(&mut self, record: &FrameRecord) -> PfResult<()> {
        let frame_number = record.frame_number;
        if !(1..=FRAME_COUNT as u8).contains(&frame_number) {
            return Err(PinfallError::Validation(format!(
                "frame number {} is outside 1..={}",
                frame_number, FRAME_COUNT
            )));
        }
        let mut rolls: Vec<&RollRecord> = record.rolls.iter().filter(|r| r.pins.is_some()).collect();
        rolls.sort_by_key(|r| r.roll_number);

        let mut frame = Frame::new(frame_number);
        for roll in rolls {
            if let RollUpdate::Ignored(violation) = frame.restore_roll(roll)? {
                return Err(PinfallError::Validation(violation.to_string()));
            }
        }

        self.frames[(frame_number - 1) as usize] = frame;
        self.refresh_frame_scores();
        Ok(())
    }

    /// Running total for each frame, or `None` where it is not yet known.
    ///
    /// Once a frame is undetermined every later entry is too, since a running
    /// total needs all earlier frames.
    pub fn cumulative_scores(&self) -> CumulativeScores {
        let mut totals = [None; FRAME_COUNT];
        let mut running = 0u32;
        for (i, slot) in totals.iter_mut().enumerate() {
            match self.frame_value(i) {
                Some(value) => {
                    running += value;
                    *slot = Some(running);
                }
                None => break,
            }
        }
        totals
    }

    /// Last determined running total, 0 before any frame resolves.
    pub fn final_score(&self) -> u32 {
        self.cumulative_scores()
            .iter()
            .rev()
            .find_map(|s| *s)
            .unwrap_or(0)
    }

    /// Frame and roll of the first open slot, `None` once the card is complete.
    pub fn current_slot(&self) -> Option<(u8, u8)> {
        self.frames
            .iter()
            .find_map(|f| f.next_roll().map(|r| (f.frame_number(), r)))
    }

    pub fn current_frame(&self) -> Option<u8> {
        self.current_slot().map(|(frame, _)| frame)
    }

    pub fn current_roll(&self) -> Option<u8> {
        self.current_slot().map(|(_, roll)| roll)
    }

    pub fn is_complete(&self) -> bool {
        self.current_slot().is_none()
    }

    pub fn strike_count(&self) -> usize {
        self.count_rolls(Roll::is_strike)
    }

    pub fn spare_count(&self) -> usize {
        self.count_rolls(Roll::is_spare)
    }

    pub fn split_count(&self) -> usize {
        self.count_rolls(Roll::is_split)
    }

    pub fn foul_count(&self) -> usize {
        self.count_rolls(Roll::is_foul)
    }

    fn count_rolls(&self, pred: fn(&Roll) -> bool) -> usize {
        self.frames
            .iter()
            .flat_map(|f| f.rolls())
            .filter(|r| r.is_recorded() && pred(r))
            .count()
    }

    /// Points earned by a single frame, bonuses included.
    fn frame_value(&self, idx: usize) -> Option<u32> {
        let frame = &self.frames[idx];
        if frame.is_final() {
            return frame.is_complete().then(|| frame.pinfall());
        }

        let first = &frame.rolls()[0];
        if !first.is_recorded() {
            return None;
        }
        if first.is_strike() {
            return self.bonus_after(idx, 2).map(|b| first.scoring_pins() + b);
        }

        let second = &frame.rolls()[1];
        if !second.is_recorded() {
            return None;
        }
        let base = first.scoring_pins() + second.scoring_pins();
        if second.is_spare() {
            return self.bonus_after(idx, 1).map(|b| base + b);
        }
        Some(base)
    }

    /// Sum of the next `count` rolls in bowling order after frame `idx`,
    /// or `None` if any of them is still unthrown.
    fn bonus_after(&self, idx: usize, count: usize) -> Option<u32> {
        let mut needed = count;
        let mut bonus = 0;
        for frame in &self.frames[idx + 1..] {
            for roll in &frame.rolls()[..frame.allowed_slots() as usize] {
                if needed == 0 {
                    return Some(bonus);
                }
                if !roll.is_recorded() {
                    return None;
                }
                bonus += roll.scoring_pins();
                needed -= 1;
            }
        }
        (needed == 0).then_some(bonus)
    }

    fn refresh_frame_scores(&mut self) {
        let totals = self.cumulative_scores();
        for (frame, total) in self.frames.iter_mut().zip(totals) {
            frame.set_frame_score(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll_all(card: &mut ScoreCard, pins: &[u8]) {
        for &p in pins {
            let (frame, roll) = card.current_slot().expect("card already complete");
            card.set_score(frame, roll, p, None, None).unwrap();
        }
    }

    #[test]
    fn test_perfect_game() {
        let mut card = ScoreCard::new("b");
        roll_all(&mut card, &[10; 12]);
        assert!(card.is_complete());
        assert_eq!(card.final_score(), 300);
    }

    #[test]
    fn test_strike_bonus() {
        let mut card = ScoreCard::new("b");
        roll_all(&mut card, &[10, 3, 4]);
        let totals = card.cumulative_scores();
        assert_eq!(totals[0], Some(17));
        assert_eq!(totals[1], Some(24));
        assert_eq!(totals[2], None);
        assert_eq!(card.frame(1).unwrap().frame_score(), Some(17));
    }

    #[test]
    fn test_spare_waits_for_next_ball() {
        let mut card = ScoreCard::new("b");
        roll_all(&mut card, &[5, 5]);
        assert_eq!(card.cumulative_scores()[0], None);
        assert_eq!(card.final_score(), 0);
        roll_all(&mut card, &[3]);
        assert_eq!(card.cumulative_scores()[0], Some(13));
    }

    #[test]
    fn test_double_in_ninth_reads_tenth() {
        let mut card = ScoreCard::new("b");
        roll_all(&mut card, &[0; 16]);
        roll_all(&mut card, &[10, 10]);
        assert_eq!(card.current_slot(), Some((10, 2)));
        assert_eq!(card.cumulative_scores()[8], None);
        roll_all(&mut card, &[10, 10]);
        assert_eq!(card.cumulative_scores()[8], Some(30));
        assert_eq!(card.final_score(), 60);
    }

    #[test]
    fn test_foul_counts_zero_in_bonus() {
        let mut card = ScoreCard::new("b");
        card.set_score(1, 1, 10, None, None).unwrap();
        card.set_foul(2, 1, None).unwrap();
        card.set_score(2, 2, 6, None, None).unwrap();
        let totals = card.cumulative_scores();
        assert_eq!(totals[0], Some(16));
        assert_eq!(totals[1], Some(22));
    }

    #[test]
    fn test_restore_frame_is_atomic() {
        fn stored(roll_number: u8, pins: u8) -> RollRecord {
            RollRecord {
                roll_number,
                pins: Some(pins),
                strike: None,
                spare: Some(pins == 4),
                split: None,
                foul: false,
                pin_data: None,
            }
        }

        let mut card = ScoreCard::new("b");
        let bad = FrameRecord {
            frame_number: 1,
            rolls: vec![stored(2, 6), stored(1, 6)],
            frame_score: None,
        };
        assert!(card.restore_frame(&bad).is_err());
        assert!(!card.frame(1).unwrap().rolls()[0].is_recorded());

        let good = FrameRecord {
            frame_number: 1,
            rolls: vec![stored(2, 4), stored(1, 6)],
            frame_score: Some(999),
        };
        card.restore_frame(&good).unwrap();
        assert!(card.frame(1).unwrap().is_spare());
        assert_eq!(card.frame(1).unwrap().frame_score(), None);
    }
}
