use crate::pins::PinConfiguration;

/// One ball thrown within a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roll {
    roll_number: u8,
    pins: Option<u8>,
    strike: bool,
    spare: bool,
    split: bool,
    foul: bool,
    config: Option<PinConfiguration>,
}

/// Strike/spare/split marks of a recorded roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollFlags {
    pub strike: bool,
    pub spare: bool,
    pub split: bool,
}

/// Marks read back from storage. `None` means the mark was not saved.
///
/// Strike and spare must agree with the rack the roll was thrown at; a saved
/// split is taken as a manual override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedMarks {
    pub strike: Option<bool>,
    pub spare: Option<bool>,
    pub split: Option<bool>,
}

/// Everything a caller can say about a roll when recording it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollInput {
    pub pins: u8,
    pub config: Option<PinConfiguration>,
    pub split: Option<bool>,
    pub foul: bool,
    pub saved: Option<SavedMarks>,
}

impl RollInput {
    pub fn pins(pins: u8) -> Self {
        Self {
            pins,
            ..Default::default()
        }
    }

    pub fn foul() -> Self {
        Self {
            foul: true,
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: PinConfiguration) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_split(mut self, split: bool) -> Self {
        self.split = Some(split);
        self
    }

    pub fn with_saved_marks(mut self, saved: SavedMarks) -> Self {
        self.saved = Some(saved);
        self
    }
}

impl Roll {
    pub fn new(roll_number: u8) -> Self {
        Self {
            roll_number,
            pins: None,
            strike: false,
            spare: false,
            split: false,
            foul: false,
            config: None,
        }
    }

    pub fn roll_number(&self) -> u8 {
        self.roll_number
    }

    /// Recorded pin count; `None` until the roll is thrown.
    pub fn pins(&self) -> Option<u8> {
        self.pins
    }

    pub fn is_recorded(&self) -> bool {
        self.pins.is_some()
    }

    /// Pins this roll contributes to any score. Fouls count zero.
    pub fn scoring_pins(&self) -> u32 {
        if self.foul {
            0
        } else {
            self.pins.unwrap_or(0) as u32
        }
    }

    pub fn is_strike(&self) -> bool {
        self.strike
    }

    pub fn is_spare(&self) -> bool {
        self.spare
    }

    pub fn is_split(&self) -> bool {
        self.split
    }

    pub fn is_foul(&self) -> bool {
        self.foul
    }

    pub fn config(&self) -> Option<&PinConfiguration> {
        self.config.as_ref()
    }

    pub fn flags(&self) -> RollFlags {
        RollFlags {
            strike: self.strike,
            spare: self.spare,
            split: self.split,
        }
    }

    pub(crate) fn record(
        &mut self,
        pins: u8,
        foul: bool,
        config: Option<PinConfiguration>,
        split: bool,
    ) {
        self.pins = Some(pins);
        self.foul = foul;
        self.config = config;
        self.split = split;
    }

    pub(crate) fn set_marks(&mut self, strike: bool, spare: bool) {
        self.strike = strike;
        self.spare = spare;
    }
}
