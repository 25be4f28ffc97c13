use crate::consts::PIN_COUNT;
use crate::error::{PfResult, PinfallError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod split;

pub use split::{is_split, SplitDetector};

/// Physical neighbours of each pin (1-based), indexed by `pin - 1`.
///
/// Deck layout seen from the approach:
///
/// ```text
///  7  8  9  10
///    4  5  6
///      2  3
///        1
/// ```
pub const PIN_ADJACENCY: [&[usize]; PIN_COUNT] = [
    &[2, 3],
    &[1, 3, 4, 5],
    &[1, 2, 5, 6],
    &[2, 5, 7, 8],
    &[2, 3, 4, 6, 8, 9],
    &[3, 5, 9, 10],
    &[4, 8],
    &[4, 5, 7, 9],
    &[5, 6, 8, 10],
    &[6, 9],
];

/// Deck coordinates in pin spacings; x across the lane, y away from the foul line.
pub const PIN_POSITIONS: [(f32, f32); PIN_COUNT] = [
    (0.0, 0.0),
    (-0.5, 1.0),
    (0.5, 1.0),
    (-1.0, 2.0),
    (0.0, 2.0),
    (1.0, 2.0),
    (-1.5, 3.0),
    (-0.5, 3.0),
    (0.5, 3.0),
    (1.5, 3.0),
];

pub fn adjacent(pin: usize) -> &'static [usize] {
    match pin {
        1..=PIN_COUNT => PIN_ADJACENCY[pin - 1],
        _ => &[],
    }
}

/// Euclidean distance between two pins on the deck.
pub fn pin_distance(a: usize, b: usize) -> f32 {
    let (ax, ay) = PIN_POSITIONS[a - 1];
    let (bx, by) = PIN_POSITIONS[b - 1];
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

/// Standing/down state of the ten pins after a roll.
///
/// Only constructed through validating factories, so a value always holds
/// exactly ten pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PinConfiguration {
    standing: [bool; PIN_COUNT],
}

impl PinConfiguration {
    pub fn full_rack() -> Self {
        Self {
            standing: [true; PIN_COUNT],
        }
    }

    pub fn cleared() -> Self {
        Self {
            standing: [false; PIN_COUNT],
        }
    }

    pub fn from_standing(standing: &[bool]) -> PfResult<Self> {
        let standing: [bool; PIN_COUNT] = standing.try_into().map_err(|_| {
            PinfallError::Validation(format!(
                "pin configuration needs {} pins, got {}",
                PIN_COUNT,
                standing.len()
            ))
        })?;
        Ok(Self { standing })
    }

    /// Builds from `1` (standing) / `0` (down) flags, the persisted form.
    pub fn from_flags(flags: &[u8]) -> PfResult<Self> {
        if flags.len() != PIN_COUNT {
            return Err(PinfallError::Validation(format!(
                "pin configuration needs {} pins, got {}",
                PIN_COUNT,
                flags.len()
            )));
        }
        let mut standing = [false; PIN_COUNT];
        for (i, &flag) in flags.iter().enumerate() {
            standing[i] = match flag {
                0 => false,
                1 => true,
                other => {
                    return Err(PinfallError::Validation(format!(
                        "pin {} has flag {}, expected 0 or 1",
                        i + 1,
                        other
                    )))
                }
            };
        }
        Ok(Self { standing })
    }

    /// Builds a rack where only the listed pins (1-based) stand.
    pub fn from_standing_pins(pins: &[usize]) -> PfResult<Self> {
        let mut config = Self::cleared();
        for &pin in pins {
            if !(1..=PIN_COUNT).contains(&pin) {
                return Err(PinfallError::Validation(format!(
                    "pin {} is not on the deck",
                    pin
                )));
            }
            config.standing[pin - 1] = true;
        }
        Ok(config)
    }

    pub fn is_standing(&self, pin: usize) -> bool {
        (1..=PIN_COUNT).contains(&pin) && self.standing[pin - 1]
    }

    pub fn standing_count(&self) -> u8 {
        self.standing.iter().filter(|&&s| s).count() as u8
    }

    pub fn down_count(&self) -> u8 {
        PIN_COUNT as u8 - self.standing_count()
    }

    pub fn standing_pins(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=PIN_COUNT).filter(move |&p| self.standing[p - 1])
    }

    pub fn down_pins(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=PIN_COUNT).filter(move |&p| !self.standing[p - 1])
    }

    pub fn knock_down(&mut self, pin: usize) {
        if (1..=PIN_COUNT).contains(&pin) {
            self.standing[pin - 1] = false;
        }
    }

    /// First pin that is down in `before` but standing here, if any.
    /// Pins never get back up within a rack.
    pub fn resurrected_pin(&self, before: &PinConfiguration) -> Option<usize> {
        (1..=PIN_COUNT).find(|&p| !before.standing[p - 1] && self.standing[p - 1])
    }

    pub fn is_split(&self) -> bool {
        is_split(self)
    }

    pub fn to_flags(&self) -> [u8; PIN_COUNT] {
        let mut flags = [0u8; PIN_COUNT];
        for (i, &s) in self.standing.iter().enumerate() {
            flags[i] = s as u8;
        }
        flags
    }
}

impl Default for PinConfiguration {
    fn default() -> Self {
        Self::full_rack()
    }
}

impl TryFrom<Vec<u8>> for PinConfiguration {
    type Error = PinfallError;

    fn try_from(flags: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_flags(&flags)
    }
}

impl From<PinConfiguration> for Vec<u8> {
    fn from(config: PinConfiguration) -> Self {
        config.to_flags().to_vec()
    }
}

impl fmt::Display for PinConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: [&[usize]; 4] = [&[7, 8, 9, 10], &[4, 5, 6], &[2, 3], &[1]];
        for (depth, row) in rows.iter().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", " ".repeat(depth * 2))?;
            let cells: Vec<String> = row
                .iter()
                .map(|&p| {
                    if self.is_standing(p) {
                        format!("{:>2}", p)
                    } else {
                        " .".to_string()
                    }
                })
                .collect();
            write!(f, "{}", cells.join("  "))?;
        }
        Ok(())
    }
}
