//! Scoresheet marks: `X` strike, `/` spare, `-` gutter, `F` foul, digits.

use crate::consts::PIN_COUNT;
use crate::error::{PfResult, PinfallError};
use crate::scorer::{Frame, Roll, ScoreCard};

/// One parsed ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrowMark {
    pub pins: u8,
    pub foul: bool,
}

impl ThrowMark {
    pub fn pins(pins: u8) -> Self {
        Self { pins, foul: false }
    }

    pub fn foul() -> Self {
        Self {
            pins: 0,
            foul: true,
        }
    }
}

/// Marks for one frame: two cells for frames 1-9, three for the tenth.
pub fn frame_marks(frame: &Frame) -> String {
    let rolls = frame.rolls();
    if !frame.is_final() && frame.is_strike() {
        return "X ".to_string();
    }
    rolls.iter().map(roll_mark).collect()
}

/// The 21-cell sheet for a whole card.
pub fn card_marks(card: &ScoreCard) -> String {
    card.frames().iter().map(frame_marks).collect()
}

fn roll_mark(roll: &Roll) -> char {
    match roll.pins() {
        None => ' ',
        Some(_) if roll.is_foul() => 'F',
        Some(_) if roll.is_strike() => 'X',
        Some(_) if roll.is_spare() => '/',
        Some(0) => '-',
        Some(p) if p as usize == PIN_COUNT => 'X',
        Some(p) => char::from(b'0' + p),
    }
}

/// Parses a game written in scoresheet marks, packed (`X7/9-`) or spaced
/// (`X 7 / 9 -`), into balls in bowling order.
pub fn parse_game(input: &str) -> PfResult<Vec<ThrowMark>> {
    let mut marks = Vec::new();
    // Pins down on the first ball of the rack currently being cleaned up.
    let mut pending: Option<u8> = None;

    for (pos, c) in input.chars().filter(|c| !c.is_whitespace()).enumerate() {
        let mark = match c.to_ascii_uppercase() {
            'X' => {
                if pending.is_some() {
                    return Err(bad_mark(pos, c, "strike after a first ball"));
                }
                ThrowMark::pins(PIN_COUNT as u8)
            }
            '/' => match pending.take() {
                Some(first) => {
                    marks.push(ThrowMark::pins(PIN_COUNT as u8 - first));
                    continue;
                }
                None if marks.is_empty() => {
                    return Err(bad_mark(pos, c, "spare cannot open a game"))
                }
                None => return Err(bad_mark(pos, c, "spare without a first ball")),
            },
            'F' => ThrowMark::foul(),
            '-' => ThrowMark::pins(0),
            d @ '0'..='9' => ThrowMark::pins(d as u8 - b'0'),
            _ => return Err(bad_mark(pos, c, "unknown mark")),
        };

        pending = match pending {
            Some(first) => {
                if first as u32 + mark.pins as u32 > PIN_COUNT as u32 {
                    return Err(bad_mark(pos, c, "more than ten pins in one rack"));
                }
                None
            }
            None if mark.pins as usize == PIN_COUNT => None,
            None => Some(mark.pins),
        };
        marks.push(mark);
    }

    Ok(marks)
}

fn bad_mark(pos: usize, c: char, reason: &str) -> PinfallError {
    PinfallError::Validation(format!("mark {} ('{}'): {}", pos + 1, c, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins(marks: &[ThrowMark]) -> Vec<u8> {
        marks.iter().map(|m| m.pins).collect()
    }

    #[test]
    fn test_packed_and_spaced_agree() {
        let packed = parse_game("X7/9-F4").unwrap();
        let spaced = parse_game("X 7 / 9 - F 4").unwrap();
        assert_eq!(packed, spaced);
        assert_eq!(pins(&packed), vec![10, 7, 3, 9, 0, 0, 4]);
        assert!(packed[5].foul);
    }

    #[test]
    fn test_rejects_bad_spares() {
        assert!(parse_game("/5").is_err());
        assert!(parse_game("X/").is_err());
        assert!(parse_game("7/").is_ok());
    }

    #[test]
    fn test_rejects_overfull_rack() {
        assert!(parse_game("78").is_err());
        assert!(parse_game("7X").is_err());
        assert!(parse_game("7?").is_err());
    }

    #[test]
    fn test_frame_marks() {
        let mut frame = Frame::new(1);
        assert_eq!(frame_marks(&frame), "  ");
        frame.set_roll_score(1, 0, None, None).unwrap();
        frame.set_roll_score(2, 10, None, None).unwrap();
        assert_eq!(frame_marks(&frame), "-/");

        let mut strike = Frame::new(4);
        strike.set_roll_score(1, 10, None, None).unwrap();
        assert_eq!(frame_marks(&strike), "X ");
    }

    #[test]
    fn test_tenth_frame_marks() {
        let mut frame = Frame::new(10);
        frame.set_roll_score(1, 10, None, None).unwrap();
        frame.set_roll_score(2, 7, None, None).unwrap();
        frame.set_roll_score(3, 3, None, None).unwrap();
        assert_eq!(frame_marks(&frame), "X7/");

        let mut fouled = Frame::new(10);
        fouled.record_foul(1, None).unwrap();
        fouled.set_roll_score(2, 9, None, None).unwrap();
        assert_eq!(frame_marks(&fouled), "F9 ");
    }
}
