use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinfallError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Validation Error: {0}")]
    Validation(String),
}

pub type PfResult<T> = Result<T, PinfallError>;

/// A roll slot that cannot legally be scored in the frame's current state.
///
/// These are not failures: the mutation is dropped and the frame is left
/// untouched, so replaying the same input twice is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralViolation {
    /// Roll number outside the frame's slots (0, 3 in frames 1-9, 4+ in frame 10).
    NoSuchSlot { frame: u8, roll: u8 },
    /// Roll 2 of frames 1-9 after a strike.
    FrameClosedByStrike { frame: u8 },
    /// Roll 3 of frame 10 without a strike or spare in the first two rolls.
    BonusNotEarned,
    /// The preceding roll of the same frame has not been recorded.
    PreviousRollMissing { frame: u8, roll: u8 },
    /// Editing this roll would leave a later recorded roll illegal.
    WouldStrandLaterRoll { frame: u8, roll: u8 },
}

impl fmt::Display for StructuralViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchSlot { frame, roll } => {
                write!(f, "frame {} has no roll slot {}", frame, roll)
            }
            Self::FrameClosedByStrike { frame } => {
                write!(f, "frame {} was closed by a strike", frame)
            }
            Self::BonusNotEarned => write!(f, "tenth-frame bonus roll was not earned"),
            Self::PreviousRollMissing { frame, roll } => {
                write!(f, "frame {} roll {} comes before its predecessor", frame, roll)
            }
            Self::WouldStrandLaterRoll { frame, roll } => {
                write!(
                    f,
                    "changing frame {} roll {} would invalidate a later roll",
                    frame, roll
                )
            }
        }
    }
}
