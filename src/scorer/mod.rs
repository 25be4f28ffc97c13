//! Frame/roll model and the cumulative scoring algorithm.

pub mod card;
pub mod frame;
pub mod roll;

pub use card::{CumulativeScores, ScoreCard};
pub use frame::{Frame, Rack, RollUpdate};
pub use roll::{Roll, RollFlags, RollInput, SavedMarks};
