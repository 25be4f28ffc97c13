/// Pins in a full rack.
pub const PIN_COUNT: usize = 10;

/// Frames in a game.
pub const FRAME_COUNT: usize = 10;

/// Roll slots in frames 1-9.
pub const OPEN_FRAME_SLOTS: usize = 2;

/// Roll slots in the tenth frame (the third only when earned).
pub const FINAL_FRAME_SLOTS: usize = 3;

/// Highest possible game.
pub const PERFECT_GAME: u32 = 300;

/// Games considered by the rolling bowler average.
pub const AVERAGE_WINDOW: usize = 12;

/// Skill used when a bowler carries no rating.
pub const DEFAULT_SIMULATION_SKILL: f32 = 0.5;

/// Skill given to bowlers created through the store.
pub const DEFAULT_BOWLER_SKILL: f32 = 0.7;
