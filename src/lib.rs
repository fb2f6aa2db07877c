//! Speedy Sums - steer a car into the lane holding the right answer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (questions, player, answer column, game loop)
//! - `session`: Per-player context tying the simulation to score persistence
//! - `renderer`: Backend-agnostic scene painting plus the WebGPU pipeline
//! - `platform`: Native terminal frontend
//! - `persistence`: User records and best scores
//! - `settings`: Tuning and file locations

pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use persistence::{ScoreGateway, UserStore};
pub use session::Session;
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Playfield size in game units (origin top-left, y down)
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Frame cap and the nominal step every simulated frame represents
    pub const TARGET_FPS: u32 = 60;
    pub const FRAME_MS: f32 = 1000.0 / TARGET_FPS as f32;
    /// Longest frame credited to the session clock (stalls don't skip difficulty)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Session start
    pub const STARTING_LIVES: u8 = 3;

    /// Speed and difficulty curves
    pub const BASE_SPEED: f32 = 5.0;
    /// Seconds of play per +1 unit/frame of column speed
    pub const SPEED_TIME_DIVISOR: f32 = 10.0;
    /// Seconds of play per difficulty level
    pub const DIFFICULTY_PERIOD_SECS: f32 = 20.0;

    /// How long the correct/wrong dot stays visible
    pub const FEEDBACK_DURATION_MS: f32 = 1000.0;

    /// Car silhouette
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 10.0;
    pub const CAR_BODY_WIDTH: f32 = 60.0;
    pub const CAR_BODY_HEIGHT: f32 = 20.0;
    pub const CAR_ROOF_HEIGHT: f32 = 15.0;
    pub const CAR_WHEEL_RADIUS: f32 = 6.0;
    pub const PLAYER_HEIGHT: f32 = CAR_ROOF_HEIGHT + CAR_BODY_HEIGHT;

    /// Answer column
    pub const COLUMN_WIDTH: f32 = 200.0;
    pub const ZONE_GAP: f32 = 10.0;
    pub const ZONE_COUNT: usize = 3;

    /// Road markings
    pub const HIGHWAY_SPEED: f32 = 300.0;
    pub const DASH_WIDTH: f32 = 40.0;
    pub const DASH_HEIGHT: f32 = 10.0;
    pub const DASH_GAP: f32 = 60.0;
    pub const EDGE_LINE_THICKNESS: f32 = 20.0;

    /// Candidate answers per question
    pub const CANDIDATE_COUNT: usize = 3;
    /// Operand upper bound and decoy spread, per difficulty level
    pub const RANGE_PER_LEVEL: i64 = 10;
    /// Largest quotient for generated divisions
    pub const MAX_QUOTIENT: i64 = 10;
}

/// Milliseconds to whole seconds as f32
#[inline]
pub fn ms_to_secs(ms: f32) -> f32 {
    ms / 1000.0
}
