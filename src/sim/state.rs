//! Game state and core simulation types
//!
//! Everything a session needs between frames lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::column::AnswerColumn;
use super::highway::Highway;
use super::player::Player;
use super::question::Question;
use crate::consts::*;
use crate::settings::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen until pause is toggled again
    Paused,
    /// Out of lives
    GameOver,
}

/// Outcome shown by the feedback indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Wrong,
}

/// Most recent hit, timestamped on the session clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub at_ms: f32,
}

/// Things that happened during a frame, for frontends and the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Car hit the zone holding the answer
    CorrectHit { zone: usize, answer: i64 },
    /// Car hit a decoy
    WrongHit { zone: usize, picked: i64, answer: i64 },
    /// Column left the screen untouched
    ColumnMissed,
    Paused,
    Resumed,
    /// Lives reached zero
    GameOver { score: u32 },
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub lives: u8,
    pub score: u32,
    /// Session clock: milliseconds spent in `Playing`
    pub elapsed_ms: f32,
    /// Derived from `elapsed_ms`, never decreases
    pub difficulty: u32,
    /// Column step per frame, derived from `elapsed_ms`
    pub game_speed: f32,
    /// Simulated Playing frames
    pub frames: u64,
    pub player: Player,
    pub highway: Highway,
    pub column: AnswerColumn,
    pub question: Question,
    pub feedback: Option<Feedback>,
    /// Events from the latest frame (cleared at the start of each tick)
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let question = Question::generate(1, &mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            lives: tuning.starting_lives,
            score: 0,
            elapsed_ms: 0.0,
            difficulty: 1,
            game_speed: tuning.base_speed,
            frames: 0,
            player: Player::default(),
            highway: Highway::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT, tuning.highway_speed),
            column: AnswerColumn::default(),
            question,
            feedback: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// Park the column at the right edge with a fresh question
    pub fn respawn_column(&mut self) {
        self.column.respawn();
        self.question = Question::generate(self.difficulty, &mut self.rng);
    }

    pub fn elapsed_secs(&self) -> f32 {
        crate::ms_to_secs(self.elapsed_ms)
    }

    /// Feedback still inside its display window
    pub fn visible_feedback(&self) -> Option<FeedbackKind> {
        self.feedback
            .filter(|f| self.elapsed_ms - f.at_ms < self.tuning.feedback_duration_ms)
            .map(|f| f.kind)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
