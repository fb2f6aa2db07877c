//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed zone order (top to bottom) for collision tests
//! - No rendering or platform dependencies

pub mod collision;
pub mod column;
pub mod highway;
pub mod player;
pub mod question;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_hit};
pub use column::AnswerColumn;
pub use highway::Highway;
pub use player::{Player, PlayerInput};
pub use question::{Operator, Question};
pub use state::{Feedback, FeedbackKind, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
