//! A signed-in player's run: game state, tuning and the score gateway

use crate::persistence::ScoreGateway;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Explicit context passed to update and render, replacing process-wide
/// "current user" / "current game" globals
pub struct Session<G: ScoreGateway> {
    user: String,
    gateway: G,
    settings: Settings,
    state: GameState,
    /// Best score as of the last gateway read
    best_score: u32,
}

impl<G: ScoreGateway> Session<G> {
    pub fn new(user: impl Into<String>, gateway: G, settings: Settings, seed: u64) -> Self {
        let user = user.into().trim().to_string();
        let best_score = gateway.get_best_score(&user);
        let state = GameState::with_tuning(seed, settings.tuning.clone());
        log::info!(
            "Session for {} started with seed {} (best score {})",
            user,
            seed,
            best_score
        );
        Self {
            user,
            gateway,
            settings,
            state,
            best_score,
        }
    }

    /// Run one frame and react to what happened in it.
    /// Returns the frame's events.
    pub fn frame(&mut self, input: &TickInput, elapsed_ms: f32) -> &[GameEvent] {
        tick(&mut self.state, input, elapsed_ms);

        let final_score = self.state.events.iter().find_map(|e| match e {
            GameEvent::GameOver { score } => Some(*score),
            _ => None,
        });
        if let Some(score) = final_score {
            self.record_final_score(score);
        }

        &self.state.events
    }

    /// Hand the final score to the gateway (it only keeps new bests)
    fn record_final_score(&mut self, score: u32) {
        match self.gateway.update_best_score(&self.user, score) {
            Ok(true) => log::info!("{} set a new best score: {}", self.user, score),
            Ok(false) => {}
            Err(e) => log::warn!("Could not save score for {}: {}", self.user, e),
        }
        self.best_score = self.gateway.get_best_score(&self.user).max(self.best_score);
    }

    /// Start over with fresh state
    pub fn restart(&mut self, seed: u64) {
        self.state = GameState::with_tuning(seed, self.settings.tuning.clone());
        self.best_score = self.gateway.get_best_score(&self.user);
        log::info!("Session for {} restarted with seed {}", self.user, seed);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }
}
