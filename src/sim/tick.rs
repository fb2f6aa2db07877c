//! Per-frame simulation step
//!
//! Motion is frame-stepped: every Playing tick moves the column by
//! `game_speed`, the car by one input step and the road by one nominal
//! frame. Real elapsed time only feeds the session clock, which drives
//! speed, difficulty and the feedback window.

use super::collision::first_hit;
use super::player::PlayerInput;
use super::state::{Feedback, FeedbackKind, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held this frame
    pub up: bool,
    /// Held this frame
    pub down: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

impl TickInput {
    pub fn movement(&self) -> PlayerInput {
        PlayerInput {
            up: self.up,
            down: self.down,
        }
    }
}

/// Advance the game by one frame. `elapsed_ms` is the real time since the
/// previous frame.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.frames += 1;
    state.elapsed_ms += elapsed_ms.clamp(0.0, MAX_FRAME_MS);

    // Speed and difficulty only ever ratchet up
    let secs = state.elapsed_secs();
    state.game_speed = state.game_speed.max(state.tuning.game_speed(secs));
    state.difficulty = state.difficulty.max(state.tuning.difficulty(secs));

    state
        .player
        .move_by(input.movement().delta_y(state.tuning.player_speed));

    state.column.advance(state.game_speed);
    if state.column.is_off_screen() {
        state.respawn_column();
        state.events.push(GameEvent::ColumnMissed);
    }

    resolve_collision(state);

    state.highway.advance(FRAME_MS);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
    }
}

/// Resolve at most one zone hit. Zones are tested top to bottom and the
/// first overlap wins; the column respawns immediately, so nothing else can
/// be hit this frame.
fn resolve_collision(state: &mut GameState) -> Option<FeedbackKind> {
    let zones = state.column.zones();
    let zone = first_hit(&state.player.bounds(), &zones)?;

    let picked = state.question.candidates[zone];
    let answer = state.question.answer;
    let kind = if state.question.is_correct(picked) {
        state.score += 1;
        state.events.push(GameEvent::CorrectHit { zone, answer });
        FeedbackKind::Correct
    } else {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::WrongHit {
            zone,
            picked,
            answer,
        });
        FeedbackKind::Wrong
    };
    log::debug!(
        "{:?} hit on zone {} ({} for {}), score {}, lives {}",
        kind,
        zone,
        picked,
        state.question.text,
        state.score,
        state.lives
    );

    state.feedback = Some(Feedback {
        kind,
        at_ms: state.elapsed_ms,
    });
    state.respawn_column();
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = FRAME_MS;

    /// Put the car inside `zone` with the column about to reach it
    fn line_up(state: &mut GameState, zone: usize) {
        state.player.pos.y = state.column.zones()[zone].min.y + 50.0;
        state.column.x = PLAYER_X;
    }

    fn wrong_zone(state: &GameState) -> usize {
        (state.question.correct_index() + 1) % ZONE_COUNT
    }

    #[test]
    fn test_correct_hit() {
        let mut state = GameState::new(2024);
        let before = state.question.clone();
        line_up(&mut state, before.correct_index());

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_ne!(state.question, before);
        assert_eq!(state.column.x, PLAYFIELD_WIDTH);
        assert_eq!(state.visible_feedback(), Some(FeedbackKind::Correct));
        assert_eq!(
            state.events,
            vec![GameEvent::CorrectHit {
                zone: before.correct_index(),
                answer: before.answer
            }]
        );
    }

    #[test]
    fn test_wrong_hit() {
        let mut state = GameState::new(5);
        let zone = wrong_zone(&state);
        line_up(&mut state, zone);

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.column.x, PLAYFIELD_WIDTH);
        assert_eq!(state.visible_feedback(), Some(FeedbackKind::Wrong));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_three_wrong_hits_end_the_game() {
        let mut state = GameState::new(9);

        // One correct hit first so the final score is non-zero
        let zone = state.question.correct_index();
        line_up(&mut state, zone);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.score, 1);

        for expected_lives in (0..STARTING_LIVES).rev() {
            let zone = wrong_zone(&state);
            line_up(&mut state, zone);
            tick(&mut state, &TickInput::default(), DT);
            assert_eq!(state.lives, expected_lives);
            assert_eq!(state.score, 1);
        }

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events.last(), Some(&GameEvent::GameOver { score: 1 }));

        // Nothing moves after game over
        let frames = state.frames;
        let x = state.column.x;
        let input = TickInput {
            down: true,
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.frames, frames);
        assert_eq!(state.column.x, x);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_at_most_one_hit_per_frame() {
        let mut state = GameState::new(31);
        let zones = state.column.zones();
        // Straddle the gap between zones 0 and 1
        state.player.pos.y = zones[0].max().y - 10.0;
        state.column.x = PLAYER_X;
        assert!(state.player.bounds().intersects(&zones[1]));

        let top_is_correct = state.question.correct_index() == 0;
        tick(&mut state, &TickInput::default(), DT);

        let hits = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CorrectHit { .. } | GameEvent::WrongHit { .. }))
            .count();
        assert_eq!(hits, 1);
        if top_is_correct {
            assert_eq!((state.score, state.lives), (1, STARTING_LIVES));
        } else {
            assert_eq!((state.score, state.lives), (0, STARTING_LIVES - 1));
        }
        assert!(matches!(
            state.events[0],
            GameEvent::CorrectHit { zone: 0, .. } | GameEvent::WrongHit { zone: 0, .. }
        ));
    }

    #[test]
    fn test_column_steps_by_game_speed() {
        let mut state = GameState::new(3);
        let mut last_speed = state.game_speed;
        for _ in 0..150 {
            let x = state.column.x;
            tick(&mut state, &TickInput::default(), DT);
            assert!(state.events.is_empty());
            assert!((x - state.column.x - state.game_speed).abs() < 1e-3);
            assert!(state.game_speed >= last_speed);
            last_speed = state.game_speed;
        }
        assert!(state.game_speed > state.tuning.base_speed);
    }

    #[test]
    fn test_missed_column_respawns() {
        let mut state = GameState::new(11);
        let before = state.question.clone();
        state.column.x = -COLUMN_WIDTH + 1.0;

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.events, vec![GameEvent::ColumnMissed]);
        assert_eq!(state.column.x, PLAYFIELD_WIDTH);
        assert_ne!(state.question, before);
        assert_eq!((state.score, state.lives), (0, STARTING_LIVES));
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default(), DT);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.events, vec![GameEvent::Paused]);

        let snapshot = (state.elapsed_ms, state.column.x, state.player.pos, state.frames);
        let held = TickInput {
            down: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &held, 50.0);
        }
        assert_eq!(
            (state.elapsed_ms, state.column.x, state.player.pos, state.frames),
            snapshot
        );

        // Unpause resumes within the same frame
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::Resumed]);
        assert_eq!(state.frames, snapshot.3 + 1);
    }

    #[test]
    fn test_input_moves_player() {
        let mut state = GameState::new(1);
        let y = state.player.pos.y;
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        tick(&mut state, &up, DT);
        assert_eq!(state.player.pos.y, y - PLAYER_SPEED);
    }

    #[test]
    fn test_difficulty_steps_up_and_feeds_new_questions() {
        let mut state = GameState::new(8);
        state.elapsed_ms = DIFFICULTY_PERIOD_SECS * 1000.0 - 1.0;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.difficulty, 2);

        let zone = state.question.correct_index();
        line_up(&mut state, zone);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.question.difficulty, 2);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), 5_000.0);
        assert_eq!(state.elapsed_ms, MAX_FRAME_MS);
        assert_eq!(state.difficulty, 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let inputs = [
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                down: true,
                ..Default::default()
            },
        ];
        for i in 0..600 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.question, b.question);
        assert_eq!(a.column, b.column);
    }

    proptest! {
        #[test]
        fn prop_speed_and_difficulty_never_drop(
            frames in prop::collection::vec(-50.0f32..500.0, 1..200),
        ) {
            let mut state = GameState::new(4);
            let mut speed = state.game_speed;
            let mut difficulty = state.difficulty;
            let mut elapsed = state.elapsed_ms;
            for dt in frames {
                tick(&mut state, &TickInput::default(), dt);
                prop_assert!(state.game_speed >= speed);
                prop_assert!(state.difficulty >= difficulty);
                prop_assert!(state.elapsed_ms >= elapsed);
                speed = state.game_speed;
                difficulty = state.difficulty;
                elapsed = state.elapsed_ms;
            }
        }

        #[test]
        fn prop_score_and_lives_move_by_one(
            seed in any::<u64>(),
            zones in prop::collection::vec(0usize..ZONE_COUNT, 1..10),
        ) {
            let mut state = GameState::new(seed);
            for zone in zones {
                if state.is_over() {
                    break;
                }
                let correct = zone == state.question.correct_index();
                let (score, lives) = (state.score, state.lives);
                line_up(&mut state, zone);
                tick(&mut state, &TickInput::default(), DT);
                if correct {
                    prop_assert_eq!((state.score, state.lives), (score + 1, lives));
                } else {
                    prop_assert_eq!((state.score, state.lives), (score, lives - 1));
                }
                prop_assert_eq!(state.is_over(), state.lives == 0);
            }
        }
    }
}
