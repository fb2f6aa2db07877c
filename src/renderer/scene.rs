//! Paints one frame of the game onto a [`Canvas`]

use glam::Vec2;

use super::Canvas;
use super::vertex::colors;
use crate::consts::*;
use crate::sim::{FeedbackKind, GamePhase, GameState, Player, Rect};

/// Feedback dot placement
const FEEDBACK_POS: Vec2 = Vec2::new(PLAYFIELD_WIDTH / 2.0, 50.0);
const FEEDBACK_RADIUS: f32 = 30.0;

/// Paint the whole frame for the current phase
pub fn draw_frame(state: &GameState, canvas: &mut impl Canvas, best_score: u32) {
    match state.phase {
        GamePhase::Playing => draw_playing(state, canvas),
        GamePhase::Paused => draw_paused(canvas),
        GamePhase::GameOver => draw_game_over(state, canvas, best_score),
    }
}

fn draw_playing(state: &GameState, canvas: &mut impl Canvas) {
    // Road
    canvas.clear(colors::ROAD);
    for line in state.highway.edge_lines() {
        canvas.fill_rect(line, colors::ROAD_MARKING);
    }
    for dash in state.highway.dash_rects() {
        canvas.fill_rect(dash, colors::ROAD_MARKING);
    }
    canvas.text(
        Vec2::new(PLAYFIELD_WIDTH - 180.0, 10.0),
        "Press P to Pause",
        colors::HINT_TEXT,
    );

    draw_car(&state.player, canvas);

    // Answer zones
    for (zone, candidate) in state.column.zones().iter().zip(state.question.candidates) {
        canvas.fill_rect(*zone, colors::ZONE);
        canvas.text(
            Vec2::new(zone.min.x + 50.0, zone.center().y - 18.0),
            &candidate.to_string(),
            colors::ZONE_LABEL,
        );
    }

    if let Some(kind) = state.visible_feedback() {
        let color = match kind {
            FeedbackKind::Correct => colors::FEEDBACK_CORRECT,
            FeedbackKind::Wrong => colors::FEEDBACK_WRONG,
        };
        canvas.fill_circle(FEEDBACK_POS, FEEDBACK_RADIUS, color);
    }

    // HUD
    canvas.text(Vec2::new(20.0, 20.0), &format!("Lives: {}", state.lives), colors::HUD_TEXT);
    canvas.text(Vec2::new(20.0, 60.0), &format!("Score: {}", state.score), colors::HUD_TEXT);
    canvas.text(Vec2::new(300.0, 20.0), &state.question.text, colors::HUD_TEXT);
}

/// Body, roof, window and wheels. The roof sits on top of the body; the
/// wheels hang below the bounding box.
fn draw_car(player: &Player, canvas: &mut impl Canvas) {
    let Vec2 { x, y } = player.pos;
    let w = CAR_BODY_WIDTH;

    canvas.fill_rect(
        Rect::new(x, y + CAR_ROOF_HEIGHT, w, CAR_BODY_HEIGHT),
        colors::CAR_BODY,
    );
    canvas.fill_polygon(
        &[
            Vec2::new(x + w * 0.2, y + CAR_ROOF_HEIGHT),
            Vec2::new(x + w * 0.35, y),
            Vec2::new(x + w * 0.65, y),
            Vec2::new(x + w * 0.8, y + CAR_ROOF_HEIGHT),
        ],
        colors::CAR_ROOF,
    );
    canvas.fill_rect(
        Rect::new(x + w * 0.4, y + 2.0, w * 0.2, CAR_ROOF_HEIGHT - 4.0),
        colors::CAR_WINDOW,
    );

    let axle_y = y + PLAYER_HEIGHT;
    for fraction in [0.25, 0.75] {
        let center = Vec2::new(x + w * fraction, axle_y);
        canvas.fill_circle(center, CAR_WHEEL_RADIUS + 3.0, colors::TIRE);
        canvas.fill_circle(center, CAR_WHEEL_RADIUS, colors::HUBCAP);
    }
}

fn draw_paused(canvas: &mut impl Canvas) {
    canvas.clear(colors::OVERLAY);
    canvas.text(
        Vec2::new(PLAYFIELD_WIDTH / 2.0 - 200.0, PLAYFIELD_HEIGHT / 2.0),
        "Paused - Press 'P' to Resume",
        colors::PAUSE_TEXT,
    );
}

fn draw_game_over(state: &GameState, canvas: &mut impl Canvas, best_score: u32) {
    canvas.clear(colors::OVERLAY);
    canvas.text(
        Vec2::new(200.0, 150.0),
        &format!("Game Over! Final Score: {}", state.score),
        colors::GAME_OVER_TEXT,
    );
    canvas.text(
        Vec2::new(200.0, 200.0),
        &format!("Best Score: {}", best_score.max(state.score)),
        colors::HUD_TEXT,
    );
    canvas.text(
        Vec2::new(200.0, 250.0),
        "Press R to Replay or Q to Quit",
        colors::HUD_TEXT,
    );
}
