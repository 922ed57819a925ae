use glam::{Vec2, Vec4};

use wordsmith_core::geometry::Rect;
use wordsmith_platformer::level::Level;
use wordsmith_platformer::{WordsmithGame, WordsmithState};

use crate::hud::HudState;
use crate::scene::{Align, Layer, Scene, Shape};
use crate::theme::{Theme, rgba};

const OBSTACLE_BUBBLE_SIZE: Vec2 = Vec2::new(80.0, 20.0);
const OBSTACLE_BUBBLE_OFFSET: Vec2 = Vec2::new(-30.0, -25.0);
const SELF_DOUBT_BUBBLE_SIZE: Vec2 = Vec2::new(100.0, 20.0);
const SELF_DOUBT_BUBBLE_OFFSET: Vec2 = Vec2::new(35.0, -25.0);
const DOOR_LABEL_RISE: f32 = 10.0;
const RESTART_PROMPT: &str = "Press R to restart or Q to quit";

fn add_rect(scene: &mut Scene, r: &Rect, color: Vec4, layer: Layer) {
    scene.add(
        Shape::Rect {
            size: Vec2::new(r.w, r.h),
        },
        Vec2::new(r.x, r.y),
        color,
        layer,
    );
}

fn add_text(
    scene: &mut Scene,
    text: &str,
    position: Vec2,
    align: Align,
    color: Vec4,
    layer: Layer,
) {
    scene.add(
        Shape::Text {
            text: text.to_string(),
            align,
        },
        position,
        color,
        layer,
    );
}

/// Rebuild the scene from the current session. Reads the game, never mutates it.
pub fn sync_scene(scene: &mut Scene, game: &WordsmithGame, theme: &Theme) {
    draw_state(scene, game.level(), game.state(), theme);
}

/// Rebuild the scene from a level and a state snapshot.
pub fn draw_state(scene: &mut Scene, level: &Level, state: &WordsmithState, theme: &Theme) {
    scene.clear();

    // Sky with two bands of hills.
    let (w, h) = (level.width(), level.height());
    add_rect(scene, &Rect::new(0.0, 0.0, w, h), rgba(&theme.sky), Layer::Background);
    add_rect(
        scene,
        &Rect::new(0.0, h * 0.4, w, h * 0.6),
        rgba(&theme.far_hills),
        Layer::Background,
    );
    add_rect(
        scene,
        &Rect::new(0.0, h * 0.6, w, h * 0.4),
        rgba(&theme.near_hills),
        Layer::Background,
    );

    for platform in level.platforms().values() {
        add_rect(scene, &platform.rect, rgba(&theme.platform), Layer::Terrain);
    }

    for item in state.items.values().filter(|i| !i.collected) {
        add_rect(scene, &item.rect, rgba(&theme.item), Layer::Entities);
        add_text(
            scene,
            &item.word,
            Vec2::new(item.rect.center_x(), item.rect.y + item.rect.h / 2.0),
            Align::Center,
            rgba(&theme.item_text),
            Layer::Entities,
        );
    }

    for obstacle in state.obstacles.values().filter(|o| !o.defeated) {
        let r = &obstacle.rect;
        add_rect(scene, r, rgba(&theme.obstacle), Layer::Entities);
        scene.add(
            Shape::Circle { radius: r.w * 0.28 },
            Vec2::new(r.center_x(), r.y + r.h * 0.32),
            rgba(&theme.obstacle_head),
            Layer::Entities,
        );
        if obstacle.speech.visible {
            scene.add(
                Shape::Bubble {
                    text: obstacle.message.clone(),
                    size: OBSTACLE_BUBBLE_SIZE,
                    ink: rgba(&theme.bubble_text),
                },
                Vec2::new(r.x, r.y) + OBSTACLE_BUBBLE_OFFSET,
                rgba(&theme.bubble),
                Layer::Callouts,
            );
        }
    }

    let door = &state.door;
    let (door_color, label, label_color) = if door.unlocked {
        (theme.door_unlocked, "EXIT", theme.door_label_unlocked)
    } else {
        (theme.door_locked, "LOCKED", theme.door_label_locked)
    };
    add_rect(scene, &door.rect, rgba(&door_color), Layer::Entities);
    add_text(
        scene,
        label,
        Vec2::new(door.rect.center_x(), door.rect.y - DOOR_LABEL_RISE),
        Align::Center,
        rgba(&label_color),
        Layer::Entities,
    );

    let player = &state.player;
    add_rect(scene, &player.rect(), rgba(&theme.player), Layer::Player);
    scene.add(
        Shape::Circle {
            radius: player.width * 0.3,
        },
        Vec2::new(player.x + player.width / 2.0, player.y + player.height * 0.3),
        rgba(&theme.player_head),
        Layer::Player,
    );

    if state.session.self_doubt.visible {
        scene.add(
            Shape::Bubble {
                text: state.session.self_doubt_text.clone(),
                size: SELF_DOUBT_BUBBLE_SIZE,
                ink: rgba(&theme.self_doubt_text),
            },
            Vec2::new(player.x, player.y) + SELF_DOUBT_BUBBLE_OFFSET,
            rgba(&theme.bubble),
            Layer::Callouts,
        );
    }
}

/// Append the counters and, once the session is over, the end panel.
pub fn draw_hud(scene: &mut Scene, hud: &HudState, level: &Level, theme: &Theme) {
    let text = rgba(&theme.hud_text);
    add_text(scene, &hud.words_label(), Vec2::new(10.0, 10.0), Align::Start, text, Layer::Hud);
    add_text(scene, &hud.lives_label(), Vec2::new(200.0, 10.0), Align::Start, text, Layer::Hud);

    let Some(message) = hud.end_message else {
        return;
    };
    let (w, h) = (level.width(), level.height());
    add_rect(
        scene,
        &Rect::new(w * 0.1, h * 0.3, w * 0.8, h * 0.4),
        rgba(&theme.panel),
        Layer::Hud,
    );
    let panel_text = rgba(&theme.panel_text);
    add_text(scene, message, Vec2::new(w / 2.0, h * 0.42), Align::Center, panel_text, Layer::Hud);
    add_text(
        scene,
        RESTART_PROMPT,
        Vec2::new(w / 2.0, h * 0.58),
        Align::Center,
        panel_text,
        Layer::Hud,
    );
}
