use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Client palette, loaded from JSON at compile time.
/// All colors are stored as `[f32; 4]` (RGBA).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub sky: [f32; 4],
    pub far_hills: [f32; 4],
    pub near_hills: [f32; 4],
    pub platform: [f32; 4],
    pub item: [f32; 4],
    pub item_text: [f32; 4],
    pub obstacle: [f32; 4],
    pub obstacle_head: [f32; 4],
    pub bubble: [f32; 4],
    pub bubble_text: [f32; 4],
    pub door_locked: [f32; 4],
    pub door_unlocked: [f32; 4],
    pub door_label_locked: [f32; 4],
    pub door_label_unlocked: [f32; 4],
    pub player: [f32; 4],
    pub player_head: [f32; 4],
    pub self_doubt_text: [f32; 4],
    pub hud_text: [f32; 4],
    pub panel: [f32; 4],
    pub panel_text: [f32; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            sky: [0.53, 0.81, 0.92, 1.0],
            far_hills: [0.13, 0.55, 0.13, 1.0],
            near_hills: [0.2, 0.8, 0.2, 1.0],
            platform: [0.55, 0.27, 0.07, 1.0],
            item: [1.0, 0.84, 0.0, 1.0],
            item_text: [0.55, 0.27, 0.07, 1.0],
            obstacle: [0.0, 0.0, 0.0, 1.0],
            obstacle_head: [1.0, 0.86, 0.67, 1.0],
            bubble: [1.0, 1.0, 1.0, 1.0],
            bubble_text: [0.2, 0.2, 0.2, 1.0],
            door_locked: [0.4, 0.26, 0.13, 1.0],
            door_unlocked: [0.55, 0.27, 0.07, 1.0],
            door_label_locked: [1.0, 0.0, 0.0, 1.0],
            door_label_unlocked: [0.0, 1.0, 0.0, 1.0],
            player: [1.0, 0.41, 0.71, 1.0],
            player_head: [1.0, 0.86, 0.67, 1.0],
            self_doubt_text: [0.4, 0.4, 0.4, 1.0],
            hud_text: [1.0, 1.0, 1.0, 1.0],
            panel: [0.0, 0.0, 0.0, 0.85],
            panel_text: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Theme {
    /// Load the bundled theme. Falls back to the built-in palette if it does not parse.
    pub fn load() -> Self {
        let json = include_str!("../theme.json");
        serde_json::from_str(json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Bundled theme is invalid, using defaults");
            Self::default()
        })
    }
}

/// Convert an RGBA array to a vector color.
pub fn rgba(c: &[f32; 4]) -> Vec4 {
    Vec4::from_array(*c)
}
