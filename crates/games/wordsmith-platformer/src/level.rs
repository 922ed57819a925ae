use std::fmt;

use wordsmith_core::arena::{Arena, Id};
use wordsmith_core::geometry::Rect;

/// Logical width of the display surface.
pub const CANVAS_WIDTH: f32 = 800.0;
/// Logical height of the display surface.
pub const CANVAS_HEIGHT: f32 = 400.0;
/// Where the player appears at session start and after losing a life.
pub const SPAWN_X: f32 = 50.0;
pub const SPAWN_Y: f32 = 300.0;

/// Static platform. Never mutated during a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
}

pub type PlatformId = Id<Platform>;

/// Raw level description, validated by [`Level::new`].
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub width: f32,
    pub height: f32,
    /// The first platform is the ground; it never hosts items or obstacles.
    pub platforms: Vec<Rect>,
    pub door: Rect,
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl LevelLayout {
    /// The single fixed screen the game is played on.
    pub fn standard() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            platforms: vec![
                Rect::new(0.0, 380.0, 800.0, 20.0), // ground
                Rect::new(150.0, 320.0, 100.0, 15.0),
                Rect::new(300.0, 260.0, 120.0, 15.0),
                Rect::new(480.0, 200.0, 100.0, 15.0),
                Rect::new(650.0, 280.0, 100.0, 15.0),
                Rect::new(100.0, 180.0, 80.0, 15.0),
                Rect::new(600.0, 140.0, 90.0, 15.0),
                Rect::new(350.0, 120.0, 100.0, 15.0),
            ],
            door: Rect::new(720.0, 340.0, 40.0, 60.0),
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
        }
    }
}

/// Reasons a layout cannot host a session.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// No non-ground platform is wide enough to place items and obstacles on.
    NoEligiblePlatform { required_span: f32 },
    /// The player does not fit horizontally on the canvas.
    CanvasTooSmall { width: f32, player_width: f32 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligiblePlatform { required_span } => write!(
                f,
                "no non-ground platform is at least {required_span} units wide"
            ),
            Self::CanvasTooSmall {
                width,
                player_width,
            } => write!(
                f,
                "canvas width {width} cannot hold a player {player_width} units wide"
            ),
        }
    }
}

impl std::error::Error for LevelError {}

/// Validated, immutable level geometry.
#[derive(Debug, Clone)]
pub struct Level {
    width: f32,
    height: f32,
    platforms: Arena<Platform>,
    ground: PlatformId,
    eligible: Vec<PlatformId>,
    door: Rect,
    spawn_x: f32,
    spawn_y: f32,
}

impl Level {
    /// Validate a layout. `min_span` is the narrowest platform that can host
    /// generated content.
    pub fn new(layout: LevelLayout, min_span: f32, player_width: f32) -> Result<Self, LevelError> {
        if layout.width < player_width {
            return Err(LevelError::CanvasTooSmall {
                width: layout.width,
                player_width,
            });
        }

        let platforms: Arena<Platform> = layout
            .platforms
            .into_iter()
            .map(|rect| Platform { rect })
            .collect();

        let mut ids = platforms.ids();
        let Some(ground) = ids.next() else {
            return Err(LevelError::NoEligiblePlatform {
                required_span: min_span,
            });
        };
        let eligible: Vec<PlatformId> = ids
            .filter(|&id| platforms.get(id).is_some_and(|p| p.rect.w >= min_span))
            .collect();

        if eligible.is_empty() {
            return Err(LevelError::NoEligiblePlatform {
                required_span: min_span,
            });
        }

        Ok(Self {
            width: layout.width,
            height: layout.height,
            platforms,
            ground,
            eligible,
            door: layout.door,
            spawn_x: layout.spawn_x,
            spawn_y: layout.spawn_y,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn platforms(&self) -> &Arena<Platform> {
        &self.platforms
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.get(id)
    }

    pub fn ground(&self) -> PlatformId {
        self.ground
    }

    /// Platforms that may host items and obstacles. Never empty.
    pub fn eligible_platforms(&self) -> &[PlatformId] {
        &self.eligible
    }

    pub fn door(&self) -> Rect {
        self.door
    }

    pub fn spawn(&self) -> (f32, f32) {
        (self.spawn_x, self.spawn_y)
    }
}
