use glam::{Vec2, Vec4};

/// Unique identifier for a render object.
pub type ObjectId = u32;

/// How a text run sits relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Position is the left end of the run.
    Start,
    /// Position is the middle of the run.
    Center,
}

/// 2D primitive types.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box; position is its top-left corner.
    Rect { size: Vec2 },
    /// Disc; position is its center.
    Circle { radius: f32 },
    /// Single line of text; see [`Align`] for how position anchors it.
    Text { text: String, align: Align },
    /// Speech callout: a box with centered `ink` text; position is its top-left corner.
    Bubble { text: String, size: Vec2, ink: Vec4 },
}

/// Draw order, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Terrain,
    Entities,
    Player,
    Callouts,
    Hud,
}

/// A renderable object in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    pub id: ObjectId,
    pub shape: Shape,
    pub position: Vec2,
    pub color: Vec4,
    pub layer: Layer,
}

/// Flat, layered draw list in logical canvas units.
pub struct Scene {
    objects: Vec<RenderObject>,
    next_id: ObjectId,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::with_capacity(128),
            next_id: 1,
        }
    }

    /// Add an object to the scene, returning its ID.
    pub fn add(&mut self, shape: Shape, position: Vec2, color: Vec4, layer: Layer) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(RenderObject {
            id,
            shape,
            position,
            color,
            layer,
        });
        id
    }

    /// Clear all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.next_id = 1;
    }

    /// Iterate over all objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.objects.iter()
    }

    /// Objects back to front. Insertion order breaks ties.
    pub fn draw_order(&self) -> Vec<&RenderObject> {
        let mut ordered: Vec<&RenderObject> = self.objects().collect();
        ordered.sort_by_key(|o| o.layer);
        ordered
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
