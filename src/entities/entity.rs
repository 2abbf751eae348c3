use crate::config::Field;

/// A moving axis-aligned rectangle in field space.
///
/// The size is fixed at construction. `alive` only ever goes from true to
/// false; there is no way to bring an entity back.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub x: f64,
    pub y: f64,
    width: f64,
    height: f64,
    pub speed: f64,
    alive: bool,
}

impl Entity {
    pub fn new(x: f64, y: f64, width: f64, height: f64, speed: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            speed,
            alive: true,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    /// Displaces the entity by `(dx, dy) * speed * dt`.
    pub fn move_by(&mut self, dx: f64, dy: f64, dt: f64) {
        self.x += dx * self.speed * dt;
        self.y += dy * self.speed * dt;
    }

    /// Strict overlap test; rectangles that only share an edge don't collide.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// True once the whole rectangle has left the field on any side.
    pub fn is_out_of_bounds(&self, field: Field) -> bool {
        self.x + self.width < 0.0
            || self.x > field.width
            || self.y + self.height < 0.0
            || self.y > field.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Shared movement and collision surface of everything on the field
pub trait Body {
    fn entity(&self) -> &Entity;

    fn is_alive(&self) -> bool {
        self.entity().is_alive()
    }

    fn collides_with<B: Body + ?Sized>(&self, other: &B) -> bool {
        self.entity().overlaps(other.entity())
    }

    fn is_out_of_bounds(&self, field: Field) -> bool {
        self.entity().is_out_of_bounds(field)
    }
}

impl Body for Entity {
    fn entity(&self) -> &Entity {
        self
    }
}
