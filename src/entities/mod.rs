mod enemy;
mod entity;
mod formation;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::Enemy;
pub use entity::{Body, Entity};
pub use formation::{Formation, Shape, generate_shape};
pub use player::Player;
pub use projectile::Projectile;
