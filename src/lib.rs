// Library exports for testing
pub use config::{Field, FirePolicy, GameConfig, HitPolicy};
pub use entities::{Body, Enemy, Entity, Formation, Player, Projectile, Shape, generate_shape};
pub use input::InputState;
pub use simulation::{GameEvent, GameOverCause, GameState, Simulation};

pub mod app;
pub mod config;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod simulation;
