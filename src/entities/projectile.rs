use super::entity::{Body, Entity};
use crate::config::GameConfig;

/// A player shot travelling straight up at a fixed speed
#[derive(Debug, Clone)]
pub struct Projectile {
    body: Entity,
}

impl Projectile {
    pub fn new(x: f64, y: f64, config: &GameConfig) -> Self {
        Self {
            body: Entity::new(
                x,
                y,
                config.projectile_width,
                config.projectile_height,
                config.projectile_speed,
            ),
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.body.move_by(0.0, -1.0, dt);
    }

    pub fn destroy(&mut self) {
        self.body.destroy();
    }
}

impl Body for Projectile {
    fn entity(&self) -> &Entity {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_new() {
        let config = GameConfig::default();
        let projectile = Projectile::new(10.0, 10.0, &config);
        assert_eq!(projectile.entity().x, 10.0);
        assert_eq!(projectile.entity().y, 10.0);
        assert_eq!(projectile.entity().width(), 4.0);
        assert_eq!(projectile.entity().height(), 12.0);
        assert!(projectile.is_alive());
    }

    #[test]
    fn test_projectile_moves_up() {
        let config = GameConfig::default();
        let mut projectile = Projectile::new(10.0, 300.0, &config);
        projectile.update(0.5);
        assert_eq!(projectile.entity().x, 10.0);
        assert_eq!(projectile.entity().y, 200.0);
    }

    #[test]
    fn test_projectile_leaves_field_after_long_flight() {
        let config = GameConfig::default();
        let mut projectile = Projectile::new(100.0, 690.0, &config);
        assert!(!projectile.is_out_of_bounds(config.field));
        projectile.update(4.0);
        assert_eq!(projectile.entity().y, -110.0);
        assert!(projectile.is_out_of_bounds(config.field));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_never_moves_down(
                initial_y in 0.0..700.0f64,
                dt in 0.0..5.0f64,
            ) {
                let config = GameConfig::default();
                let mut projectile = Projectile::new(50.0, initial_y, &config);
                projectile.update(dt);
                prop_assert!(projectile.entity().y <= initial_y);
                prop_assert_eq!(projectile.entity().x, 50.0);
            }
        }
    }
}
