use super::entity::{Body, Entity};
use super::projectile::Projectile;
use crate::config::{Field, GameConfig};
use crate::input::InputState;

/// The player's ship. Moves horizontally only.
#[derive(Debug, Clone)]
pub struct Player {
    body: Entity,
}

impl Player {
    pub fn new(x: f64, y: f64, config: &GameConfig) -> Self {
        Self {
            body: Entity::new(
                x,
                y,
                config.player_width,
                config.player_height,
                config.player_speed,
            ),
        }
    }

    /// Spawns the ship at its starting position for the configured field.
    pub fn spawn(config: &GameConfig) -> Self {
        let (x, y) = config.player_spawn();
        Self::new(x, y, config)
    }

    pub fn x(&self) -> f64 {
        self.body.x
    }

    pub fn y(&self) -> f64 {
        self.body.y
    }

    /// Applies held left/right input, keeping the ship inside the field.
    pub fn update(&mut self, input: &InputState, dt: f64, field: Field) {
        let dx = input.horizontal();
        if dx != 0.0 {
            self.body.move_by(dx, 0.0, dt);
        }
        let max_x = (field.width - self.body.width()).max(0.0);
        self.body.x = self.body.x.clamp(0.0, max_x);
    }

    /// Top-left corner of a projectile leaving the gun.
    pub fn muzzle(&self, config: &GameConfig) -> (f64, f64) {
        (
            self.body.x + self.body.width() / 2.0 - config.projectile_width / 2.0,
            self.body.y - 10.0,
        )
    }

    pub fn fire(&self, config: &GameConfig) -> Projectile {
        let (x, y) = self.muzzle(config);
        Projectile::new(x, y, config)
    }
}

impl Body for Player {
    fn entity(&self) -> &Entity {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(left: bool, right: bool) -> InputState {
        InputState {
            left,
            right,
            fire: false,
        }
    }

    #[test]
    fn test_player_spawn() {
        let config = GameConfig::default();
        let player = Player::spawn(&config);
        assert_eq!(player.x(), 230.0);
        assert_eq!(player.y(), 670.0);
        assert_eq!(player.entity().width(), 32.0);
        assert_eq!(player.entity().height(), 20.0);
    }

    #[test]
    fn test_player_movement_right() {
        let config = GameConfig::default();
        let mut player = Player::new(100.0, 670.0, &config);
        player.update(&held(false, true), 0.1, config.field);
        assert_eq!(player.x(), 125.0);
        assert_eq!(player.y(), 670.0);
    }

    #[test]
    fn test_player_movement_left() {
        let config = GameConfig::default();
        let mut player = Player::new(100.0, 670.0, &config);
        player.update(&held(true, false), 0.1, config.field);
        assert_eq!(player.x(), 75.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let config = GameConfig::default();
        let mut player = Player::new(100.0, 670.0, &config);
        player.update(&held(true, true), 0.1, config.field);
        assert_eq!(player.x(), 100.0);
    }

    #[test]
    fn test_player_clamped_at_edges() {
        let config = GameConfig::default();
        let mut player = Player::new(5.0, 670.0, &config);
        player.update(&held(true, false), 1.0, config.field);
        assert_eq!(player.x(), 0.0);

        player.update(&held(false, true), 10.0, config.field);
        assert_eq!(player.x(), 480.0 - 32.0);
    }

    #[test]
    fn test_fire_spawns_centered_above() {
        let config = GameConfig::default();
        let player = Player::new(230.0, 670.0, &config);
        let shot = player.fire(&config);
        assert_eq!(shot.entity().x, 230.0 + 16.0 - 2.0);
        assert_eq!(shot.entity().y, 660.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_player_stays_in_bounds_x(
                initial_x in 0.0..448.0f64,
                moves in prop::collection::vec((prop::bool::ANY, 0.0..2.0f64), 0..100)
            ) {
                let config = GameConfig::default();
                let mut player = Player::new(initial_x, 670.0, &config);
                for (move_right, dt) in moves {
                    player.update(&held(!move_right, move_right), dt, config.field);
                    prop_assert!(player.x() >= 0.0);
                    prop_assert!(player.x() + 32.0 <= 480.0);
                    prop_assert_eq!(player.y(), 670.0);
                }
            }
        }
    }
}
