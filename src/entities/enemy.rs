use super::entity::{Body, Entity};

/// An invader occupying one slot of a formation.
///
/// The position is owned by the formation and rewritten from the grid
/// whenever the formation moves.
#[derive(Debug, Clone)]
pub struct Enemy {
    body: Entity,
    /// Grid slot (row, col) inside the owning formation
    pub slot: (usize, usize),
}

impl Enemy {
    pub fn new(x: f64, y: f64, width: f64, height: f64, speed: f64, slot: (usize, usize)) -> Self {
        Self {
            body: Entity::new(x, y, width, height, speed),
            slot,
        }
    }

    pub(crate) fn place(&mut self, x: f64, y: f64) {
        self.body.x = x;
        self.body.y = y;
    }

    pub fn destroy(&mut self) {
        self.body.destroy();
    }
}

impl Body for Enemy {
    fn entity(&self) -> &Entity {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_place() {
        let mut enemy = Enemy::new(10.0, 10.0, 30.0, 23.0, 20.0, (1, 2));
        enemy.place(25.0, 18.0);
        assert_eq!(enemy.entity().x, 25.0);
        assert_eq!(enemy.entity().y, 18.0);
        assert_eq!(enemy.slot, (1, 2));
    }

    #[test]
    fn test_enemy_destroy() {
        let mut enemy = Enemy::new(10.0, 10.0, 30.0, 23.0, 20.0, (0, 0));
        assert!(enemy.is_alive());
        enemy.destroy();
        assert!(!enemy.is_alive());
    }
}
