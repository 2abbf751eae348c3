use rand::Rng;

use super::enemy::Enemy;
use super::entity::Body;
use crate::config::{Field, FormationParams, ShapeParams};

/// Occupancy mask of a formation, indexed `[row][col]`
pub type Shape = Vec<Vec<bool>>;

/// Draws a random left-right symmetric shape with at least one occupied slot.
///
/// Each row's left half is drawn cell by cell and then mirrored, so a row of
/// `n` drawn cells becomes `2n` columns wide.
pub fn generate_shape<R: Rng + ?Sized>(rng: &mut R, params: &ShapeParams) -> Shape {
    loop {
        let rows = rng.random_range(params.rows.clone());
        let half_columns = rng.random_range(params.half_columns.clone());

        let shape: Shape = (0..rows)
            .map(|_| {
                let half: Vec<bool> = (0..half_columns)
                    .map(|_| rng.random_bool(params.occupied_probability))
                    .collect();
                half.iter().chain(half.iter().rev()).copied().collect()
            })
            .collect();

        if shape.iter().flatten().any(|&occupied| occupied) {
            return shape;
        }
    }
}

/// A grid of enemies marching in lockstep.
///
/// Enemies never change slots. Their positions are always derived from
/// `origin + offset + slot * pitch`.
#[derive(Debug, Clone)]
pub struct Formation {
    slots: Vec<Vec<Option<Enemy>>>,
    origin: (f64, f64),
    offset_x: f64,
    /// Never decreases
    offset_y: f64,
    /// -1.0 left, 1.0 right
    direction: f64,
    speed: f64,
    params: FormationParams,
    field: Field,
    last_move: Option<f64>,
}

impl Formation {
    /// Builds a formation horizontally centered in the field.
    pub fn new(shape: &[Vec<bool>], speed: f64, params: FormationParams, field: Field) -> Self {
        let columns = shape.iter().map(Vec::len).max().unwrap_or(0);
        let grid_width = columns as f64 * params.pitch();
        let origin = ((field.width - grid_width) / 2.0, params.top_margin);
        Self::with_origin(shape, origin, speed, params, field)
    }

    pub fn with_origin(
        shape: &[Vec<bool>],
        origin: (f64, f64),
        speed: f64,
        params: FormationParams,
        field: Field,
    ) -> Self {
        let pitch = params.pitch();
        let slots = shape
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, &occupied)| {
                        occupied.then(|| {
                            Enemy::new(
                                origin.0 + col as f64 * pitch,
                                origin.1 + row as f64 * pitch,
                                params.enemy_width,
                                params.enemy_height,
                                speed,
                                (row, col),
                            )
                        })
                    })
                    .collect()
            })
            .collect();

        Self {
            slots,
            origin,
            offset_x: 0.0,
            offset_y: 0.0,
            direction: 1.0,
            speed,
            params,
            field,
            last_move: None,
        }
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn enemy(&self, row: usize, col: usize) -> Option<&Enemy> {
        self.slots.get(row)?.get(col)?.as_ref()
    }

    /// Where the top-left corner of slot `(row, col)` currently sits.
    pub fn slot_position(&self, row: usize, col: usize) -> (f64, f64) {
        let pitch = self.params.pitch();
        (
            self.origin.0 + self.offset_x + col as f64 * pitch,
            self.origin.1 + self.offset_y + row as f64 * pitch,
        )
    }

    /// Every occupied slot, dead or alive.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.slots.iter().flatten().flatten()
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.slots
            .iter()
            .flatten()
            .flatten()
            .filter(|enemy| enemy.is_alive())
    }

    pub fn alive_enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.slots
            .iter_mut()
            .flatten()
            .flatten()
            .filter(|enemy| enemy.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive_enemies().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.alive_enemies().next().is_none()
    }

    /// Horizontal extent `(left, right)` of the living enemies, if any.
    pub fn alive_extent(&self) -> Option<(f64, f64)> {
        self.alive_enemies()
            .map(|enemy| {
                let (x, _) = self.slot_position(enemy.slot.0, enemy.slot.1);
                (x, x + self.params.enemy_width)
            })
            .reduce(|(min, max), (left, right)| (min.min(left), max.max(right)))
    }

    /// Advances one lockstep move if `step_interval` has passed since the
    /// previous one. Returns whether the formation moved.
    pub fn step(&mut self, now: f64) -> bool {
        if let Some(last) = self.last_move
            && now - last < self.params.step_interval
        {
            return false;
        }
        self.last_move = Some(now);
        self.offset_x += self.speed * self.direction;

        if let Some((left, right)) = self.alive_extent()
            && (left <= 0.0 || right >= self.field.width)
        {
            self.direction = -self.direction;
            self.offset_y += self.params.descent;
            log::trace!(
                "formation reversed, direction={} offset_y={}",
                self.direction,
                self.offset_y
            );
        }

        self.layout();
        true
    }

    /// Rewrites every living enemy's position from its slot.
    fn layout(&mut self) {
        let pitch = self.params.pitch();
        let (base_x, base_y) = (
            self.origin.0 + self.offset_x,
            self.origin.1 + self.offset_y,
        );
        for enemy in self.slots.iter_mut().flatten().flatten() {
            if enemy.is_alive() {
                let (row, col) = enemy.slot;
                enemy.place(base_x + col as f64 * pitch, base_y + row as f64 * pitch);
            }
        }
    }
}
