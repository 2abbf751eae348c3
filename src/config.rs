use color_eyre::eyre::{Result, ensure};
use std::ops::Range;

/// Dimensions of the play field in field units (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Field {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// When the player's gun is allowed to shoot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePolicy {
    /// Shoot whenever the cooldown has elapsed
    Auto,
    /// Shoot only while fire is held and the cooldown has elapsed
    Trigger,
}

/// Which enemy a projectile destroys when it overlaps several in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPolicy {
    /// First living enemy in row-major slot order
    FirstMatch,
    /// Enemy whose centre is closest to the projectile's centre
    Nearest,
}

/// Parameters for random formation shapes
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeParams {
    pub rows: Range<usize>,
    /// Columns drawn for the left half; each row is mirrored to double it
    pub half_columns: Range<usize>,
    pub occupied_probability: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            rows: 3..4,
            half_columns: 2..6,
            occupied_probability: 0.4,
        }
    }
}

/// Geometry and timing of an enemy formation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationParams {
    pub enemy_width: f64,
    pub enemy_height: f64,
    /// Slot size used for the grid pitch (slot + spacing)
    pub slot_size: f64,
    pub spacing: f64,
    pub top_margin: f64,
    /// Seconds between lockstep moves
    pub step_interval: f64,
    /// Vertical drop applied on every direction reversal
    pub descent: f64,
}

impl FormationParams {
    pub fn pitch(&self) -> f64 {
        self.slot_size + self.spacing
    }
}

impl Default for FormationParams {
    fn default() -> Self {
        Self {
            enemy_width: 30.0,
            enemy_height: 23.0,
            slot_size: 28.0,
            spacing: 10.0,
            top_margin: 10.0,
            step_interval: 0.5,
            descent: 20.0,
        }
    }
}

/// Every tuning constant of the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub field: Field,
    pub player_width: f64,
    pub player_height: f64,
    pub player_speed: f64,
    pub projectile_width: f64,
    pub projectile_height: f64,
    pub projectile_speed: f64,
    /// Seconds between two shots
    pub fire_cooldown: f64,
    pub fire_policy: FirePolicy,
    pub hit_policy: HitPolicy,
    pub formation: FormationParams,
    pub shape: ShapeParams,
    /// Horizontal distance of one lockstep move in the first wave
    pub initial_wave_speed: f64,
    pub wave_speed_increment: f64,
    pub max_wave_speed: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: Field::new(480.0, 700.0),
            player_width: 32.0,
            player_height: 20.0,
            player_speed: 250.0,
            projectile_width: 4.0,
            projectile_height: 12.0,
            projectile_speed: 200.0,
            fire_cooldown: 0.5,
            fire_policy: FirePolicy::Auto,
            hit_policy: HitPolicy::FirstMatch,
            formation: FormationParams::default(),
            shape: ShapeParams::default(),
            initial_wave_speed: 20.0,
            wave_speed_increment: 10.0,
            max_wave_speed: 30.0,
        }
    }
}

impl GameConfig {
    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.field.width.is_finite() && self.field.width > 0.0,
            "field width must be positive, got {}",
            self.field.width
        );
        ensure!(
            self.field.height.is_finite() && self.field.height > 0.0,
            "field height must be positive, got {}",
            self.field.height
        );
        ensure!(
            !self.shape.rows.is_empty() && !self.shape.half_columns.is_empty(),
            "formation shape ranges must not be empty"
        );
        ensure!(
            self.shape.rows.start >= 1 && self.shape.half_columns.start >= 1,
            "formation shapes need at least one row and column, got rows {:?} half columns {:?}",
            self.shape.rows,
            self.shape.half_columns
        );
        ensure!(
            self.shape.occupied_probability > 0.0 && self.shape.occupied_probability <= 1.0,
            "occupied probability must be in (0, 1], got {}",
            self.shape.occupied_probability
        );
        Ok(())
    }

    /// Lockstep distance for the formation of the given wave (0-based).
    pub fn wave_speed(&self, wave: u32) -> f64 {
        (self.initial_wave_speed + self.wave_speed_increment * wave as f64)
            .min(self.max_wave_speed)
    }

    /// Spawn point of the player's top-left corner.
    pub fn player_spawn(&self) -> (f64, f64) {
        ((self.field.width - 20.0) / 2.0, self.field.height - 30.0)
    }
}
