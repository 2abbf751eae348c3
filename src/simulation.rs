use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{FirePolicy, GameConfig, HitPolicy};
use crate::entities::{Body, Entity, Formation, Player, Projectile, generate_shape};
use crate::input::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    /// Frozen until [`Simulation::restart`]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    /// An enemy overlapped the player's ship
    PlayerHit,
    /// An enemy reached the bottom of the field
    Breach,
}

/// Something notable that happened during one [`Simulation::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ShotFired,
    EnemyDestroyed { row: usize, col: usize },
    WaveCleared { wave: u32 },
    GameOver { cause: GameOverCause },
}

/// The whole game: one player, one formation and the shots in flight.
///
/// Time only moves through [`Simulation::advance`]; the accumulated `dt`
/// is the clock used for the fire cooldown and the formation's step gate.
pub struct Simulation {
    config: GameConfig,
    state: GameState,
    player: Player,
    formation: Formation,
    projectiles: Vec<Projectile>,
    kills: u32,
    waves: u32,
    clock: f64,
    last_shot: Option<f64>,
    rng: StdRng,
}

impl Simulation {
    /// Construct a new [`Simulation`] seeded from the OS.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let formation = Self::spawn_formation(&config, &mut rng, 0);
        Self::assemble(config, formation, rng)
    }

    /// Starts from a prepared formation instead of a random first wave.
    pub fn with_formation(config: GameConfig, formation: Formation) -> Self {
        Self::assemble(config, formation, StdRng::from_os_rng())
    }

    /// Like [`Simulation::with_formation`], with later waves drawn from `seed`.
    pub fn with_formation_seeded(config: GameConfig, formation: Formation, seed: u64) -> Self {
        Self::assemble(config, formation, StdRng::seed_from_u64(seed))
    }

    fn assemble(config: GameConfig, formation: Formation, rng: StdRng) -> Self {
        Self {
            player: Player::spawn(&config),
            config,
            state: GameState::Running,
            formation,
            projectiles: Vec::new(),
            kills: 0,
            waves: 0,
            clock: 0.0,
            last_shot: None,
            rng,
        }
    }

    fn spawn_formation(config: &GameConfig, rng: &mut StdRng, wave: u32) -> Formation {
        let shape = generate_shape(rng, &config.shape);
        Formation::new(
            &shape,
            config.wave_speed(wave),
            config.formation,
            config.field,
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn waves(&self) -> u32 {
        self.waves
    }

    /// Seconds of simulated time since the run started.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Runs one frame of `dt` seconds. Does nothing after game over.
    pub fn advance(&mut self, dt: f64, input: &InputState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state == GameState::GameOver {
            return events;
        }

        let dt = dt.max(0.0);
        self.clock += dt;
        let now = self.clock;
        log::trace!(
            "advance dt={dt:.4} now={now:.3} projectiles={}",
            self.projectiles.len()
        );

        if let Some(cause) = self.check_game_over() {
            self.state = GameState::GameOver;
            log::info!(
                "game over ({cause:?}) after {} waves, {} kills",
                self.waves,
                self.kills
            );
            events.push(GameEvent::GameOver { cause });
            return events;
        }

        if self.should_fire(input, now) {
            self.projectiles.push(self.player.fire(&self.config));
            self.last_shot = Some(now);
            events.push(GameEvent::ShotFired);
        }

        self.resolve_hits(dt, &mut events);

        let field = self.config.field;
        self.projectiles
            .retain(|p| p.is_alive() && !p.is_out_of_bounds(field));

        self.player.update(input, dt, field);

        self.formation.step(now);

        if self.formation.is_cleared() {
            self.waves += 1;
            self.formation = Self::spawn_formation(&self.config, &mut self.rng, self.waves);
            log::info!(
                "wave {} cleared, next formation has {} enemies at speed {}",
                self.waves,
                self.formation.alive_count(),
                self.formation.speed()
            );
            events.push(GameEvent::WaveCleared { wave: self.waves });
        }

        events
    }

    /// Replaces the finished run with a fresh one. The random generator
    /// carries over so the new run gets a different first wave.
    pub fn restart(&mut self) {
        log::info!("restarting");
        *self = Self::with_rng(self.config.clone(), self.rng.clone());
    }

    fn check_game_over(&self) -> Option<GameOverCause> {
        let bottom = self.config.field.height;
        for enemy in self.formation.alive_enemies() {
            if self.player.collides_with(enemy) {
                return Some(GameOverCause::PlayerHit);
            }
            if enemy.entity().bottom() >= bottom {
                return Some(GameOverCause::Breach);
            }
        }
        None
    }

    fn should_fire(&self, input: &InputState, now: f64) -> bool {
        let triggered = match self.config.fire_policy {
            FirePolicy::Auto => true,
            FirePolicy::Trigger => input.fire,
        };
        let cooled_down = self
            .last_shot
            .is_none_or(|last| now - last >= self.config.fire_cooldown);
        triggered && cooled_down
    }

    /// Moves every projectile and lets each one destroy at most one enemy.
    fn resolve_hits(&mut self, dt: f64, events: &mut Vec<GameEvent>) {
        let policy = self.config.hit_policy;
        for projectile in &mut self.projectiles {
            projectile.update(dt);
            if !projectile.is_alive() {
                continue;
            }

            let mut hits = self
                .formation
                .alive_enemies_mut()
                .filter(|enemy| enemy.collides_with(&*projectile));
            let target = match policy {
                HitPolicy::FirstMatch => hits.next(),
                HitPolicy::Nearest => hits.min_by(|a, b| {
                    distance_sq(a.entity(), projectile.entity())
                        .total_cmp(&distance_sq(b.entity(), projectile.entity()))
                }),
            };

            if let Some(enemy) = target {
                enemy.destroy();
                projectile.destroy();
                self.kills += 1;
                let (row, col) = enemy.slot;
                log::debug!("enemy ({row}, {col}) destroyed, kills={}", self.kills);
                events.push(GameEvent::EnemyDestroyed { row, col });
            }
        }
    }
}

fn distance_sq(a: &Entity, b: &Entity) -> f64 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).powi(2) + (ay - by).powi(2)
}
