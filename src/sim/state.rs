//! Game state and core simulation types
//!
//! `GameState` exclusively owns every entity collection. Each collection keeps
//! spawn order; entities flag themselves `expired` and are purged once per tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::input::TickInput;
use super::spawn::SpawnDirector;
use crate::palette;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing simulated yet
    Ready,
    /// Active gameplay
    Playing,
    /// Frame loop suspended
    Paused,
    /// Run ended by unshielded contact
    GameOver,
}

/// Fire-and-forget sound notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    Shoot,
    Explosion,
    Powerup,
}

/// Discrete notifications for the audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    GameOver { score: u64 },
    ScoreChanged { score: u64 },
    WeaponLevelChanged { level: u32 },
    ShieldChanged { active: bool },
    Sound { effect: SoundEffect },
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Agent {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Never decreases within a session
    pub weapon_level: u32,
    /// Frames until the next shot is allowed
    pub fire_cooldown: u32,
    pub shielded: bool,
    pub shield_ticks: u32,
}

impl Agent {
    pub fn new(tuning: &Tuning) -> Self {
        let mut agent = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::splat(tuning.player_size),
            weapon_level: 1,
            fire_cooldown: 0,
            shielded: false,
            shield_ticks: 0,
        };
        agent.reset(tuning);
        agent
    }

    /// Back to the start position with a level 1 weapon
    pub fn reset(&mut self, tuning: &Tuning) {
        self.size = Vec2::splat(tuning.player_size);
        self.pos = Vec2::new(
            tuning.playfield_width / 2.0 - self.size.x / 2.0,
            tuning.playfield_height - tuning.player_start_offset,
        );
        self.vel = Vec2::ZERO;
        self.weapon_level = 1;
        self.fire_cooldown = 0;
        self.shielded = false;
        self.shield_ticks = 0;
        self.clamp_to_playfield(tuning);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Firing point (top center of the ship)
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Apply one frame of movement from whichever input mode is active
    pub fn steer(&mut self, input: &TickInput, tuning: &Tuning) {
        if let Some(pointer) = input.pointer {
            let target = Vec2::new(pointer.x, pointer.y) - self.size / 2.0;
            self.pos += (target - self.pos) * tuning.pointer_ease;
            self.vel = Vec2::ZERO;
        } else {
            let max_speed = if input.focus {
                tuning.player_focus_speed
            } else {
                tuning.player_speed
            };
            let dir = input.direction();
            if dir != Vec2::ZERO {
                self.vel = dir.normalize() * max_speed;
            } else {
                self.vel *= tuning.player_friction;
            }
            if self.vel.x.abs() < tuning.velocity_snap {
                self.vel.x = 0.0;
            }
            if self.vel.y.abs() < tuning.velocity_snap {
                self.vel.y = 0.0;
            }
            self.pos += self.vel;
        }
        self.clamp_to_playfield(tuning);
    }

    pub fn clamp_to_playfield(&mut self, tuning: &Tuning) {
        let max = Vec2::new(
            tuning.playfield_width - self.size.x,
            tuning.playfield_height - self.size.y,
        );
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    /// Count down cooldown and shield. Returns true when the shield ran out this frame.
    pub fn tick_timers(&mut self) -> bool {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if self.shielded {
            self.shield_ticks = self.shield_ticks.saturating_sub(1);
            if self.shield_ticks == 0 {
                self.shielded = false;
                return true;
            }
        }
        false
    }

    pub fn upgrade_weapon(&mut self) {
        self.weapon_level += 1;
    }

    pub fn activate_shield(&mut self, ticks: u32) {
        self.shielded = true;
        self.shield_ticks = ticks;
    }

    pub fn deactivate_shield(&mut self) {
        self.shielded = false;
        self.shield_ticks = 0;
    }
}

/// A player bullet
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed per frame
    pub speed: f32,
    /// Horizontal drift per frame
    pub vx: f32,
    pub damage: f32,
    pub expired: bool,
}

impl Projectile {
    /// Bullet centered horizontally on `origin.x`, fired at `angle` radians from vertical
    pub fn new(origin: Vec2, angle: f32, damage: f32, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(origin.x - tuning.projectile_width / 2.0, origin.y),
            size: Vec2::new(tuning.projectile_width, tuning.projectile_height),
            speed: tuning.projectile_speed,
            vx: angle * tuning.projectile_drift_factor,
            damage: damage.max(1.0),
            expired: false,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= self.speed;
        self.pos.x += self.vx;
        if self.pos.y < 0.0 {
            self.expired = true;
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// An enemy descending toward the player
#[derive(Debug, Clone)]
pub struct Hostile {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub hp: f32,
    /// Frames of white flash left after a hit
    pub hit_timer: u32,
    pub color: u32,
    pub expired: bool,
}

impl Hostile {
    pub fn new(x: f32, speed: f32, hp: f32, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(x, tuning.hostile_spawn_y),
            size: Vec2::splat(tuning.hostile_size),
            speed,
            hp,
            hit_timer: 0,
            color: palette::HOSTILE,
            expired: false,
        }
    }

    /// Descend; escaping past the bottom edge expires without penalty
    pub fn update(&mut self, playfield_height: f32) {
        self.pos.y += self.speed;
        self.hit_timer = self.hit_timer.saturating_sub(1);
        if self.pos.y > playfield_height {
            self.expired = true;
        }
    }

    /// Apply damage and start the flash. Returns true if this hit destroyed it.
    pub fn take_hit(&mut self, damage: f32, flash_ticks: u32) -> bool {
        self.hp -= damage;
        self.hit_timer = flash_ticks;
        if self.hp <= 0.0 {
            self.expired = true;
        }
        self.expired
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    WeaponUpgrade,
    Shield,
    Score,
}

impl PickupKind {
    pub fn color(&self) -> u32 {
        match self {
            PickupKind::WeaponUpgrade => palette::PURPLE,
            PickupKind::Shield => palette::WHITE,
            PickupKind::Score => palette::TEAL,
        }
    }
}

/// A collectible drifting down the playfield
#[derive(Debug, Clone)]
pub struct Pickup {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: PickupKind,
    pub expired: bool,
}

impl Pickup {
    pub fn new(pos: Vec2, kind: PickupKind, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: Vec2::splat(tuning.pickup_size),
            speed: tuning.pickup_speed,
            kind,
            expired: false,
        }
    }

    pub fn update(&mut self, playfield_height: f32) {
        self.pos.y += self.speed;
        self.pos.x += (self.pos.y * 0.05).sin() * 0.5;
        if self.pos.y > playfield_height {
            self.expired = true;
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Particle behaviour variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Expanding hit ring
    Ring,
    /// Drifting explosion debris
    Spark,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub kind: ParticleKind,
    /// 0-1, doubles as alpha
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn new<R: Rng>(rng: &mut R, pos: Vec2, color: u32, kind: ParticleKind) -> Self {
        let (size, vel) = match kind {
            ParticleKind::Spark => (
                rng.random::<f32>() * 3.0 + 2.0,
                Vec2::new(
                    rng.random::<f32>() * 6.0 - 3.0,
                    rng.random::<f32>() * 6.0 - 3.0,
                ),
            ),
            ParticleKind::Ring => (1.0, Vec2::ZERO),
        };
        Self {
            pos,
            vel,
            color,
            kind,
            life: 1.0,
            size,
        }
    }

    pub fn update(&mut self) {
        match self.kind {
            ParticleKind::Spark => {
                self.pos += self.vel;
                self.life -= 0.05;
            }
            ParticleKind::Ring => {
                self.size += 4.0;
                self.life -= 0.08;
            }
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Most sparks a single burst request produces
pub const MAX_BURST: usize = 4;

/// Bounded particle pool; requests past the cap are dropped
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    cap: usize,
}

impl ParticleSystem {
    pub fn new(cap: usize) -> Self {
        Self {
            particles: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Spawn a burst. Rings are always single; sparks are limited to [`MAX_BURST`].
    pub fn emit<R: Rng>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        count: usize,
        color: u32,
        kind: ParticleKind,
    ) {
        let count = match kind {
            ParticleKind::Ring => 1,
            ParticleKind::Spark => count.min(MAX_BURST),
        };
        for _ in 0..count {
            if self.particles.len() >= self.cap {
                return;
            }
            self.particles.push(Particle::new(rng, pos, color, kind));
        }
    }

    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

/// Background star (visual only)
#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * tuning.playfield_width,
                rng.random::<f32>() * tuning.playfield_height,
            ),
            size: rng.random::<f32>() * 2.0,
            speed: rng.random::<f32>() * 0.5 + 0.1,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Immutable balance for this session
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Never decreases within a session
    pub score: u64,
    /// Grows by a fixed increment every frame
    pub difficulty: f32,
    pub spawner: SpawnDirector,
    /// Simulated frames this session
    pub time_ticks: u64,
    /// Current shake intensity in pixels (decays each frame)
    pub screen_shake: f32,
    pub agent: Agent,
    pub projectiles: Vec<Projectile>,
    pub hostiles: Vec<Hostile>,
    pub pickups: Vec<Pickup>,
    pub particles: ParticleSystem,
    pub stars: Vec<Star>,
    /// Notifications since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on the start screen with the given seed.
    ///
    /// `tuning` is used as given; run [`Tuning::validate`] on hand-built values
    /// (`Tuning::from_json` and `Tuning::load` already do).
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_rng(seed, Pcg32::seed_from_u64(seed), tuning)
    }

    /// Create a session drawing from an already-seeded source
    pub fn with_rng(seed: u64, mut rng: Pcg32, tuning: Tuning) -> Self {
        let stars = (0..tuning.star_count)
            .map(|_| Star::random(&mut rng, &tuning))
            .collect();
        Self {
            seed,
            rng,
            phase: GamePhase::Ready,
            score: 0,
            difficulty: tuning.difficulty_start,
            spawner: SpawnDirector::default(),
            time_ticks: 0,
            screen_shake: 0.0,
            agent: Agent::new(&tuning),
            projectiles: Vec::new(),
            hostiles: Vec::new(),
            pickups: Vec::new(),
            particles: ParticleSystem::new(tuning.max_particles),
            stars,
            events: Vec::new(),
            tuning,
        }
    }

    /// Reset the run and begin playing
    pub fn start(&mut self) {
        self.score = 0;
        self.difficulty = self.tuning.difficulty_start;
        self.spawner = SpawnDirector::default();
        self.time_ticks = 0;
        self.screen_shake = 0.0;
        self.agent.reset(&self.tuning);
        self.projectiles.clear();
        self.hostiles.clear();
        self.pickups.clear();
        self.particles.clear();
        self.phase = GamePhase::Playing;

        log::info!("Session started (seed {})", self.seed);
        self.events.push(GameEvent::Started);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::WeaponLevelChanged { level: 1 });
    }

    /// Toggle between Playing and Paused; no effect in other phases
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            GamePhase::Ready | GamePhase::GameOver => {}
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Total live entities across all collections
    pub fn entity_count(&self) -> usize {
        self.projectiles.len() + self.hostiles.len() + self.pickups.len() + self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_ready() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.agent.weapon_level, 1);
        assert_eq!(state.stars.len(), 60);
        assert_eq!(state.entity_count(), 0);
    }

    #[test]
    fn test_start_position() {
        let tuning = Tuning::default();
        let agent = Agent::new(&tuning);
        assert_eq!(agent.pos, Vec2::new(382.0, 500.0));
    }

    #[test]
    fn test_hostile_destroyed_exactly_at_zero_hp() {
        let tuning = Tuning::default();
        let mut hostile = Hostile::new(100.0, 1.0, 3.0, &tuning);
        assert!(!hostile.take_hit(1.0, 3));
        assert!(!hostile.take_hit(1.5, 3));
        assert_eq!(hostile.hit_timer, 3);
        assert!(hostile.take_hit(0.5, 3));
    }

    #[test]
    fn test_hostile_escapes_bottom() {
        let tuning = Tuning::default();
        let mut hostile = Hostile::new(100.0, 3.0, 5.0, &tuning);
        hostile.pos.y = tuning.playfield_height - 1.0;
        hostile.update(tuning.playfield_height);
        assert!(hostile.expired);
        assert_eq!(hostile.hp, 5.0);
    }

    #[test]
    fn test_projectile_exits_top() {
        let tuning = Tuning::default();
        let mut projectile = Projectile::new(Vec2::new(100.0, 20.0), 0.0, 1.0, &tuning);
        projectile.update();
        assert!(!projectile.expired);
        projectile.update();
        assert!(projectile.expired);
    }

    #[test]
    fn test_angled_projectile_drifts() {
        let tuning = Tuning::default();
        let mut projectile = Projectile::new(Vec2::new(100.0, 300.0), 0.2, 1.0, &tuning);
        let x0 = projectile.pos.x;
        projectile.update();
        assert!((projectile.pos.x - x0 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_ring_and_spark_decay() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ring = Particle::new(&mut rng, Vec2::ZERO, palette::WHITE, ParticleKind::Ring);
        ring.update();
        assert_eq!(ring.size, 5.0);
        assert!((ring.life - 0.92).abs() < 1e-6);

        let mut spark = Particle::new(&mut rng, Vec2::ZERO, palette::WHITE, ParticleKind::Spark);
        assert!((2.0..5.0).contains(&spark.size));
        for _ in 0..21 {
            spark.update();
        }
        assert!(spark.is_dead());
    }

    #[test]
    fn test_particle_cap_drops_requests() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = ParticleSystem::new(10);
        for _ in 0..5 {
            particles.emit(&mut rng, Vec2::ZERO, 20, palette::WHITE, ParticleKind::Spark);
        }
        assert_eq!(particles.len(), 10);
        particles.emit(&mut rng, Vec2::ZERO, 1, palette::WHITE, ParticleKind::Ring);
        assert_eq!(particles.len(), 10);
    }

    #[test]
    fn test_spark_burst_limited() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = ParticleSystem::new(80);
        particles.emit(&mut rng, Vec2::ZERO, 20, palette::CYAN, ParticleKind::Spark);
        assert_eq!(particles.len(), MAX_BURST);
    }

    #[test]
    fn test_shield_runs_out() {
        let tuning = Tuning::default();
        let mut agent = Agent::new(&tuning);
        agent.activate_shield(2);
        assert!(!agent.tick_timers());
        assert!(agent.tick_timers());
        assert!(!agent.shielded);
    }

    #[test]
    fn test_pause_ignored_when_over() {
        let mut state = GameState::new(1, Tuning::default());
        state.start();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
        state.phase = GamePhase::GameOver;
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
