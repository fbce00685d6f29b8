//! Fixed per-frame simulation tick
//!
//! Core game loop that advances the session by exactly one frame. The step
//! order matters: projectile hits are resolved before player contact, so a
//! hostile killed this frame can never end the run.

use rand::Rng;

use super::collision::overlaps_with_tolerance;
use super::input::{TickInput, autopilot};
use super::spawn::{Spawn, spawn_pickup};
use super::state::{GameEvent, GamePhase, GameState, ParticleKind, PickupKind, SoundEffect};
use super::weapon;
use crate::palette;

/// Shake decay per frame
const SHAKE_DECAY: f32 = 0.9;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.start && matches!(state.phase, GamePhase::Ready | GamePhase::GameOver) {
        state.start();
    }

    // Handle pause toggle
    if input.pause {
        let was_playing = state.phase == GamePhase::Playing;
        state.toggle_pause();
        if was_playing {
            return;
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    state.time_ticks += 1;

    state.screen_shake *= SHAKE_DECAY;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    // 1. Difficulty ramps every frame, unbounded
    state.difficulty = state.tuning.difficulty_at(state.time_ticks);
    update_stars(state);

    // 2. Spawning
    let level = state.agent.weapon_level;
    if let Some(spawn) = state
        .spawner
        .step(&mut state.rng, state.difficulty, level, &state.tuning)
    {
        match spawn {
            Spawn::Hostile(hostile) => {
                log::debug!(
                    "Spawned hostile at x={:.0} (hp {:.1}, speed {:.2})",
                    hostile.pos.x,
                    hostile.hp,
                    hostile.speed
                );
                state.hostiles.push(hostile);
            }
            Spawn::Pickup(pickup) => {
                log::debug!("Spawned natural {:?} pickup", pickup.kind);
                state.pickups.push(pickup);
            }
        }
    }

    // 3. Player movement and firing
    update_agent(state, &input);

    // 4. Projectiles
    for projectile in &mut state.projectiles {
        projectile.update();
    }
    state.projectiles.retain(|p| !p.expired);

    // 5-6. Hostiles vs projectiles, then vs player
    resolve_hostiles(state);

    // 7. Pickups
    collect_pickups(state);

    // 8. Particles
    state.particles.update();

    // Nothing destroyed this frame survives to be drawn
    state.projectiles.retain(|p| !p.expired);
    state.hostiles.retain(|h| !h.expired);
    state.pickups.retain(|p| !p.expired);
}

fn update_stars(state: &mut GameState) {
    let GameState {
        tuning,
        rng,
        stars,
        difficulty,
        ..
    } = state;
    for star in stars.iter_mut() {
        star.pos.y += star.speed * (*difficulty + 2.0);
        if star.pos.y > tuning.playfield_height {
            star.pos.y = 0.0;
            star.pos.x = rng.random::<f32>() * tuning.playfield_width;
        }
    }
}

fn update_agent(state: &mut GameState, input: &TickInput) {
    let GameState {
        tuning,
        agent,
        projectiles,
        events,
        ..
    } = state;

    agent.steer(input, tuning);

    if input.wants_fire() && agent.fire_cooldown == 0 {
        projectiles.extend(weapon::fire(agent, tuning));
        agent.fire_cooldown = weapon::fire_cooldown(agent.weapon_level, tuning);
        events.push(GameEvent::Sound {
            effect: SoundEffect::Shoot,
        });
    }

    if agent.tick_timers() {
        events.push(GameEvent::ShieldChanged { active: false });
    }
}

fn resolve_hostiles(state: &mut GameState) {
    let GameState {
        tuning,
        rng,
        phase,
        score,
        difficulty,
        screen_shake,
        agent,
        projectiles,
        hostiles,
        pickups,
        particles,
        events,
        ..
    } = state;

    // Reverse order so later spawns get first claim on overlapping projectiles
    for hostile in hostiles.iter_mut().rev() {
        hostile.update(tuning.playfield_height);
        if hostile.expired {
            // Escaped off the bottom: no penalty
            continue;
        }

        let hit_box = hostile.bounds().inflate(tuning.hostile_hitbox_expand);
        // Only the first overlapping projectile counts this frame
        if let Some(projectile) = projectiles
            .iter_mut()
            .find(|p| !p.expired && p.bounds().overlaps(&hit_box))
        {
            projectile.expired = true;
            if hostile.take_hit(projectile.damage, tuning.hit_flash_ticks) {
                let center = hostile.center();
                particles.emit(rng, center, 6, hostile.color, ParticleKind::Spark);
                particles.emit(rng, center, 1, palette::WHITE, ParticleKind::Ring);
                events.push(GameEvent::Sound {
                    effect: SoundEffect::Explosion,
                });

                *score += tuning.kill_score_base
                    + tuning.kill_score_per_level * agent.weapon_level as u64;
                events.push(GameEvent::ScoreChanged { score: *score });

                if rng.random::<f32>() < tuning.drop_rate_on_kill {
                    let max_x = tuning.playfield_width - tuning.pickup_size;
                    let mut pos = hostile.pos;
                    pos.x = pos.x.min(max_x).max(0.0);
                    let drop = spawn_pickup(rng, pos, agent.weapon_level, tuning);
                    log::debug!("Hostile dropped {:?} pickup", drop.kind);
                    pickups.push(drop);
                }
            } else {
                particles.emit(rng, projectile.pos, 1, palette::WHITE, ParticleKind::Spark);
            }
        }

        if hostile.expired || *phase != GamePhase::Playing {
            continue;
        }

        let contact = overlaps_with_tolerance(
            hostile.bounds(),
            tuning.contact_hostile_expand,
            agent.bounds(),
            -tuning.player_hitbox_shrink,
        );
        if !contact {
            continue;
        }

        if agent.shielded {
            hostile.expired = true;
            agent.deactivate_shield();
            particles.emit(rng, hostile.pos, 8, palette::WHITE, ParticleKind::Spark);
            particles.emit(rng, hostile.pos, 1, palette::WHITE, ParticleKind::Ring);
            *screen_shake = tuning.shield_hit_shake;
            events.push(GameEvent::ShieldChanged { active: false });
        } else {
            particles.emit(rng, agent.pos, 20, palette::CYAN, ParticleKind::Spark);
            *phase = GamePhase::GameOver;
            events.push(GameEvent::Sound {
                effect: SoundEffect::Explosion,
            });
            events.push(GameEvent::GameOver { score: *score });
            log::info!(
                "Game over: score {} at weapon level {} (difficulty {:.2})",
                score,
                agent.weapon_level,
                difficulty
            );
        }
    }

    hostiles.retain(|h| !h.expired);
}

fn collect_pickups(state: &mut GameState) {
    let GameState {
        tuning,
        rng,
        score,
        agent,
        pickups,
        particles,
        events,
        ..
    } = state;

    for pickup in pickups.iter_mut().rev() {
        pickup.update(tuning.playfield_height);
        if pickup.expired {
            continue;
        }

        let grab_box = pickup.bounds().inflate(tuning.pickup_hitbox_expand);
        if !agent.bounds().overlaps(&grab_box) {
            continue;
        }

        pickup.expired = true;
        match pickup.kind {
            PickupKind::WeaponUpgrade => {
                agent.upgrade_weapon();
                particles.emit(rng, agent.nose(), 10, palette::PURPLE, ParticleKind::Spark);
                log::debug!("Weapon upgraded to level {}", agent.weapon_level);
                events.push(GameEvent::WeaponLevelChanged {
                    level: agent.weapon_level,
                });
            }
            PickupKind::Shield => {
                agent.activate_shield(tuning.shield_ticks);
                events.push(GameEvent::ShieldChanged { active: true });
            }
            PickupKind::Score => {}
        }

        particles.emit(rng, pickup.pos, 4, pickup.kind.color(), ParticleKind::Spark);
        *score += tuning.pickup_score;
        events.push(GameEvent::ScoreChanged { score: *score });
        events.push(GameEvent::Sound {
            effect: SoundEffect::Powerup,
        });
    }

    pickups.retain(|p| !p.expired);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::sim::state::{Hostile, Pickup, Projectile};
    use crate::tuning::Tuning;

    /// Tuning with spawning disabled so tests control every entity
    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_rate_base: 1.0e9,
            spawn_rate_min: 1.0e9,
            ..Tuning::default()
        }
    }

    fn playing(tuning: Tuning) -> GameState {
        let mut state = GameState::new(12345, tuning);
        state.start();
        state.drain_events();
        state
    }

    fn parked_hostile(state: &GameState, pos: Vec2, hp: f32) -> Hostile {
        let mut hostile = Hostile::new(pos.x, 0.0, hp, &state.tuning);
        hostile.pos.y = pos.y;
        hostile
    }

    #[test]
    fn test_tick_ready_to_playing() {
        let mut state = GameState::new(12345, Tuning::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_ticks, 0);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
        assert!(state.events.contains(&GameEvent::Started));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing(quiet_tuning());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 1);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 1);

        // Unpause resumes within the same tick
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_difficulty_ramps_each_frame() {
        let mut state = playing(quiet_tuning());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!((state.difficulty - 1.002).abs() < 1e-5);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = playing(quiet_tuning());
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        tick(&mut state, &shoot);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.agent.fire_cooldown, 9);
        assert!(state.drain_events().contains(&GameEvent::Sound {
            effect: SoundEffect::Shoot
        }));

        // Next shot lands ten frames after the first
        for _ in 0..9 {
            tick(&mut state, &shoot);
        }
        assert_eq!(state.projectiles.len(), 1);
        tick(&mut state, &shoot);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_destroys_hostile() {
        let mut state = playing(quiet_tuning());
        let hostile = parked_hostile(&state, Vec2::new(100.0, 200.0), 1.0);
        state.hostiles.push(hostile);
        let bullet = Projectile::new(Vec2::new(113.0, 215.0), 0.0, 1.0, &state.tuning);
        state.projectiles.push(bullet);

        tick(&mut state, &TickInput::default());

        assert!(state.hostiles.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 12);
        assert_eq!(state.particles.len(), 5);
        assert!(state.pickups.len() <= 1);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 12 }));
        assert!(events.contains(&GameEvent::Sound {
            effect: SoundEffect::Explosion
        }));
    }

    /// Kill a 1 hp hostile parked at `pos` with a single centered bullet
    fn kill_at(state: &mut GameState, pos: Vec2) {
        let hostile = parked_hostile(state, pos, 1.0);
        let center_x = hostile.center().x;
        state.hostiles.push(hostile);
        let bullet = Projectile::new(Vec2::new(center_x, pos.y + 15.0), 0.0, 1.0, &state.tuning);
        state.projectiles.push(bullet);
        tick(state, &TickInput::default());
        assert!(state.hostiles.is_empty());
    }

    #[test]
    fn test_kill_always_drops_at_hostile() {
        let mut state = playing(Tuning {
            drop_rate_on_kill: 1.0,
            ..quiet_tuning()
        });
        kill_at(&mut state, Vec2::new(100.0, 200.0));

        assert_eq!(state.pickups.len(), 1);
        let pickup = &state.pickups[0];
        // Dropped at the hostile, then moved once by the pickup step
        assert!((pickup.pos.y - (200.0 + state.tuning.pickup_speed)).abs() < 1e-4);
        assert!((pickup.pos.x - 100.0).abs() <= 0.5);
    }

    #[test]
    fn test_kill_drop_clamped_into_playfield() {
        let mut state = playing(Tuning {
            drop_rate_on_kill: 1.0,
            ..quiet_tuning()
        });
        let max_x = state.tuning.playfield_width - state.tuning.pickup_size;
        kill_at(&mut state, Vec2::new(795.0, 200.0));

        assert_eq!(state.pickups.len(), 1);
        assert!((state.pickups[0].pos.x - max_x).abs() <= 0.5);
    }

    #[test]
    fn test_kill_never_drops_at_zero_rate() {
        let mut state = playing(Tuning {
            drop_rate_on_kill: 0.0,
            ..quiet_tuning()
        });
        for i in 0..20 {
            kill_at(&mut state, Vec2::new(40.0 + i as f32 * 30.0, 200.0));
        }
        assert!(state.pickups.is_empty());
        assert_eq!(state.score, 20 * 12);
    }

    #[test]
    fn test_oversized_pickup_drop_does_not_panic() {
        // Bypasses validation on purpose
        let mut state = playing(Tuning {
            drop_rate_on_kill: 1.0,
            pickup_size: 900.0,
            ..quiet_tuning()
        });
        kill_at(&mut state, Vec2::new(100.0, 200.0));
        assert!(state.score >= 12);
    }

    #[test]
    fn test_one_projectile_per_hostile_per_frame() {
        let mut state = playing(quiet_tuning());
        let hostile = parked_hostile(&state, Vec2::new(100.0, 200.0), 10.0);
        state.hostiles.push(hostile);
        for x in [105.0, 120.0] {
            let bullet = Projectile::new(Vec2::new(x, 215.0), 0.0, 1.0, &state.tuning);
            state.projectiles.push(bullet);
        }

        tick(&mut state, &TickInput::default());

        assert_eq!(state.hostiles.len(), 1);
        assert_eq!(state.hostiles[0].hp, 9.0);
        assert_eq!(state.hostiles[0].hit_timer, 3);
        assert_eq!(state.projectiles.len(), 1);
        // The earliest projectile was the one consumed
        assert!(state.projectiles[0].pos.x > 110.0);
        // Single white hit spark
        assert_eq!(state.particles.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_shield_absorbs_contact() {
        let mut state = playing(quiet_tuning());
        state.agent.activate_shield(300);
        let hostile = parked_hostile(&state, state.agent.pos, 50.0);
        state.hostiles.push(hostile);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.agent.shielded);
        assert!(state.hostiles.is_empty());
        assert_eq!(state.screen_shake, 5.0);
        assert!(state.events.contains(&GameEvent::ShieldChanged { active: false }));
    }

    #[test]
    fn test_unshielded_contact_ends_run() {
        let mut state = playing(quiet_tuning());
        let hostile = parked_hostile(&state, state.agent.pos, 50.0);
        state.hostiles.push(hostile);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));

        // World is frozen until restart
        let ticks = state.time_ticks;
        let difficulty = state.difficulty;
        let agent_pos = state.agent.pos;
        let particles = state.particles.len();
        let hostiles = state.hostiles.len();
        let busy = TickInput {
            left: true,
            shoot: true,
            pause: true,
            ..Default::default()
        };
        for _ in 0..50 {
            tick(&mut state, &busy);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.difficulty, difficulty);
        assert_eq!(state.agent.pos, agent_pos);
        assert_eq!(state.particles.len(), particles);
        assert_eq!(state.hostiles.len(), hostiles);
        assert!(state.projectiles.is_empty());

        let restart = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.hostiles.is_empty());
    }

    #[test]
    fn test_killed_hostile_cannot_end_run() {
        let mut state = playing(quiet_tuning());
        let hostile = parked_hostile(&state, state.agent.pos, 1.0);
        state.hostiles.push(hostile);
        let bullet = Projectile::new(state.agent.nose() + Vec2::new(0.0, 12.0), 0.0, 1.0, &state.tuning);
        state.projectiles.push(bullet);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.hostiles.is_empty());
    }

    #[test]
    fn test_escaped_hostile_no_penalty() {
        let mut state = playing(quiet_tuning());
        let height = state.tuning.playfield_height;
        let mut hostile = parked_hostile(&state, Vec2::new(10.0, height - 1.0), 5.0);
        hostile.speed = 3.0;
        state.hostiles.push(hostile);
        state.score = 40;

        tick(&mut state, &TickInput::default());

        assert!(state.hostiles.is_empty());
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_pickup_upgrade() {
        let mut state = playing(quiet_tuning());
        let pickup = Pickup::new(state.agent.pos, PickupKind::WeaponUpgrade, &state.tuning);
        state.pickups.push(pickup);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.agent.weapon_level, 2);
        assert_eq!(state.score, 5);
        assert!(state.pickups.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::WeaponLevelChanged { level: 2 }));
        assert!(events.contains(&GameEvent::Sound {
            effect: SoundEffect::Powerup
        }));
    }

    #[test]
    fn test_pickup_shield() {
        let mut state = playing(quiet_tuning());
        let pickup = Pickup::new(state.agent.pos, PickupKind::Shield, &state.tuning);
        state.pickups.push(pickup);

        tick(&mut state, &TickInput::default());

        assert!(state.agent.shielded);
        assert_eq!(state.agent.weapon_level, 1);
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_agent_clamped_to_playfield() {
        let mut state = playing(quiet_tuning());
        let up_left = TickInput {
            up: true,
            left: true,
            ..Default::default()
        };
        for _ in 0..1000 {
            tick(&mut state, &up_left);
        }
        assert_eq!(state.agent.pos, Vec2::ZERO);

        let pointer = TickInput {
            pointer: Some(crate::sim::PointerState {
                x: 5000.0,
                y: 5000.0,
                down: false,
            }),
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &pointer);
        }
        let max = Vec2::new(
            state.tuning.playfield_width - state.agent.size.x,
            state.tuning.playfield_height - state.agent.size.y,
        );
        assert_eq!(state.agent.pos, max);
    }

    #[test]
    fn test_determinism() {
        let demo = TickInput {
            idle_mode: true,
            start: true,
            ..Default::default()
        };
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        for _ in 0..3000 {
            tick(&mut state1, &demo);
            tick(&mut state2, &demo);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.hostiles.len(), state2.hostiles.len());
        assert_eq!(state1.particles.len(), state2.particles.len());
        assert_eq!(state1.agent.pos, state2.agent.pos);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_session_invariants(
            seed in any::<u64>(),
            frames in prop::collection::vec(any::<u8>(), 1..600),
        ) {
            let mut state = playing(Tuning::default());
            state.seed = seed;
            state.rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(seed);
            let mut last_score = state.score;
            let mut last_level = state.agent.weapon_level;

            for bits in frames {
                let input = TickInput {
                    up: bits & 1 != 0,
                    down: bits & 2 != 0,
                    left: bits & 4 != 0,
                    right: bits & 8 != 0,
                    shoot: bits & 16 != 0,
                    focus: bits & 32 != 0,
                    idle_mode: bits & 64 != 0,
                    ..Default::default()
                };
                tick(&mut state, &input);

                let pos = state.agent.pos;
                prop_assert!(pos.x >= 0.0 && pos.x <= state.tuning.playfield_width - state.agent.size.x);
                prop_assert!(pos.y >= 0.0 && pos.y <= state.tuning.playfield_height - state.agent.size.y);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.agent.weapon_level >= last_level);
                prop_assert!(state.particles.len() <= state.tuning.max_particles);
                prop_assert!(state.projectiles.iter().all(|p| !p.expired));
                prop_assert!(state.hostiles.iter().all(|h| !h.expired && h.hp > 0.0));
                last_score = state.score;
                last_level = state.agent.weapon_level;
            }
        }
    }
}
