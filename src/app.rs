use std::error::Error;
use std::fs;

use glam::Vec2;
use instant::Instant;

use crate::particles::{BurstTimer, ParticleSprite, ParticleSystem};
use crate::path::{self, LineVertex, Waypoint};
use crate::pet::{Pet, PetConfig, PetState};
use crate::records::{self, InputFrame, Playback, SessionRecord};
use crate::settings::Settings;

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f64 = 1.0 / 60.0;
/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// Simulated session length in seconds.
const SESSION_SECONDS: f64 = 30.0;
/// How often to log a status line (simulated seconds).
const STATUS_INTERVAL: f64 = 5.0;
/// Seconds between pulse bursts.
const PULSE_INTERVAL: f32 = 2.0;
/// World the scripted player strolls around in.
const WORLD_SIZE: Vec2 = Vec2::new(3000.0, 2000.0);
/// Margin the stroll keeps from the world edges.
const WORLD_MARGIN: f32 = 100.0;
/// Stroll speed of the scripted player (units/second).
const WANDER_SPEED: f32 = 220.0;
/// Distance at which a stroll goal counts as reached.
const GOAL_REACHED: f32 = 20.0;

// ---------------------------------------------------------------------------
// Scripted player
// ---------------------------------------------------------------------------

/// Stand-in for the tracked player. Strolls between random waypoints
/// inside the world bounds.
struct Wanderer {
    pos: Vec2,
    goal: Vec2,
    vel: Vec2,
}

impl Wanderer {
    fn new(rng: &mut fastrand::Rng) -> Self {
        let pos = WORLD_SIZE * 0.5;
        Self {
            pos,
            goal: Self::random_goal(rng),
            vel: Vec2::ZERO,
        }
    }

    fn random_goal(rng: &mut fastrand::Rng) -> Vec2 {
        Vec2::new(
            WORLD_MARGIN + rng.f32() * (WORLD_SIZE.x - 2.0 * WORLD_MARGIN),
            WORLD_MARGIN + rng.f32() * (WORLD_SIZE.y - 2.0 * WORLD_MARGIN),
        )
    }

    fn update(&mut self, dt: f32, rng: &mut fastrand::Rng) {
        let to_goal = self.goal - self.pos;
        if to_goal.length() < GOAL_REACHED {
            self.goal = Self::random_goal(rng);
            self.vel = Vec2::ZERO;
            return;
        }
        self.vel = to_goal.normalize() * WANDER_SPEED;
        self.pos += self.vel * dt;
    }

    fn moving(&self) -> bool {
        self.vel.length_squared() > 1.0
    }

    /// The input a player walking like this would be holding down.
    fn input_frame(&self) -> InputFrame {
        InputFrame {
            direction: if self.vel.x > 1.0 {
                1
            } else if self.vel.x < -1.0 {
                -1
            } else {
                0
            },
            jump: (self.vel.y < -1.0) as i32,
            ..InputFrame::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One headless simulated session: the scripted player, the pet chasing
/// it, and the cosmetic systems hanging off both.
struct Session {
    settings: Settings,
    pet_cfg: PetConfig,
    pet: Pet,
    player: Wanderer,
    particles: ParticleSystem,
    pulse: BurstTimer,
    record: SessionRecord,
    rng: fastrand::Rng,

    // Fixed timestep
    accumulator: f64,
    tick_count: u64,

    last_pet_state: PetState,
    next_status_log: f64,

    // Reusable frame buffers (avoid per-frame allocation)
    sprite_buf: Vec<ParticleSprite>,
    line_buf: Vec<LineVertex>,
    dot_buf: Vec<Waypoint>,
}

impl Session {
    fn new(settings: Settings) -> Self {
        let mut rng = fastrand::Rng::new();
        let pet_cfg = PetConfig {
            reactive: settings.reactive_pet,
            ..PetConfig::default()
        };
        let player = Wanderer::new(&mut rng);
        let pet = Pet::new(Vec2::ZERO);
        let last_pet_state = pet.state();

        Self {
            settings,
            pet_cfg,
            pet,
            player,
            particles: ParticleSystem::new(),
            pulse: BurstTimer::new(PULSE_INTERVAL),
            record: SessionRecord::new(),
            rng,
            accumulator: 0.0,
            tick_count: 0,
            last_pet_state,
            next_status_log: 0.0,
            sprite_buf: Vec::new(),
            line_buf: Vec::new(),
            dot_buf: Vec::new(),
        }
    }

    /// Run fixed-timestep simulation ticks for one frame's worth of time.
    fn run_fixed_update(&mut self, frame_dt: f64) {
        self.accumulator += frame_dt;

        if self.accumulator > MAX_ACCUMULATOR {
            self.accumulator = MAX_ACCUMULATOR;
        }

        while self.accumulator >= TICK_RATE {
            self.tick(TICK_RATE as f32);
            self.accumulator -= TICK_RATE;
        }
    }

    /// One simulation tick.
    fn tick(&mut self, dt: f32) {
        self.player.update(dt, &mut self.rng);
        let player_pos = self.player.pos;

        if self.settings.pet_enabled {
            self.pet.advance(dt, player_pos, &self.pet_cfg);

            let state = self.pet.state();
            if state != self.last_pet_state {
                log::debug!(
                    "pet {:?} -> {:?} at ({:.0}, {:.0})",
                    self.last_pet_state,
                    state,
                    self.pet.position().x,
                    self.pet.position().y,
                );
                self.last_pet_state = state;
            }

            // Trail only while the pet is actually chasing.
            if self.settings.pet_trail && state == PetState::Follow {
                self.particles.spawn_trail(
                    self.pet.position(),
                    self.settings.pet_trail_radius,
                    self.settings.pet_trail_color,
                    &mut self.rng,
                );
            }
        }

        if self.settings.player_trail && self.player.moving() {
            self.particles.spawn_trail(
                player_pos,
                self.settings.player_trail_radius,
                self.settings.player_trail_color,
                &mut self.rng,
            );
        }

        if self.settings.scatter_sparkles {
            self.particles
                .spawn_scatter(player_pos, self.settings.scatter_radius, &mut self.rng);
        }

        if self.settings.pulse_sparkles && self.pulse.fire(dt) {
            self.particles
                .spawn_pulse(player_pos, self.settings.pulse_radius, &mut self.rng);
        }

        self.particles.update(dt);

        if self.settings.recording {
            let aim = self.player.goal - player_pos;
            self.record
                .push_frame(self.player.input_frame(), aim, player_pos);
        }

        self.tick_count += 1;
    }

    /// Build the per-frame draw data a renderer would consume.
    fn build_frame(&mut self) {
        self.sprite_buf.clear();
        self.line_buf.clear();
        self.particles.snapshot(&mut self.sprite_buf);

        if self.settings.pet_enabled && self.settings.sight_line {
            path::sight_line(self.pet.position(), self.player.pos, &mut self.line_buf);
        }
    }

    fn sim_time(&self) -> f64 {
        self.tick_count as f64 * TICK_RATE
    }

    fn maybe_log_status(&mut self) {
        if self.sim_time() < self.next_status_log {
            return;
        }
        self.next_status_log = self.sim_time() + STATUS_INTERVAL;

        let dist = self.pet.position().distance(self.player.pos);
        log::info!(
            "t={:>5.1}s | pet {:?} at ({:.0}, {:.0}) vel {:.0} | dist {:.0} | {} sprites",
            self.sim_time(),
            self.pet.state(),
            self.pet.position().x,
            self.pet.position().y,
            self.pet.velocity().length(),
            dist,
            self.sprite_buf.len(),
        );
    }

    /// Persist and replay the session record, if any was kept.
    fn finish(&mut self) -> Result<(), Box<dyn Error>> {
        if self.record.is_empty() {
            return Ok(());
        }
        let Some(dir) = self.settings.records_dir.clone() else {
            log::info!(
                "Recorded {} frames (persistence disabled)",
                self.record.len()
            );
            return Ok(());
        };

        fs::create_dir_all(&dir)?;
        let file = records::record_file(&dir, &self.settings.map_name);
        self.record.save(&file)?;
        log::info!(
            "{} record file(s) in {}",
            records::list_records(&dir)?.len(),
            dir.display()
        );

        // Round-trip what we just wrote: build the route preview and
        // drain a playback, like the client does before a replay.
        let mut playback = Playback::new(SessionRecord::load(&file)?);
        self.line_buf.clear();
        self.dot_buf.clear();
        path::route_preview(playback.route(), &mut self.line_buf, &mut self.dot_buf);
        if let Some(dot) = self.dot_buf.first() {
            log::debug!(
                "first waypoint at ({:.0}, {:.0}) r={} color={:?}",
                dot.position[0],
                dot.position[1],
                dot.radius,
                path::waypoint_color(),
            );
        }

        log::debug!("replaying {} frames", playback.remaining());
        let mut replayed = 0u32;
        while playback.next_frame().is_some() {
            replayed += 1;
        }
        log::info!(
            "Route preview: {} segments, {} waypoints; replayed {} frames",
            self.line_buf.len() / 2,
            self.dot_buf.len(),
            replayed,
        );

        self.record.clear();
        Ok(())
    }
}

/// Entry point — run one scripted session with everything switched on.
pub fn run() -> Result<(), Box<dyn Error>> {
    let settings = Settings {
        reactive_pet: true,
        scatter_sparkles: true,
        pulse_sparkles: true,
        recording: true,
        records_dir: Some(std::env::temp_dir().join("sidekick-records")),
        ..Settings::default()
    };
    run_session(settings, SESSION_SECONDS)
}

fn run_session(settings: Settings, seconds: f64) -> Result<(), Box<dyn Error>> {
    let started = Instant::now();
    let mut session = Session::new(settings);

    let frames = (seconds / TICK_RATE).ceil() as u64;
    for _ in 0..frames {
        session.run_fixed_update(TICK_RATE);
        session.build_frame();
        session.maybe_log_status();
    }

    session.finish()?;
    log::info!(
        "Session done: {} ticks simulated in {:.2}s wall time",
        session.tick_count,
        started.elapsed().as_secs_f64(),
    );
    Ok(())
}
