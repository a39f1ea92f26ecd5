use glam::Vec2;

/// Maximum concurrent particles.
const MAX_PARTICLES: usize = 2048;

/// Particles per trail puff.
const TRAIL_COUNT: usize = 5;
/// Particles per scatter burst.
const SCATTER_COUNT: usize = 10;
/// Particles per pulse burst.
const PULSE_COUNT: usize = 30;

/// Sprite size a fresh particle starts at; it shrinks to zero over its life.
const START_SIZE: f32 = 8.0;
/// Upward lift applied per second.
const LIFT: f32 = 10.0;
/// Velocity drag per second.
const DRAG: f32 = 2.0;

/// A single decorative particle.
#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: Vec2,
    vel: Vec2,
    lifetime: f32,
    max_lifetime: f32,
    /// RGBA packed as u32.
    color: u32,
}

/// What the host renderer draws for one live particle.
#[derive(Debug, Clone, Copy)]
pub struct ParticleSprite {
    pub pos: Vec2,
    pub size: f32,
    /// RGBA packed as u32, alpha already faded by remaining lifetime.
    pub color: u32,
}

/// Pool of decorative particles: trail puffs behind moving things and
/// sparkle bursts around points of interest.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    pub enabled: bool,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            enabled: true,
        }
    }

    /// Small puff left behind a moving entity. The whole puff shares one
    /// jitter offset so it reads as a single smudge, not a spray.
    pub fn spawn_trail(&mut self, pos: Vec2, radius: f32, color: u32, rng: &mut fastrand::Rng) {
        if !self.enabled {
            return;
        }
        let jitter = radius / 10.0;
        let r = rng.f32() * 2.0 * jitter - jitter;
        let at = pos + Vec2::splat(r);

        for _ in 0..TRAIL_COUNT {
            self.push(Particle {
                pos: at,
                vel: Vec2::new(rng.f32() * 20.0 - 10.0, rng.f32() * 20.0 - 10.0),
                lifetime: 0.25 + rng.f32() * 0.25,
                max_lifetime: 0.0, // fixed up in push()
                color,
            });
        }
    }

    /// Sparkles scattered inside a disc around `center`, drifting outward.
    /// Every sparkle gets its own random color.
    pub fn spawn_scatter(&mut self, center: Vec2, radius: f32, rng: &mut fastrand::Rng) {
        if !self.enabled {
            return;
        }
        for _ in 0..SCATTER_COUNT {
            let (offset, out_dir) = disc_offset(radius, rng);
            self.push(Particle {
                pos: center + offset,
                vel: out_dir * (10.0 + rng.f32() * 20.0),
                lifetime: 0.25 + rng.f32() * 0.25,
                max_lifetime: 0.0,
                color: random_color(rng, 0.5),
            });
        }
    }

    /// Big slow burst, meant to fire on a timer rather than every tick.
    pub fn spawn_pulse(&mut self, center: Vec2, radius: f32, rng: &mut fastrand::Rng) {
        if !self.enabled {
            return;
        }
        for _ in 0..PULSE_COUNT {
            let (offset, out_dir) = disc_offset(radius, rng);
            self.push(Particle {
                pos: center + offset,
                vel: out_dir * (5.0 + rng.f32() * 15.0),
                lifetime: 0.5 + rng.f32(),
                max_lifetime: 0.0,
                color: random_color(rng, 0.2),
            });
        }
    }

    fn push(&mut self, mut p: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            p.max_lifetime = p.lifetime;
            self.particles.push(p);
        }
    }

    /// Update all particles: move, age, remove dead.
    pub fn update(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += p.vel * dt;
            p.vel.y -= LIFT * dt;
            p.vel *= 1.0 - DRAG * dt;
            p.lifetime -= dt;

            if p.lifetime <= 0.0 {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Append render-ready sprites to `buf`. Size shrinks linearly with
    /// age, alpha fades with an ease-out so death reads as a pop.
    pub fn snapshot(&self, buf: &mut Vec<ParticleSprite>) {
        for p in &self.particles {
            let life_frac = (p.lifetime / p.max_lifetime).clamp(0.0, 1.0);
            let alpha = life_frac * life_frac;

            let base_alpha = (p.color & 0xFF) as f32;
            let new_alpha = (base_alpha * alpha) as u32;
            let color = (p.color & 0xFFFF_FF00) | new_alpha;

            buf.push(ParticleSprite {
                pos: p.pos,
                size: START_SIZE * life_frac,
                color,
            });
        }
    }

    /// Number of live particles.
    pub fn count(&self) -> usize {
        self.particles.len()
    }
}

/// Countdown gate for the pulse burst. Refires every `interval` seconds.
pub struct BurstTimer {
    timer: f32,
    interval: f32,
}

impl BurstTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            timer: interval,
            interval,
        }
    }

    /// Tick the timer down; true exactly on the ticks where a burst is due.
    pub fn fire(&mut self, dt: f32) -> bool {
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = self.interval;
            true
        } else {
            false
        }
    }
}

/// Random point inside a disc plus the unit direction it lies along.
fn disc_offset(radius: f32, rng: &mut fastrand::Rng) -> (Vec2, Vec2) {
    let angle = rng.f32() * std::f32::consts::TAU;
    let dist = rng.f32() * radius;
    let dir = Vec2::new(angle.cos(), angle.sin());
    (dir * dist, dir)
}

/// Random RGBA color with alpha drawn from [alpha_min, 1].
fn random_color(rng: &mut fastrand::Rng, alpha_min: f32) -> u32 {
    let r = (rng.f32() * 255.0) as u32;
    let g = (rng.f32() * 255.0) as u32;
    let b = (rng.f32() * 255.0) as u32;
    let a = ((alpha_min + rng.f32() * (1.0 - alpha_min)) * 255.0) as u32;
    r << 24 | g << 16 | b << 8 | a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_puff_spawns_five_short_lived_particles() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut ps = ParticleSystem::new();
        ps.spawn_trail(Vec2::new(10.0, 10.0), 16.0, 0xFF00_00FF, &mut rng);

        assert_eq!(ps.count(), TRAIL_COUNT);
        for p in &ps.particles {
            assert!(p.lifetime >= 0.25 && p.lifetime <= 0.5);
            // Whole puff lands within the jitter envelope.
            assert!((p.pos - Vec2::new(10.0, 10.0)).abs().max_element() <= 1.6);
        }
    }

    #[test]
    fn scatter_stays_inside_radius() {
        let mut rng = fastrand::Rng::with_seed(2);
        let mut ps = ParticleSystem::new();
        let center = Vec2::new(100.0, 100.0);
        ps.spawn_scatter(center, 50.0, &mut rng);

        assert_eq!(ps.count(), SCATTER_COUNT);
        for p in &ps.particles {
            assert!(p.pos.distance(center) <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn particles_age_out() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut ps = ParticleSystem::new();
        ps.spawn_trail(Vec2::ZERO, 16.0, 0xFFFF_FFFF, &mut rng);
        ps.spawn_pulse(Vec2::ZERO, 80.0, &mut rng);

        // Trail puffs live at most 0.5s, pulses at most 1.5s.
        for _ in 0..20 {
            ps.update(0.05);
        }
        assert!(ps.count() <= PULSE_COUNT);
        for _ in 0..20 {
            ps.update(0.05);
        }
        assert_eq!(ps.count(), 0);
    }

    #[test]
    fn pool_is_capped() {
        let mut rng = fastrand::Rng::with_seed(4);
        let mut ps = ParticleSystem::new();
        for _ in 0..MAX_PARTICLES {
            ps.spawn_pulse(Vec2::ZERO, 10.0, &mut rng);
        }
        assert_eq!(ps.count(), MAX_PARTICLES);
    }

    #[test]
    fn disabled_system_spawns_nothing() {
        let mut rng = fastrand::Rng::with_seed(5);
        let mut ps = ParticleSystem::new();
        ps.enabled = false;
        ps.spawn_trail(Vec2::ZERO, 16.0, 0xFFFF_FFFF, &mut rng);
        ps.spawn_scatter(Vec2::ZERO, 50.0, &mut rng);
        assert_eq!(ps.count(), 0);
    }

    #[test]
    fn snapshot_fades_and_shrinks() {
        let mut rng = fastrand::Rng::with_seed(6);
        let mut ps = ParticleSystem::new();
        ps.spawn_trail(Vec2::ZERO, 16.0, 0xFFFF_FFFF, &mut rng);
        ps.update(0.2);

        let mut buf = Vec::new();
        ps.snapshot(&mut buf);
        assert_eq!(buf.len(), ps.count());
        for sprite in &buf {
            assert!(sprite.size < START_SIZE);
            assert!((sprite.color & 0xFF) < 0xFF);
        }
    }

    #[test]
    fn burst_timer_fires_on_the_interval() {
        let mut timer = BurstTimer::new(0.5);
        let mut fired = 0;
        for _ in 0..100 {
            if timer.fire(0.05) {
                fired += 1;
            }
        }
        // 5 seconds of ticks at a 0.5s interval.
        assert_eq!(fired, 10);
    }
}
