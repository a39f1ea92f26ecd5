use glam::Vec2;

/// Seconds the pet rests in Idle before it can react.
const IDLE_DWELL: f32 = 1.0;
/// Seconds an angry fit lasts.
const ANGRY_DWELL: f32 = 0.3;
/// Cruise speed while chasing (units/second).
const FOLLOW_SPEED: f32 = 400.0;
/// Catch-up speed when the target is absurdly far away (map change, teleport).
const SPRINT_SPEED: f32 = 15_000.0;
/// Distance beyond which the sprint speed kicks in.
const SPRINT_DISTANCE: f32 = 1_000.0;
/// Rate the idle sway phase advances, in radians per second.
const IDLE_PHASE_RATE: f32 = 50.0;
/// Blend factor toward the sway direction per update.
const IDLE_BLEND: f32 = 0.1;
/// Base idle drift speed; the sway phase wobbles it by ±1.
const IDLE_SPEED: f32 = 15.0;

/// Current behavior state. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetState {
    /// Chasing the target head-on, no direction smoothing.
    Follow,
    /// Settled near the target, swaying in place.
    Idle,
    /// Throwing a fit, rooted in place until the timer runs out.
    Angry,
}

/// Tuning knobs for one pet. Passed into [`Pet::advance`] every tick so
/// nothing is read from globals.
#[derive(Debug, Clone, Copy)]
pub struct PetConfig {
    /// Distance at which a chase ends and the pet settles down.
    pub min_distance: f32,
    /// Distance beyond which the pet is forced back into a chase,
    /// whatever it was doing.
    pub max_distance: f32,
    /// Chase easing: speed gained per second, scaled by how close the
    /// target is. Zero gives constant-velocity travel.
    pub acceleration: f32,
    /// Whether an expired idle dwell turns into an angry fit.
    pub reactive: bool,
    /// Positions for which this returns false force a chase reset.
    pub in_bounds: fn(Vec2) -> bool,
}

/// Default validity check: the playable area is the positive quadrant.
fn non_negative(p: Vec2) -> bool {
    p.x >= 0.0 && p.y >= 0.0
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            min_distance: 70.0,
            max_distance: 250.0,
            acceleration: 60.0,
            reactive: false,
            in_bounds: non_negative,
        }
    }
}

/// The companion pet. Owned by the host and advanced once per rendered
/// frame; never touched from more than one thread.
#[derive(Debug, Clone)]
pub struct Pet {
    pos: Vec2,
    /// Derived velocity, displacement over the last tick divided by its dt.
    /// For motion effects only, never fed back into the controller.
    vel: Vec2,
    /// Unit direction the next integration step moves along.
    dir: Vec2,
    /// Scalar speed, never negative.
    speed: f32,
    state: PetState,
    /// Countdown for the current state. Only meaningful in Idle and Angry.
    state_timer: f32,
    /// Idle sway phase accumulator, in radians.
    idle_phase: f32,
}

impl Pet {
    /// Spawn a pet at `pos`, already chasing.
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            dir: Vec2::ZERO,
            speed: FOLLOW_SPEED,
            state: PetState::Follow,
            state_timer: IDLE_DWELL,
            idle_phase: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn state(&self) -> PetState {
        self.state
    }

    /// Velocity derived from the last integration step.
    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// Advance the pet by `dt` seconds toward (or around) `target`.
    ///
    /// State-specific behavior runs first, then the safety override that
    /// yanks a far-away or out-of-bounds pet back into a chase, then the
    /// position integration for whatever state the pet ended up in.
    pub fn advance(&mut self, dt: f32, target: Vec2, cfg: &PetConfig) {
        let prev = self.pos;

        match self.state {
            PetState::Idle => {
                self.state_timer -= dt;
                if self.state_timer <= 0.0 && cfg.reactive {
                    self.enter_angry();
                } else {
                    // Timer keeps counting below zero harmlessly when the
                    // pet is not reactive.
                    self.idle_sway(dt);
                }
            }
            PetState::Angry => {
                self.speed = 0.0;
                self.state_timer -= dt;
                if self.state_timer <= 0.0 {
                    self.enter_idle(dt);
                }
            }
            PetState::Follow => {
                if self.pos.distance(target) <= cfg.min_distance {
                    self.enter_idle(dt);
                } else {
                    self.aim_at(target);
                }
            }
        }

        // Safety net over the state machine: never stay idle or angry while
        // far from the target or somewhere invalid.
        let dist = self.pos.distance(target);
        if dist > cfg.max_distance || !(cfg.in_bounds)(self.pos) {
            self.enter_follow(target);
        }
        if dist > SPRINT_DISTANCE {
            self.speed = SPRINT_SPEED;
        }

        if self.state == PetState::Follow {
            // Ease in as the pet closes the gap. Only the chase ramps;
            // Idle owns its own speed and Angry stays rooted.
            let ramp = 1.0 - dist / cfg.max_distance;
            self.speed = (self.speed + cfg.acceleration * ramp * dt).max(0.0);
        }

        self.pos += self.dir * self.speed * dt;

        self.vel = (self.pos - prev) / dt;
    }

    /// One tick of the idle drift: advance the sway phase, blend the
    /// direction toward the vertical sway, wobble the speed.
    fn idle_sway(&mut self, dt: f32) {
        self.idle_phase += dt * IDLE_PHASE_RATE;
        let sway = Vec2::new(0.0, self.idle_phase.sin());
        if sway.length_squared() > f32::EPSILON {
            let blended = self.dir.lerp(sway / sway.length(), IDLE_BLEND);
            if blended.length_squared() > f32::EPSILON {
                self.dir = blended.normalize();
            }
        }
        self.speed = IDLE_SPEED + self.idle_phase.sin();
    }

    /// Point the direction straight at `target`. Degenerate offsets keep
    /// the previous direction for this tick.
    fn aim_at(&mut self, target: Vec2) {
        let to_target = target - self.pos;
        if to_target.length_squared() > f32::EPSILON {
            self.dir = to_target.normalize();
        }
    }

    fn enter_idle(&mut self, dt: f32) {
        self.state = PetState::Idle;
        self.state_timer = IDLE_DWELL;
        self.idle_sway(dt);
    }

    fn enter_angry(&mut self) {
        self.state = PetState::Angry;
        self.state_timer = ANGRY_DWELL;
        self.speed = 0.0;
    }

    fn enter_follow(&mut self, target: Vec2) {
        self.state = PetState::Follow;
        self.aim_at(target);
        self.speed = FOLLOW_SPEED;
    }
}
