//! Rigid-body state and integration for a single die.
//!
//! Unit cube, unit mass, Z-up. The floor is the plane z = 0; square arena
//! walls at `±arena_half_extent` keep throws on the table. Contact response
//! is impulse-based against the die's corners so the cube tumbles and comes
//! to rest flat instead of sliding like a particle.

use glam::{Quat, Vec3};
use yd_core::PhysicsConfig;

/// Half extent of the cube die.
pub const DIE_HALF_EXTENT: f32 = 0.5;

/// Inverse inertia scalar of a unit-mass, unit-side cube (I = m·s²/6).
const INV_INERTIA: f32 = 6.0;

/// Contact speed below which bounces are fully inelastic. Without this
/// cutoff the per-tick gravity kick keeps a resting die micro-bouncing
/// above the stillness thresholds.
const BOUNCE_SPEED: f32 = 1.0;

/// The 8 corners of the die in body space.
const CORNERS: [Vec3; 8] = [
    Vec3::new(-DIE_HALF_EXTENT, -DIE_HALF_EXTENT, -DIE_HALF_EXTENT),
    Vec3::new(-DIE_HALF_EXTENT, -DIE_HALF_EXTENT, DIE_HALF_EXTENT),
    Vec3::new(-DIE_HALF_EXTENT, DIE_HALF_EXTENT, -DIE_HALF_EXTENT),
    Vec3::new(-DIE_HALF_EXTENT, DIE_HALF_EXTENT, DIE_HALF_EXTENT),
    Vec3::new(DIE_HALF_EXTENT, -DIE_HALF_EXTENT, -DIE_HALF_EXTENT),
    Vec3::new(DIE_HALF_EXTENT, -DIE_HALF_EXTENT, DIE_HALF_EXTENT),
    Vec3::new(DIE_HALF_EXTENT, DIE_HALF_EXTENT, -DIE_HALF_EXTENT),
    Vec3::new(DIE_HALF_EXTENT, DIE_HALF_EXTENT, DIE_HALF_EXTENT),
];

/// Physical state of one die during a roll.
#[derive(Debug, Clone, Copy)]
pub struct DieBody {
    pub pos: Vec3,
    pub orient: Quat,
    pub vel: Vec3,
    pub ang_vel: Vec3,
    /// Consecutive ticks below the stillness thresholds (settle hysteresis).
    still_ticks: u32,
}

impl DieBody {
    /// Launch a die with the given initial state.
    pub fn launch(pos: Vec3, orient: Quat, vel: Vec3, ang_vel: Vec3) -> Self {
        Self {
            pos,
            orient: orient.normalize(),
            vel,
            ang_vel,
            still_ticks: 0,
        }
    }

    /// Advance this die by one fixed timestep: gravity, damping, free-body
    /// integration, then floor and wall contact response.
    ///
    /// Mutates only this die; die-die contact is resolved separately from a
    /// snapshot of all bodies (see [`crate::session`]).
    pub fn step(&mut self, cfg: &PhysicsConfig) {
        let dt = cfg.dt;

        self.vel.z -= cfg.gravity * dt;
        self.vel *= (1.0 - cfg.linear_damping * dt).max(0.0);
        self.ang_vel *= (1.0 - cfg.angular_damping * dt).max(0.0);

        self.pos += self.vel * dt;

        // q' = q + dt/2 · ω_quat · q, renormalized.
        let w = self.ang_vel;
        if w.length_squared() > 1e-12 {
            let wq = Quat::from_xyzw(w.x, w.y, w.z, 0.0);
            let dq = wq.mul_quat(self.orient);
            self.orient = (self.orient + dq * (0.5 * dt)).normalize();
        }

        self.floor_contact(cfg);
        self.wall_contact(cfg);

        let still = self.vel.length() < cfg.settle_linear_speed
            && self.ang_vel.length() < cfg.settle_angular_speed;
        if still {
            self.still_ticks = self.still_ticks.saturating_add(1);
        } else {
            self.still_ticks = 0;
        }
    }

    /// True once the die has stayed below the stillness thresholds for the
    /// configured number of consecutive ticks.
    pub fn is_settled(&self, cfg: &PhysicsConfig) -> bool {
        self.still_ticks >= cfg.settle_ticks
    }

    /// Re-arm an edge-rested die: small lift plus fresh spin so it can fall
    /// onto a flat face, and restart the settle hysteresis.
    pub fn nudge(&mut self, spin: Vec3, lift: f32) {
        self.vel.z += lift;
        self.ang_vel += spin;
        self.still_ticks = 0;
    }

    fn floor_contact(&mut self, cfg: &PhysicsConfig) {
        let mut max_pen = 0.0f32;
        for corner in CORNERS {
            let r = self.orient * corner;
            let world = self.pos + r;
            if world.z >= 0.0 {
                continue;
            }
            max_pen = max_pen.max(-world.z);

            // Velocity of the contact point.
            let v_c = self.vel + self.ang_vel.cross(r);
            if v_c.z < 0.0 {
                // Normal impulse with rotational effective mass.
                let n = Vec3::Z;
                let rn = r.cross(n);
                let k = 1.0 + INV_INERTIA * rn.length_squared();
                let e = if v_c.z < -BOUNCE_SPEED {
                    cfg.restitution
                } else {
                    0.0
                };
                let jn = -(1.0 + e) * v_c.z / k;
                let impulse = n * jn;
                self.vel += impulse;
                self.ang_vel += INV_INERTIA * r.cross(impulse);
            }

            // Friction: bleed off tangential contact velocity.
            let v_c = self.vel + self.ang_vel.cross(r);
            let vt = Vec3::new(v_c.x, v_c.y, 0.0);
            if vt.length_squared() > 1e-10 {
                let jt = vt * -cfg.friction;
                self.vel += jt;
                self.ang_vel += INV_INERTIA * r.cross(jt);
            }
        }
        // Positional correction once for the deepest corner.
        if max_pen > 0.0 {
            self.pos.z += max_pen;
        }
    }

    fn wall_contact(&mut self, cfg: &PhysicsConfig) {
        let bound = cfg.arena_half_extent - DIE_HALF_EXTENT;
        if self.pos.x > bound {
            self.pos.x = bound;
            if self.vel.x > 0.0 {
                self.vel.x = -self.vel.x * cfg.restitution;
            }
        } else if self.pos.x < -bound {
            self.pos.x = -bound;
            if self.vel.x < 0.0 {
                self.vel.x = -self.vel.x * cfg.restitution;
            }
        }
        if self.pos.y > bound {
            self.pos.y = bound;
            if self.vel.y > 0.0 {
                self.vel.y = -self.vel.y * cfg.restitution;
            }
        } else if self.pos.y < -bound {
            self.pos.y = -bound;
            if self.vel.y < 0.0 {
                self.vel.y = -self.vel.y * cfg.restitution;
            }
        }
    }
}
