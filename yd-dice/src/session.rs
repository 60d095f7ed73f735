//! One roll: throw the selected dice, simulate until every one of them
//! resolves to a face, emit the merged outcome.
//!
//! The session is single-shot and budgeted: the owner calls
//! [`RollSession::tick`] with a step allowance until it reports
//! [`RollStatus::Complete`], and may simply drop the session to cancel the
//! roll (nothing is committed until the outcome is consumed).

use glam::{Quat, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use thiserror::Error;

use yd_core::{PhysicsConfig, NUM_DICE};

use crate::body::DieBody;
use crate::face::{nearest_face, resolve};

/// Bounding-sphere radius used for die-die contact.
const CONTACT_RADIUS: f32 = 0.62;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RollError {
    #[error("roll selection is empty")]
    EmptySelection,
    #[error("held die {index} has no face value")]
    UnrolledHeldDie { index: usize },
}

/// Progress report from [`RollSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollStatus {
    /// Some dice are still moving; call `tick` again.
    InFlight,
    /// Every die resolved; held dice keep their previous values.
    Complete([u8; NUM_DICE]),
}

/// A single in-flight roll of up to five dice.
#[derive(Debug)]
pub struct RollSession {
    cfg: PhysicsConfig,
    rng: ChaCha8Rng,
    /// Bodies for dice picked up by this roll; held dice have no body.
    bodies: [Option<DieBody>; NUM_DICE],
    /// Face per die: held values up front, resolved values as they land.
    values: [u8; NUM_DICE],
    resolved: [bool; NUM_DICE],
    retries: [u32; NUM_DICE],
    ticks: u32,
    outcome: Option<[u8; NUM_DICE]>,
}

impl RollSession {
    /// Start a roll. `selection[i]` picks die `i` up; unselected dice must
    /// carry a valid previous face value in `held` and stay immobile.
    pub fn throw(
        held: [u8; NUM_DICE],
        selection: [bool; NUM_DICE],
        seed: u64,
        cfg: PhysicsConfig,
    ) -> Result<Self, RollError> {
        if !selection.iter().any(|&s| s) {
            return Err(RollError::EmptySelection);
        }
        for i in 0..NUM_DICE {
            if !selection[i] && !(1..=6).contains(&held[i]) {
                return Err(RollError::UnrolledHeldDie { index: i });
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut bodies: [Option<DieBody>; NUM_DICE] = [None; NUM_DICE];
        let mut resolved = [false; NUM_DICE];
        for i in 0..NUM_DICE {
            if selection[i] {
                bodies[i] = Some(spawn_die(i, &mut rng, &cfg));
            } else {
                resolved[i] = true;
            }
        }

        Ok(Self {
            cfg,
            rng,
            bodies,
            values: held,
            resolved,
            retries: [0; NUM_DICE],
            ticks: 0,
            outcome: None,
        })
    }

    /// Simulation ticks consumed so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance the simulation by up to `max_steps` ticks.
    ///
    /// Terminates in bounded time: an edge-rested die is re-armed at most
    /// `rearm_retry_cap` times, and once the roll exceeds `max_ticks` every
    /// remaining die is force-resolved to its nearest pose.
    pub fn tick(&mut self, max_steps: u32) -> RollStatus {
        if let Some(outcome) = self.outcome {
            return RollStatus::Complete(outcome);
        }

        for _ in 0..max_steps {
            if self.resolved.iter().all(|&r| r) {
                break;
            }
            self.ticks += 1;
            if self.ticks > self.cfg.max_ticks {
                self.force_resolve_remaining();
                break;
            }

            resolve_die_contacts(&mut self.bodies, &self.resolved);
            for i in 0..NUM_DICE {
                if self.resolved[i] {
                    continue;
                }
                let body = match self.bodies[i].as_mut() {
                    Some(b) => b,
                    None => continue,
                };
                body.step(&self.cfg);
                if !body.is_settled(&self.cfg) {
                    continue;
                }
                match resolve(body.orient, self.cfg.face_epsilon) {
                    Some(face) => {
                        self.values[i] = face;
                        self.resolved[i] = true;
                    }
                    None if self.retries[i] < self.cfg.rearm_retry_cap => {
                        // Edge rest: wake the die and let it topple onto a
                        // face before the next settle event.
                        self.retries[i] += 1;
                        let spin = Vec3::new(
                            self.rng.gen_range(-4.0..4.0),
                            self.rng.gen_range(-4.0..4.0),
                            self.rng.gen_range(-1.0..1.0),
                        );
                        body.nudge(spin, self.rng.gen_range(1.0..2.0));
                    }
                    None => {
                        self.values[i] = nearest_face(body.orient);
                        self.resolved[i] = true;
                    }
                }
            }
        }

        if self.resolved.iter().all(|&r| r) {
            self.outcome = Some(self.values);
            RollStatus::Complete(self.values)
        } else {
            RollStatus::InFlight
        }
    }

    fn force_resolve_remaining(&mut self) {
        for i in 0..NUM_DICE {
            if self.resolved[i] {
                continue;
            }
            if let Some(body) = &self.bodies[i] {
                self.values[i] = nearest_face(body.orient);
            }
            self.resolved[i] = true;
        }
    }
}

fn spawn_die(index: usize, rng: &mut ChaCha8Rng, cfg: &PhysicsConfig) -> DieBody {
    // Staggered spawn line along +X, thrown toward the middle of the table.
    let pos = Vec3::new(
        cfg.arena_half_extent - 1.0,
        (index as f32 - 2.0) * 1.5,
        cfg.drop_height + index as f32 * 0.3,
    );
    let orient = random_orientation(rng);
    let speed = rng.gen_range(cfg.launch_speed_min..=cfg.launch_speed_max);
    let dir = Vec3::new(
        -1.0,
        rng.gen_range(-0.3..0.3),
        rng.gen_range(-0.1..0.05),
    )
    .normalize();
    let spin = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    ) * cfg.spin_speed_max;
    DieBody::launch(pos, orient, dir * speed, spin)
}

fn random_orientation(rng: &mut ChaCha8Rng) -> Quat {
    // Uniform-enough for a throw: random axis, random angle.
    let axis = Vec3::new(
        rng.gen_range(-1.0..1.0f32),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    let axis = if axis.length_squared() < 1e-6 {
        Vec3::Z
    } else {
        axis.normalize()
    };
    Quat::from_axis_angle(axis, rng.gen_range(0.0..std::f32::consts::TAU))
}

/// Pairwise die-die contact, resolved from a snapshot of the previous tick
/// so the result is independent of iteration order. Already-resolved dice
/// act as immovable obstacles.
fn resolve_die_contacts(bodies: &mut [Option<DieBody>; NUM_DICE], frozen: &[bool; NUM_DICE]) {
    let snapshot: [Option<(Vec3, Vec3)>; NUM_DICE] = {
        let mut s = [None; NUM_DICE];
        for i in 0..NUM_DICE {
            if let Some(b) = &bodies[i] {
                s[i] = Some((b.pos, b.vel));
            }
        }
        s
    };

    let mut dv = [Vec3::ZERO; NUM_DICE];
    let mut dp = [Vec3::ZERO; NUM_DICE];

    for i in 0..NUM_DICE {
        let (pi, vi) = match snapshot[i] {
            Some(s) => s,
            None => continue,
        };
        for j in (i + 1)..NUM_DICE {
            let (pj, vj) = match snapshot[j] {
                Some(s) => s,
                None => continue,
            };
            let delta = pj - pi;
            let dist = delta.length();
            if dist >= 2.0 * CONTACT_RADIUS || dist < 1e-6 {
                continue;
            }
            let n = delta / dist;
            let overlap = 2.0 * CONTACT_RADIUS - dist;
            let approaching = (vj - vi).dot(n);

            match (frozen[i], frozen[j]) {
                (false, false) => {
                    if approaching < 0.0 {
                        let jm = -approaching * 0.5;
                        dv[i] -= n * jm;
                        dv[j] += n * jm;
                    }
                    dp[i] -= n * (overlap * 0.5);
                    dp[j] += n * (overlap * 0.5);
                }
                (true, false) => {
                    if approaching < 0.0 {
                        dv[j] += n * -approaching;
                    }
                    dp[j] += n * overlap;
                }
                (false, true) => {
                    if approaching < 0.0 {
                        dv[i] += n * approaching;
                    }
                    dp[i] -= n * overlap;
                }
                (true, true) => {}
            }
        }
    }

    for i in 0..NUM_DICE {
        if let Some(b) = bodies[i].as_mut() {
            b.vel += dv[i];
            b.pos += dp[i];
        }
    }
}
