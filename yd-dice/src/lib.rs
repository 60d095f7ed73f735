//! yd-dice: physically-simulated dice rolls and face resolution.

pub mod body;
pub mod face;
pub mod session;

pub use body::{DieBody, DIE_HALF_EXTENT};
pub use face::{nearest_face, resolve, FACE_AXES};
pub use session::{RollError, RollSession, RollStatus};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod face_tests;
#[cfg(test)]
mod session_tests;
