//! Scatter Generator: placement points inside an annulus around the origin.
//!
//! Points are drawn by rejection sampling: uniform `x` and `z` over the
//! square `[-R, R]²`, kept only when `r <= sqrt(x² + z²) <= R`. The result is
//! area-uniform over the ring. Overlapping points are allowed.
//!
//! # Invariants
//! - Constraints are validated before any draw; an empty ring fails fast.
//! - Every point gets a bounded number of draws; running out is an error,
//!   never an endless loop.
//! - Output length equals `count` on success.

mod constraints;
mod density;
mod error;
mod generator;
mod stats;

pub use constraints::{DEFAULT_MAX_ATTEMPTS, ScatterConstraints};
pub use density::DensityProfile;
pub use error::{Result, ScatterError};
pub use generator::{DrawMode, generate, generate_seeded};
pub use stats::{RadialStats, equal_area_radius};

pub fn crate_info() -> &'static str {
    "grove-scatter v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scatter"));
    }
}
