use grove_common::ScatterSettings;

use crate::error::{Result, ScatterError};

/// Default rejection budget per point.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Parameters of the scatter generator.
///
/// The accept region is the closed annulus
/// `exclusion_radius <= distance <= max_spawn_radius` on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterConstraints {
    pub count: usize,
    pub exclusion_radius: f32,
    pub max_spawn_radius: f32,
    /// Carried through to [`DensityProfile`](crate::DensityProfile); does not affect sampling.
    pub density_increase_end_radius: Option<f32>,
    pub max_attempts: u32,
}

impl ScatterConstraints {
    pub fn new(count: usize, exclusion_radius: f32, max_spawn_radius: f32) -> Self {
        Self {
            count,
            exclusion_radius,
            max_spawn_radius,
            density_increase_end_radius: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_density_increase_end_radius(mut self, radius: f32) -> Self {
        self.density_increase_end_radius = Some(radius);
        self
    }

    /// Check that the accept region is non-empty and the budget is usable.
    pub fn validate(&self) -> Result<()> {
        let (r, max) = (self.exclusion_radius, self.max_spawn_radius);
        if !r.is_finite() || !max.is_finite() {
            return Err(ScatterError::InvalidConstraint(format!(
                "radii must be finite (exclusion={r}, max={max})"
            )));
        }
        if r < 0.0 {
            return Err(ScatterError::InvalidConstraint(format!(
                "exclusion radius {r} is negative"
            )));
        }
        if r >= max {
            return Err(ScatterError::InvalidConstraint(format!(
                "exclusion radius {r} must be smaller than max spawn radius {max}"
            )));
        }
        // Draws span [-max, max] and distances square the radius; both must stay finite.
        if !(2.0 * max).is_finite() || !(max * max).is_finite() {
            return Err(ScatterError::InvalidConstraint(format!(
                "max spawn radius {max} is too large to sample"
            )));
        }
        if self.max_attempts == 0 {
            return Err(ScatterError::InvalidConstraint(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether a point at `(x, z)` lies in the accept region.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let distance = x.hypot(z);
        distance >= self.exclusion_radius && distance <= self.max_spawn_radius
    }

    /// Probability that a uniform draw from the bounding square lands in the annulus.
    pub fn square_acceptance_rate(&self) -> f64 {
        let r = self.exclusion_radius as f64;
        let max = self.max_spawn_radius as f64;
        std::f64::consts::PI * (max * max - r * r) / (4.0 * max * max)
    }
}

impl From<&ScatterSettings> for ScatterConstraints {
    fn from(s: &ScatterSettings) -> Self {
        Self {
            count: s.count,
            exclusion_radius: s.exclusion_radius,
            max_spawn_radius: s.max_spawn_radius,
            density_increase_end_radius: s.density_increase_end_radius,
            max_attempts: s.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_annulus() {
        assert!(ScatterConstraints::new(5, 0.0, 1.0).validate().is_ok());
        assert!(ScatterConstraints::new(5, 10.0, 10.0001).validate().is_ok());
    }

    #[test]
    fn rejects_empty_region() {
        for (r, max) in [(10.0, 10.0), (20.0, 10.0)] {
            let err = ScatterConstraints::new(1, r, max).validate().unwrap_err();
            assert!(matches!(err, ScatterError::InvalidConstraint(_)));
        }
    }

    #[test]
    fn rejects_negative_and_non_finite_radii() {
        let bad = [
            ScatterConstraints::new(1, -1.0, 10.0),
            ScatterConstraints::new(1, 0.0, f32::NAN),
            ScatterConstraints::new(1, 0.0, f32::INFINITY),
            ScatterConstraints::new(1, -5.0, -1.0),
        ];
        for c in bad {
            assert!(matches!(
                c.validate(),
                Err(ScatterError::InvalidConstraint(_))
            ));
        }
    }

    #[test]
    fn rejects_radius_too_large_to_sample() {
        for max in [f32::MAX, f32::MAX / 2.0, 1e20] {
            assert!(matches!(
                ScatterConstraints::new(1, 0.0, max).validate(),
                Err(ScatterError::InvalidConstraint(_))
            ));
        }
        assert!(ScatterConstraints::new(1, 0.0, 1e18).validate().is_ok());
    }

    #[test]
    fn rejects_zero_budget() {
        let c = ScatterConstraints::new(1, 0.0, 1.0).with_max_attempts(0);
        assert!(matches!(
            c.validate(),
            Err(ScatterError::InvalidConstraint(_))
        ));
    }

    #[test]
    fn contains_is_closed_on_both_edges() {
        let c = ScatterConstraints::new(1, 3.0, 5.0);
        assert!(c.contains(3.0, 0.0));
        assert!(c.contains(0.0, -5.0));
        assert!(c.contains(3.0, 4.0));
        assert!(!c.contains(1.0, 1.0));
        assert!(!c.contains(5.0, 5.0));
    }

    #[test]
    fn contains_handles_large_coordinates() {
        let c = ScatterConstraints::new(1, 1e18, 1e19);
        assert!(c.contains(5e18, 5e18));
        assert!(!c.contains(1e19, 1e19));
    }

    #[test]
    fn acceptance_rate_of_full_disk() {
        let c = ScatterConstraints::new(1, 0.0, 1.0);
        let expected = std::f64::consts::PI / 4.0;
        assert!((c.square_acceptance_rate() - expected).abs() < 1e-9);
    }

    #[test]
    fn from_settings_copies_fields() {
        let settings = ScatterSettings {
            count: 3,
            exclusion_radius: 2.0,
            max_spawn_radius: 4.0,
            density_increase_end_radius: Some(3.0),
            seed: Some(1),
            max_attempts: 50,
        };
        let c = ScatterConstraints::from(&settings);
        assert_eq!(c.count, 3);
        assert_eq!(c.exclusion_radius, 2.0);
        assert_eq!(c.max_spawn_radius, 4.0);
        assert_eq!(c.density_increase_end_radius, Some(3.0));
        assert_eq!(c.max_attempts, 50);
    }
}
