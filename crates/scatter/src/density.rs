use crate::constraints::ScatterConstraints;

/// Relative placement density as a function of distance from the origin.
///
/// Placement is area-uniform over the annulus, so the weight is flat inside
/// it. The end radius is carried so a future falloff has a single place to
/// live; [`generate`](crate::generate) does not consult this profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityProfile {
    inner: f32,
    outer: f32,
    end_radius: Option<f32>,
}

impl DensityProfile {
    pub fn new(constraints: &ScatterConstraints) -> Self {
        Self {
            inner: constraints.exclusion_radius,
            outer: constraints.max_spawn_radius,
            end_radius: constraints.density_increase_end_radius,
        }
    }

    pub fn end_radius(&self) -> Option<f32> {
        self.end_radius
    }

    /// Relative density at `distance`: 1 inside the annulus, 0 outside.
    pub fn weight(&self, distance: f32) -> f32 {
        if distance >= self.inner && distance <= self.outer {
            1.0
        } else {
            0.0
        }
    }
}
