use grove_common::PlacementPoint;

use crate::constraints::ScatterConstraints;

/// Summary of how a generated set is spread over the annulus.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialStats {
    pub count: usize,
    pub min_distance: f32,
    pub max_distance: f32,
    pub mean_distance: f32,
    /// Fraction of points inside the radius that splits the annulus into two
    /// equal areas. Close to 0.5 for an area-uniform set.
    pub inner_half_fraction: f32,
}

impl RadialStats {
    pub fn from_points(points: &[PlacementPoint], constraints: &ScatterConstraints) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let split = equal_area_radius(constraints);
        let mut min = f32::INFINITY;
        let mut max = 0.0_f32;
        let mut sum = 0.0_f64;
        let mut inner = 0usize;
        for p in points {
            let d = p.distance_from_origin();
            min = min.min(d);
            max = max.max(d);
            sum += d as f64;
            if d < split {
                inner += 1;
            }
        }

        Self {
            count: points.len(),
            min_distance: min,
            max_distance: max,
            mean_distance: (sum / points.len() as f64) as f32,
            inner_half_fraction: inner as f32 / points.len() as f32,
        }
    }
}

/// Radius that divides the annulus into two rings of equal area.
pub fn equal_area_radius(c: &ScatterConstraints) -> f32 {
    ((c.exclusion_radius * c.exclusion_radius + c.max_spawn_radius * c.max_spawn_radius) / 2.0)
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_has_zeroed_stats() {
        let c = ScatterConstraints::new(0, 1.0, 2.0);
        assert_eq!(RadialStats::from_points(&[], &c), RadialStats::default());
    }

    #[test]
    fn stats_over_known_points() {
        let c = ScatterConstraints::new(3, 0.0, 10.0);
        let points = [
            PlacementPoint::on_ground(3.0, 4.0),
            PlacementPoint::on_ground(0.0, 9.0),
            PlacementPoint::on_ground(-1.0, 0.0),
        ];
        let stats = RadialStats::from_points(&points, &c);
        assert_eq!(stats.count, 3);
        assert!((stats.min_distance - 1.0).abs() < 1e-6);
        assert!((stats.max_distance - 9.0).abs() < 1e-6);
        assert!((stats.mean_distance - 5.0).abs() < 1e-6);
        // split radius is sqrt(50) ~ 7.07
        assert!((stats.inner_half_fraction - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn equal_area_radius_of_disk() {
        let c = ScatterConstraints::new(1, 0.0, 2.0);
        assert!((equal_area_radius(&c) - 2.0_f32.sqrt()).abs() < 1e-6);
    }
}
