use grove_common::PlacementPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constraints::ScatterConstraints;
use crate::error::{Result, ScatterError};

/// Below this many expected hits per budget, square draws switch to annulus draws.
const MIN_EXPECTED_SQUARE_HITS: f64 = 32.0;

/// How candidate points are drawn. Both produce the same area-uniform
/// distribution over the annulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Uniform x and z over the bounding square, rejected outside the annulus.
    Square,
    /// Uniform angle and area-weighted radius inside the annulus, for rings
    /// too thin for square draws to hit within the budget.
    Annulus,
}

impl DrawMode {
    pub fn for_constraints(c: &ScatterConstraints) -> Self {
        let expected_hits = c.square_acceptance_rate() * c.max_attempts as f64;
        if expected_hits < MIN_EXPECTED_SQUARE_HITS {
            Self::Annulus
        } else {
            Self::Square
        }
    }
}

/// Scatter `constraints.count` points over the annulus.
///
/// Fails fast with [`ScatterError::InvalidConstraint`] before drawing anything
/// if the accept region is empty, and with [`ScatterError::AttemptsExhausted`]
/// if one point cannot be placed within `max_attempts` draws.
pub fn generate<R: Rng + ?Sized>(
    constraints: &ScatterConstraints,
    rng: &mut R,
) -> Result<Vec<PlacementPoint>> {
    constraints.validate()?;
    if constraints.count == 0 {
        return Ok(Vec::new());
    }

    let _span = tracing::info_span!(
        "scatter",
        count = constraints.count,
        exclusion = constraints.exclusion_radius,
        max = constraints.max_spawn_radius
    )
    .entered();

    let mode = DrawMode::for_constraints(constraints);
    if mode == DrawMode::Annulus {
        tracing::debug!(
            rate = constraints.square_acceptance_rate(),
            "annulus too thin for square draws, sampling inside it"
        );
    }

    let mut points = Vec::with_capacity(constraints.count);
    let mut draws: u64 = 0;
    for index in 0..constraints.count {
        let (point, used) = place_one(constraints, mode, rng);
        draws += used as u64;
        match point {
            Some(p) => points.push(p),
            None => {
                return Err(ScatterError::AttemptsExhausted {
                    index,
                    attempts: constraints.max_attempts,
                });
            }
        }
    }

    tracing::debug!(
        placed = points.len(),
        draws,
        acceptance = points.len() as f64 / draws as f64,
        ?mode,
        "scatter complete"
    );
    Ok(points)
}

/// Scatter with a [`StdRng`] seeded from `seed`. Same seed, same points.
pub fn generate_seeded(
    constraints: &ScatterConstraints,
    seed: u64,
) -> Result<Vec<PlacementPoint>> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(constraints, &mut rng)
}

/// Draw until one candidate is accepted or the budget runs out.
/// Returns the accepted point, if any, and the number of draws used.
fn place_one<R: Rng + ?Sized>(
    c: &ScatterConstraints,
    mode: DrawMode,
    rng: &mut R,
) -> (Option<PlacementPoint>, u32) {
    for attempt in 1..=c.max_attempts {
        let (x, z) = match mode {
            DrawMode::Square => draw_square(c, rng),
            DrawMode::Annulus => draw_annulus(c, rng),
        };
        if c.contains(x, z) {
            return (Some(PlacementPoint::on_ground(x, z)), attempt);
        }
    }
    (None, c.max_attempts)
}

fn draw_square<R: Rng + ?Sized>(c: &ScatterConstraints, rng: &mut R) -> (f32, f32) {
    let r = c.max_spawn_radius;
    (rng.random_range(-r..=r), rng.random_range(-r..=r))
}

fn draw_annulus<R: Rng + ?Sized>(c: &ScatterConstraints, rng: &mut R) -> (f32, f32) {
    let inner_sq = c.exclusion_radius * c.exclusion_radius;
    let outer_sq = c.max_spawn_radius * c.max_spawn_radius;
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    let u: f32 = rng.random();
    let radius = (inner_sq + u * (outer_sq - inner_sq)).sqrt();
    (radius * theta.cos(), radius * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_annulus(points: &[PlacementPoint], c: &ScatterConstraints) {
        for p in points {
            let d = p.distance_from_origin();
            assert!(
                d >= c.exclusion_radius && d <= c.max_spawn_radius,
                "distance {d} outside [{}, {}]",
                c.exclusion_radius,
                c.max_spawn_radius
            );
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn produces_exactly_count_points_in_annulus() {
        let c = ScatterConstraints::new(500, 8.0, 60.0);
        let points = generate_seeded(&c, 42).unwrap();
        assert_eq!(points.len(), 500);
        assert_in_annulus(&points, &c);
    }

    #[test]
    fn huge_radius_is_an_error_not_a_panic() {
        let c = ScatterConstraints::new(1, 0.0, f32::MAX);
        let err = generate_seeded(&c, 1).unwrap_err();
        assert!(matches!(err, ScatterError::InvalidConstraint(_)));
    }

    #[test]
    fn zero_count_is_empty_not_error() {
        let c = ScatterConstraints::new(0, 1.0, 2.0);
        assert!(generate_seeded(&c, 1).unwrap().is_empty());
    }

    #[test]
    fn empty_region_fails_without_drawing() {
        struct PanicRng;
        impl rand::RngCore for PanicRng {
            fn next_u32(&mut self) -> u32 {
                panic!("drew from rng")
            }
            fn next_u64(&mut self) -> u64 {
                panic!("drew from rng")
            }
            fn fill_bytes(&mut self, _dst: &mut [u8]) {
                panic!("drew from rng")
            }
        }

        let c = ScatterConstraints::new(10, 10.0, 10.0);
        let err = generate(&c, &mut PanicRng).unwrap_err();
        assert!(matches!(err, ScatterError::InvalidConstraint(_)));
    }

    #[test]
    fn thin_ring_terminates_near_radius() {
        let c = ScatterConstraints::new(1, 10.0, 10.0001);
        assert_eq!(DrawMode::for_constraints(&c), DrawMode::Annulus);

        let points = generate_seeded(&c, 7).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].distance_from_origin() - 10.0).abs() < 1e-3);
        assert_in_annulus(&points, &c);
    }

    #[test]
    fn wide_ring_uses_square_draws() {
        let c = ScatterConstraints::new(1, 8.0, 60.0);
        assert_eq!(DrawMode::for_constraints(&c), DrawMode::Square);
    }

    /// Every draw lands on the low end of its range.
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        // Square draws always land on the (-R, -R) corner, outside the ring.
        let c = ScatterConstraints::new(3, 8.0, 60.0).with_max_attempts(100);
        assert_eq!(DrawMode::for_constraints(&c), DrawMode::Square);
        let err = generate(&c, &mut ZeroRng).unwrap_err();
        assert_eq!(
            err,
            ScatterError::AttemptsExhausted {
                index: 0,
                attempts: 100
            }
        );
    }

    #[test]
    fn annulus_draws_start_on_inner_edge() {
        let c = ScatterConstraints::new(2, 10.0, 10.0001);
        let points = generate(&c, &mut ZeroRng).unwrap();
        assert_eq!(points, vec![PlacementPoint::on_ground(10.0, 0.0); 2]);
    }

    #[test]
    fn determinism_for_same_seed() {
        let c = ScatterConstraints::new(64, 2.0, 20.0);
        let a = generate_seeded(&c, 123).unwrap();
        let b = generate_seeded(&c, 123).unwrap();
        assert_eq!(a, b);

        let other = generate_seeded(&c, 456).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn points_are_area_uniform() {
        // Half the annulus area lies inside sqrt((r^2 + R^2) / 2).
        let c = ScatterConstraints::new(4000, 5.0, 50.0);
        let points = generate_seeded(&c, 99).unwrap();
        let split = ((c.exclusion_radius.powi(2) + c.max_spawn_radius.powi(2)) / 2.0).sqrt();
        let inner = points
            .iter()
            .filter(|p| p.distance_from_origin() < split)
            .count();
        let fraction = inner as f32 / points.len() as f32;
        assert!((fraction - 0.5).abs() < 0.05, "inner fraction {fraction}");
    }

    #[test]
    fn annulus_draws_match_square_distribution() {
        let c = ScatterConstraints::new(1, 5.0, 50.0);
        let mut rng = StdRng::seed_from_u64(5);
        let split_sq = (c.exclusion_radius.powi(2) + c.max_spawn_radius.powi(2)) / 2.0;
        let n = 4000;
        let inner = (0..n)
            .map(|_| draw_annulus(&c, &mut rng))
            .filter(|(x, z)| x * x + z * z < split_sq)
            .count();
        let fraction = inner as f32 / n as f32;
        assert!((fraction - 0.5).abs() < 0.05, "inner fraction {fraction}");
    }

    #[test]
    fn density_end_radius_does_not_change_points() {
        let plain = ScatterConstraints::new(32, 4.0, 40.0);
        let with_end = plain.with_density_increase_end_radius(20.0);
        assert_eq!(
            generate_seeded(&plain, 11).unwrap(),
            generate_seeded(&with_end, 11).unwrap()
        );
    }
}
