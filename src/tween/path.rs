//! Arc-length parameterized sample tables for path tweens.
//!
//! A [`PathTable`] stores sampled points and the cumulative distance to each
//! point, normalized to `[0, 1]`. Sampling at evenly spaced normalized
//! positions then moves at constant speed along the path regardless of how
//! the underlying curve is parameterized.

use glam::Vec3;

use super::error::TweenError;

/// Smallest accepted sampling step.
pub const MIN_PRECISION: f32 = 0.0;
/// Largest accepted sampling step.
pub const MAX_PRECISION: f32 = 0.5;
/// Knot intervals shorter than this are widened to keep the spline finite.
const MIN_KNOT_INTERVAL: f32 = 1e-4;

pub fn check_precision(precision: f32) -> Result<(), TweenError> {
    if precision.is_finite() && precision > MIN_PRECISION && precision <= MAX_PRECISION {
        Ok(())
    } else {
        Err(TweenError::InvalidPrecision {
            value: precision,
            min: MIN_PRECISION,
            max: MAX_PRECISION,
        })
    }
}

/// Number of samples for a parametric step, last one landing on `t = 1`.
fn sample_count(precision: f32) -> usize {
    ((1.0 - 0.0001) / precision) as usize + 2
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathTable {
    points: Vec<Vec3>,
    lengths: Vec<f32>,
}

impl PathTable {
    /// Straight segments through `points`.
    pub fn line(points: &[Vec3]) -> Result<Self, TweenError> {
        if points.len() < 2 {
            return Err(TweenError::NotEnoughPoints {
                needed: 2,
                got: points.len(),
            });
        }
        Ok(Self::from_points(points.to_vec()))
    }

    /// Cubic Bézier through `b0` and `b3` with control points `b1`, `b2`.
    pub fn bezier(b0: Vec3, b1: Vec3, b2: Vec3, b3: Vec3, precision: f32) -> Result<Self, TweenError> {
        check_precision(precision)?;
        let count = sample_count(precision);
        let mut points = Vec::with_capacity(count);
        points.push(b0);
        for i in 1..count - 1 {
            points.push(cubic_bezier(b0, b1, b2, b3, i as f32 * precision));
        }
        points.push(b3);
        Ok(Self::from_points(points))
    }

    /// Catmull-Rom spline through every waypoint.
    ///
    /// `alpha` is the knot exponent: 0 uniform, 0.5 centripetal, 1 chordal.
    /// The first and last segments use control points reflected across the
    /// path ends.
    pub fn catmull_rom(waypoints: &[Vec3], precision: f32, alpha: f32) -> Result<Self, TweenError> {
        check_precision(precision)?;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(TweenError::InvalidAlpha(alpha));
        }
        let n = waypoints.len();
        if n < 2 {
            return Err(TweenError::NotEnoughPoints { needed: 2, got: n });
        }

        let mut ext = Vec::with_capacity(n + 2);
        ext.push(2.0 * waypoints[0] - waypoints[1]);
        ext.extend_from_slice(waypoints);
        ext.push(2.0 * waypoints[n - 1] - waypoints[n - 2]);

        let count = sample_count(precision);
        let mut points = Vec::with_capacity((n - 1) * count);
        points.push(waypoints[0]);
        for quad in ext.windows(4) {
            let [p0, p1, p2, p3] = [quad[0], quad[1], quad[2], quad[3]];
            for j in 1..count - 1 {
                let t = (j as f32 * precision).min(1.0);
                points.push(catmull_rom_point(p0, p1, p2, p3, t, alpha));
            }
            points.push(p2);
        }
        Ok(Self::from_points(points))
    }

    fn from_points(points: Vec<Vec3>) -> Self {
        let mut lengths = Vec::with_capacity(points.len());
        let mut total = 0.0;
        lengths.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            lengths.push(total);
        }
        let last = lengths.len() - 1;
        if total > 0.0 {
            for l in &mut lengths {
                *l /= total;
            }
        } else {
            // Zero-length path: spread evenly so sampling stays finite.
            for (i, l) in lengths.iter_mut().enumerate() {
                *l = i as f32 / last as f32;
            }
        }
        lengths[last] = 1.0;
        Self { points, lengths }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Cumulative normalized lengths, parallel to [`points`](Self::points).
    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn first(&self) -> Vec3 {
        self.points[0]
    }

    pub fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Point at normalized arc length `s`.
    ///
    /// Interpolation within the bracketing segment is unclamped, so `s`
    /// outside `[0, 1]` extrapolates along the first/last segment.
    pub fn sample(&self, s: f32) -> Vec3 {
        let last = self.points.len() - 1;
        let i = self.lengths.partition_point(|&l| l < s).clamp(1, last);
        let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
        let span = l1 - l0;
        let f = if span > 0.0 { (s - l0) / span } else { 1.0 };
        self.points[i - 1].lerp(self.points[i], f)
    }

    /// Approximate normalized arc length of `pos`.
    ///
    /// For every segment, estimates the local fraction of `pos` on each axis
    /// and keeps the largest. Segments where some axis falls outside the
    /// segment's extent are skipped; the last segment that matches wins.
    /// Returns 0 when no segment matches.
    pub fn locate(&self, pos: Vec3) -> f32 {
        let mut found = 0.0;
        for i in 1..self.points.len() {
            let (a, b) = (self.points[i - 1], self.points[i]);
            let q = axis_fraction(a, b, pos);
            if q.iter().any(|v| !(0.0..=1.0).contains(v)) {
                continue;
            }
            let t = q[0].max(q[1]).max(q[2]);
            let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
            found = l0 + (l1 - l0) * t;
        }
        found
    }
}

fn axis_fraction(a: Vec3, b: Vec3, pos: Vec3) -> [f32; 3] {
    let frac = |a: f32, b: f32, p: f32| if b != a { (p - a) / (b - a) } else { 0.0 };
    [
        frac(a.x, b.x, pos.x),
        frac(a.y, b.y, pos.y),
        frac(a.z, b.z, pos.z),
    ]
}

pub fn cubic_bezier(b0: Vec3, b1: Vec3, b2: Vec3, b3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    b0 * (u * u * u) + b1 * (3.0 * u * u * t) + b2 * (3.0 * u * t * t) + b3 * (t * t * t)
}

fn knot(k: f32, a: Vec3, b: Vec3, alpha: f32) -> f32 {
    let interval = a.distance_squared(b).powf(0.5 * alpha);
    k + interval.max(MIN_KNOT_INTERVAL)
}

fn remap(a: f32, b: f32, c: f32, d: f32, u: f32) -> f32 {
    c + (d - c) * ((u - a) / (b - a))
}

/// Point on the Catmull-Rom segment between `p1` and `p2` (Barry-Goldman pyramid).
fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32, alpha: f32) -> Vec3 {
    let k0 = 0.0;
    let k1 = knot(k0, p0, p1, alpha);
    let k2 = knot(k1, p1, p2, alpha);
    let k3 = knot(k2, p2, p3, alpha);
    let u = k1 + (k2 - k1) * t;

    let lerp = |a: Vec3, b: Vec3, ka: f32, kb: f32| a.lerp(b, remap(ka, kb, 0.0, 1.0, u));
    let a1 = lerp(p0, p1, k0, k1);
    let a2 = lerp(p1, p2, k1, k2);
    let a3 = lerp(p2, p3, k2, k3);
    let b1 = lerp(a1, a2, k0, k2);
    let b2 = lerp(a2, a3, k1, k3);
    lerp(b1, b2, k1, k2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_v3(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < EPSILON
    }

    fn assert_normalized(table: &PathTable) {
        let lens = table.lengths();
        assert_eq!(lens.len(), table.points().len());
        assert!(lens.windows(2).all(|w| w[1] >= w[0]), "lengths must not decrease");
        assert!((lens[lens.len() - 1] - 1.0).abs() < EPSILON);
        assert_eq!(lens[0], 0.0);
    }

    // ==================== TABLE TESTS ====================

    #[test]
    fn test_line_lengths_are_exact() {
        let t = PathTable::line(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 3.0, 0.0)])
            .unwrap();
        assert_normalized(&t);
        assert!((t.lengths()[1] - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_line_needs_two_points() {
        assert_eq!(
            PathTable::line(&[Vec3::ZERO]),
            Err(TweenError::NotEnoughPoints { needed: 2, got: 1 })
        );
    }

    #[test]
    fn test_bezier_rejects_bad_precision() {
        let p = Vec3::ZERO;
        assert!(PathTable::bezier(p, p, p, p, 0.0).is_err());
        assert!(PathTable::bezier(p, p, p, p, -0.1).is_err());
        assert!(PathTable::bezier(p, p, p, p, 0.6).is_err());
    }

    #[test]
    fn test_bezier_table_endpoints_and_count() {
        let b0 = Vec3::ZERO;
        let b3 = Vec3::new(4.0, 0.0, 0.0);
        let t = PathTable::bezier(b0, Vec3::new(1.0, 2.0, 0.0), Vec3::new(3.0, 2.0, 0.0), b3, 0.1)
            .unwrap();
        assert_eq!(t.points().len(), 11);
        assert!(approx_v3(t.first(), b0));
        assert!(approx_v3(t.last(), b3));
        assert_normalized(&t);
    }

    #[test]
    fn test_degenerate_path_is_still_normalized() {
        let p = Vec3::new(2.0, 2.0, 2.0);
        let t = PathTable::bezier(p, p, p, p, 0.25).unwrap();
        assert_normalized(&t);
        assert!(approx_v3(t.sample(0.5), p));
    }

    #[test]
    fn test_catmull_rom_passes_through_waypoints() {
        let pts = [
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 1.0, 0.0),
        ];
        for alpha in [0.0, 0.5, 1.0] {
            let t = PathTable::catmull_rom(&pts, 0.05, alpha).unwrap();
            assert_normalized(&t);
            for p in pts {
                assert!(
                    t.points().iter().any(|q| approx_v3(*q, p)),
                    "waypoint {p} missing for alpha {alpha}"
                );
            }
        }
    }

    #[test]
    fn test_catmull_rom_with_two_points_is_straight() {
        let t = PathTable::catmull_rom(&[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)], 0.1, 0.5).unwrap();
        assert_normalized(&t);
        assert!(t.points().iter().all(|p| p.y.abs() < EPSILON));
        assert!(approx_v3(t.sample(0.5), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_catmull_rom_rejects_bad_alpha() {
        let pts = [Vec3::ZERO, Vec3::ONE];
        assert_eq!(
            PathTable::catmull_rom(&pts, 0.1, 1.5),
            Err(TweenError::InvalidAlpha(1.5))
        );
    }

    // ==================== SAMPLING TESTS ====================

    #[test]
    fn test_sample_is_arc_length_uniform() {
        // Quarter circle approximation of radius 1.
        let k = 0.5523;
        let t = PathTable::bezier(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, k, 0.0),
            Vec3::new(k, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            0.01,
        )
        .unwrap();
        let samples: Vec<Vec3> = [0.0, 0.25, 0.5, 0.75, 1.0].iter().map(|&s| t.sample(s)).collect();
        let d: Vec<f32> = samples.windows(2).map(|w| w[0].distance(w[1])).collect();
        let mean = d.iter().sum::<f32>() / d.len() as f32;
        for di in &d {
            assert!((di - mean).abs() < 0.01, "uneven spacing {d:?}");
        }
    }

    #[test]
    fn test_sample_extrapolates_unclamped() {
        let t = PathTable::line(&[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]).unwrap();
        assert!(approx_v3(t.sample(1.1), Vec3::new(11.0, 0.0, 0.0)));
        assert!(approx_v3(t.sample(-0.1), Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_reverse_sampling_mirrors_forward() {
        let t = PathTable::line(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)])
            .unwrap();
        assert!(approx_v3(t.sample(1.0 - 0.25), Vec3::new(1.0, 0.5, 0.0)));
    }

    // ==================== LOCATE TESTS ====================

    #[test]
    fn test_locate_on_straight_polyline() {
        let t = PathTable::line(&[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)])
            .unwrap();
        assert!((t.locate(Vec3::new(1.0, 0.0, 0.0)) - 0.25).abs() < EPSILON);
        assert!((t.locate(Vec3::new(3.0, 0.0, 0.0)) - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_locate_prefers_last_matching_segment() {
        // (0.5, 0, 0) fits the first segment, but a flat axis on the second
        // segment also accepts it, and the later match wins.
        let t = PathTable::line(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)])
            .unwrap();
        assert!((t.locate(Vec3::new(1.0, 0.5, 0.0)) - 0.75).abs() < EPSILON);
        assert!((t.locate(Vec3::new(0.5, 0.0, 0.0)) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_locate_off_path_returns_zero() {
        let t = PathTable::line(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]).unwrap();
        assert_eq!(t.locate(Vec3::new(5.0, 5.0, 0.0)), 0.0);
    }
}
