//! Keyframed easing curves.
//!
//! An [`EasingCurve`] maps normalized time to a normalized interpolation
//! factor. Keys carry in/out tangents and segments are evaluated as cubic
//! Hermite splines. Outside the key range the curve holds its first/last value.
//!
//! A curve always has at least one key: [`EasingCurve::from_keys`] and
//! deserialization both reject empty, unsorted or non-finite key lists, and
//! key times outside `[0, 1]`. Keys need not reach both ends of that range.

use serde::{Deserialize, Serialize};

use super::error::TweenError;

const SOLVE_SAMPLES: usize = 64;
const SOLVE_ITERATIONS: usize = 24;
const SOLVE_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Preset easing functions.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves. [`EasingCurve::from_easing`]
/// turns them into keyframes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0].
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Slope of [`ease`] at `t`.
fn ease_slope(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => 1.0,
        Easing::QuadIn => 2.0 * t,
        Easing::QuadOut => 2.0 - 2.0 * t,
        Easing::QuadInOut => {
            if t < 0.5 {
                4.0 * t
            } else {
                4.0 - 4.0 * t
            }
        }
        Easing::CubicIn => 3.0 * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            3.0 * p * p
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                12.0 * t * t
            } else {
                let p = 2.0 * t - 2.0;
                3.0 * p * p
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct EasingCurve {
    keys: Vec<Keyframe>,
}

impl EasingCurve {
    pub fn from_keys(keys: Vec<Keyframe>) -> Result<Self, TweenError> {
        if keys.is_empty() {
            return Err(TweenError::EmptyCurve);
        }
        let finite = keys.iter().all(|k| {
            k.time.is_finite()
                && k.value.is_finite()
                && k.in_tangent.is_finite()
                && k.out_tangent.is_finite()
        });
        if !finite {
            return Err(TweenError::NonFiniteCurve);
        }
        if let Some(k) = keys.iter().find(|k| !(0.0..=1.0).contains(&k.time)) {
            return Err(TweenError::CurveKeyOutOfRange(k.time));
        }
        if keys.windows(2).any(|w| w[1].time < w[0].time) {
            return Err(TweenError::UnsortedCurve);
        }
        Ok(Self { keys })
    }

    /// Identity mapping: `(0, 0)` to `(1, 1)` with unit tangents.
    pub fn linear() -> Self {
        Self {
            keys: vec![
                Keyframe::new(0.0, 0.0, 1.0, 1.0),
                Keyframe::new(1.0, 1.0, 1.0, 1.0),
            ],
        }
    }

    /// Sample a preset into `segments + 1` evenly spaced keys with exact tangents.
    pub fn from_easing(easing: Easing, segments: usize) -> Self {
        let segments = segments.max(1);
        let keys = (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let slope = ease_slope(easing, t);
                Keyframe::new(t, ease(easing, t), slope, slope)
            })
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Value of the last key, where a pass of the tween comes to rest.
    pub fn last_value(&self) -> f32 {
        self.keys.last().map(|k| k.value).unwrap_or(1.0)
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return t;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        let i = self.keys.partition_point(|k| k.time <= t);
        let (a, b) = (self.keys[i - 1], self.keys[i]);
        let dt = b.time - a.time;
        if dt <= 0.0 {
            return b.value;
        }
        let s = (t - a.time) / dt;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * a.value + h10 * dt * a.out_tangent + h01 * b.value + h11 * dt * b.in_tangent
    }

    /// Mirror in time and value: the result evaluates to `1 - f(1 - t)`.
    pub fn reversed(&self) -> Self {
        let keys = self
            .keys
            .iter()
            .rev()
            .map(|k| Keyframe::new(1.0 - k.time, 1.0 - k.value, k.out_tangent, k.in_tangent))
            .collect();
        Self { keys }
    }

    /// Find a time whose curve value is `value`.
    ///
    /// Scans the key range for the first sign change and bisects it. When the
    /// curve never reaches `value` the closest sampled time is returned.
    pub fn solve(&self, value: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return value.clamp(0.0, 1.0);
        };
        let (t0, t1) = (first.time, last.time);
        if t1 <= t0 {
            return t0;
        }
        let step = (t1 - t0) / SOLVE_SAMPLES as f32;
        let mut prev_t = t0;
        let mut prev_d = self.evaluate(t0) - value;
        let mut best = (t0, prev_d.abs());
        if prev_d.abs() <= SOLVE_EPSILON {
            return t0;
        }
        for i in 1..=SOLVE_SAMPLES {
            let t = if i == SOLVE_SAMPLES {
                t1
            } else {
                t0 + step * i as f32
            };
            let d = self.evaluate(t) - value;
            if d.abs() < best.1 {
                best = (t, d.abs());
            }
            if d.abs() <= SOLVE_EPSILON {
                return t;
            }
            if (prev_d < 0.0) != (d < 0.0) {
                return self.bisect(prev_t, t, value);
            }
            prev_t = t;
            prev_d = d;
        }
        best.0
    }

    fn bisect(&self, mut lo: f32, mut hi: f32, value: f32) -> f32 {
        let lo_below = self.evaluate(lo) < value;
        for _ in 0..SOLVE_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if (self.evaluate(mid) < value) == lo_below {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

impl Default for EasingCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl TryFrom<Vec<Keyframe>> for EasingCurve {
    type Error = TweenError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::from_keys(keys)
    }
}

impl From<EasingCurve> for Vec<Keyframe> {
    fn from(curve: EasingCurve) -> Self {
        curve.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    // ==================== VALIDATION TESTS ====================

    #[test]
    fn test_empty_curve_is_rejected() {
        assert_eq!(EasingCurve::from_keys(vec![]), Err(TweenError::EmptyCurve));
    }

    #[test]
    fn test_unsorted_curve_is_rejected() {
        let keys = vec![Keyframe::new(1.0, 1.0, 0.0, 0.0), Keyframe::new(0.0, 0.0, 0.0, 0.0)];
        assert_eq!(EasingCurve::from_keys(keys), Err(TweenError::UnsortedCurve));
    }

    #[test]
    fn test_nan_curve_is_rejected() {
        let keys = vec![Keyframe::new(0.0, f32::NAN, 0.0, 0.0)];
        assert_eq!(EasingCurve::from_keys(keys), Err(TweenError::NonFiniteCurve));
    }

    #[test]
    fn test_key_time_past_one_is_rejected() {
        let keys = vec![Keyframe::new(0.0, 0.0, 0.0, 0.0), Keyframe::new(2.0, 1.0, 0.0, 0.0)];
        assert_eq!(EasingCurve::from_keys(keys), Err(TweenError::CurveKeyOutOfRange(2.0)));
        let keys = vec![Keyframe::new(-0.5, 0.0, 0.0, 0.0)];
        assert_eq!(EasingCurve::from_keys(keys), Err(TweenError::CurveKeyOutOfRange(-0.5)));
    }

    #[test]
    fn test_deserializing_out_of_range_curve_fails() {
        let result: Result<EasingCurve, _> =
            serde_json::from_str(r#"[{"time":0.0,"value":0.0},{"time":2.0,"value":1.0}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserializing_empty_curve_fails() {
        let result: Result<EasingCurve, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_defaults_tangents() {
        let curve: EasingCurve =
            serde_json::from_str(r#"[{"time":0.0,"value":0.0},{"time":1.0,"value":1.0}]"#)
                .unwrap();
        assert_eq!(curve.keys()[0].in_tangent, 0.0);
        assert_eq!(curve.keys().len(), 2);
    }

    // ==================== EVALUATION TESTS ====================

    #[test]
    fn test_linear_is_identity() {
        let c = EasingCurve::linear();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!(approx_eq(c.evaluate(t), t), "t={t} got {}", c.evaluate(t));
        }
    }

    #[test]
    fn test_evaluate_clamps_outside_keys() {
        let c = EasingCurve::linear();
        assert!(approx_eq(c.evaluate(-1.0), 0.0));
        assert!(approx_eq(c.evaluate(2.0), 1.0));
    }

    #[test]
    fn test_single_key_is_constant() {
        let c = EasingCurve::from_keys(vec![Keyframe::new(0.5, 0.3, 0.0, 0.0)]).unwrap();
        assert!(approx_eq(c.evaluate(0.0), 0.3));
        assert!(approx_eq(c.evaluate(1.0), 0.3));
        assert!(approx_eq(c.last_value(), 0.3));
    }

    #[test]
    fn test_zero_tangents_give_smoothstep() {
        let c = EasingCurve::from_keys(vec![
            Keyframe::new(0.0, 0.0, 0.0, 0.0),
            Keyframe::new(1.0, 1.0, 0.0, 0.0),
        ])
        .unwrap();
        assert!(approx_eq(c.evaluate(0.5), 0.5));
        assert!(c.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_presets_match_easing_functions() {
        for e in [
            Easing::Linear,
            Easing::QuadIn,
            Easing::QuadOut,
            Easing::QuadInOut,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
        ] {
            let c = EasingCurve::from_easing(e, 16);
            for i in 0..=20 {
                let t = i as f32 / 20.0;
                assert!(
                    (c.evaluate(t) - ease(e, t)).abs() < 1e-3,
                    "{e:?} at {t}: expected {}, got {}",
                    ease(e, t),
                    c.evaluate(t)
                );
            }
        }
    }

    // ==================== REVERSE TESTS ====================

    #[test]
    fn test_reversed_mirrors_curve() {
        let c = EasingCurve::from_keys(vec![
            Keyframe::new(0.0, 0.0, 0.0, 2.0),
            Keyframe::new(0.3, 0.6, 0.5, 0.5),
            Keyframe::new(1.0, 1.0, 0.1, 0.0),
        ])
        .unwrap();
        let r = c.reversed();
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let expected = 1.0 - c.evaluate(1.0 - t);
            assert!(
                approx_eq(r.evaluate(t), expected),
                "t={t}: expected {expected}, got {}",
                r.evaluate(t)
            );
        }
    }

    #[test]
    fn test_reversed_twice_is_original() {
        let c = EasingCurve::from_easing(Easing::CubicOut, 8);
        assert_eq!(c.reversed().reversed().keys().len(), c.keys().len());
        for (a, b) in c.reversed().reversed().keys().iter().zip(c.keys()) {
            assert!(approx_eq(a.time, b.time));
            assert!(approx_eq(a.value, b.value));
        }
    }

    // ==================== SOLVE TESTS ====================

    #[test]
    fn test_solve_inverts_monotonic_curve() {
        let c = EasingCurve::from_easing(Easing::QuadIn, 8);
        for v in [0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
            let t = c.solve(v);
            assert!(
                (c.evaluate(t) - v).abs() < 1e-3,
                "value {v}: solved t={t}, curve gives {}",
                c.evaluate(t)
            );
        }
    }

    #[test]
    fn test_solve_out_of_range_returns_closest_end() {
        let c = EasingCurve::linear();
        assert!(approx_eq(c.solve(2.0), 1.0));
        assert!(approx_eq(c.solve(-1.0), 0.0));
    }
}
