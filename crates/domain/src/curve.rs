//! Time curves — the per-attribute tracks a scene plays back over the day.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::light::{Attribute, AttributeValue};
use crate::time::TimeOfDay;

/// One authored point on a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub at: TimeOfDay,
    pub value: AttributeValue,
}

impl TimePoint {
    #[must_use]
    pub fn new(at: TimeOfDay, value: impl Into<AttributeValue>) -> Self {
        Self {
            at,
            value: value.into(),
        }
    }
}

/// A validated, time-ordered curve for a single attribute.
///
/// The curve is circular: it has no first or last instant, and evaluation
/// wraps around midnight in both directions. It always yields a value for
/// every moment of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    attribute: Attribute,
    points: Vec<TimePoint>,
}

impl Curve {
    /// Build a curve from authored points, sorting them by time.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError`] when the point list is empty, contains
    /// duplicate times, or carries a value of the wrong kind or range for
    /// `attribute`.
    pub fn new(attribute: Attribute, mut points: Vec<TimePoint>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }
        for point in &points {
            attribute
                .check_value(&point.value)
                .map_err(|source| CurveError::InvalidValue {
                    at: point.at,
                    source,
                })?;
        }
        points.sort_by_key(|point| point.at);
        for pair in points.windows(2) {
            if pair[0].at == pair[1].at {
                return Err(CurveError::DuplicateTime { at: pair[0].at });
            }
        }
        Ok(Self { attribute, points })
    }

    /// The attribute this curve drives.
    #[must_use]
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// The points in ascending time order.
    #[must_use]
    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    /// Evaluate the curve at a moment in the day.
    ///
    /// Numeric attributes blend linearly between the bracketing points,
    /// with both elapsed time and span measured forward on the day circle.
    /// Power values hold the previous point's value until the next point.
    #[must_use]
    pub fn value_at(&self, at: TimeOfDay) -> AttributeValue {
        let (prev, next) = self.bracketing(at);
        match (prev.value, next.value) {
            (AttributeValue::Number(from), AttributeValue::Number(to)) => {
                let span = prev.at.seconds_until(next.at);
                if span == 0 {
                    // single-point curve
                    return prev.value;
                }
                let elapsed = prev.at.seconds_until(at);
                let ratio = f64::from(elapsed) / f64::from(span);
                AttributeValue::Number(from + (to - from) * ratio)
            }
            _ => prev.value,
        }
    }

    /// The governing previous point and the upcoming next point around `at`.
    ///
    /// When `at` precedes every point, the previous point wraps to the final
    /// one of the day; when `at` follows every point, the next wraps to the
    /// first.
    fn bracketing(&self, at: TimeOfDay) -> (TimePoint, TimePoint) {
        let split = self.points.partition_point(|point| point.at <= at);
        let prev = if split == 0 {
            self.points[self.points.len() - 1]
        } else {
            self.points[split - 1]
        };
        let next = if split == self.points.len() {
            self.points[0]
        } else {
            self.points[split]
        };
        (prev, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PowerState;

    fn at(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::from_hms(hour, minute, 0).unwrap()
    }

    fn brightness_curve(points: &[(u32, u32, f64)]) -> Curve {
        Curve::new(
            Attribute::Brightness,
            points
                .iter()
                .map(|&(hour, minute, value)| TimePoint::new(at(hour, minute), value))
                .collect(),
        )
        .unwrap()
    }

    fn assert_number(value: AttributeValue, expected: f64) {
        let number = value.as_number().unwrap();
        assert!(
            (number - expected).abs() < 1e-6,
            "expected {expected}, got {number}"
        );
    }

    #[test]
    fn should_reject_empty_point_list() {
        let result = Curve::new(Attribute::Brightness, Vec::new());
        assert_eq!(result, Err(CurveError::Empty));
    }

    #[test]
    fn should_reject_duplicate_times() {
        let result = Curve::new(
            Attribute::Brightness,
            vec![
                TimePoint::new(at(8, 0), 10.0),
                TimePoint::new(at(8, 0), 20.0),
            ],
        );
        assert!(matches!(result, Err(CurveError::DuplicateTime { .. })));
    }

    #[test]
    fn should_reject_out_of_range_values() {
        let result = Curve::new(
            Attribute::Brightness,
            vec![TimePoint::new(at(8, 0), 300.0)],
        );
        assert!(matches!(result, Err(CurveError::InvalidValue { .. })));
    }

    #[test]
    fn should_reject_wrong_value_kind() {
        let result = Curve::new(
            Attribute::Power,
            vec![TimePoint::new(at(8, 0), 1.0)],
        );
        assert!(matches!(result, Err(CurveError::InvalidValue { .. })));
    }

    #[test]
    fn should_sort_points_by_time() {
        let curve = brightness_curve(&[(18, 0, 30.0), (6, 0, 10.0), (12, 0, 20.0)]);
        let times: Vec<_> = curve.points().iter().map(|p| p.at).collect();
        assert_eq!(times, vec![at(6, 0), at(12, 0), at(18, 0)]);
    }

    #[test]
    fn should_hold_constant_with_a_single_point() {
        let curve = brightness_curve(&[(12, 0, 80.0)]);
        assert_number(curve.value_at(at(0, 0)), 80.0);
        assert_number(curve.value_at(at(12, 0)), 80.0);
        assert_number(curve.value_at(at(23, 59)), 80.0);
    }

    #[test]
    fn should_return_exact_value_at_a_point() {
        let curve = brightness_curve(&[(6, 0, 10.0), (18, 0, 50.0)]);
        assert_number(curve.value_at(at(6, 0)), 10.0);
        assert_number(curve.value_at(at(18, 0)), 50.0);
    }

    #[test]
    fn should_interpolate_between_points() {
        let curve = brightness_curve(&[(6, 0, 10.0), (18, 0, 50.0)]);
        assert_number(curve.value_at(at(12, 0)), 30.0);
        assert_number(curve.value_at(at(9, 0)), 20.0);
    }

    #[test]
    fn should_interpolate_across_midnight() {
        // 23:00 -> 10, 01:00 -> 20: midnight sits halfway.
        let curve = brightness_curve(&[(23, 0, 10.0), (1, 0, 20.0)]);
        assert_number(curve.value_at(at(0, 0)), 15.0);
        assert_number(curve.value_at(at(23, 30)), 12.5);
        assert_number(curve.value_at(at(0, 30)), 17.5);
    }

    #[test]
    fn should_wrap_before_the_first_point() {
        let curve = brightness_curve(&[(6, 0, 60.0), (22, 0, 20.0)]);
        // 02:00 sits between 22:00 and 06:00: 4 of 8 hours elapsed.
        assert_number(curve.value_at(at(2, 0)), 40.0);
    }

    #[test]
    fn should_wrap_after_the_last_point() {
        let curve = brightness_curve(&[(6, 0, 60.0), (22, 0, 20.0)]);
        // 23:00 sits between 22:00 and 06:00: 1 of 8 hours elapsed.
        assert_number(curve.value_at(at(23, 0)), 25.0);
    }

    #[test]
    fn should_handle_a_point_exactly_at_midnight() {
        let curve = brightness_curve(&[(0, 0, 10.0), (12, 0, 100.0)]);
        assert_number(curve.value_at(at(6, 0)), 55.0);
        // The wrap ramp runs 12:00 back to the midnight anchor.
        assert_number(curve.value_at(at(18, 0)), 55.0);
        assert_number(curve.value_at(at(0, 0)), 10.0);
    }

    #[test]
    fn should_be_defined_at_every_minute_of_the_day() {
        let curve = brightness_curve(&[(6, 30, 10.0), (14, 45, 200.0), (21, 10, 40.0)]);
        for minute in 0..1_440 {
            let t = TimeOfDay::from_secs(minute * 60).unwrap();
            let value = curve.value_at(t).as_number().unwrap();
            assert!((10.0..=200.0).contains(&value), "value {value} at {t}");
        }
    }

    #[test]
    fn should_step_power_values_instead_of_blending() {
        let curve = Curve::new(
            Attribute::Power,
            vec![
                TimePoint::new(at(7, 0), PowerState::On),
                TimePoint::new(at(23, 0), PowerState::Off),
            ],
        )
        .unwrap();
        assert_eq!(
            curve.value_at(at(12, 0)),
            AttributeValue::Power(PowerState::On)
        );
        assert_eq!(
            curve.value_at(at(23, 0)),
            AttributeValue::Power(PowerState::Off)
        );
        assert_eq!(
            curve.value_at(at(3, 0)),
            AttributeValue::Power(PowerState::Off)
        );
    }
}
