//! Light attributes and the values they carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Tolerance under which two numeric values count as the same.
///
/// Brightness and colour temperature are integer-quantised at the device,
/// so differences below half a unit can never be observed.
pub const NUMERIC_TOLERANCE: f64 = 0.5;

/// A controllable aspect of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Emission level, `0..=255`.
    Brightness,
    /// Colour temperature in mired, `153..=500`.
    ColorTemp,
    /// Whether the light is on or off.
    Power,
}

impl Attribute {
    /// Inclusive numeric range for this attribute, when it is numeric.
    #[must_use]
    pub fn numeric_range(self) -> Option<(f64, f64)> {
        match self {
            Self::Brightness => Some((0.0, 255.0)),
            Self::ColorTemp => Some((153.0, 500.0)),
            Self::Power => None,
        }
    }

    /// Check that a value is the right kind and within range for this attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] describing the mismatch.
    pub fn check_value(self, value: &AttributeValue) -> Result<(), ValueError> {
        match (self.numeric_range(), value) {
            (Some((min, max)), AttributeValue::Number(number)) => {
                if !number.is_finite() {
                    return Err(ValueError::NotFinite {
                        attribute: self,
                        value: *number,
                    });
                }
                if *number < min || *number > max {
                    return Err(ValueError::OutOfRange {
                        attribute: self,
                        value: *number,
                        min,
                        max,
                    });
                }
                Ok(())
            }
            (Some(_), AttributeValue::Power(_)) => Err(ValueError::ExpectedNumber { attribute: self }),
            (None, AttributeValue::Number(_)) => Err(ValueError::ExpectedPower { attribute: self }),
            (None, AttributeValue::Power(_)) => Ok(()),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Brightness => "brightness",
            Self::ColorTemp => "color_temp",
            Self::Power => "power",
        };
        f.write_str(label)
    }
}

/// On/off state of a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// A value carried by a curve point, a command, or a reading.
///
/// Serialised untagged: power states appear as `"on"`/`"off"` strings,
/// everything else as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Power(PowerState),
    Number(f64),
}

impl AttributeValue {
    /// The numeric payload, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Power(_) => None,
        }
    }

    /// Whether `self` and `other` differ enough to matter to a device.
    #[must_use]
    pub fn materially_differs(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => (a - b).abs() >= NUMERIC_TOLERANCE,
            (Self::Power(a), Self::Power(b)) => a != b,
            _ => true,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<PowerState> for AttributeValue {
    fn from(value: PowerState) -> Self {
        Self::Power(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => number.fmt(f),
            Self::Power(state) => state.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_attributes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Attribute::ColorTemp).unwrap(),
            "\"color_temp\""
        );
        assert_eq!(
            serde_json::to_string(&Attribute::Brightness).unwrap(),
            "\"brightness\""
        );
    }

    #[test]
    fn should_deserialize_power_value_from_string() {
        let value: AttributeValue = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(value, AttributeValue::Power(PowerState::Off));
    }

    #[test]
    fn should_deserialize_numeric_value_from_number() {
        let value: AttributeValue = serde_json::from_str("127.5").unwrap();
        assert_eq!(value, AttributeValue::Number(127.5));
    }

    #[test]
    fn should_accept_brightness_within_range() {
        assert!(Attribute::Brightness
            .check_value(&AttributeValue::Number(0.0))
            .is_ok());
        assert!(Attribute::Brightness
            .check_value(&AttributeValue::Number(255.0))
            .is_ok());
    }

    #[test]
    fn should_reject_brightness_out_of_range() {
        let result = Attribute::Brightness.check_value(&AttributeValue::Number(300.0));
        assert!(matches!(result, Err(ValueError::OutOfRange { .. })));
    }

    #[test]
    fn should_reject_color_temp_below_minimum() {
        let result = Attribute::ColorTemp.check_value(&AttributeValue::Number(100.0));
        assert!(matches!(result, Err(ValueError::OutOfRange { .. })));
    }

    #[test]
    fn should_reject_power_state_for_numeric_attribute() {
        let result = Attribute::Brightness.check_value(&AttributeValue::Power(PowerState::On));
        assert!(matches!(result, Err(ValueError::ExpectedNumber { .. })));
    }

    #[test]
    fn should_reject_number_for_power_attribute() {
        let result = Attribute::Power.check_value(&AttributeValue::Number(1.0));
        assert!(matches!(result, Err(ValueError::ExpectedPower { .. })));
    }

    #[test]
    fn should_reject_non_finite_numbers() {
        let result = Attribute::Brightness.check_value(&AttributeValue::Number(f64::NAN));
        assert!(matches!(result, Err(ValueError::NotFinite { .. })));
    }

    #[test]
    fn should_treat_sub_tolerance_difference_as_equal() {
        let a = AttributeValue::Number(100.0);
        let b = AttributeValue::Number(100.4);
        assert!(!a.materially_differs(&b));
    }

    #[test]
    fn should_treat_tolerance_difference_as_changed() {
        let a = AttributeValue::Number(100.0);
        let b = AttributeValue::Number(100.5);
        assert!(a.materially_differs(&b));
    }

    #[test]
    fn should_treat_power_flip_as_changed() {
        let on = AttributeValue::Power(PowerState::On);
        let off = AttributeValue::Power(PowerState::Off);
        assert!(on.materially_differs(&off));
        assert!(!on.materially_differs(&on));
    }

    #[test]
    fn should_treat_kind_mismatch_as_changed() {
        let number = AttributeValue::Number(1.0);
        let power = AttributeValue::Power(PowerState::On);
        assert!(number.materially_differs(&power));
    }
}
