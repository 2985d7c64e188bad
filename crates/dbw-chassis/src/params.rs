//! Vehicle actuation parameters

use crate::types::DrivingMode;

/// Static per-vehicle actuation limits and startup configuration.
///
/// The controller refuses to initialize without
/// `initial_driving_mode`; everything else has platform defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleParams {
    /// Maximum physical steering angle (absolute), actuator units.
    pub max_steer_angle: f64,
    /// Minimum commandable steering angle rate.
    pub min_steer_angle_rate: f64,
    /// Maximum commandable steering angle rate.
    pub max_steer_angle_rate: f64,
    /// Mode the vehicle starts in. Required; `None` fails init.
    pub initial_driving_mode: Option<DrivingMode>,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            max_steer_angle: 470.0,
            min_steer_angle_rate: 0.0,
            max_steer_angle_rate: 400.0,
            initial_driving_mode: Some(DrivingMode::Manual),
        }
    }
}

/// Clamp `value` into `[lo, hi]`.
///
/// Used wherever a scaled command must stay inside the actuator's
/// physical envelope.
pub fn bounded_value(lo: f64, hi: f64, value: f64) -> f64 {
    value.clamp(lo, hi)
}
