//! External-facing chassis report
//!
//! A sanitized, fully-populated structure derived from the internal
//! snapshot plus the controller's mode/error state. Unlike
//! [`ChassisSnapshot`](crate::snapshot::ChassisSnapshot), nothing here
//! is optional: absent source fields map to documented defaults (zero
//! for numeric telemetry, [`GearPosition::None`] for gear,
//! [`TurnSignal::None`] for the signal, `false` for horn and parking
//! brake).

use crate::types::{ChassisErrorCode, DrivingMode, GearPosition, TurnSignal};

/// Sanitized chassis state handed to external readers.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChassisReport {
    pub driving_mode: DrivingMode,
    pub error_code: ChassisErrorCode,
    /// Fixed-layout hardware fault mask; see the controller's fault
    /// module for bit assignments.
    pub error_mask: u32,
    /// The platform reports no engine start/stop state; always true.
    pub engine_started: bool,
    pub engine_rpm: f64,
    pub speed_mps: f64,
    pub throttle_percentage: f64,
    pub brake_percentage: f64,
    pub gear_location: GearPosition,
    /// Reported steering position as a percentage of the maximum
    /// steering angle, [-100, 100].
    pub steering_percentage: f64,
    pub steering_torque_nm: f64,
    pub parking_brake_on: bool,
    pub turn_signal: TurnSignal,
    pub horn_on: bool,
}
