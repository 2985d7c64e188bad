//! Per-poll chassis telemetry view
//!
//! [`ChassisSnapshot`] is the structured result of decoding the most
//! recent bus traffic. Every section is optional: a section is absent
//! until at least one frame of that subsystem has been decoded, and
//! individual telemetry fields inside a section stay `None` until
//! their source signal has been seen. Consumers must treat absence
//! conservatively (a missing liveness flag means "not online").
//!
//! Snapshots are plain values with no identity beyond "most recent";
//! they are produced fresh per poll and never retained.

use crate::types::{GearPosition, TurnSignal};

/// Steering unit (EPS) telemetry and fault flags.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringStatus {
    /// Reported wheel angle, in the actuator's physical unit.
    pub angle: Option<f64>,
    /// Reported assist torque, Nm.
    pub torque_nm: Option<f64>,
    /// Timestamp of the last steering report, seconds.
    pub report_timestamp: Option<f64>,
    pub watchdog_fault: bool,
    pub channel_1_fault: bool,
    pub channel_2_fault: bool,
    pub calibration_fault: bool,
    pub connector_fault: bool,
}

/// Braking unit telemetry and fault flags.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrakeStatus {
    /// Applied brake output, percent.
    pub output: Option<f64>,
    pub watchdog_fault: bool,
    pub channel_1_fault: bool,
    pub channel_2_fault: bool,
    /// Brake-on/off switch circuit fault.
    pub boo_fault: bool,
    pub connector_fault: bool,
}

/// Drive (throttle/engine) unit telemetry and fault flags.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveStatus {
    /// Applied throttle output, percent.
    pub throttle_output: Option<f64>,
    pub engine_rpm: Option<f64>,
    pub watchdog_fault: bool,
    pub channel_1_fault: bool,
    pub channel_2_fault: bool,
    pub connector_fault: bool,
}

/// Gear unit state.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearStatus {
    pub state: Option<GearPosition>,
    pub canbus_fault: bool,
}

/// Lighting and horn state.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightStatus {
    pub turn_signal: Option<TurnSignal>,
    pub horn_on: Option<bool>,
}

/// Vehicle motion telemetry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionStatus {
    /// Vehicle speed, m/s.
    pub speed_mps: Option<f64>,
    pub parking_brake_on: Option<bool>,
}

/// Per-unit online flags from the hardware's check-response frames.
///
/// `None` means the unit has not reported; callers must treat that as
/// offline, never as "unknown/skip".
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivenessStatus {
    pub steering_online: Option<bool>,
    pub drive_online: Option<bool>,
    pub brake_online: Option<bool>,
}

/// The most recently decoded structured view of all subsystem
/// telemetry fields.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChassisSnapshot {
    pub steering: Option<SteeringStatus>,
    pub brake: Option<BrakeStatus>,
    pub drive: Option<DriveStatus>,
    pub gear: Option<GearStatus>,
    pub light: Option<LightStatus>,
    pub motion: Option<MotionStatus>,
    pub liveness: Option<LivenessStatus>,
}

impl ChassisSnapshot {
    /// Whether the steering unit reports itself operable.
    ///
    /// Absence of the liveness section or of the flag is "offline".
    pub fn steering_unit_online(&self) -> bool {
        self.liveness
            .as_ref()
            .and_then(|l| l.steering_online)
            .unwrap_or(false)
    }

    /// Whether both units backing speed authority (drive and brake)
    /// report themselves operable.
    pub fn speed_units_online(&self) -> bool {
        match &self.liveness {
            Some(l) => l.drive_online.unwrap_or(false) && l.brake_online.unwrap_or(false),
            None => false,
        }
    }
}
