//! Controller error types

use dbw_chassis::DrivingMode;
use thiserror::Error;

use crate::actuator::ActuatorId;

/// Failure to register an actuator frame with the transmit schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The schedule already carries a frame for this actuator.
    #[error("actuator {0:?} is already registered")]
    Duplicate(ActuatorId),

    /// The transmit schedule cannot accept more frames.
    #[error("transmit schedule is full")]
    ScheduleFull,
}

/// Failure to produce a chassis snapshot at the reader boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// No decodable chassis frames have been received yet.
    #[error("no decodable chassis frames received yet")]
    NoFrames,

    /// Received traffic could not be decoded into a snapshot.
    #[error("chassis frame decode failed: {0}")]
    Decode(String),
}

/// Controller lifecycle and mode-transition errors.
///
/// Runtime liveness/fault failures are never reported through this
/// type; they are absorbed into the driving mode and error code,
/// which callers poll.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// `VehicleParams::initial_driving_mode` was `None`.
    #[error("vehicle params do not specify an initial driving mode")]
    MissingDrivingModeConfig,

    /// An actuator frame could not be registered at init.
    #[error("failed to register actuator frame: {0}")]
    Register(#[from] RegisterError),

    /// `start()` called while the health monitor is already running.
    #[error("health monitor already started")]
    AlreadyStarted,

    /// A mode upgrade failed its liveness check. The controller has
    /// already demoted itself to emergency mode.
    #[error("failed to switch to {target:?}: actuation units not responding")]
    ModeSwitchFailed { target: DrivingMode },
}
