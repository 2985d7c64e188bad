//! # DBW Chassis
//!
//! Data model shared across the drive-by-wire stack (no hardware
//! dependency).
//!
//! ## Modules
//!
//! - `types`: driving mode, error code, gear and signal enums
//! - `snapshot`: the per-poll decoded chassis telemetry view
//! - `report`: the sanitized external-facing chassis report
//! - `params`: vehicle actuation parameters and numeric helpers
//!
//! The controller crate (`dbw-controller`) consumes these types; bus
//! adapters produce [`ChassisSnapshot`] values from decoded frames and
//! feed them through the `ChassisStateReader` boundary.

pub mod params;
pub mod report;
pub mod snapshot;
pub mod types;

pub use params::{bounded_value, VehicleParams};
pub use report::ChassisReport;
pub use snapshot::{
    BrakeStatus, ChassisSnapshot, DriveStatus, GearStatus, LightStatus, LivenessStatus,
    MotionStatus, SteeringStatus,
};
pub use types::{BeamRequest, ChassisErrorCode, DrivingMode, GearPosition, TurnSignal};
