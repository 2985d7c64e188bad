//! # DBW Controller
//!
//! The drive-by-wire control core. Converts high-level driving
//! commands (throttle, brake, steering, gear, signals) into bounded,
//! mode-gated actuation requests, continuously verifies that the
//! actuation hardware is alive and fault-free, and autonomously
//! demotes the vehicle to a safe state when verification fails.
//!
//! ## Modules
//!
//! - `actuator`: typed command-encoder handles and the frame registry
//! - `bus`: collaborator traits (transmit schedule, chassis reader)
//! - `controller`: [`ChassisController`] lifecycle and mode machine
//! - `command`: mode-gated command translation
//! - `monitor`: background health-monitoring loop
//! - `fault`: chassis fault aggregation into the error mask
//! - `state`: atomic cells shared between the two contexts
//! - `mock`: in-memory collaborators for tests and host simulation
//!   (behind the `mock` feature)
//!
//! ## Execution contexts
//!
//! Two contexts touch the controller: the caller's context (mode
//! transitions, per-cycle command issuance) and one background thread
//! running the health monitor. Shared state is held in independent
//! atomic cells; no lock is held across a collaborator call.

pub mod actuator;
pub mod bus;
pub mod command;
pub mod controller;
pub mod error;
pub mod fault;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod monitor;
pub mod state;

pub use actuator::{
    ActuatorId, BrakeCommand, ChassisCommands, CommandFrame, GearCommand, LightingCommand,
    SteeringCommand, ThrottleCommand,
};
pub use bus::{BusTransmitter, ChassisStateReader};
pub use controller::ChassisController;
pub use error::{ControllerError, RegisterError, SnapshotError};
pub use fault::{mask_bit, scan_faults, FaultScan};
pub use monitor::{ResponseUnits, MAX_FAIL_ATTEMPTS, MONITOR_PERIOD};
pub use state::{AtomicDrivingMode, AtomicErrorCode, SharedChassisState};
