//! Chassis controller
//!
//! [`ChassisController`] owns the mode state machine and the health
//! monitor thread. Construction validates configuration and registers
//! the actuator frames with the transmit schedule; `start()` spawns
//! the monitor; mode operations arbitrate whether a transition is
//! safe before granting actuation authority.
//!
//! # Mode upgrades require proof of liveness
//!
//! Every transition into an autonomous mode performs a blocking
//! liveness check of the units that mode controls *before* the mode
//! is considered active. Commands issued in a mode the hardware
//! cannot execute would be silently dropped by that hardware, which
//! is unacceptable for a safety actuator. Downgrades never require
//! proof: going back to manual is always safe.

use std::sync::Arc;
use std::thread::JoinHandle;

use dbw_chassis::{
    ChassisErrorCode, ChassisReport, DrivingMode, GearPosition, TurnSignal, VehicleParams,
};
use tracing::{error, info, warn};

use crate::actuator::{ActuatorId, ChassisCommands, CommandFrame};
use crate::bus::{BusTransmitter, ChassisStateReader};
use crate::error::ControllerError;
use crate::monitor::ResponseUnits;
use crate::state::SharedChassisState;

/// Why the controller is demoting itself. Decides the error code
/// published alongside the demotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DemotionCause {
    /// A hardware fault bit was observed, or an upgrade check failed.
    Fault,
    /// Sustained liveness loss; the operator must take over.
    ManualIntervention,
}

/// Shared core: everything both execution contexts need.
pub(crate) struct ControllerCore {
    pub(crate) params: VehicleParams,
    pub(crate) commands: ChassisCommands,
    pub(crate) transmitter: Arc<dyn BusTransmitter>,
    pub(crate) reader: Arc<dyn ChassisStateReader>,
    pub(crate) state: SharedChassisState,
}

impl ControllerCore {
    pub(crate) fn driving_mode(&self) -> DrivingMode {
        self.state.driving_mode()
    }

    /// Forced transition to emergency mode: reset all actuator
    /// command state, then publish the cause. Idempotent and safe
    /// under concurrent invocation from both contexts.
    pub(crate) fn demote(&self, cause: DemotionCause) {
        self.state.set_driving_mode(DrivingMode::EmergencyMode);
        self.commands.reset_all();
        self.state.set_error_code(match cause {
            DemotionCause::Fault => ChassisErrorCode::ChassisError,
            DemotionCause::ManualIntervention => ChassisErrorCode::ManualIntervention,
        });
        warn!(?cause, "demoted to emergency mode");
    }
}

/// The drive-by-wire control core.
///
/// One instance per vehicle. Mode transitions and command issuance
/// happen on the caller's context; one background thread runs the
/// health monitor between `start()` and `stop()`.
pub struct ChassisController {
    pub(crate) core: Arc<ControllerCore>,
    monitor: Option<JoinHandle<()>>,
}

impl ChassisController {
    /// Initialize the controller.
    ///
    /// Validates the vehicle parameters and registers all five
    /// actuator frames (disabled) with the transmit schedule. A
    /// controller that failed to initialize must not be started;
    /// this is enforced by construction.
    pub fn new(
        params: VehicleParams,
        transmitter: Arc<dyn BusTransmitter>,
        reader: Arc<dyn ChassisStateReader>,
    ) -> Result<Self, ControllerError> {
        let initial_mode = params
            .initial_driving_mode
            .ok_or(ControllerError::MissingDrivingModeConfig)?;

        let commands = ChassisCommands::new();
        let frames: [(ActuatorId, Arc<dyn CommandFrame>); 5] = [
            (ActuatorId::Brake, commands.brake.clone()),
            (ActuatorId::Throttle, commands.throttle.clone()),
            (ActuatorId::Steering, commands.steering.clone()),
            (ActuatorId::Gear, commands.gear.clone()),
            (ActuatorId::Lighting, commands.lighting.clone()),
        ];
        for (id, frame) in frames {
            transmitter.register(id, frame, false)?;
        }

        info!("chassis controller initialized");
        Ok(Self {
            core: Arc::new(ControllerCore {
                params,
                commands,
                transmitter,
                reader,
                state: SharedChassisState::new(initial_mode),
            }),
            monitor: None,
        })
    }

    /// Spawn the background health monitor.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.monitor.is_some() {
            return Err(ControllerError::AlreadyStarted);
        }
        let core = self.core.clone();
        self.monitor = Some(std::thread::spawn(move || core.monitor_loop()));
        Ok(())
    }

    /// Join the health monitor.
    ///
    /// The monitor's sole exit condition is the transmitter's running
    /// flag turning false; stop the transmit schedule before calling
    /// this, mirroring the bus shutdown order.
    pub fn stop(&mut self) {
        if let Some(handle) = self.monitor.take() {
            if handle.join().is_err() {
                error!("health monitor thread panicked");
            } else {
                info!("chassis controller stopped");
            }
        } else {
            warn!("stop() called but the health monitor was not running");
        }
    }

    // ==================== observers ====================

    /// The typed actuator handles. Transmitter adapters clone the
    /// `Arc`s they need for frame encoding at setup time; tests use
    /// this to observe commanded actuator state.
    pub fn commands(&self) -> &ChassisCommands {
        &self.core.commands
    }

    pub fn driving_mode(&self) -> DrivingMode {
        self.core.state.driving_mode()
    }

    pub fn chassis_error_code(&self) -> ChassisErrorCode {
        self.core.state.error_code()
    }

    pub fn chassis_error_mask(&self) -> u32 {
        self.core.state.error_mask()
    }

    /// Sanitized external-facing chassis state, derived from the
    /// latest snapshot plus mode/error fields. Absent source fields
    /// map to documented defaults; a missing snapshot yields a report
    /// that is default everywhere except mode/error.
    pub fn chassis_report(&self) -> ChassisReport {
        let snapshot = self.core.reader.read_snapshot().unwrap_or_default();

        let steering_percentage = match snapshot.steering.as_ref().and_then(|s| s.angle) {
            Some(angle) if self.core.params.max_steer_angle != 0.0 => {
                angle * 100.0 / self.core.params.max_steer_angle
            }
            _ => 0.0,
        };

        ChassisReport {
            driving_mode: self.driving_mode(),
            error_code: self.chassis_error_code(),
            error_mask: self.chassis_error_mask(),
            engine_started: true,
            engine_rpm: snapshot
                .drive
                .as_ref()
                .and_then(|d| d.engine_rpm)
                .unwrap_or(0.0),
            speed_mps: snapshot
                .motion
                .as_ref()
                .and_then(|m| m.speed_mps)
                .unwrap_or(0.0),
            throttle_percentage: snapshot
                .drive
                .as_ref()
                .and_then(|d| d.throttle_output)
                .unwrap_or(0.0),
            brake_percentage: snapshot
                .brake
                .as_ref()
                .and_then(|b| b.output)
                .unwrap_or(0.0),
            gear_location: snapshot
                .gear
                .as_ref()
                .and_then(|g| g.state)
                .unwrap_or(GearPosition::None),
            steering_percentage,
            steering_torque_nm: snapshot
                .steering
                .as_ref()
                .and_then(|s| s.torque_nm)
                .unwrap_or(0.0),
            parking_brake_on: snapshot
                .motion
                .as_ref()
                .and_then(|m| m.parking_brake_on)
                .unwrap_or(false),
            turn_signal: snapshot
                .light
                .as_ref()
                .and_then(|l| l.turn_signal)
                .unwrap_or(TurnSignal::None),
            horn_on: snapshot
                .light
                .as_ref()
                .and_then(|l| l.horn_on)
                .unwrap_or(false),
        }
    }

    // ==================== mode state machine ====================

    /// Grant full autonomous authority (steering + speed).
    pub fn enable_auto_mode(&self) -> Result<(), ControllerError> {
        if self.driving_mode() == DrivingMode::CompleteAutoDrive {
            info!("already in complete auto drive mode");
            return Ok(());
        }
        self.core.commands.brake.set_enable();
        self.core.commands.throttle.set_enable();
        self.core.commands.steering.set_enable();
        self.core.transmitter.force_update();

        if !self.core.check_response(ResponseUnits::ALL, true) {
            error!("failed to switch to complete auto drive mode");
            self.core.demote(DemotionCause::Fault);
            return Err(ControllerError::ModeSwitchFailed {
                target: DrivingMode::CompleteAutoDrive,
            });
        }
        self.core
            .state
            .set_driving_mode(DrivingMode::CompleteAutoDrive);
        info!("switched to complete auto drive mode");
        Ok(())
    }

    /// Drop all autonomous authority. Always succeeds; idempotent.
    pub fn disable_auto_mode(&self) {
        self.core.commands.reset_all();
        self.core.transmitter.force_update();
        self.core.state.set_driving_mode(DrivingMode::Manual);
        self.core.state.set_error_code(ChassisErrorCode::NoError);
        info!("switched to manual mode");
    }

    /// Grant steering-only authority.
    pub fn enable_steering_only_mode(&self) -> Result<(), ControllerError> {
        let mode = self.driving_mode();
        if mode == DrivingMode::CompleteAutoDrive || mode == DrivingMode::AutoSteerOnly {
            self.core.state.set_driving_mode(DrivingMode::AutoSteerOnly);
            info!("already in auto steer only mode");
            return Ok(());
        }
        self.core.commands.brake.set_disable();
        self.core.commands.throttle.set_disable();
        self.core.commands.steering.set_enable();
        self.core.transmitter.force_update();

        if !self.core.check_response(ResponseUnits::STEER, true) {
            error!("failed to switch to auto steer only mode");
            self.core.demote(DemotionCause::Fault);
            return Err(ControllerError::ModeSwitchFailed {
                target: DrivingMode::AutoSteerOnly,
            });
        }
        self.core.state.set_driving_mode(DrivingMode::AutoSteerOnly);
        info!("switched to auto steer only mode");
        Ok(())
    }

    /// Grant speed-only (brake/throttle/gear) authority.
    pub fn enable_speed_only_mode(&self) -> Result<(), ControllerError> {
        let mode = self.driving_mode();
        if mode == DrivingMode::CompleteAutoDrive || mode == DrivingMode::AutoSpeedOnly {
            self.core.state.set_driving_mode(DrivingMode::AutoSpeedOnly);
            info!("already in auto speed only mode");
            return Ok(());
        }
        self.core.commands.brake.set_enable();
        self.core.commands.throttle.set_enable();
        self.core.commands.steering.set_disable();
        self.core.transmitter.force_update();

        if !self.core.check_response(ResponseUnits::SPEED, true) {
            error!("failed to switch to auto speed only mode");
            self.core.demote(DemotionCause::Fault);
            return Err(ControllerError::ModeSwitchFailed {
                target: DrivingMode::AutoSpeedOnly,
            });
        }
        self.core.state.set_driving_mode(DrivingMode::AutoSpeedOnly);
        info!("switched to auto speed only mode");
        Ok(())
    }

    /// Forced transition to emergency mode with a chassis error.
    /// Callable from any context; idempotent.
    pub fn emergency(&self) {
        self.core.demote(DemotionCause::Fault);
    }
}
