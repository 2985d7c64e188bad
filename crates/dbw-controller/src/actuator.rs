//! Actuator command handles
//!
//! Each handle holds the last commanded value for one actuator frame
//! and exposes setter-style operations. The bus transmitter owns the
//! periodic wire dispatch and serialization; from the controller's
//! side a handle is just shared mutable command state plus an
//! enabled flag.
//!
//! Handles are `Arc`-shared between the controller and the
//! transmitter. Each guards its own multi-field state with one short
//! `parking_lot::Mutex`, never held across a collaborator call.

use std::sync::Arc;

use dbw_chassis::{BeamRequest, GearPosition, TurnSignal};
use parking_lot::Mutex;

/// Identifies one actuator frame on the transmit schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorId {
    Brake,
    Throttle,
    Steering,
    Gear,
    Lighting,
}

/// The transmitter's view of a registered command frame.
///
/// Wire encoding lives on the transmitter side; the controller only
/// guarantees that the frame can report its identity and whether the
/// actuator is currently enabled.
pub trait CommandFrame: Send + Sync {
    fn actuator_id(&self) -> ActuatorId;
    fn is_enabled(&self) -> bool;
}

// ==================== Brake ====================

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct BrakeState {
    enabled: bool,
    pedal: f64,
}

/// Brake pedal command. Pedal is a percentage in [0, 100); final
/// bounds are owned by the actuator.
#[derive(Debug, Default)]
pub struct BrakeCommand {
    state: Mutex<BrakeState>,
}

impl BrakeCommand {
    pub fn set_enable(&self) {
        self.state.lock().enabled = true;
    }

    pub fn set_disable(&self) {
        self.state.lock().enabled = false;
    }

    pub fn set_pedal(&self, percent: f64) {
        self.state.lock().pedal = percent;
    }

    pub fn pedal(&self) -> f64 {
        self.state.lock().pedal
    }

    /// Back to disabled/neutral, as commanded on emergency demotion.
    pub fn reset(&self) {
        *self.state.lock() = BrakeState::default();
    }
}

impl CommandFrame for BrakeCommand {
    fn actuator_id(&self) -> ActuatorId {
        ActuatorId::Brake
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

// ==================== Throttle ====================

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct ThrottleState {
    enabled: bool,
    pedal: f64,
}

/// Throttle pedal command. Pedal is a percentage in [0, 100).
#[derive(Debug, Default)]
pub struct ThrottleCommand {
    state: Mutex<ThrottleState>,
}

impl ThrottleCommand {
    pub fn set_enable(&self) {
        self.state.lock().enabled = true;
    }

    pub fn set_disable(&self) {
        self.state.lock().enabled = false;
    }

    pub fn set_pedal(&self, percent: f64) {
        self.state.lock().pedal = percent;
    }

    pub fn pedal(&self) -> f64 {
        self.state.lock().pedal
    }

    pub fn reset(&self) {
        *self.state.lock() = ThrottleState::default();
    }
}

impl CommandFrame for ThrottleCommand {
    fn actuator_id(&self) -> ActuatorId {
        ActuatorId::Throttle
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

// ==================== Steering ====================

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct SteeringState {
    enabled: bool,
    angle: f64,
    angle_rate: f64,
}

/// Steering command: target wheel angle plus angle rate, both in the
/// actuator's physical units (already scaled and clamped by the
/// translator).
#[derive(Debug, Default)]
pub struct SteeringCommand {
    state: Mutex<SteeringState>,
}

impl SteeringCommand {
    pub fn set_enable(&self) {
        self.state.lock().enabled = true;
    }

    pub fn set_disable(&self) {
        self.state.lock().enabled = false;
    }

    /// Set the target angle; returns `&Self` so the angle rate can be
    /// chained in the same statement.
    pub fn set_steering_angle(&self, angle: f64) -> &Self {
        self.state.lock().angle = angle;
        self
    }

    pub fn set_steering_angle_speed(&self, rate: f64) {
        self.state.lock().angle_rate = rate;
    }

    pub fn angle(&self) -> f64 {
        self.state.lock().angle
    }

    pub fn angle_rate(&self) -> f64 {
        self.state.lock().angle_rate
    }

    pub fn reset(&self) {
        *self.state.lock() = SteeringState::default();
    }
}

impl CommandFrame for SteeringCommand {
    fn actuator_id(&self) -> ActuatorId {
        ActuatorId::Steering
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

// ==================== Gear ====================

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct GearState {
    enabled: bool,
    position: GearPosition,
}

/// Gear selection command.
#[derive(Debug, Default)]
pub struct GearCommand {
    state: Mutex<GearState>,
}

impl GearCommand {
    pub fn set_enable(&self) {
        self.state.lock().enabled = true;
    }

    pub fn set_disable(&self) {
        self.state.lock().enabled = false;
    }

    pub fn set_gear_neutral(&self) {
        self.state.lock().position = GearPosition::Neutral;
    }

    pub fn set_gear_reverse(&self) {
        self.state.lock().position = GearPosition::Reverse;
    }

    pub fn set_gear_drive(&self) {
        self.state.lock().position = GearPosition::Drive;
    }

    pub fn set_gear_park(&self) {
        self.state.lock().position = GearPosition::Parking;
    }

    pub fn set_gear_low(&self) {
        self.state.lock().position = GearPosition::Low;
    }

    pub fn set_gear_none(&self) {
        self.state.lock().position = GearPosition::None;
    }

    pub fn position(&self) -> GearPosition {
        self.state.lock().position
    }

    pub fn reset(&self) {
        *self.state.lock() = GearState::default();
    }
}

impl CommandFrame for GearCommand {
    fn actuator_id(&self) -> ActuatorId {
        ActuatorId::Gear
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

// ==================== Lighting ====================

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct LightingState {
    enabled: bool,
    turn_signal: TurnSignal,
    horn: bool,
    beam: BeamRequest,
}

/// Turn signal, horn and beam command. Not safety-gated; exactly one
/// of {left, right, none} is asserted for the turn signal.
#[derive(Debug, Default)]
pub struct LightingCommand {
    state: Mutex<LightingState>,
}

impl LightingCommand {
    pub fn set_enable(&self) {
        self.state.lock().enabled = true;
    }

    pub fn set_disable(&self) {
        self.state.lock().enabled = false;
    }

    pub fn set_turn_left(&self) {
        self.state.lock().turn_signal = TurnSignal::Left;
    }

    pub fn set_turn_right(&self) {
        self.state.lock().turn_signal = TurnSignal::Right;
    }

    pub fn set_turn_none(&self) {
        self.state.lock().turn_signal = TurnSignal::None;
    }

    pub fn set_horn(&self, on: bool) {
        self.state.lock().horn = on;
    }

    pub fn set_beam(&self, beam: BeamRequest) {
        self.state.lock().beam = beam;
    }

    pub fn turn_signal(&self) -> TurnSignal {
        self.state.lock().turn_signal
    }

    pub fn horn(&self) -> bool {
        self.state.lock().horn
    }

    pub fn beam(&self) -> BeamRequest {
        self.state.lock().beam
    }

    pub fn reset(&self) {
        *self.state.lock() = LightingState::default();
    }
}

impl CommandFrame for LightingCommand {
    fn actuator_id(&self) -> ActuatorId {
        ActuatorId::Lighting
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

// ==================== Registry ====================

/// The five actuator handles owned by the controller, obtained at
/// construction time and registered with the transmit schedule once.
#[derive(Debug)]
pub struct ChassisCommands {
    pub brake: Arc<BrakeCommand>,
    pub throttle: Arc<ThrottleCommand>,
    pub steering: Arc<SteeringCommand>,
    pub gear: Arc<GearCommand>,
    pub lighting: Arc<LightingCommand>,
}

impl ChassisCommands {
    pub fn new() -> Self {
        Self {
            brake: Arc::new(BrakeCommand::default()),
            throttle: Arc::new(ThrottleCommand::default()),
            steering: Arc::new(SteeringCommand::default()),
            gear: Arc::new(GearCommand::default()),
            lighting: Arc::new(LightingCommand::default()),
        }
    }

    /// Reset every command to its disabled/neutral state. Invoked on
    /// emergency demotion and on disarm; idempotent.
    pub fn reset_all(&self) {
        self.brake.reset();
        self.throttle.reset();
        self.steering.reset();
        self.gear.reset();
        self.lighting.reset();
    }
}

impl Default for ChassisCommands {
    fn default() -> Self {
        Self::new()
    }
}
