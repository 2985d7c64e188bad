//! Mode-gated command translation
//!
//! Maps normalized command inputs onto actuator setter calls, gated
//! by the current driving mode. Callers issue commands on a steady
//! cycle regardless of mode, so authorization failure is a logged
//! no-op, never an error: a safety controller's failure mode is
//! "stop commanding", not "reject the caller".

use dbw_chassis::{bounded_value, BeamRequest, GearPosition, TurnSignal};
use tracing::{debug, error};

use crate::controller::ChassisController;

/// Angle rate applied by the angle-only steering form.
const DEFAULT_STEER_ANGLE_RATE: f64 = 200.0;

impl ChassisController {
    /// Request a gear position. Authorized in complete-auto and
    /// speed-only modes. `Invalid` is accepted but logged and mapped
    /// to no gear.
    pub fn set_gear(&self, position: GearPosition) {
        if !self.driving_mode().has_speed_authority() {
            debug!(?position, "current driving mode has no gear authority, ignoring");
            return;
        }
        let gear = &self.core.commands.gear;
        match position {
            GearPosition::Neutral => gear.set_gear_neutral(),
            GearPosition::Reverse => gear.set_gear_reverse(),
            GearPosition::Drive => gear.set_gear_drive(),
            GearPosition::Parking => gear.set_gear_park(),
            GearPosition::Low => gear.set_gear_low(),
            GearPosition::None => gear.set_gear_none(),
            GearPosition::Invalid => {
                error!("invalid gear command, mapping to no gear");
                gear.set_gear_none();
            }
        }
    }

    /// Request brake pedal, percent in [0, 100). Passed through
    /// unclamped; the actuator owns final bounds.
    pub fn set_brake(&self, pedal_percent: f64) {
        if !self.driving_mode().has_speed_authority() {
            debug!("current driving mode has no brake authority, ignoring");
            return;
        }
        self.core.commands.brake.set_pedal(pedal_percent);
    }

    /// Request throttle pedal, percent in [0, 100).
    pub fn set_throttle(&self, pedal_percent: f64) {
        if !self.driving_mode().has_speed_authority() {
            debug!("current driving mode has no throttle authority, ignoring");
            return;
        }
        self.core.commands.throttle.set_pedal(pedal_percent);
    }

    /// Request a steering angle as a percentage of the maximum angle,
    /// [-100, 100]. The angle rate defaults to a fixed constant.
    pub fn set_steering(&self, angle_percent: f64) {
        if !self.driving_mode().has_steer_authority() {
            debug!("current driving mode has no steering authority, ignoring");
            return;
        }
        let angle = self.core.params.max_steer_angle * angle_percent / 100.0;
        self.core
            .commands
            .steering
            .set_steering_angle(angle)
            .set_steering_angle_speed(DEFAULT_STEER_ANGLE_RATE);
    }

    /// Request a steering angle with an explicit angle rate, both as
    /// percentages. The scaled rate is always clamped into the
    /// vehicle's rate envelope, even on caller error.
    pub fn set_steering_with_rate(&self, angle_percent: f64, rate_percent: f64) {
        if !self.driving_mode().has_steer_authority() {
            debug!("current driving mode has no steering authority, ignoring");
            return;
        }
        let params = &self.core.params;
        let angle = params.max_steer_angle * angle_percent / 100.0;
        let rate = bounded_value(
            params.min_steer_angle_rate,
            params.max_steer_angle_rate,
            params.max_steer_angle_rate * rate_percent / 100.0,
        );
        self.core
            .commands
            .steering
            .set_steering_angle(angle)
            .set_steering_angle_speed(rate);
    }

    /// Assert a turn signal. Pass-through, not mode-gated: signals
    /// are not safety-critical to driving authority.
    pub fn set_turn_signal(&self, signal: TurnSignal) {
        let lighting = &self.core.commands.lighting;
        match signal {
            TurnSignal::Left => lighting.set_turn_left(),
            TurnSignal::Right => lighting.set_turn_right(),
            TurnSignal::None => lighting.set_turn_none(),
        }
    }

    /// Set the horn. Pass-through, not mode-gated.
    pub fn set_horn(&self, on: bool) {
        self.core.commands.lighting.set_horn(on);
    }

    /// Set the beam. Pass-through, not mode-gated.
    pub fn set_beam(&self, beam: BeamRequest) {
        self.core.commands.lighting.set_beam(beam);
    }
}
