//! Core chassis enums
//!
//! All enums shared between the two execution contexts are `repr(u8)`
//! so they can live inside atomic cells; `num_enum` provides the
//! byte round-trip.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Current authority level over actuation.
///
/// Exactly one value holds at any instant. The value is owned by the
/// controller's mode state machine and mutated only through its
/// transition operations; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum DrivingMode {
    /// Human has full authority (initial state).
    #[default]
    Manual = 0,
    /// Steering, brake and throttle under autonomous control.
    CompleteAutoDrive = 1,
    /// Only steering under autonomous control.
    AutoSteerOnly = 2,
    /// Only brake/throttle (and gear) under autonomous control.
    AutoSpeedOnly = 3,
    /// Demoted state: all actuators reset, commands ignored until
    /// explicitly disarmed back to [`DrivingMode::Manual`].
    EmergencyMode = 4,
}

impl DrivingMode {
    /// Whether this mode holds steering authority.
    pub fn has_steer_authority(self) -> bool {
        matches!(self, Self::CompleteAutoDrive | Self::AutoSteerOnly)
    }

    /// Whether this mode holds speed (brake/throttle/gear) authority.
    pub fn has_speed_authority(self) -> bool {
        matches!(self, Self::CompleteAutoDrive | Self::AutoSpeedOnly)
    }
}

/// Coarse chassis error classification, published by the health
/// monitor and readable by any context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChassisErrorCode {
    #[default]
    NoError = 0,
    /// A hardware fault bit was observed in the chassis telemetry.
    ChassisError = 1,
    /// Sustained liveness loss; the operator must take over.
    ManualIntervention = 2,
}

/// Requested gear position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum GearPosition {
    Neutral = 0,
    Reverse = 1,
    Drive = 2,
    Parking = 3,
    Low = 4,
    /// No gear commanded / unknown gear reported.
    #[default]
    None = 5,
    /// Caller error; accepted but mapped to a safe default.
    Invalid = 6,
}

/// Turn-signal request. Exactly one of the three values is asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TurnSignal {
    #[default]
    None = 0,
    Left = 1,
    Right = 2,
}

/// Headlamp beam request (pass-through, not safety-gated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BeamRequest {
    #[default]
    Off = 0,
    Low = 1,
    High = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driving_mode_byte_round_trip() {
        for mode in [
            DrivingMode::Manual,
            DrivingMode::CompleteAutoDrive,
            DrivingMode::AutoSteerOnly,
            DrivingMode::AutoSpeedOnly,
            DrivingMode::EmergencyMode,
        ] {
            let byte: u8 = mode.into();
            assert_eq!(DrivingMode::try_from(byte).unwrap(), mode);
        }
        assert!(DrivingMode::try_from(250u8).is_err());
    }

    #[test]
    fn authority_split() {
        assert!(DrivingMode::CompleteAutoDrive.has_steer_authority());
        assert!(DrivingMode::CompleteAutoDrive.has_speed_authority());
        assert!(DrivingMode::AutoSteerOnly.has_steer_authority());
        assert!(!DrivingMode::AutoSteerOnly.has_speed_authority());
        assert!(!DrivingMode::AutoSpeedOnly.has_steer_authority());
        assert!(DrivingMode::AutoSpeedOnly.has_speed_authority());
        assert!(!DrivingMode::Manual.has_steer_authority());
        assert!(!DrivingMode::EmergencyMode.has_speed_authority());
    }

    #[test]
    fn defaults_are_safe() {
        assert_eq!(DrivingMode::default(), DrivingMode::Manual);
        assert_eq!(ChassisErrorCode::default(), ChassisErrorCode::NoError);
        assert_eq!(GearPosition::default(), GearPosition::None);
        assert_eq!(TurnSignal::default(), TurnSignal::None);
    }
}
