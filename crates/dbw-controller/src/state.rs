//! Shared state cells
//!
//! The caller context and the health-monitor thread share three
//! scalars: the driving mode, the coarse error code, and the fault
//! mask. Each lives in its own atomic cell; there is deliberately no
//! single lock covering all three, so command issuance never contends
//! with health polling.
//!
//! The enum cells store the `repr(u8)` discriminant in an `AtomicU8`
//! and round-trip through the enum's byte conversion.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use dbw_chassis::{ChassisErrorCode, DrivingMode};

/// Driving mode in an atomic cell, shareable across threads.
#[derive(Debug)]
pub struct AtomicDrivingMode {
    inner: AtomicU8,
}

impl AtomicDrivingMode {
    pub fn new(mode: DrivingMode) -> Self {
        Self {
            inner: AtomicU8::new(mode.into()),
        }
    }

    pub fn load(&self) -> DrivingMode {
        // Only `store` writes this cell, so the byte is always a
        // valid discriminant; fall back to Manual regardless.
        DrivingMode::try_from(self.inner.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn store(&self, mode: DrivingMode) {
        self.inner.store(mode.into(), Ordering::Release);
    }
}

/// Chassis error code in an atomic cell.
#[derive(Debug)]
pub struct AtomicErrorCode {
    inner: AtomicU8,
}

impl AtomicErrorCode {
    pub fn new(code: ChassisErrorCode) -> Self {
        Self {
            inner: AtomicU8::new(code.into()),
        }
    }

    pub fn load(&self) -> ChassisErrorCode {
        ChassisErrorCode::try_from(self.inner.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn store(&self, code: ChassisErrorCode) {
        self.inner.store(code.into(), Ordering::Release);
    }
}

/// The three cells shared between the caller context and the monitor.
#[derive(Debug)]
pub struct SharedChassisState {
    mode: AtomicDrivingMode,
    error_code: AtomicErrorCode,
    error_mask: AtomicU32,
}

impl SharedChassisState {
    pub fn new(initial_mode: DrivingMode) -> Self {
        Self {
            mode: AtomicDrivingMode::new(initial_mode),
            error_code: AtomicErrorCode::new(ChassisErrorCode::NoError),
            error_mask: AtomicU32::new(0),
        }
    }

    pub fn driving_mode(&self) -> DrivingMode {
        self.mode.load()
    }

    pub fn set_driving_mode(&self, mode: DrivingMode) {
        self.mode.store(mode);
    }

    pub fn error_code(&self) -> ChassisErrorCode {
        self.error_code.load()
    }

    pub fn set_error_code(&self, code: ChassisErrorCode) {
        self.error_code.store(code);
    }

    pub fn error_mask(&self) -> u32 {
        self.error_mask.load(Ordering::Acquire)
    }

    /// Overwrite the fault mask with a fresh scan result. The mask is
    /// never OR-ed with history.
    pub fn set_error_mask(&self, mask: u32) {
        self.error_mask.store(mask, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_driving_mode_round_trip() {
        let cell = AtomicDrivingMode::new(DrivingMode::Manual);
        assert_eq!(cell.load(), DrivingMode::Manual);
        cell.store(DrivingMode::EmergencyMode);
        assert_eq!(cell.load(), DrivingMode::EmergencyMode);
    }

    #[test]
    fn shared_state_starts_clean() {
        let state = SharedChassisState::new(DrivingMode::Manual);
        assert_eq!(state.driving_mode(), DrivingMode::Manual);
        assert_eq!(state.error_code(), ChassisErrorCode::NoError);
        assert_eq!(state.error_mask(), 0);
    }

    #[test]
    fn mask_is_overwritten_not_accumulated() {
        let state = SharedChassisState::new(DrivingMode::Manual);
        state.set_error_mask(0b101);
        state.set_error_mask(0b010);
        assert_eq!(state.error_mask(), 0b010);
    }

    #[test]
    fn cells_are_shareable_across_threads() {
        use std::sync::Arc;

        let state = Arc::new(SharedChassisState::new(DrivingMode::Manual));
        let writer = {
            let state = state.clone();
            std::thread::spawn(move || {
                state.set_driving_mode(DrivingMode::CompleteAutoDrive);
                state.set_error_code(ChassisErrorCode::ChassisError);
            })
        };
        writer.join().unwrap();
        assert_eq!(state.driving_mode(), DrivingMode::CompleteAutoDrive);
        assert_eq!(state.error_code(), ChassisErrorCode::ChassisError);
    }
}
