//! Background health monitor
//!
//! A periodic loop, independent of command issuance, that verifies
//! the actuation hardware is still responding while an autonomous
//! mode holds authority, and triggers emergency demotion when it is
//! not.
//!
//! # Cycle ordering
//!
//! Within one cycle the sequence is strict: steering check, then
//! speed check, then fault aggregation, then the demotion decision.
//! Failure counters reset on any successful check, so demotion
//! requires *consecutive* failures (10 cycles at 50 ms, roughly half
//! a second of sustained unresponsiveness).
//!
//! # Lifecycle
//!
//! The loop waits for the transmitter to report it is running, then
//! cycles until that flag turns false. That flag is the sole exit
//! condition; there is no mid-cycle cancellation.

use std::time::{Duration, Instant};

use dbw_chassis::ChassisErrorCode;
use tracing::{info, trace, warn};

use crate::controller::{ControllerCore, DemotionCause};
use crate::fault::scan_faults;

/// Target period of the monitor loop.
pub const MONITOR_PERIOD: Duration = Duration::from_millis(50);

/// Consecutive failed cycles before a unit is declared unresponsive.
pub const MAX_FAIL_ATTEMPTS: u32 = 10;

/// Attempts for the blocking liveness check (mode-upgrade path).
pub(crate) const CHECK_RESPONSE_RETRIES: u32 = 20;

/// Delay between blocking liveness attempts.
pub(crate) const CHECK_RESPONSE_RETRY_DELAY: Duration = Duration::from_millis(20);

/// Which actuation units a liveness check must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseUnits {
    pub steer: bool,
    pub speed: bool,
}

impl ResponseUnits {
    /// Steering unit only.
    pub const STEER: Self = Self {
        steer: true,
        speed: false,
    };
    /// Drive and braking units.
    pub const SPEED: Self = Self {
        steer: false,
        speed: true,
    };
    /// All units.
    pub const ALL: Self = Self {
        steer: true,
        speed: true,
    };
}

/// Consecutive-failure counters, local to the monitor loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FailureCounters {
    pub(crate) steer: u32,
    pub(crate) speed: u32,
}

impl ControllerCore {
    /// Query whether the required units report themselves operable.
    ///
    /// Non-blocking form returns the single-shot result. The blocking
    /// form retries for up to ~400 ms; mode upgrades tolerate a
    /// bounded startup delay for hardware to report ready, while the
    /// monitor must never block its own cadence.
    ///
    /// A snapshot read failure ("no decodable frames yet") is a
    /// failed check in either form.
    pub(crate) fn check_response(&self, units: ResponseUnits, blocking: bool) -> bool {
        let mut retries = CHECK_RESPONSE_RETRIES;
        let mut steer_online = false;
        let mut speed_online = false;

        loop {
            match self.reader.read_snapshot() {
                Ok(snapshot) => {
                    steer_online = snapshot.steering_unit_online();
                    speed_online = snapshot.speed_units_online();
                    let mut ok = true;
                    if units.steer {
                        ok = ok && steer_online;
                    }
                    if units.speed {
                        ok = ok && speed_online;
                    }
                    if ok {
                        return true;
                    }
                    trace!("liveness check not satisfied yet");
                }
                Err(err) => {
                    warn!(%err, "chassis snapshot unavailable, liveness check failed");
                    return false;
                }
            }

            if !blocking {
                break;
            }
            retries -= 1;
            spin_sleep::sleep(CHECK_RESPONSE_RETRY_DELAY);
            if retries == 0 {
                break;
            }
        }

        warn!(
            steer_online,
            speed_online,
            ?units,
            "liveness check failed"
        );
        false
    }

    /// One monitor cycle: strict steering check, speed check, fault
    /// aggregation, demotion decision. Factored out of the loop so
    /// tests can drive cycles deterministically.
    pub(crate) fn monitor_cycle(&self, counters: &mut FailureCounters) {
        let mode = self.driving_mode();
        let mut demotion: Option<DemotionCause> = None;

        // 1. steering control check
        if mode.has_steer_authority() && !self.check_response(ResponseUnits::STEER, false) {
            counters.steer += 1;
            if counters.steer >= MAX_FAIL_ATTEMPTS {
                self.state
                    .set_error_code(ChassisErrorCode::ManualIntervention);
                demotion = Some(DemotionCause::ManualIntervention);
            }
        } else {
            counters.steer = 0;
        }

        // 2. speed control check
        if mode.has_speed_authority() && !self.check_response(ResponseUnits::SPEED, false) {
            counters.speed += 1;
            if counters.speed >= MAX_FAIL_ATTEMPTS {
                self.state
                    .set_error_code(ChassisErrorCode::ManualIntervention);
                demotion = Some(DemotionCause::ManualIntervention);
            }
        } else {
            counters.speed = 0;
        }

        // 3. fault aggregation; a short-circuited scan leaves the
        // shared mask untouched for this cycle
        if let Ok(snapshot) = self.reader.read_snapshot() {
            if let Some(scan) = scan_faults(&snapshot) {
                self.state.set_error_mask(scan.mask);
                if scan.fault_present {
                    self.state.set_error_code(ChassisErrorCode::ChassisError);
                    demotion = Some(DemotionCause::Fault);
                }
            }
        }

        // 4. demotion decision
        if let Some(cause) = demotion {
            if mode != dbw_chassis::DrivingMode::EmergencyMode {
                self.demote(cause);
            }
        }
    }

    /// The monitor loop body, run on the dedicated thread.
    pub(crate) fn monitor_loop(&self) {
        // Startup dependency: the transmit schedule comes up first.
        // Expected to resolve quickly; cooperative yield, no timeout.
        while !self.transmitter.is_running() {
            std::thread::yield_now();
        }
        info!("health monitor running");

        let mut counters = FailureCounters::default();
        let mut cycle_start = Instant::now();

        while self.transmitter.is_running() {
            self.monitor_cycle(&mut counters);

            let elapsed = cycle_start.elapsed();
            if elapsed < MONITOR_PERIOD {
                spin_sleep::sleep(MONITOR_PERIOD - elapsed);
                cycle_start += MONITOR_PERIOD;
            } else {
                // Overran the period: proceed immediately, no
                // catch-up sleep beyond the next boundary.
                warn!(elapsed_us = elapsed.as_micros() as u64, "monitor cycle overran its period");
                cycle_start = Instant::now();
            }
        }
        info!("health monitor exited (transmitter stopped)");
    }
}
