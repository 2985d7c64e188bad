//! Chassis fault aggregation
//!
//! Derives the fixed-layout 15-bit error mask and the aggregate
//! "fault present" boolean from a chassis snapshot. The mask is
//! produced fresh per scan; the monitor overwrites the shared mask
//! with it and never ORs scans together.
//!
//! Section-absence policy (kept asymmetric on purpose, it is
//! observable safety behavior): a missing steering, brake or drive
//! section aborts the scan with "no determination" (`None`), while a
//! missing gear section only skips the gear bit.

use dbw_chassis::ChassisSnapshot;
use tracing::{debug, error, warn};

/// Bit positions of the error mask, in fixed order.
pub mod mask_bit {
    pub const STEERING_WATCHDOG: u32 = 1 << 0;
    pub const STEERING_CHANNEL_1: u32 = 1 << 1;
    pub const STEERING_CHANNEL_2: u32 = 1 << 2;
    pub const STEERING_CALIBRATION: u32 = 1 << 3;
    pub const STEERING_CONNECTOR: u32 = 1 << 4;
    pub const BRAKE_WATCHDOG: u32 = 1 << 5;
    pub const BRAKE_CHANNEL_1: u32 = 1 << 6;
    pub const BRAKE_CHANNEL_2: u32 = 1 << 7;
    pub const BRAKE_BOO: u32 = 1 << 8;
    pub const BRAKE_CONNECTOR: u32 = 1 << 9;
    pub const DRIVE_WATCHDOG: u32 = 1 << 10;
    pub const DRIVE_CHANNEL_1: u32 = 1 << 11;
    pub const DRIVE_CHANNEL_2: u32 = 1 << 12;
    pub const DRIVE_CONNECTOR: u32 = 1 << 13;
    pub const GEAR_CANBUS: u32 = 1 << 14;
}

/// Result of one complete fault scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultScan {
    /// Fresh 15-bit fault mask, see [`mask_bit`].
    pub mask: u32,
    /// True iff any steering, brake or drive bit is set. A lone gear
    /// bit is recorded in the mask but does not flip this.
    pub fault_present: bool,
}

/// Assigns consecutive bits in declaration order.
#[derive(Default)]
struct MaskBuilder {
    mask: u32,
    next_bit: u32,
}

impl MaskBuilder {
    /// Consume the next bit position; set it if `flag` is true.
    /// Returns `flag` so group aggregates can be OR-ed inline.
    fn push(&mut self, flag: bool) -> bool {
        if flag {
            self.mask |= 1 << self.next_bit;
        }
        self.next_bit += 1;
        flag
    }
}

/// Scan one snapshot for hardware fault bits.
///
/// Returns `None` when a required section (steering, brake, drive) is
/// absent: the aggregator cannot make a determination, the condition
/// is logged, and the caller must leave the shared mask untouched for
/// this cycle.
pub fn scan_faults(snapshot: &ChassisSnapshot) -> Option<FaultScan> {
    let Some(steering) = &snapshot.steering else {
        error!("chassis snapshot carries no steering section, skipping fault scan");
        return None;
    };
    let Some(brake) = &snapshot.brake else {
        error!("chassis snapshot carries no brake section, skipping fault scan");
        return None;
    };
    let Some(drive) = &snapshot.drive else {
        error!("chassis snapshot carries no drive section, skipping fault scan");
        return None;
    };

    let mut bits = MaskBuilder::default();

    let mut steering_fault = false;
    steering_fault |= bits.push(steering.watchdog_fault);
    steering_fault |= bits.push(steering.channel_1_fault);
    steering_fault |= bits.push(steering.channel_2_fault);
    steering_fault |= bits.push(steering.calibration_fault);
    steering_fault |= bits.push(steering.connector_fault);

    let mut brake_fault = false;
    brake_fault |= bits.push(brake.watchdog_fault);
    brake_fault |= bits.push(brake.channel_1_fault);
    brake_fault |= bits.push(brake.channel_2_fault);
    brake_fault |= bits.push(brake.boo_fault);
    brake_fault |= bits.push(brake.connector_fault);

    let mut drive_fault = false;
    drive_fault |= bits.push(drive.watchdog_fault);
    drive_fault |= bits.push(drive.channel_1_fault);
    drive_fault |= bits.push(drive.channel_2_fault);
    drive_fault |= bits.push(drive.connector_fault);

    let mut gear_fault = false;
    match &snapshot.gear {
        Some(gear) => {
            gear_fault = bits.push(gear.canbus_fault);
        }
        None => {
            // Missing telemetry is not escalated; only the gear bit
            // is skipped this cycle.
            debug!("chassis snapshot carries no gear section, gear bit skipped");
        }
    }

    if steering_fault {
        warn!(
            watchdog = steering.watchdog_fault,
            channel_1 = steering.channel_1_fault,
            channel_2 = steering.channel_2_fault,
            calibration = steering.calibration_fault,
            connector = steering.connector_fault,
            "steering fault detected"
        );
    }
    if brake_fault {
        warn!(
            watchdog = brake.watchdog_fault,
            channel_1 = brake.channel_1_fault,
            channel_2 = brake.channel_2_fault,
            boo = brake.boo_fault,
            connector = brake.connector_fault,
            "brake fault detected"
        );
    }
    if drive_fault {
        warn!(
            watchdog = drive.watchdog_fault,
            channel_1 = drive.channel_1_fault,
            channel_2 = drive.channel_2_fault,
            connector = drive.connector_fault,
            "drive fault detected"
        );
    }
    if gear_fault {
        warn!("gear canbus fault detected");
    }

    Some(FaultScan {
        mask: bits.mask,
        fault_present: steering_fault || brake_fault || drive_fault,
    })
}
