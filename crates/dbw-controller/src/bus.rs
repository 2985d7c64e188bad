//! Bus collaborator traits
//!
//! The control core never touches the wire. It talks to two external
//! collaborators through these traits:
//!
//! - [`BusTransmitter`]: owns the periodic transmit schedule. The
//!   controller registers its actuator frames once at init and later
//!   only toggles their enabled state (through the handles) and
//!   triggers immediate flushes.
//! - [`ChassisStateReader`]: decodes received bus traffic into the
//!   most recent [`ChassisSnapshot`].

use std::sync::Arc;

use dbw_chassis::ChassisSnapshot;

use crate::actuator::{ActuatorId, CommandFrame};
use crate::error::{RegisterError, SnapshotError};

/// Periodic transmit scheduler at the wire level.
pub trait BusTransmitter: Send + Sync {
    /// Add a command frame to the periodic schedule.
    ///
    /// Called once per actuator during controller init; a failure is
    /// fatal to initialization.
    fn register(
        &self,
        id: ActuatorId,
        frame: Arc<dyn CommandFrame>,
        initially_enabled: bool,
    ) -> Result<(), RegisterError>;

    /// Flush the current command state immediately instead of waiting
    /// for the next scheduled tick.
    fn force_update(&self);

    /// Whether the transmit schedule is actively running. The health
    /// monitor waits on this at startup and exits when it turns
    /// false.
    fn is_running(&self) -> bool;
}

/// Structured view over the latest received bus traffic.
pub trait ChassisStateReader: Send + Sync {
    /// Decode the most recent traffic into a snapshot.
    ///
    /// An error means no decodable frames are available yet; liveness
    /// checks must treat that as a failed check, never as a crash.
    fn read_snapshot(&self) -> Result<ChassisSnapshot, SnapshotError>;
}
