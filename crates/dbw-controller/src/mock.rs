//! In-memory collaborators
//!
//! Deterministic stand-ins for the bus transmitter and chassis
//! reader, used by the test suites and the examples, and usable for
//! host-side simulation of the actuation layer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use dbw_chassis::{
    BrakeStatus, ChassisSnapshot, DriveStatus, GearStatus, LivenessStatus, SteeringStatus,
};
use parking_lot::Mutex;

use crate::actuator::{ActuatorId, CommandFrame};
use crate::bus::{BusTransmitter, ChassisStateReader};
use crate::error::{RegisterError, SnapshotError};

/// A snapshot with all fault-relevant sections present, all units
/// online, and no fault bits set.
pub fn healthy_snapshot() -> ChassisSnapshot {
    ChassisSnapshot {
        steering: Some(SteeringStatus::default()),
        brake: Some(BrakeStatus::default()),
        drive: Some(DriveStatus::default()),
        gear: Some(GearStatus::default()),
        liveness: Some(LivenessStatus {
            steering_online: Some(true),
            drive_online: Some(true),
            brake_online: Some(true),
        }),
        ..Default::default()
    }
}

/// A healthy snapshot whose units do not report themselves online.
pub fn offline_snapshot() -> ChassisSnapshot {
    ChassisSnapshot {
        liveness: None,
        ..healthy_snapshot()
    }
}

/// Transmit schedule double: records registrations and flushes,
/// exposes a switchable running flag.
pub struct MockTransmitter {
    running: AtomicBool,
    registered: Mutex<Vec<(ActuatorId, Arc<dyn CommandFrame>, bool)>>,
    updates: AtomicUsize,
}

impl MockTransmitter {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            registered: Mutex::new(Vec::new()),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn stopped() -> Self {
        let transmitter = Self::new();
        transmitter.set_running(false);
        transmitter
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Number of `force_update` flushes observed.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::Acquire)
    }

    pub fn registered_ids(&self) -> Vec<ActuatorId> {
        self.registered.lock().iter().map(|(id, _, _)| *id).collect()
    }
}

impl Default for MockTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl BusTransmitter for MockTransmitter {
    fn register(
        &self,
        id: ActuatorId,
        frame: Arc<dyn CommandFrame>,
        initially_enabled: bool,
    ) -> Result<(), RegisterError> {
        let mut registered = self.registered.lock();
        if registered.iter().any(|(existing, _, _)| *existing == id) {
            return Err(RegisterError::Duplicate(id));
        }
        registered.push((id, frame, initially_enabled));
        Ok(())
    }

    fn force_update(&self) {
        self.updates.fetch_add(1, Ordering::AcqRel);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Reader double that serves scripted responses in order, then a
/// fallback forever.
pub struct ScriptedReader {
    queue: Mutex<VecDeque<Result<ChassisSnapshot, SnapshotError>>>,
    fallback: Mutex<Result<ChassisSnapshot, SnapshotError>>,
}

impl ScriptedReader {
    /// Serve `snapshot` on every read.
    pub fn always(snapshot: ChassisSnapshot) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Ok(snapshot)),
        }
    }

    /// Report "no decodable frames" on every read.
    pub fn failing() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Err(SnapshotError::NoFrames)),
        }
    }

    /// Enqueue one scripted response, served before the fallback.
    pub fn push(&self, response: Result<ChassisSnapshot, SnapshotError>) {
        self.queue.lock().push_back(response);
    }

    /// Replace the fallback served once the queue is drained.
    pub fn set_fallback(&self, response: Result<ChassisSnapshot, SnapshotError>) {
        *self.fallback.lock() = response;
    }
}

impl ChassisStateReader for ScriptedReader {
    fn read_snapshot(&self) -> Result<ChassisSnapshot, SnapshotError> {
        if let Some(response) = self.queue.lock().pop_front() {
            return response;
        }
        self.fallback.lock().clone()
    }
}
