//! Emergency-demotion walkthrough against the in-memory bus.
//!
//! Arms full autonomous control, injects a steering watchdog fault
//! into the chassis telemetry, and watches the health monitor demote
//! the vehicle to emergency mode.
//!
//! ```bash
//! cargo run --example demote_on_fault
//! ```

use std::sync::Arc;
use std::time::Duration;

use dbw_chassis::{DrivingMode, VehicleParams};
use dbw_controller::mock::{healthy_snapshot, MockTransmitter, ScriptedReader};
use dbw_controller::ChassisController;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));

    let mut controller =
        ChassisController::new(VehicleParams::default(), transmitter.clone(), reader.clone())
            .expect("controller init failed");
    controller.start().expect("monitor start failed");

    controller.enable_auto_mode().expect("auto mode rejected");
    controller.set_throttle(12.0);
    controller.set_steering(25.0);
    println!("armed: mode = {:?}", controller.driving_mode());

    // the steering unit develops a watchdog fault
    let mut faulty = healthy_snapshot();
    faulty.steering.as_mut().unwrap().watchdog_fault = true;
    reader.set_fallback(Ok(faulty));

    while controller.driving_mode() != DrivingMode::EmergencyMode {
        std::thread::sleep(Duration::from_millis(10));
    }
    let report = controller.chassis_report();
    println!(
        "demoted: mode = {:?}, error = {:?}, mask = {:#x}",
        report.driving_mode, report.error_code, report.error_mask
    );

    controller.disable_auto_mode();
    println!("disarmed: mode = {:?}", controller.driving_mode());

    transmitter.set_running(false);
    controller.stop();
}
