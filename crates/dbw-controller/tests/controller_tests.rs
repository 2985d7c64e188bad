//! End-to-end controller tests against the in-memory collaborators.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dbw_chassis::{
    ChassisErrorCode, DrivingMode, GearPosition, LightStatus, MotionStatus, TurnSignal,
    VehicleParams,
};
use dbw_controller::mock::{healthy_snapshot, offline_snapshot, MockTransmitter, ScriptedReader};
use dbw_controller::{ActuatorId, ChassisController, CommandFrame, ControllerError};

fn new_controller(
    transmitter: Arc<MockTransmitter>,
    reader: Arc<ScriptedReader>,
) -> ChassisController {
    ChassisController::new(VehicleParams::default(), transmitter, reader)
        .expect("controller init failed")
}

#[test]
fn init_registers_all_five_actuator_frames() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let _controller = new_controller(transmitter.clone(), reader);

    let ids = transmitter.registered_ids();
    for id in [
        ActuatorId::Brake,
        ActuatorId::Throttle,
        ActuatorId::Steering,
        ActuatorId::Gear,
        ActuatorId::Lighting,
    ] {
        assert!(ids.contains(&id), "missing registration for {id:?}");
    }
}

#[test]
fn init_requires_an_initial_driving_mode() {
    let params = VehicleParams {
        initial_driving_mode: None,
        ..Default::default()
    };
    let result = ChassisController::new(
        params,
        Arc::new(MockTransmitter::new()),
        Arc::new(ScriptedReader::failing()),
    );
    assert!(matches!(
        result,
        Err(ControllerError::MissingDrivingModeConfig)
    ));
}

#[test]
fn init_surfaces_registration_failure() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let _first = new_controller(transmitter.clone(), reader.clone());

    // the schedule already carries this vehicle's frames
    let second = ChassisController::new(VehicleParams::default(), transmitter, reader);
    assert!(matches!(second, Err(ControllerError::Register(_))));
}

#[test]
fn commands_without_authority_leave_actuators_unchanged() {
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);

    for mode_setup in [
        None,                                  // Manual (initial)
        Some(DrivingMode::AutoSteerOnly),      // no speed authority
    ] {
        if let Some(DrivingMode::AutoSteerOnly) = mode_setup {
            controller.disable_auto_mode();
            controller.enable_steering_only_mode().unwrap();
        }
        let before_gear = controller.commands().gear.position();
        let before_brake = controller.commands().brake.pedal();
        let before_throttle = controller.commands().throttle.pedal();

        controller.set_gear(GearPosition::Drive);
        controller.set_brake(55.0);
        controller.set_throttle(33.0);

        assert_eq!(controller.commands().gear.position(), before_gear);
        assert_eq!(controller.commands().brake.pedal(), before_brake);
        assert_eq!(controller.commands().throttle.pedal(), before_throttle);
    }
}

#[test]
fn steering_without_authority_is_ignored() {
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);
    controller.enable_speed_only_mode().unwrap();

    controller.set_steering(80.0);
    controller.set_steering_with_rate(80.0, 50.0);
    assert_eq!(controller.commands().steering.angle(), 0.0);
}

#[test]
fn enable_auto_mode_with_dead_bus_demotes_to_emergency() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::failing());
    let controller = new_controller(transmitter.clone(), reader);

    let result = controller.enable_auto_mode();
    assert!(matches!(
        result,
        Err(ControllerError::ModeSwitchFailed {
            target: DrivingMode::CompleteAutoDrive
        })
    ));
    assert_eq!(controller.driving_mode(), DrivingMode::EmergencyMode);
    assert_eq!(
        controller.chassis_error_code(),
        ChassisErrorCode::ChassisError
    );
    // the actuator reset ran: everything back to disabled/neutral
    assert!(!controller.commands().brake.is_enabled());
    assert!(!controller.commands().throttle.is_enabled());
    assert!(!controller.commands().steering.is_enabled());
    // the enable attempt was flushed before the check
    assert_eq!(transmitter.update_count(), 1);
}

#[test]
fn enable_auto_mode_exhausts_retries_against_offline_units() {
    let reader = Arc::new(ScriptedReader::always(offline_snapshot()));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);

    let start = Instant::now();
    assert!(controller.enable_auto_mode().is_err());
    // 20 attempts, each followed by a 20 ms delay
    assert!(start.elapsed() >= Duration::from_millis(400));
    assert_eq!(controller.driving_mode(), DrivingMode::EmergencyMode);
}

#[test]
fn mode_upgrades_succeed_against_live_units() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(transmitter.clone(), reader);

    controller.enable_auto_mode().unwrap();
    assert_eq!(controller.driving_mode(), DrivingMode::CompleteAutoDrive);
    assert!(controller.commands().brake.is_enabled());
    assert!(controller.commands().throttle.is_enabled());
    assert!(controller.commands().steering.is_enabled());

    // repeated call is a no-op success, no extra flush
    let updates = transmitter.update_count();
    controller.enable_auto_mode().unwrap();
    assert_eq!(transmitter.update_count(), updates);
}

#[test]
fn steering_only_normalizes_from_complete_auto_drive() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(transmitter.clone(), reader);

    controller.enable_auto_mode().unwrap();
    let updates = transmitter.update_count();

    controller.enable_steering_only_mode().unwrap();
    assert_eq!(controller.driving_mode(), DrivingMode::AutoSteerOnly);
    // normalization path performs no flush and no liveness check
    assert_eq!(transmitter.update_count(), updates);
}

#[test]
fn speed_only_mode_disables_steering_actuator() {
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);

    controller.enable_speed_only_mode().unwrap();
    assert_eq!(controller.driving_mode(), DrivingMode::AutoSpeedOnly);
    assert!(controller.commands().brake.is_enabled());
    assert!(controller.commands().throttle.is_enabled());
    assert!(!controller.commands().steering.is_enabled());

    controller.set_gear(GearPosition::Drive);
    controller.set_throttle(25.0);
    assert_eq!(controller.commands().gear.position(), GearPosition::Drive);
    assert_eq!(controller.commands().throttle.pedal(), 25.0);
}

#[test]
fn disable_auto_mode_is_idempotent_from_any_mode() {
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);

    // from emergency mode
    controller.emergency();
    assert_eq!(controller.driving_mode(), DrivingMode::EmergencyMode);
    for _ in 0..3 {
        controller.disable_auto_mode();
        assert_eq!(controller.driving_mode(), DrivingMode::Manual);
        assert_eq!(controller.chassis_error_code(), ChassisErrorCode::NoError);
    }

    // from an autonomous mode
    controller.enable_auto_mode().unwrap();
    controller.disable_auto_mode();
    assert_eq!(controller.driving_mode(), DrivingMode::Manual);
    assert_eq!(controller.chassis_error_code(), ChassisErrorCode::NoError);
}

#[test]
fn steering_scaling_matches_vehicle_envelope() {
    // max_angle = 470, 50% -> 235.0; rate 150% of max 400 caps at 400
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);
    controller.enable_auto_mode().unwrap();

    controller.set_steering(50.0);
    assert_eq!(controller.commands().steering.angle(), 235.0);

    controller.set_steering_with_rate(50.0, 150.0);
    assert_eq!(controller.commands().steering.angle(), 235.0);
    assert_eq!(controller.commands().steering.angle_rate(), 400.0);
}

#[test]
fn chassis_report_defaults_when_bus_is_silent() {
    let reader = Arc::new(ScriptedReader::failing());
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);

    let report = controller.chassis_report();
    assert_eq!(report.driving_mode, DrivingMode::Manual);
    assert_eq!(report.error_code, ChassisErrorCode::NoError);
    assert_eq!(report.speed_mps, 0.0);
    assert_eq!(report.throttle_percentage, 0.0);
    assert_eq!(report.gear_location, GearPosition::None);
    assert_eq!(report.turn_signal, TurnSignal::None);
    assert!(!report.horn_on);
    assert!(report.engine_started);
}

#[test]
fn chassis_report_carries_snapshot_telemetry() {
    let mut snapshot = healthy_snapshot();
    snapshot.steering.as_mut().unwrap().angle = Some(235.0);
    snapshot.steering.as_mut().unwrap().torque_nm = Some(1.5);
    snapshot.drive.as_mut().unwrap().throttle_output = Some(18.0);
    snapshot.drive.as_mut().unwrap().engine_rpm = Some(900.0);
    snapshot.brake.as_mut().unwrap().output = Some(5.0);
    snapshot.gear.as_mut().unwrap().state = Some(GearPosition::Drive);
    snapshot.motion = Some(MotionStatus {
        speed_mps: Some(7.2),
        parking_brake_on: Some(false),
    });
    snapshot.light = Some(LightStatus {
        turn_signal: Some(TurnSignal::Left),
        horn_on: Some(true),
    });
    let reader = Arc::new(ScriptedReader::always(snapshot));
    let controller = new_controller(Arc::new(MockTransmitter::new()), reader);

    let report = controller.chassis_report();
    // steering percentage normalized against max_steer_angle = 470
    assert_eq!(report.steering_percentage, 50.0);
    assert_eq!(report.steering_torque_nm, 1.5);
    assert_eq!(report.throttle_percentage, 18.0);
    assert_eq!(report.engine_rpm, 900.0);
    assert_eq!(report.brake_percentage, 5.0);
    assert_eq!(report.gear_location, GearPosition::Drive);
    assert_eq!(report.speed_mps, 7.2);
    assert_eq!(report.turn_signal, TurnSignal::Left);
    assert!(report.horn_on);
}

#[test]
fn monitor_demotes_after_sustained_liveness_loss() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let mut controller = new_controller(transmitter.clone(), reader.clone());

    controller.start().unwrap();
    assert!(matches!(
        controller.start(),
        Err(ControllerError::AlreadyStarted)
    ));

    controller.enable_steering_only_mode().unwrap();

    // the steering unit goes silent; 10 consecutive 50 ms cycles must
    // elapse before demotion
    reader.set_fallback(Ok(offline_snapshot()));
    let deadline = Instant::now() + Duration::from_secs(3);
    while controller.driving_mode() != DrivingMode::EmergencyMode && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }

    assert_eq!(controller.driving_mode(), DrivingMode::EmergencyMode);
    assert_eq!(
        controller.chassis_error_code(),
        ChassisErrorCode::ManualIntervention
    );
    assert!(!controller.commands().steering.is_enabled());

    // shutdown is cooperative through the transmitter's running flag
    transmitter.set_running(false);
    controller.stop();
}

#[test]
fn monitor_exits_when_transmitter_stops() {
    let transmitter = Arc::new(MockTransmitter::new());
    let reader = Arc::new(ScriptedReader::always(healthy_snapshot()));
    let mut controller = new_controller(transmitter.clone(), reader);

    controller.start().unwrap();
    std::thread::sleep(Duration::from_millis(120));
    transmitter.set_running(false);

    let start = Instant::now();
    controller.stop();
    assert!(start.elapsed() < Duration::from_secs(1));
    // a healthy run leaves mode and error untouched
    assert_eq!(controller.driving_mode(), DrivingMode::Manual);
    assert_eq!(controller.chassis_error_code(), ChassisErrorCode::NoError);
}
