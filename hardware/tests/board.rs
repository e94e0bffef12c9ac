//! tests against a real board plugged on a serial port, run them with `cargo test -- --ignored`
//!
//! the port is discovered unless `MICROFPGA_PORT` is set

use std::{thread::sleep, time::Duration};
use serial_test::serial;

use microfpga::{
    Controller, Allocation, TriggerMode, LaserParameters, CameraParameters,
    serial::SerialTransport,
    };


fn connect(allocation: Allocation) -> Controller<SerialTransport> {
    let _ = env_logger::builder().is_test(true).try_init();
    let transport = match std::env::var("MICROFPGA_PORT") {
        Ok(path) => SerialTransport::new(path),
        Err(_) => SerialTransport::discover(),
    };
    Controller::new(transport, &allocation).expect("failed to connect to board")
}


#[test]
#[ignore]
#[serial]
fn identification() {
    let mut controller = connect(Allocation::default());
    println!("connected to {} board, firmware {}", controller.device_label(), controller.version());
    assert!(controller.is_connected());
    controller.disconnect().unwrap();
    assert!(!controller.is_connected());
}

#[test]
#[ignore]
#[serial]
fn digital_outputs_blink() {
    let mut controller = connect(Allocation {digital_outputs: 4, .. Default::default()});
    for channel in 0 .. controller.digital_outputs() {
        for state in [true, false] {
            controller.set_digital_output(channel, state).unwrap();
            assert_eq!(controller.digital_output(channel).unwrap(), state);
            sleep(Duration::from_millis(50));
        }
    }
}

#[test]
#[ignore]
#[serial]
fn pwm_and_servo() {
    let mut controller = connect(Allocation {pwms: 1, servos: 1, .. Default::default()});
    controller.set_pwm(0, 128).unwrap();
    assert_eq!(controller.pwm(0).unwrap(), 128);
    controller.set_servo(0, 32_768).unwrap();
    assert_eq!(controller.servo(0).unwrap(), 32_768);
    controller.set_pwm(0, 0).unwrap();
}

#[test]
#[ignore]
#[serial]
fn lasers_follow_camera() {
    let mut controller = connect(Allocation {lasers: 2, camera: true, .. Default::default()});
    let parameters = LaserParameters::new(TriggerMode::Rising, 2000, "1010101010101010").unwrap();
    for channel in 0 .. controller.lasers() {
        controller.set_laser_parameters(channel, &parameters).unwrap();
        assert_eq!(controller.laser_parameters(channel).unwrap(), parameters);
    }

    let timings = CameraParameters::from_ms(controller.profile(), 1., 5., 15., 2.);
    controller.set_camera_parameters(&timings).unwrap();
    assert_eq!(controller.camera_parameters().unwrap(), timings);
    controller.set_camera_active().unwrap();
    controller.start_camera().unwrap();
    sleep(Duration::from_millis(500));
    controller.stop_camera().unwrap();
    controller.set_camera_passive().unwrap();

    for channel in 0 .. controller.lasers() {
        controller.set_laser_mode(channel, TriggerMode::Off).unwrap();
    }
}
