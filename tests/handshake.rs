use microfpga::{
    Controller, Allocation, State, DeviceId, Error,
    memory::MemoryBoard,
    registers,
    };


fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn everything() -> Allocation {
    Allocation {
        lasers: registers::LASERS,
        digital_outputs: registers::DIGITAL_OUTPUTS,
        servos: registers::SERVOS,
        pwms: registers::PWMS,
        analog_inputs: registers::ANALOG_INPUTS,
        camera: true,
    }
}


#[test]
fn unreachable_board() {
    init();
    let mut board = MemoryBoard::with_device(DeviceId::Au).unreachable();
    let result = Controller::new(&mut board, &everything());
    assert_eq!(result.err(), Some(Error::Unreachable));
    assert!(!board.is_connected());
    assert_eq!(board.reads(), 0);
}

#[test]
fn version_mismatch() {
    init();
    let mut board = MemoryBoard::new(DeviceId::Au.register(), registers::CURRENT_VERSION + 1);
    let result = Controller::new(&mut board, &everything());
    assert_eq!(result.err(), Some(Error::Version {found: registers::CURRENT_VERSION + 1}));
    assert!(!board.is_connected());
    // no channel was armed
    assert_eq!(board.writes(), 0);
}

#[test]
fn unknown_identity() {
    init();
    let mut board = MemoryBoard::new(12, registers::CURRENT_VERSION);
    let result = Controller::new(&mut board, &everything());
    assert_eq!(result.err(), Some(Error::UnknownDevice {found: 12}));
    assert!(!board.is_connected());
    assert_eq!(board.writes(), 0);
}

#[test]
fn version_is_checked_first() {
    init();
    let mut board = MemoryBoard::new(12, 0);
    let result = Controller::new(&mut board, &everything());
    assert_eq!(result.err(), Some(Error::Version {found: 0}));
}

#[test]
fn supported_identities() {
    init();
    for device in DeviceId::ALL {
        let controller = Controller::new(MemoryBoard::with_device(device), &Allocation::default()).unwrap();
        assert!(controller.is_connected());
        assert_eq!(controller.state(), State::Ready);
        assert_eq!(controller.device(), device);
        assert_eq!(controller.version(), registers::CURRENT_VERSION);
        assert_eq!(controller.device_label(), device.label());
        assert_eq!(controller.profile(), device.profile());
    }
}

#[test]
fn labels() {
    assert_eq!(DeviceId::Cu.label(), "Cu");
    assert_eq!(DeviceId::Au.label(), "Au");
    assert_eq!(DeviceId::AuPlus.label(), "Au+");
}

#[test]
fn disconnect_makes_channels_inert() {
    init();
    let mut board = MemoryBoard::with_device(DeviceId::Au);
    let mut controller = Controller::new(&mut board, &everything()).unwrap();
    controller.set_pwm(0, 10).unwrap();
    controller.disconnect().unwrap();
    assert!(!controller.is_connected());
    assert_eq!(controller.state(), State::Disconnected);
    assert_eq!(controller.device_label(), "Not connected");
    // channel counts survive, accesses do not
    assert_eq!(controller.pwms(), registers::PWMS);
    assert_eq!(controller.set_pwm(0, 20), Err(Error::NotConnected));
    assert_eq!(controller.pwm(0), Err(Error::NotConnected));
    assert_eq!(controller.set_digital_output(0, true), Err(Error::NotConnected));
    assert_eq!(controller.laser_parameters(0).err(), Some(Error::NotConnected));
    assert_eq!(controller.start_camera(), Err(Error::NotConnected));
    assert_eq!(controller.camera_parameters_pretty().err(), Some(Error::NotConnected));
    // disconnecting again is harmless
    controller.disconnect().unwrap();
    drop(controller);

    assert!(!board.is_connected());
    assert_eq!(board.get(registers::PWM.base()), 10);
}
