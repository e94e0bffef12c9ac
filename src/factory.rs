/*!
    bounded allocation of channels

    the factory hands out each channel of the board at most once, numbering them in order. Once a kind is exhausted it answers `None` instead of failing, callers have to check for it.
*/

use log::*;
use crate::{
    device::Profile,
    registers,
    signal::{Signal, Kind},
    laser::LaserTrigger,
    camera::CameraSync,
    };


/// allocator of the channels of one board
#[derive(Debug)]
pub struct DeviceFactory {
    profile: Profile,
    digital_outputs: u16,
    pwms: u16,
    servos: u16,
    analog_inputs: u16,
    lasers: u16,
    camera: bool,
}
impl DeviceFactory {
    pub fn new(profile: &Profile) -> Self {
        Self {
            profile: *profile,
            digital_outputs: 0,
            pwms: 0,
            servos: 0,
            analog_inputs: 0,
            lasers: 0,
            camera: false,
        }
    }

    pub fn digital_output(&mut self) -> Option<Signal> {
        Self::signal(Kind::DigitalOutput, &mut self.digital_outputs, registers::DIGITAL_OUTPUTS)
    }
    pub fn pwm(&mut self) -> Option<Signal> {
        Self::signal(Kind::Pwm, &mut self.pwms, registers::PWMS)
    }
    pub fn servo(&mut self) -> Option<Signal> {
        Self::signal(Kind::Servo, &mut self.servos, registers::SERVOS)
    }
    /// only boards whose profile has analog inputs can hand them out
    pub fn analog_input(&mut self) -> Option<Signal> {
        Self::signal(Kind::AnalogInput, &mut self.analog_inputs, self.profile.analog_capacity())
    }
    pub fn laser(&mut self) -> Option<LaserTrigger> {
        if usize::from(self.lasers) >= registers::LASERS {
            warn!("no laser trigger left on the board");
            return None
        }
        let laser = LaserTrigger::new(self.lasers)?;
        self.lasers += 1;
        Some(laser)
    }
    /// the camera-sync module, only once
    pub fn camera(&mut self) -> Option<CameraSync> {
        if self.camera {
            warn!("camera-sync module already handed out");
            return None
        }
        let camera = CameraSync::new(&self.profile)?;
        self.camera = true;
        Some(camera)
    }

    pub fn remaining_digital_outputs(&self) -> usize {
        registers::DIGITAL_OUTPUTS - usize::from(self.digital_outputs)
    }
    pub fn remaining_pwms(&self) -> usize {
        registers::PWMS - usize::from(self.pwms)
    }
    pub fn remaining_servos(&self) -> usize {
        registers::SERVOS - usize::from(self.servos)
    }
    pub fn remaining_analog_inputs(&self) -> usize {
        self.profile.analog_capacity() - usize::from(self.analog_inputs)
    }
    pub fn remaining_lasers(&self) -> usize {
        registers::LASERS - usize::from(self.lasers)
    }
    pub fn remaining_cameras(&self) -> usize {
        if self.camera {0} else {registers::CAMERAS}
    }

    fn signal(kind: Kind, counter: &mut u16, capacity: usize) -> Option<Signal> {
        if usize::from(*counter) >= capacity {
            warn!("no {:?} left on the board", kind);
            return None
        }
        let signal = Signal::new(kind, *counter)?;
        *counter += 1;
        Some(signal)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{PERIOD_PROFILE, READOUT_PROFILE};

    #[test]
    fn exhausts_at_capacity() {
        let mut factory = DeviceFactory::new(&READOUT_PROFILE);
        for index in 0 .. registers::DIGITAL_OUTPUTS {
            let signal = factory.digital_output().unwrap();
            assert_eq!(usize::from(signal.index()), index);
        }
        assert_eq!(factory.remaining_digital_outputs(), 0);
        assert_eq!(factory.digital_output(), None);
        assert_eq!(factory.digital_output(), None);
        assert_eq!(factory.remaining_digital_outputs(), 0);
        // other kinds are independent
        assert_eq!(factory.pwm().unwrap().index(), 0);
        assert_eq!(factory.remaining_pwms(), registers::PWMS - 1);
    }

    #[test]
    fn lasers_and_camera() {
        let mut factory = DeviceFactory::new(&READOUT_PROFILE);
        for index in 0 .. registers::LASERS {
            assert_eq!(usize::from(factory.laser().unwrap().index()), index);
        }
        assert!(factory.laser().is_none());
        assert!(factory.camera().is_some());
        assert_eq!(factory.remaining_cameras(), 0);
        assert!(factory.camera().is_none());
    }

    #[test]
    fn analog_inputs_follow_profile() {
        let mut factory = DeviceFactory::new(&PERIOD_PROFILE);
        assert_eq!(factory.remaining_analog_inputs(), 0);
        assert_eq!(factory.analog_input(), None);

        let mut factory = DeviceFactory::new(&READOUT_PROFILE);
        assert_eq!(factory.remaining_analog_inputs(), registers::ANALOG_INPUTS);
        let signal = factory.analog_input().unwrap();
        assert!(signal.read_only());
        assert_eq!(signal.address(), registers::ANALOG_INPUT.base());
    }
}
