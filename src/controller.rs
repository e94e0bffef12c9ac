/*!
    entry point for every board access

    The [Controller] owns the transport. It connects and performs the handshake on construction, checking the firmware version and the board identity, then allocates exactly the requested channels. Every accessor first checks that the board is still connected and that the channel exists, and never touches the transport otherwise.

    ```text
    Disconnected --new--> Handshaking --version and identity ok--> Ready
                               |                                     |
                               +-- refused: disconnect, fail         +--disconnect--> Disconnected
    ```
*/

use core::fmt::{Display, Write};
use heapless::{String, Vec};
use log::*;
use crate::{
    Error,
    device::{DeviceId, Profile},
    registers::{self, Address, Value},
    signal::{Signal, DIGITAL_MAX},
    laser::{LaserTrigger, LaserParameters, TriggerMode},
    camera::{CameraSync, CameraParameters},
    factory::DeviceFactory,
    transport::Transport,
    };


/// longest pretty form of parameters, longer texts are truncated
pub const PRETTY_LENGTH: usize = 192;
/// human readable form of module parameters
pub type Pretty = String<PRETTY_LENGTH>;

/// channels requested when connecting to a board
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    pub lasers: usize,
    pub digital_outputs: usize,
    pub servos: usize,
    pub pwms: usize,
    /// ignored on boards without analog inputs
    pub analog_inputs: usize,
    /// if not requested, the camera-sync module is forced passive so the board never drives triggers unexpectedly
    pub camera: bool,
}

/// connection state of a controller
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Disconnected,
    Handshaking,
    Ready,
}


/// driver of one board, exclusive owner of its transport
pub struct Controller<T: Transport> {
    bus: T,
    state: State,
    device: DeviceId,
    version: Value,
    digital_outputs: Vec<Signal, {registers::DIGITAL_OUTPUTS}>,
    pwms: Vec<Signal, {registers::PWMS}>,
    servos: Vec<Signal, {registers::SERVOS}>,
    analog_inputs: Vec<Signal, {registers::ANALOG_INPUTS}>,
    lasers: Vec<LaserTrigger, {registers::LASERS}>,
    camera: Option<CameraSync>,
}

impl<T: Transport> Controller<T> {
    /**
        connect to the board and allocate the requested channels

        requests beyond the board capacity are served up to the capacity. Construction fails if the link cannot be opened, or if the board runs an unexpected firmware version or has an unknown identity, in which cases the transport is disconnected before returning.
    */
    pub fn new(mut bus: T, allocation: &Allocation) -> Result<Self, Error> {
        debug!("connecting to board");
        bus.connect().map_err(|error| {
            warn!("could not connect to board: {:?}", error);
            Error::Unreachable
            })?;

        debug!("handshaking");
        let (device, version) = match Self::handshake(&mut bus) {
            Ok(found) => found,
            Err(error) => return Err(Self::abort(bus, error)),
        };
        info!("connected to {} board, firmware version {}", device, version);

        let mut factory = DeviceFactory::new(device.profile());
        let digital_outputs = Self::allocate("digital output", allocation.digital_outputs, || factory.digital_output());
        let pwms = Self::allocate("PWM", allocation.pwms, || factory.pwm());
        let lasers = Self::allocate("laser trigger", allocation.lasers, || factory.laser());
        let servos = Self::allocate("servo", allocation.servos, || factory.servo());
        let analog_inputs = Self::allocate("analog input", allocation.analog_inputs, || factory.analog_input());

        let camera = match factory.camera() {
            Some(camera) if !allocation.camera => {
                if let Err(error) = camera.set_passive(&mut bus)
                    {return Err(Self::abort(bus, error))}
                None
            },
            camera => camera,
        };

        Ok(Self {
            bus,
            state: State::Ready,
            device,
            version,
            digital_outputs,
            pwms,
            servos,
            analog_inputs,
            lasers,
            camera,
        })
    }
    fn handshake(bus: &mut T) -> Result<(DeviceId, Value), Error> {
        let version = Self::identification(bus, registers::VERSION)?;
        let id = Self::identification(bus, registers::ID)?;
        if version != registers::CURRENT_VERSION {
            warn!("incorrect firmware version {}, expected {}", version, registers::CURRENT_VERSION);
            return Err(Error::Version {found: version})
        }
        let device = DeviceId::from_register(id).ok_or_else(|| {
            warn!("unknown device id {}", id);
            Error::UnknownDevice {found: id}
            })?;
        Ok((device, version))
    }
    fn identification(bus: &mut T, address: Address) -> Result<Value, Error> {
        bus.read(address).map_err(|error| {
            warn!("could not read identification register {}: {:?}", address, error);
            Error::Transport
            })
    }
    /// disconnect after a failed construction, returning the reason
    fn abort(mut bus: T, error: Error) -> Error {
        if let Err(failure) = bus.disconnect() {
            warn!("could not disconnect from board: {:?}", failure);
        }
        error
    }
    fn allocate<S, const N: usize>(name: &str, requested: usize, mut next: impl FnMut() -> Option<S>) -> Vec<S, N> {
        let mut channels = Vec::new();
        while channels.len() < requested {
            let Some(channel) = next()
                else {
                    warn!("requested {} {} channels, the board only has {}", requested, name, channels.len());
                    break
                };
            if channels.push(channel).is_err()
                {break}
        }
        channels
    }

    pub fn state(&self) -> State {self.state}
    pub fn is_connected(&self) -> bool {self.state == State::Ready}
    /// disconnect the board, channels stay allocated but refuse any access
    pub fn disconnect(&mut self) -> Result<(), Error> {
        if self.state == State::Disconnected
            {return Ok(())}
        self.bus.disconnect().map_err(|error| {
            warn!("could not disconnect from board: {:?}", error);
            Error::Transport
            })?;
        info!("disconnected from {} board", self.device);
        self.state = State::Disconnected;
        Ok(())
    }
    /// the underlying transport
    pub fn transport(&self) -> &T {&self.bus}

    /// identity found during the handshake
    pub fn device(&self) -> DeviceId {self.device}
    /// label of the connected board identity
    pub fn device_label(&self) -> &'static str {
        if self.is_connected() {self.device.label()} else {"Not connected"}
    }
    /// firmware version found during the handshake
    pub fn version(&self) -> Value {self.version}
    pub fn profile(&self) -> &'static Profile {self.device.profile()}

    pub fn digital_outputs(&self) -> usize {self.digital_outputs.len()}
    pub fn pwms(&self) -> usize {self.pwms.len()}
    pub fn servos(&self) -> usize {self.servos.len()}
    pub fn analog_inputs(&self) -> usize {self.analog_inputs.len()}
    pub fn lasers(&self) -> usize {self.lasers.len()}
    pub fn has_camera(&self) -> bool {self.camera.is_some()}

    pub fn set_digital_output(&mut self, channel: usize, state: bool) -> Result<(), Error> {
        let signal = self.select(&self.digital_outputs, channel)?;
        signal.set_state(&mut self.bus, if state {DIGITAL_MAX} else {0})
    }
    pub fn digital_output(&mut self, channel: usize) -> Result<bool, Error> {
        let signal = self.select(&self.digital_outputs, channel)?;
        Ok(signal.get_state(&mut self.bus)? == DIGITAL_MAX)
    }
    pub fn set_pwm(&mut self, channel: usize, duty: Value) -> Result<(), Error> {
        let signal = self.select(&self.pwms, channel)?;
        signal.set_state(&mut self.bus, duty)
    }
    pub fn pwm(&mut self, channel: usize) -> Result<Value, Error> {
        let signal = self.select(&self.pwms, channel)?;
        signal.get_state(&mut self.bus)
    }
    pub fn set_servo(&mut self, channel: usize, position: Value) -> Result<(), Error> {
        let signal = self.select(&self.servos, channel)?;
        signal.set_state(&mut self.bus, position)
    }
    pub fn servo(&mut self, channel: usize) -> Result<Value, Error> {
        let signal = self.select(&self.servos, channel)?;
        signal.get_state(&mut self.bus)
    }
    pub fn analog_input(&mut self, channel: usize) -> Result<Value, Error> {
        let signal = self.select(&self.analog_inputs, channel)?;
        signal.get_state(&mut self.bus)
    }

    /// write all laser parameters, see [LaserTrigger::set_parameters] for partial failures
    pub fn set_laser_parameters(&mut self, channel: usize, parameters: &LaserParameters) -> Result<(), Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.set_parameters(&mut self.bus, parameters)
    }
    pub fn laser_parameters(&mut self, channel: usize) -> Result<LaserParameters, Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.parameters(&mut self.bus)
    }
    pub fn laser_parameters_pretty(&mut self, channel: usize) -> Result<Pretty, Error> {
        self.laser_parameters(channel).map(pretty)
    }
    pub fn set_laser_mode(&mut self, channel: usize, mode: TriggerMode) -> Result<(), Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.set_mode(&mut self.bus, mode)
    }
    /// laser mode, unknown register values decode to [TriggerMode::Off]
    pub fn laser_mode(&mut self, channel: usize) -> Result<TriggerMode, Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.mode(&mut self.bus).map(TriggerMode::from_register)
    }
    /// set the laser pulse duration in microseconds
    pub fn set_laser_duration(&mut self, channel: usize, duration: Value) -> Result<(), Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.set_duration(&mut self.bus, duration)
    }
    pub fn laser_duration(&mut self, channel: usize) -> Result<Value, Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.duration(&mut self.bus)
    }
    /// set the raw sequence register, see [crate::laser::parse_sequence] for the textual form
    pub fn set_laser_sequence(&mut self, channel: usize, sequence: Value) -> Result<(), Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.set_sequence(&mut self.bus, sequence)
    }
    pub fn laser_sequence(&mut self, channel: usize) -> Result<Value, Error> {
        let laser = self.select(&self.lasers, channel)?;
        laser.sequence(&mut self.bus)
    }

    pub fn set_camera_active(&mut self) -> Result<(), Error> {
        let camera = self.camera()?;
        camera.set_active(&mut self.bus)
    }
    pub fn set_camera_passive(&mut self) -> Result<(), Error> {
        let camera = self.camera()?;
        camera.set_passive(&mut self.bus)
    }
    pub fn is_camera_active(&mut self) -> Result<bool, Error> {
        let camera = self.camera()?;
        camera.is_active(&mut self.bus)
    }
    pub fn start_camera(&mut self) -> Result<(), Error> {
        let camera = self.camera()?;
        camera.start(&mut self.bus)
    }
    pub fn stop_camera(&mut self) -> Result<(), Error> {
        let camera = self.camera()?;
        camera.stop(&mut self.bus)
    }
    /// write all camera timings, see [CameraSync::set_parameters] for partial failures
    pub fn set_camera_parameters(&mut self, parameters: &CameraParameters) -> Result<(), Error> {
        let camera = self.camera()?;
        camera.set_parameters(&mut self.bus, parameters)
    }
    pub fn camera_parameters(&mut self) -> Result<CameraParameters, Error> {
        let camera = self.camera()?;
        camera.parameters(&mut self.bus)
    }
    pub fn camera_parameters_pretty(&mut self) -> Result<Pretty, Error> {
        self.camera_parameters().map(pretty)
    }

    /// check the connection and the channel index
    fn select<S: Copy>(&self, channels: &[S], channel: usize) -> Result<S, Error> {
        if !self.is_connected()
            {return Err(Error::NotConnected)}
        channels.get(channel).copied().ok_or(Error::InvalidChannel)
    }
    fn camera(&self) -> Result<CameraSync, Error> {
        if !self.is_connected()
            {return Err(Error::NotConnected)}
        self.camera.ok_or(Error::NoCamera)
    }
}

fn pretty(value: impl Display) -> Pretty {
    let mut text = Pretty::new();
    // only fails when exceeding the capacity, keep what fitted
    let _ = write!(text, "{}", value);
    text
}
