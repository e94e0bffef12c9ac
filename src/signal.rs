/*!
    bounds-checked view onto one board register

    every register the driver touches is reached through a [Signal]: its [Kind] fixes the register block, the highest accepted value and whether the register can be written at all.
*/

use log::*;
use crate::{
    Error,
    device::CameraField,
    registers::{self, Address, Block, Value},
    transport::Transport,
    };


/// highest value of a digital output, it is either on or off
pub const DIGITAL_MAX: Value = 1;
/// highest PWM duty cycle
pub const PWM_MAX: Value = 255;
/// highest servo position
pub const SERVO_MAX: Value = 65_535;
/// highest laser trigger mode
pub const LASER_MODE_MAX: Value = 4;
/// longest laser pulse, in microseconds
pub const LASER_DURATION_MAX: Value = 65_535;
/// highest laser sequence, all 16 bits set
pub const LASER_SEQUENCE_MAX: Value = 65_535;


/// every kind of register slot on the board
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    DigitalOutput,
    Pwm,
    Servo,
    AnalogInput,
    LaserMode,
    LaserDuration,
    LaserSequence,
    CameraMode,
    CameraStart,
    /// camera timing register, its range depends on the board profile
    CameraTiming {field: CameraField, max: Value},
}
impl Kind {
    /// register block of this kind
    pub const fn block(self) -> Block {
        match self {
            Self::DigitalOutput => registers::DIGITAL_OUTPUT,
            Self::Pwm => registers::PWM,
            Self::Servo => registers::SERVO,
            Self::AnalogInput => registers::ANALOG_INPUT,
            Self::LaserMode => registers::LASER_MODE,
            Self::LaserDuration => registers::LASER_DURATION,
            Self::LaserSequence => registers::LASER_SEQUENCE,
            Self::CameraMode => registers::CAMERA_MODE,
            Self::CameraStart => registers::CAMERA_START,
            Self::CameraTiming {field, ..} => field.block(),
        }
    }
    /// highest value accepted on write, `None` if nothing can be written
    pub const fn max(self) -> Option<Value> {
        match self {
            Self::DigitalOutput => Some(DIGITAL_MAX),
            Self::Pwm => Some(PWM_MAX),
            Self::Servo => Some(SERVO_MAX),
            Self::AnalogInput => None,
            Self::LaserMode => Some(LASER_MODE_MAX),
            Self::LaserDuration => Some(LASER_DURATION_MAX),
            Self::LaserSequence => Some(LASER_SEQUENCE_MAX),
            Self::CameraMode | Self::CameraStart => Some(1),
            Self::CameraTiming {max, ..} => Some(max),
        }
    }
    pub const fn read_only(self) -> bool {
        matches!(self, Self::AnalogInput)
    }
}


/**
    one addressable register slot

    a signal only holds its kind and index, hence can be created, copied or destroyed at no cost. It reaches the board through the transport borrowed for each access.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signal {
    kind: Kind,
    index: u16,
    address: Address,
}
impl Signal {
    /// create a signal, if the index exists in the block of its kind
    pub const fn new(kind: Kind, index: u16) -> Option<Self> {
        match kind.block().at(index) {
            Some(address) => Some(Self {kind, index, address}),
            None => None,
        }
    }
    pub const fn kind(&self) -> Kind {self.kind}
    /// rank of this channel in its kind
    pub const fn index(&self) -> u16 {self.index}
    /// register address, base of the kind block plus index
    pub const fn address(&self) -> Address {self.address}
    pub const fn read_only(&self) -> bool {self.kind.read_only()}

    /// whether `value` can be written to this signal
    pub const fn is_value_allowed(&self, value: Value) -> bool {
        match self.kind.max() {
            Some(max) => value <= max,
            None => false,
        }
    }

    /// read the raw register value, no bounds checking is done since the board is the authority
    pub fn get_state<T: Transport>(&self, bus: &mut T) -> Result<Value, Error> {
        let value = bus.read(self.address).map_err(|error| {
            warn!("failed reading register {}: {:?}", self.address, error);
            Error::Transport
            })?;
        trace!("read {:?}[{}] = {}", self.kind, self.index, value);
        Ok(value)
    }
    /// write the register, the transport is not touched if the value is refused
    pub fn set_state<T: Transport>(&self, bus: &mut T, value: Value) -> Result<(), Error> {
        if self.read_only()
            {return Err(Error::ReadOnly)}
        if !self.is_value_allowed(value)
            {return Err(Error::OutOfRange)}
        debug!("write {:?}[{}] = {}", self.kind, self.index, value);
        bus.write(self.address, value).map_err(|error| {
            warn!("failed writing register {}: {:?}", self.address, error);
            Error::Transport
            })
    }
}
