/*!
    laser trigger modules

    each module drives one laser from three registers sharing the module index: a trigger [mode](TriggerMode), a pulse duration in microseconds, and a 16 bit on/off sequence played on successive camera frames.
*/

use core::fmt;
use heapless::String;
use crate::{
    Error,
    registers::Value,
    signal::{Signal, Kind, LASER_DURATION_MAX, LASER_SEQUENCE_MAX},
    transport::Transport,
    };


/// number of frames in a laser sequence
pub const SEQUENCE_LENGTH: usize = 16;

/// sequence in its textual form, one character per frame, first frame first
pub type SequenceString = String<SEQUENCE_LENGTH>;

/**
    convert a textual sequence to its register value

    the string must be exactly 16 characters of `'0'` or `'1'`, most significant bit first
*/
pub fn parse_sequence(text: &str) -> Result<u16, Error> {
    if text.len() != SEQUENCE_LENGTH || !text.bytes().all(|c| c == b'0' || c == b'1')
        {return Err(Error::InvalidSequence)}
    let mut value = 0;
    for c in text.bytes() {
        value = (value << 1) | u16::from(c - b'0');
    }
    Ok(value)
}
/// convert a sequence register value to its textual form, `None` if it does not fit 16 bits
pub fn format_sequence(value: Value) -> Option<SequenceString> {
    if value > LASER_SEQUENCE_MAX
        {return None}
    u16::try_from(value).ok().map(sequence_string)
}
fn sequence_string(value: u16) -> SequenceString {
    (0 .. SEQUENCE_LENGTH).rev()
        .map(|bit| if (value >> bit) & 1 == 1 {'1'} else {'0'})
        .collect()
}


/// how a laser reacts to the camera trigger
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriggerMode {
    /// laser always off
    #[default]
    Off = 0,
    /// laser always on
    On = 1,
    /// pulse of the set duration on the rising edge of the camera trigger
    Rising = 2,
    /// pulse of the set duration on the falling edge of the camera trigger
    Falling = 3,
    /// laser on while the camera trigger is high
    Following = 4,
}
impl TriggerMode {
    pub const ALL: [Self; 5] = [Self::Off, Self::On, Self::Rising, Self::Falling, Self::Following];

    /// decode a mode register, unknown values decode to [TriggerMode::Off]
    pub const fn from_register(value: Value) -> Self {
        match value {
            1 => Self::On,
            2 => Self::Rising,
            3 => Self::Falling,
            4 => Self::Following,
            _ => Self::Off,
        }
    }
    pub const fn register(self) -> Value {
        self as Value
    }
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Rising => "RISING",
            Self::Falling => "FALLING",
            Self::Following => "FOLLOWING",
        }
    }
}
impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}


/// full setting of a laser trigger module
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LaserParameters {
    mode: TriggerMode,
    duration: u16,
    sequence: u16,
}
impl LaserParameters {
    /// parameters from a duration in microseconds and a textual sequence
    pub fn new(mode: TriggerMode, duration: Value, sequence: &str) -> Result<Self, Error> {
        let mut parameters = Self {mode, .. Default::default()};
        parameters.set_duration(duration)?;
        parameters.set_sequence(sequence)?;
        Ok(parameters)
    }
    /// parameters from raw register values
    pub fn from_raw(mode: TriggerMode, duration: Value, sequence: Value) -> Result<Self, Error> {
        let mut parameters = Self {mode, .. Default::default()};
        parameters.set_duration(duration)?;
        parameters.set_raw_sequence(sequence)?;
        Ok(parameters)
    }

    pub fn mode(&self) -> TriggerMode {self.mode}
    /// pulse duration in microseconds
    pub fn duration(&self) -> Value {self.duration.into()}
    /// raw sequence register value
    pub fn raw_sequence(&self) -> Value {self.sequence.into()}
    /// sequence in its textual form
    pub fn sequence(&self) -> SequenceString {
        sequence_string(self.sequence)
    }

    pub fn set_mode(&mut self, mode: TriggerMode) {
        self.mode = mode;
    }
    /// set the duration, left unchanged if out of range
    pub fn set_duration(&mut self, duration: Value) -> Result<(), Error> {
        if duration > LASER_DURATION_MAX
            {return Err(Error::OutOfRange)}
        self.duration = duration as u16;
        Ok(())
    }
    /// set the sequence from its textual form, left unchanged if invalid
    pub fn set_sequence(&mut self, sequence: &str) -> Result<(), Error> {
        self.sequence = parse_sequence(sequence)?;
        Ok(())
    }
    /// set the sequence from its register value, left unchanged if out of range
    pub fn set_raw_sequence(&mut self, sequence: Value) -> Result<(), Error> {
        self.sequence = u16::try_from(sequence).map_err(|_| Error::OutOfRange)?;
        Ok(())
    }
}
impl fmt::Display for LaserParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Mode: {}, Duration: {} us, Sequence: {}]",
            self.mode, self.duration, self.sequence())
    }
}


/// one laser trigger module, made of its mode, duration and sequence registers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaserTrigger {
    mode: Signal,
    duration: Signal,
    sequence: Signal,
}
impl LaserTrigger {
    /// create the module, if the index exists on the board
    pub fn new(index: u16) -> Option<Self> {
        Some(Self {
            mode: Signal::new(Kind::LaserMode, index)?,
            duration: Signal::new(Kind::LaserDuration, index)?,
            sequence: Signal::new(Kind::LaserSequence, index)?,
        })
    }
    pub fn index(&self) -> u16 {self.mode.index()}

    pub fn set_mode<T: Transport>(&self, bus: &mut T, mode: TriggerMode) -> Result<(), Error> {
        self.mode.set_state(bus, mode.register())
    }
    /// raw mode register, may hold a value no mode corresponds to
    pub fn mode<T: Transport>(&self, bus: &mut T) -> Result<Value, Error> {
        self.mode.get_state(bus)
    }
    pub fn set_duration<T: Transport>(&self, bus: &mut T, duration: Value) -> Result<(), Error> {
        self.duration.set_state(bus, duration)
    }
    pub fn duration<T: Transport>(&self, bus: &mut T) -> Result<Value, Error> {
        self.duration.get_state(bus)
    }
    pub fn set_sequence<T: Transport>(&self, bus: &mut T, sequence: Value) -> Result<(), Error> {
        self.sequence.set_state(bus, sequence)
    }
    pub fn sequence<T: Transport>(&self, bus: &mut T) -> Result<Value, Error> {
        self.sequence.get_state(bus)
    }

    /**
        write mode, duration and sequence in that order

        the first failing write aborts the others, leaving the registers written before it applied on the board
    */
    pub fn set_parameters<T: Transport>(&self, bus: &mut T, parameters: &LaserParameters) -> Result<(), Error> {
        self.set_mode(bus, parameters.mode())?;
        self.set_duration(bus, parameters.duration())?;
        self.set_sequence(bus, parameters.raw_sequence())
    }
    /// read back the three registers of the module
    pub fn parameters<T: Transport>(&self, bus: &mut T) -> Result<LaserParameters, Error> {
        let mode = TriggerMode::from_register(self.mode(bus)?);
        let duration = self.duration(bus)?;
        let sequence = self.sequence(bus)?;
        LaserParameters::from_raw(mode, duration, sequence)
    }
}
