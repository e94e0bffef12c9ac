/*!
    camera-sync module

    the board can either follow the camera trigger (passive) or generate it (active). In active mode it times the camera and lasers from four registers: pulse, window, exposure and delay. These are stored in ticks whose resolution depends on the board [Profile], and exposed in milliseconds.
*/

use core::fmt;
use crate::{
    Error,
    device::{CameraField, Profile},
    registers::Value,
    signal::{Signal, Kind},
    transport::Transport,
    };


/// who generates the camera trigger
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// the camera triggers the board
    #[default]
    Passive = 0,
    /// the board triggers the camera
    Active = 1,
}
impl CameraMode {
    pub const fn register(self) -> Value {
        self as Value
    }
}


/**
    full timing of the camera-sync module

    values are held in register ticks of the profile they were built for. Setters in milliseconds round half-up to the nearest tick and clamp to the register range.
*/
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraParameters {
    profile: Profile,
    /// ticks, indexed in [CameraField::ALL] order
    ticks: [Value; 4],
}
impl CameraParameters {
    /// all timings at zero
    pub fn new(profile: &Profile) -> Self {
        Self {profile: *profile, ticks: [0; 4]}
    }
    /// timings in milliseconds, the window being a period or a read-out time depending on the profile
    pub fn from_ms(profile: &Profile, pulse: f64, window: f64, exposure: f64, delay: f64) -> Self {
        let mut parameters = Self::new(profile);
        parameters.set_ms(CameraField::Pulse, pulse);
        parameters.set_ms(CameraField::Window, window);
        parameters.set_ms(CameraField::Exposure, exposure);
        parameters.set_ms(CameraField::Delay, delay);
        parameters
    }
    /// timings in raw register ticks, refused if any is beyond its register range
    pub fn from_ticks(profile: &Profile, ticks: [Value; 4]) -> Result<Self, Error> {
        for (field, &value) in CameraField::ALL.iter().zip(&ticks) {
            if value > profile.scale(*field).max
                {return Err(Error::OutOfRange)}
        }
        Ok(Self {profile: *profile, ticks})
    }

    pub fn profile(&self) -> &Profile {&self.profile}

    /// set a field in milliseconds
    pub fn set_ms(&mut self, field: CameraField, ms: f64) {
        self.ticks[field.rank()] = self.profile.scale(field).ticks(ms);
    }
    /// get a field in milliseconds
    pub fn ms(&self, field: CameraField) -> f64 {
        self.profile.scale(field).ms(self.ticks(field))
    }
    /// get a field in register ticks
    pub fn ticks(&self, field: CameraField) -> Value {
        self.ticks[field.rank()]
    }

    pub fn set_pulse_ms(&mut self, ms: f64) {self.set_ms(CameraField::Pulse, ms)}
    pub fn set_window_ms(&mut self, ms: f64) {self.set_ms(CameraField::Window, ms)}
    pub fn set_exposure_ms(&mut self, ms: f64) {self.set_ms(CameraField::Exposure, ms)}
    pub fn set_delay_ms(&mut self, ms: f64) {self.set_ms(CameraField::Delay, ms)}
    pub fn pulse_ms(&self) -> f64 {self.ms(CameraField::Pulse)}
    /// period or read-out time, see [Profile::window]
    pub fn window_ms(&self) -> f64 {self.ms(CameraField::Window)}
    pub fn exposure_ms(&self) -> f64 {self.ms(CameraField::Exposure)}
    pub fn delay_ms(&self) -> f64 {self.ms(CameraField::Delay)}
}
impl fmt::Display for CameraParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Pulse: {} ms, {}: {} ms, Exposure: {} ms, Delay: {} ms]",
            self.pulse_ms(),
            self.profile.window.label(), self.window_ms(),
            self.exposure_ms(),
            self.delay_ms())
    }
}


/// the camera-sync module, at most one per board
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraSync {
    profile: Profile,
    mode: Signal,
    start: Signal,
    timings: [Signal; 4],
}
impl CameraSync {
    /// the module of a board of the given profile, only the factory hands it out
    pub(crate) fn new(profile: &Profile) -> Option<Self> {
        let timing = |field| Signal::new(Kind::CameraTiming {field, max: profile.scale(field).max}, 0);
        Some(Self {
            profile: *profile,
            mode: Signal::new(Kind::CameraMode, 0)?,
            start: Signal::new(Kind::CameraStart, 0)?,
            timings: [
                timing(CameraField::Pulse)?,
                timing(CameraField::Window)?,
                timing(CameraField::Exposure)?,
                timing(CameraField::Delay)?,
                ],
        })
    }
    pub fn profile(&self) -> &Profile {&self.profile}

    pub fn set_mode<T: Transport>(&self, bus: &mut T, mode: CameraMode) -> Result<(), Error> {
        self.mode.set_state(bus, mode.register())
    }
    /// the board generates the camera trigger
    pub fn set_active<T: Transport>(&self, bus: &mut T) -> Result<(), Error> {
        self.set_mode(bus, CameraMode::Active)
    }
    /// the camera triggers the board
    pub fn set_passive<T: Transport>(&self, bus: &mut T) -> Result<(), Error> {
        self.set_mode(bus, CameraMode::Passive)
    }
    pub fn is_active<T: Transport>(&self, bus: &mut T) -> Result<bool, Error> {
        Ok(self.mode.get_state(bus)? == CameraMode::Active.register())
    }
    /// start generating camera triggers, only effective in active mode
    pub fn start<T: Transport>(&self, bus: &mut T) -> Result<(), Error> {
        self.start.set_state(bus, 1)
    }
    pub fn stop<T: Transport>(&self, bus: &mut T) -> Result<(), Error> {
        self.start.set_state(bus, 0)
    }

    /**
        write pulse, window, exposure and delay in that order

        the first failing write aborts the others, leaving the registers written before it applied on the board
    */
    pub fn set_parameters<T: Transport>(&self, bus: &mut T, parameters: &CameraParameters) -> Result<(), Error> {
        if parameters.profile != self.profile
            {return Err(Error::ProfileMismatch)}
        for (signal, field) in self.timings.iter().zip(CameraField::ALL) {
            signal.set_state(bus, parameters.ticks(field))?;
        }
        Ok(())
    }
    /// read back the four timing registers
    pub fn parameters<T: Transport>(&self, bus: &mut T) -> Result<CameraParameters, Error> {
        let mut ticks = [0; 4];
        for (value, signal) in ticks.iter_mut().zip(&self.timings) {
            *value = signal.get_state(bus)?;
        }
        CameraParameters::from_ticks(&self.profile, ticks)
    }
}
