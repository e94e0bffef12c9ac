/*!
    board identities and the per-identity profile of the register space

    boards of different identities share the same register map, but differ in which channels exist and in how the camera-sync timings are encoded. The [Profile] is selected once from the identity read during the handshake.
*/

use core::fmt;
use crate::registers::{self, Block, Value};


/// identity reported by the board in its [registers::ID] register
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeviceId {
    Cu,
    Au,
    AuPlus,
}
impl DeviceId {
    /// all identities this driver supports
    pub const ALL: [Self; 3] = [Self::Cu, Self::Au, Self::AuPlus];

    /// decode the value of the identity register
    pub const fn from_register(value: Value) -> Option<Self> {
        match value {
            49 => Some(Self::Cu),
            79 => Some(Self::Au),
            80 => Some(Self::AuPlus),
            _ => None,
        }
    }
    /// value of the identity register for this board
    pub const fn register(self) -> Value {
        match self {
            Self::Cu => 49,
            Self::Au => 79,
            Self::AuPlus => 80,
        }
    }
    /// short human readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cu => "Cu",
            Self::Au => "Au",
            Self::AuPlus => "Au+",
        }
    }
    pub const fn profile(self) -> &'static Profile {
        match self {
            Self::Cu => &PERIOD_PROFILE,
            Self::Au | Self::AuPlus => &READOUT_PROFILE,
        }
    }
}
impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}


/// the four timing registers of the camera-sync module, in the order they are written
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CameraField {
    Pulse,
    /// period or read-out, see [Window]
    Window,
    Exposure,
    Delay,
}
impl CameraField {
    pub const ALL: [Self; 4] = [Self::Pulse, Self::Window, Self::Exposure, Self::Delay];

    /// register holding this field
    pub const fn block(self) -> Block {
        match self {
            Self::Pulse => registers::CAMERA_PULSE,
            Self::Window => registers::CAMERA_WINDOW,
            Self::Exposure => registers::CAMERA_EXPOSURE,
            Self::Delay => registers::CAMERA_DELAY,
        }
    }
    /// position of this field in [CameraField::ALL]
    pub(crate) const fn rank(self) -> usize {
        match self {
            Self::Pulse => 0,
            Self::Window => 1,
            Self::Exposure => 2,
            Self::Delay => 3,
        }
    }
}

/// meaning of the camera timing window register
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Window {
    /// the board triggers the camera periodically
    Period,
    /// the board waits for the camera read-out between frames
    Readout,
}
impl Window {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Period => "Period",
            Self::Readout => "Read-out",
        }
    }
}

/// encoding of one physical quantity in register ticks
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scale {
    /// register ticks in one millisecond
    pub ticks_per_ms: u32,
    /// highest value the register accepts
    pub max: Value,
}
impl Scale {
    /**
        convert milliseconds to the nearest tick, rounding half-up

        values beyond the register range are clamped to `[0, max]`, NaN maps to 0
    */
    pub fn ticks(&self, ms: f64) -> Value {
        let scaled = ms * f64::from(self.ticks_per_ms) + 0.5;
        if scaled.is_nan() || scaled < 0. {
            return 0
        }
        // non-negative here, so the saturating cast is a floor
        (scaled as Value).min(self.max)
    }
    /// convert ticks back to milliseconds
    pub fn ms(&self, ticks: Value) -> f64 {
        f64::from(ticks) / f64::from(self.ticks_per_ms)
    }
}

/// characteristics of a family of boards
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Profile {
    /// meaning of the camera window register
    pub window: Window,
    /// whether the board has analog inputs
    pub analog_inputs: bool,
    /// tick scale of each camera field, indexed in [CameraField::ALL] order
    pub scales: [Scale; 4],
}
impl Profile {
    pub const fn scale(&self, field: CameraField) -> Scale {
        self.scales[field.rank()]
    }
    /// number of analog inputs available on this profile
    pub const fn analog_capacity(&self) -> usize {
        if self.analog_inputs {registers::ANALOG_INPUTS} else {0}
    }
}

/// boards triggering the camera with a fixed period, at 0.1 ms resolution
pub const PERIOD_PROFILE: Profile = Profile {
    window: Window::Period,
    analog_inputs: false,
    scales: [
        Scale {ticks_per_ms: 10, max: 65_535},
        Scale {ticks_per_ms: 10, max: 65_535},
        Scale {ticks_per_ms: 10, max: 65_535},
        Scale {ticks_per_ms: 100, max: 65_535},
        ],
};
/// boards following the camera read-out, at 1 us resolution
pub const READOUT_PROFILE: Profile = Profile {
    window: Window::Readout,
    analog_inputs: true,
    scales: [
        Scale {ticks_per_ms: 1000, max: 1_048_575},
        Scale {ticks_per_ms: 1000, max: 65_535},
        Scale {ticks_per_ms: 1000, max: 1_048_575},
        Scale {ticks_per_ms: 1000, max: 65_535},
        ],
};


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_roundtrip() {
        for id in DeviceId::ALL {
            assert_eq!(DeviceId::from_register(id.register()), Some(id));
        }
        assert_eq!(DeviceId::from_register(0), None);
        assert_eq!(DeviceId::from_register(50), None);
    }

    #[test]
    fn rounding_is_half_up() {
        let scale = Scale {ticks_per_ms: 10, max: 65_535};
        assert_eq!(scale.ticks(1.0), 10);
        assert_eq!(scale.ticks(1.04), 10);
        assert_eq!(scale.ticks(1.05), 11);
        assert_eq!(scale.ticks(1.06), 11);
        assert_eq!(scale.ms(11), 1.1);
    }

    #[test]
    fn ticks_are_clamped() {
        let scale = Scale {ticks_per_ms: 1000, max: 65_535};
        assert_eq!(scale.ticks(-3.), 0);
        assert_eq!(scale.ticks(f64::NAN), 0);
        assert_eq!(scale.ticks(65.535), 65_535);
        assert_eq!(scale.ticks(100.), 65_535);
        assert_eq!(scale.ticks(f64::INFINITY), 65_535);
    }

    #[test]
    fn profiles_follow_identity() {
        assert_eq!(DeviceId::Cu.profile().window, Window::Period);
        assert_eq!(DeviceId::Cu.profile().analog_capacity(), 0);
        assert_eq!(DeviceId::Au.profile().window, Window::Readout);
        assert_eq!(DeviceId::AuPlus.profile().analog_capacity(), registers::ANALOG_INPUTS);
        assert_eq!(READOUT_PROFILE.scale(CameraField::Exposure).max, 1_048_575);
        assert_eq!(PERIOD_PROFILE.scale(CameraField::Delay).ticks_per_ms, 100);
    }
}
