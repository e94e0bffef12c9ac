/*!
    host-side driver for the MicroFPGA microscopy timing board

    the board exposes a flat register space; this crate turns it into typed and bounds-checked channels: digital outputs, PWM and servo outputs, analog inputs, laser trigger modules and a camera-sync module.

    - [registers] is the address map of the board
    - [signal] is one bounds-checked register slot
    - [laser] and [camera] are multi-register modules with their parameter codecs
    - [factory] hands out channels without exceeding the board capacity
    - [controller] performs the handshake and is the entry point for every access
    - [transport] is the seam to the physical link, implemented by [memory] for offline use and by `serial` for real boards
*/
#![no_std]
#[cfg(feature = "std")]
extern crate std;

#[cfg_attr(not(feature = "serial"), allow(unused))]
mod command;
mod utils;

pub mod registers;
pub mod device;
pub mod transport;
pub mod memory;
pub mod signal;
pub mod laser;
pub mod camera;
pub mod factory;
pub mod controller;
#[cfg(feature = "serial")]
pub mod serial;

pub use controller::{Controller, Allocation, State};
pub use device::{DeviceId, Profile};
pub use laser::{LaserParameters, TriggerMode};
pub use camera::{CameraParameters, CameraMode};
pub use transport::Transport;

use thiserror::Error;

/// error regarding board access
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("could not find device or could not connect")]
    Unreachable,
    #[error("incorrect firmware version ({found}), expected version {expected}", expected = registers::CURRENT_VERSION)]
    Version {found: registers::Value},
    #[error("unknown device id ({found}), expected 49 (Cu), 79 (Au) or 80 (Au+)")]
    UnknownDevice {found: registers::Value},

    #[error("board is not connected")]
    NotConnected,
    #[error("no such channel")]
    InvalidChannel,
    #[error("value out of range for this register")]
    OutOfRange,
    #[error("register is read-only")]
    ReadOnly,
    #[error("camera-sync module was not requested")]
    NoCamera,
    #[error("parameters were built for another board profile")]
    ProfileMismatch,
    #[error("sequence must be 16 characters of '0' or '1'")]
    InvalidSequence,

    #[error("transport failed to exchange with the board")]
    Transport,
}
