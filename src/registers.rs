/*!
    define the board register map

    the board exposes a flat space of integer registers. Each device kind owns a contiguous [Block] of registers, one per channel, and the camera-sync module owns a handful of single registers.

    blocks are derived one from another in a single ordered chain: changing the capacity of a kind shifts every block after it, so no address here is ever picked by hand except the firmware version and identity registers which live far above the chain.
*/

/// integer used for addressing board registers
pub type Address = u16;
/// integer held by one board register
pub type Value = u32;


/// number of laser trigger modules on the board
pub const LASERS: usize = 8;
/// number of digital (TTL) outputs on the board
pub const DIGITAL_OUTPUTS: usize = 4;
/// number of servo outputs on the board
pub const SERVOS: usize = 7;
/// number of PWM outputs on the board
pub const PWMS: usize = 5;
/// number of analog inputs on boards supporting them
pub const ANALOG_INPUTS: usize = 8;
/// there is at most one camera-sync module per board
pub const CAMERAS: usize = 1;


/**
    a contiguous range of registers, one per channel of a device kind

    it only holds addresses, hence can be created, copied or destroyed at no cost
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    base: Address,
    capacity: Address,
}
impl Block {
    /// first block of the register space
    pub const fn first(capacity: usize) -> Self {
        Self {base: 0, capacity: capacity as Address}
    }
    /// block starting right after this one
    pub const fn next(self, capacity: usize) -> Self {
        Self {base: self.end(), capacity: capacity as Address}
    }
    /// address of the channel 0 of this block
    pub const fn base(&self) -> Address {self.base}
    /// number of registers in this block
    pub const fn capacity(&self) -> usize {self.capacity as usize}
    /// first address after this block
    pub const fn end(&self) -> Address {self.base + self.capacity}
    /// address of the given channel, if it belongs to this block
    pub const fn at(&self, index: u16) -> Option<Address> {
        if index < self.capacity
            {Some(self.base + index)}
        else
            {None}
    }
}


/// laser trigger modes
pub const LASER_MODE: Block = Block::first(LASERS);
/// laser pulse durations
pub const LASER_DURATION: Block = LASER_MODE.next(LASERS);
/// laser on/off sequences
pub const LASER_SEQUENCE: Block = LASER_DURATION.next(LASERS);
/// digital outputs
pub const DIGITAL_OUTPUT: Block = LASER_SEQUENCE.next(DIGITAL_OUTPUTS);
/// servo outputs
pub const SERVO: Block = DIGITAL_OUTPUT.next(SERVOS);
/// PWM outputs
pub const PWM: Block = SERVO.next(PWMS);

/// camera sync mode, active or passive
pub const CAMERA_MODE: Block = PWM.next(CAMERAS);
/// camera sync start/stop, only meaningful in active mode
pub const CAMERA_START: Block = CAMERA_MODE.next(CAMERAS);
/// camera trigger pulse length
pub const CAMERA_PULSE: Block = CAMERA_START.next(CAMERAS);
/// camera timing window, a period or a read-out time depending on the board
pub const CAMERA_WINDOW: Block = CAMERA_PULSE.next(CAMERAS);
/// camera exposure
pub const CAMERA_EXPOSURE: Block = CAMERA_WINDOW.next(CAMERAS);
/// delay between camera trigger and laser triggers
pub const CAMERA_DELAY: Block = CAMERA_EXPOSURE.next(CAMERAS);

/// analog inputs
pub const ANALOG_INPUT: Block = CAMERA_DELAY.next(ANALOG_INPUTS);

/// firmware version
pub const VERSION: Address = 100;
/// board identity
pub const ID: Address = 101;

/// firmware version this driver speaks to
pub const CURRENT_VERSION: Value = 2;

const _: () = assert!(ANALOG_INPUT.end() <= VERSION, "register blocks overlap the identification registers");


#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN: [Block; 13] = [
        LASER_MODE, LASER_DURATION, LASER_SEQUENCE,
        DIGITAL_OUTPUT, SERVO, PWM,
        CAMERA_MODE, CAMERA_START, CAMERA_PULSE, CAMERA_WINDOW, CAMERA_EXPOSURE, CAMERA_DELAY,
        ANALOG_INPUT,
        ];

    #[test]
    fn blocks_are_contiguous() {
        assert_eq!(CHAIN[0].base(), 0);
        for pair in CHAIN.windows(2) {
            assert_eq!(pair[0].end(), pair[1].base());
        }
    }

    #[test]
    fn blocks_never_collide() {
        let mut seen = [false; VERSION as usize];
        for block in CHAIN {
            for index in 0 .. block.capacity() as u16 {
                let address = block.at(index).unwrap();
                assert!(!seen[usize::from(address)], "address {} allocated twice", address);
                seen[usize::from(address)] = true;
            }
        }
    }

    #[test]
    fn channel_outside_block() {
        assert_eq!(DIGITAL_OUTPUT.at(0), Some(DIGITAL_OUTPUT.base()));
        assert_eq!(DIGITAL_OUTPUT.at(3), Some(DIGITAL_OUTPUT.base() + 3));
        assert_eq!(DIGITAL_OUTPUT.at(4), None);
        assert_eq!(CAMERA_MODE.at(1), None);
    }

    #[test]
    fn known_layout() {
        assert_eq!(DIGITAL_OUTPUT.base(), 24);
        assert_eq!(SERVO.base(), 28);
        assert_eq!(PWM.base(), 35);
        assert_eq!(CAMERA_MODE.base(), 40);
        assert_eq!(CAMERA_DELAY.base(), 45);
        assert_eq!(ANALOG_INPUT.base(), 46);
    }
}
