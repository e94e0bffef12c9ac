use bilge::prelude::*;
use packbytes::{FromBytes, ToBytes};

use crate::{
    pack_bilge,
    registers::{Address, Value},
    };


/// type of register access, first byte of every request
#[bitsize(8)]
#[derive(Copy, Clone, FromBits, DebugBits, PartialEq)]
pub struct Access {
    reserved: u7,
    /// set for a write, clear for a read
    pub write: bool,
}
pack_bilge!(Access);

/// request writing a register, the board does not answer it
#[derive(Copy, Clone, FromBytes, ToBytes, Debug)]
pub struct WriteRequest {
    pub access: Access,
    pub address: u32,
    pub value: u32,
}
/// request reading a register, the board answers with the value as 4 little endian bytes
#[derive(Copy, Clone, FromBytes, ToBytes, Debug)]
pub struct ReadRequest {
    pub access: Access,
    pub address: u32,
}

impl WriteRequest {
    pub fn new(address: Address, value: Value) -> Self {
        let mut access = Access::from(0u8);
        access.set_write(true);
        Self {access, address: address.into(), value}
    }
}
impl ReadRequest {
    pub fn new(address: Address) -> Self {
        let mut access = Access::from(0u8);
        access.set_write(false);
        Self {access, address: address.into()}
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_frame() {
        let frame = WriteRequest::new(0x0123, 0xdead_beef).to_le_bytes();
        let bytes: &[u8] = frame.as_ref();
        assert_eq!(bytes, &[0x80, 0x23, 0x01, 0, 0, 0xef, 0xbe, 0xad, 0xde][..]);
    }

    #[test]
    fn read_frame() {
        let frame = ReadRequest::new(101).to_le_bytes();
        let bytes: &[u8] = frame.as_ref();
        assert_eq!(bytes, &[0x00, 101, 0, 0, 0][..]);
    }
}
