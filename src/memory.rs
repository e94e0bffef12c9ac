/*!
    in-memory register file standing in for a board

    it implements [Transport] so that the whole driver can run offline, in tests or in simulations. Faults of the link can be injected to observe how the driver reacts.
*/

use core::ops::{Deref, DerefMut};
use log::*;
use thiserror::Error;
use crate::{
    device::DeviceId,
    registers::{self, Address, Value},
    transport::Transport,
    };


/// number of registers in the simulated board, up to the identity register
pub const MEMORY: usize = registers::ID as usize + 1;

/// failure of the simulated link
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board is unreachable")]
    Unreachable,
    #[error("link is closed")]
    Closed,
    #[error("no register at address {0}")]
    InvalidRegister(Address),
    #[error("write to register {0} was dropped")]
    Dropped(Address),
}

/// simulated board register space
pub struct MemoryBoard {
    buffer: [Value; MEMORY],
    connected: bool,
    reachable: bool,
    drop_writes: Option<Address>,
    reads: usize,
    writes: usize,
}
impl MemoryBoard {
    /// a board reporting the given raw identity and firmware version
    pub fn new(id: Value, version: Value) -> Self {
        let mut buffer = [0; MEMORY];
        buffer[usize::from(registers::ID)] = id;
        buffer[usize::from(registers::VERSION)] = version;
        Self {
            buffer,
            connected: false,
            reachable: true,
            drop_writes: None,
            reads: 0,
            writes: 0,
        }
    }
    /// a board of a supported identity, running the expected firmware
    pub fn with_device(id: DeviceId) -> Self {
        Self::new(id.register(), registers::CURRENT_VERSION)
    }
    /// make the next connections fail
    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }
    /// make every write to this address fail, or none if `None`
    pub fn drop_writes(&mut self, address: Option<Address>) {
        self.drop_writes = address;
    }

    pub fn is_connected(&self) -> bool {self.connected}
    /// number of reads the link has served
    pub fn reads(&self) -> usize {self.reads}
    /// number of writes the link has served, failed ones included
    pub fn writes(&self) -> usize {self.writes}

    /// get the current register's value
    pub fn get(&self, address: Address) -> Value {
        self.buffer[usize::from(address)]
    }
    /// set the given register's value, as the board firmware would do
    pub fn set(&mut self, address: Address, value: Value) {
        self.buffer[usize::from(address)] = value;
    }

    fn slot(&mut self, address: Address) -> Result<&mut Value, BoardError> {
        if !self.connected
            {return Err(BoardError::Closed)}
        self.buffer.get_mut(usize::from(address))
            .ok_or(BoardError::InvalidRegister(address))
    }
}
impl Transport for MemoryBoard {
    type Error = BoardError;

    fn connect(&mut self) -> Result<(), BoardError> {
        if !self.reachable
            {return Err(BoardError::Unreachable)}
        debug!("simulated board connected");
        self.connected = true;
        Ok(())
    }
    fn disconnect(&mut self) -> Result<(), BoardError> {
        debug!("simulated board disconnected");
        self.connected = false;
        Ok(())
    }
    fn read(&mut self, address: Address) -> Result<Value, BoardError> {
        self.reads += 1;
        self.slot(address).map(|value| *value)
    }
    fn write(&mut self, address: Address, value: Value) -> Result<(), BoardError> {
        self.writes += 1;
        if self.drop_writes == Some(address)
            {return Err(BoardError::Dropped(address))}
        *self.slot(address)? = value;
        Ok(())
    }
}
impl Deref for MemoryBoard {
    type Target = [Value; MEMORY];
    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}
impl DerefMut for MemoryBoard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}
