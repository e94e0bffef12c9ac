/*!
    seam between the driver and the physical link to the board

    the driver only needs four capabilities from the link. Framing, timeouts and retries are the business of the implementor.

    a transport is exclusively owned by one [Controller](crate::Controller). Channels never hold it, they borrow it from the controller for the duration of each access.
*/

use core::fmt::Debug;
use crate::registers::{Address, Value};


/// link to the board register space
pub trait Transport {
    /// error reported by the link, it is logged by the driver
    type Error: Debug;

    fn connect(&mut self) -> Result<(), Self::Error>;
    fn disconnect(&mut self) -> Result<(), Self::Error>;
    /// read the current value of a register, the board is the authority on it
    fn read(&mut self, address: Address) -> Result<Value, Self::Error>;
    fn write(&mut self, address: Address, value: Value) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn connect(&mut self) -> Result<(), Self::Error> {
        (**self).connect()
    }
    fn disconnect(&mut self) -> Result<(), Self::Error> {
        (**self).disconnect()
    }
    fn read(&mut self, address: Address) -> Result<Value, Self::Error> {
        (**self).read(address)
    }
    fn write(&mut self, address: Address, value: Value) -> Result<(), Self::Error> {
        (**self).write(address, value)
    }
}
