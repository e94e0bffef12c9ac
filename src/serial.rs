/*!
    transport over the USB serial link of the board

    every access is a single request: a write is sent without answer, a read is answered by the register value as 4 little endian bytes.

    requests start with an access byte whose most significant bit is set for writes, followed by the register address and, for writes, the value, both as 4 little endian bytes.
*/

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
    vec::Vec,
    };
use packbytes::ToBytes;
use serial2::SerialPort;
use log::*;

use crate::{
    command::{ReadRequest, WriteRequest},
    device::DeviceId,
    registers::{self, Address, Value},
    transport::Transport,
    };


/// baud rate of the board firmware
pub const DEFAULT_BAUD_RATE: u32 = 57_600;
/// time the board has to answer a read
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);


/// serial link to a board, opened on [Transport::connect]
pub struct SerialTransport {
    path: Option<PathBuf>,
    rate: u32,
    timeout: Duration,
    port: Option<SerialPort>,
}
impl SerialTransport {
    /// link to the board on the given serial port
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            .. Self::discover()
        }
    }
    /// link to the first serial port answering like a supported board
    pub fn discover() -> Self {
        Self {
            path: None,
            rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            port: None,
        }
    }
    pub fn with_baud_rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    /// path of the opened port, if any
    pub fn path(&self) -> Option<&Path> {self.path.as_deref()}

    fn open(&self, path: &Path) -> io::Result<SerialPort> {
        let mut port = SerialPort::open(path, self.rate)?;
        port.set_read_timeout(self.timeout)?;
        port.discard_buffers()?;
        Ok(port)
    }
    /// whether a board of a supported identity answers on this port
    fn probe(port: &SerialPort) -> bool {
        match exchange(port, registers::ID) {
            Ok(id) => DeviceId::from_register(id).is_some(),
            Err(_) => false,
        }
    }
    fn port(&self) -> io::Result<&SerialPort> {
        self.port.as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port is not opened"))
    }
}

fn exchange(port: &SerialPort, address: Address) -> io::Result<Value> {
    port.write_all(ReadRequest::new(address).to_le_bytes().as_ref())?;
    let mut answer = [0; 4];
    port.read_exact(&mut answer)?;
    Ok(Value::from_le_bytes(answer))
}

impl Transport for SerialTransport {
    type Error = io::Error;

    fn connect(&mut self) -> io::Result<()> {
        if let Some(path) = &self.path {
            self.port = Some(self.open(path)?);
            info!("opened board on {}", path.display());
            return Ok(())
        }
        let candidates: Vec<PathBuf> = SerialPort::available_ports()?;
        for path in candidates {
            debug!("probing {}", path.display());
            match self.open(&path) {
                Ok(port) if Self::probe(&port) => {
                    info!("found board on {}", path.display());
                    self.port = Some(port);
                    self.path = Some(path);
                    return Ok(())
                },
                Ok(_) => debug!("no board answering on {}", path.display()),
                Err(error) => debug!("cannot open {}: {}", path.display(), error),
            }
        }
        Err(io::Error::new(io::ErrorKind::NotFound, "no board found on any serial port"))
    }
    fn disconnect(&mut self) -> io::Result<()> {
        // dropping the port closes it
        self.port = None;
        Ok(())
    }
    fn read(&mut self, address: Address) -> io::Result<Value> {
        exchange(self.port()?, address)
    }
    fn write(&mut self, address: Address, value: Value) -> io::Result<()> {
        self.port()?.write_all(WriteRequest::new(address, value).to_le_bytes().as_ref())
    }
}
