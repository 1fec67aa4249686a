//! Register transport between the driver and the chip

use embedded_hal::blocking::i2c::{Write, WriteRead};
use heapless::Vec;
use log::trace;

/// Longest burst the driver writes (seconds..years)
pub const MAX_BURST: usize = 7_usize;

/// Register-addressed access to the chip. Implementations own retry and
/// timeout policy.
pub trait RegisterBus {
    type Error;

    /// Write `bytes` to consecutive registers starting at `register`, in one
    /// transaction
    fn write_registers(&mut self, register: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buffer` from consecutive registers starting at `register`,
    /// returning how many bytes were actually read
    fn read_registers(&mut self, register: u8, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Errors from [`I2cBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cError<E> {
    /// The peripheral reported a failure
    I2c(E),
    /// More than [`MAX_BURST`] bytes were handed to one write. Nothing was
    /// sent.
    BurstTooLong(usize),
}

/// [`RegisterBus`] over a blocking embedded-hal I2C peripheral
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}
impl<I2C> I2cBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterBus for I2cBus<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    type Error = I2cError<E>;

    fn write_registers(&mut self, register: u8, bytes: &[u8]) -> Result<(), I2cError<E>> {
        trace!("I2C write {} bytes at {:#04x}", bytes.len(), register);

        // Register pointer followed by the payload
        let mut frame: Vec<u8, { MAX_BURST + 1 }> = Vec::new();
        let _ = frame.push(register);
        frame
            .extend_from_slice(bytes)
            .map_err(|_| I2cError::BurstTooLong(bytes.len()))?;

        self.i2c.write(self.address, &frame).map_err(I2cError::I2c)
    }

    fn read_registers(&mut self, register: u8, buffer: &mut [u8]) -> Result<usize, I2cError<E>> {
        trace!("I2C read {} bytes at {:#04x}", buffer.len(), register);

        self.i2c
            .write_read(self.address, &[register], buffer)
            .map_err(I2cError::I2c)?;
        Ok(buffer.len())
    }
}
