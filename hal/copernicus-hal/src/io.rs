//! Adapter for `embedded-io` serial devices
//!
//! Most chip HALs expose their UARTs through the `embedded-io` traits.
//! [`IoTransport`] turns any such device into a [`ByteTransport`] by holding
//! one byte of lookahead for [`ByteTransport::peek_byte`].

use embedded_io::{ErrorType, Read, ReadReady, Write};

use crate::transport::ByteTransport;

/// [`ByteTransport`] over an `embedded-io` device
pub struct IoTransport<D> {
    device: D,
    lookahead: Option<u8>,
}

impl<D> IoTransport<D> {
    /// Wrap a serial device
    pub fn new(device: D) -> Self {
        Self {
            device,
            lookahead: None,
        }
    }

    /// Get a reference to the wrapped device
    pub fn inner(&self) -> &D {
        &self.device
    }

    /// Get a mutable reference to the wrapped device
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the wrapped device
    ///
    /// A byte held for lookahead is returned alongside it.
    pub fn into_inner(self) -> (D, Option<u8>) {
        (self.device, self.lookahead)
    }
}

impl<D: Read + ReadReady> IoTransport<D> {
    /// Pull one byte from the device if it has one ready
    fn fetch(&mut self) -> Option<u8> {
        // Read errors look like an idle line; the engine keeps polling
        if !matches!(self.device.read_ready(), Ok(true)) {
            return None;
        }
        let mut buf = [0u8; 1];
        match self.device.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

impl<D: Read + ReadReady + Write> ByteTransport for IoTransport<D> {
    type Error = <D as ErrorType>::Error;

    fn available(&mut self) -> usize {
        if self.lookahead.is_some() {
            return 1;
        }
        match self.device.read_ready() {
            Ok(true) => 1,
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        match self.lookahead.take() {
            Some(byte) => Some(byte),
            None => self.fetch(),
        }
    }

    fn peek_byte(&mut self) -> Option<u8> {
        if self.lookahead.is_none() {
            self.lookahead = self.fetch();
        }
        self.lookahead
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.device.write_all(&[byte])
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.device.write_all(data)
    }
}
