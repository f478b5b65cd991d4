//! Fixed-capacity in-memory transport
//!
//! Receive bytes are queued by the owner with [`BufferTransport::feed`];
//! everything the engine transmits is captured for inspection. Useful for
//! replaying captured receiver traffic and for host-side testing.

use heapless::{Deque, Vec};

use crate::transport::ByteTransport;

/// Errors from the in-memory transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// Receive queue or transmit log is full
    Full,
}

/// In-memory serial link with `RX` bytes of receive queue and `TX` bytes of
/// transmit log
#[derive(Debug, Clone, Default)]
pub struct BufferTransport<const RX: usize, const TX: usize> {
    rx: Deque<u8, RX>,
    tx: Vec<u8, TX>,
}

impl<const RX: usize, const TX: usize> BufferTransport<RX, TX> {
    /// Create an empty transport
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes to be read by the engine
    ///
    /// Bytes that fit are queued even when the call fails.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), BufferError> {
        for &byte in data {
            self.rx.push_back(byte).map_err(|_| BufferError::Full)?;
        }
        Ok(())
    }

    /// Number of received bytes not yet consumed
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Bytes written by the engine so far
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Discard the transmit log
    pub fn clear_written(&mut self) {
        self.tx.clear();
    }
}

impl<const RX: usize, const TX: usize> ByteTransport for BufferTransport<RX, TX> {
    type Error = BufferError;

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        self.rx.front().copied()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.tx.push(byte).map_err(|_| BufferError::Full)
    }
}
