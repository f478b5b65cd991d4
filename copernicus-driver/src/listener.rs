//! Packet processors for reports the engine does not decode
//!
//! Clients that need other TSIP reports register a [`PacketProcessor`].
//! Processors are offered each unrecognised packet in registration order,
//! with the header already consumed, and read the payload straight from the
//! [`Link`].

use copernicus_hal::ByteTransport;
use copernicus_protocol::Link;
use heapless::Vec;

use crate::error::ListenerError;

/// Maximum number of registered processors
pub const MAX_LISTENERS: usize = 8;

/// Outcome of offering a packet to a processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketStatus {
    /// Not interested; no bytes were consumed
    Ignore,
    /// Fully processed, including the DLE ETX trailer
    Consumed,
    /// Some payload read; the rest must be discarded
    Partial,
    /// Processing failed; the rest must be discarded
    Error,
}

/// Handler for TSIP reports outside the engine's own set
///
/// Implementations must never leave the link inside a DLE escape, which
/// holds as long as payload is read through [`Link::read_data`] and
/// [`Link::end_report`]. Processors are shared (`&self`), so state that
/// changes per packet belongs in a `Cell` or `RefCell`.
pub trait PacketProcessor<T: ByteTransport> {
    /// Handle report `report`, whose payload is waiting in `link`
    fn process_packet(&self, report: u8, link: &mut Link<T>) -> PacketStatus;
}

/// Same processor: equal data address and equal vtable
///
/// Zero-sized processors of different types share a data address, so the
/// vtable is what tells them apart.
#[allow(ambiguous_wide_pointer_comparisons)]
fn same_processor<'p, T: ByteTransport>(
    a: &'p dyn PacketProcessor<T>,
    b: &'p dyn PacketProcessor<T>,
) -> bool {
    core::ptr::eq(a, b)
}

/// Ordered, fixed-capacity set of packet processors
///
/// Processors are compared by reference identity (address and type), so
/// registering the same one twice has no effect.
pub struct ListenerRegistry<'a, T: ByteTransport + 'a> {
    entries: Vec<&'a dyn PacketProcessor<T>, MAX_LISTENERS>,
}

impl<'a, T: ByteTransport + 'a> Default for ListenerRegistry<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: ByteTransport + 'a> ListenerRegistry<'a, T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of registered processors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if a processor is registered
    pub fn contains(&self, processor: &dyn PacketProcessor<T>) -> bool {
        self.entries
            .iter()
            .any(|&entry| same_processor(entry, processor))
    }

    /// Register a processor at the end of the order
    ///
    /// Succeeds without change if it is already registered.
    pub fn add(&mut self, processor: &'a dyn PacketProcessor<T>) -> Result<(), ListenerError> {
        if self.contains(processor) {
            return Ok(());
        }
        self.entries
            .push(processor)
            .map_err(|_| ListenerError::Full)
    }

    /// Unregister a processor, keeping the order of the rest
    pub fn remove(&mut self, processor: &dyn PacketProcessor<T>) {
        if let Some(index) = self
            .entries
            .iter()
            .position(|&entry| same_processor(entry, processor))
        {
            self.entries.remove(index);
        }
    }

    /// Offer a packet to each processor in turn
    ///
    /// Stops at the first processor that does not ignore it and returns its
    /// status. [`PacketStatus::Ignore`] means nobody claimed the packet.
    pub fn dispatch(&self, report: u8, link: &mut Link<T>) -> PacketStatus {
        for processor in &self.entries {
            let status = processor.process_packet(report, link);
            if status != PacketStatus::Ignore {
                return status;
            }
        }
        PacketStatus::Ignore
    }
}
