//! Streaming TSIP link
//!
//! [`Link`] owns the transport and the framing state machine. It finds packet
//! headers, resolves DLE escapes while payload is read, and recovers packet
//! alignment after garbage or truncated packets. The state survives between
//! calls, so a non-blocking caller that runs out of data resumes exactly where
//! it stopped instead of misreading payload bytes as a header.
//!
//! Reads inside a packet block until data arrives. Once a header has been
//! accepted, the link never hands control back in the middle of an escape
//! sequence.

use copernicus_hal::ByteTransport;

use crate::frame::{DLE, ETX};

/// Position of the link relative to packet boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Between packets, waiting for the DLE that opens the next one
    Seek,
    /// DLE consumed, the next byte is a report id (or DLE/ETX)
    Header,
    /// Header consumed, payload of the current packet not fully read
    Payload,
    /// Discarding bytes up to the next DLE ETX
    Resync,
}

/// Framing state machine over a byte transport
pub struct Link<T> {
    transport: T,
    state: LinkState,
}

impl<T: ByteTransport> Link<T> {
    /// Create a link positioned between packets
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: LinkState::Seek,
        }
    }

    /// Current framing state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Get a reference to the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport
    ///
    /// Reading from the transport directly bypasses the framing state.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Spin until the transport has at least one byte
    pub fn block_for_data(&mut self) {
        while self.transport.available() == 0 {
            core::hint::spin_loop();
        }
    }

    fn next_byte(&mut self) -> u8 {
        loop {
            self.block_for_data();
            if let Some(byte) = self.transport.read_byte() {
                return byte;
            }
        }
    }

    fn peek_next(&mut self) -> u8 {
        loop {
            self.block_for_data();
            if let Some(byte) = self.transport.peek_byte() {
                return byte;
            }
        }
    }

    /// Find the next packet header and return its report id
    ///
    /// Bytes outside packets are skipped, and an unfinished packet is
    /// discarded first. Without `block`, returns `None` as soon as the
    /// transport runs dry between packets; the state is kept so the next
    /// call continues the scan.
    pub fn next_report(&mut self, block: bool) -> Option<u8> {
        loop {
            match self.state {
                LinkState::Seek => {
                    if !block && self.transport.available() == 0 {
                        return None;
                    }
                    if self.next_byte() == DLE {
                        self.state = LinkState::Header;
                    }
                }
                LinkState::Header => match self.next_byte() {
                    // Escaped data byte: we are inside a packet
                    DLE => self.state = LinkState::Resync,
                    // End of a packet we never saw start
                    ETX => self.state = LinkState::Seek,
                    id => {
                        self.state = LinkState::Payload;
                        return Some(id);
                    }
                },
                LinkState::Payload | LinkState::Resync => {
                    if !self.skip_packet(block) {
                        return None;
                    }
                }
            }
        }
    }

    /// Discard the rest of the current packet
    ///
    /// Scans for DLE ETX, stepping over escaped DLE pairs. A DLE followed
    /// by any other byte is the header of a new packet, which is left for
    /// [`Link::next_report`]. Returns `true` once the link sits on a packet
    /// boundary, or `false` if `block` is off and data ran out first.
    pub fn skip_packet(&mut self, block: bool) -> bool {
        if matches!(self.state, LinkState::Seek | LinkState::Header) {
            return true;
        }
        self.state = LinkState::Resync;

        loop {
            if !block && self.transport.available() == 0 {
                return false;
            }
            if self.next_byte() != DLE {
                continue;
            }
            match self.peek_next() {
                ETX => {
                    self.transport.read_byte();
                    self.state = LinkState::Seek;
                    return true;
                }
                DLE => {
                    self.transport.read_byte();
                }
                _ => {
                    self.state = LinkState::Header;
                    return true;
                }
            }
        }
    }

    /// Read decoded payload bytes into `dst`
    ///
    /// Blocks until `dst` is full or the packet ends. Returns the number of
    /// bytes decoded; a short count means the packet ended early (the DLE
    /// ETX is consumed) or a new header interrupted it.
    pub fn read_data(&mut self, dst: &mut [u8]) -> usize {
        for (i, slot) in dst.iter_mut().enumerate() {
            let byte = self.next_byte();
            if byte == DLE {
                match self.peek_next() {
                    DLE => {
                        self.transport.read_byte();
                    }
                    ETX => {
                        self.transport.read_byte();
                        self.state = LinkState::Seek;
                        return i;
                    }
                    _ => {
                        // Truncated packet, a new header follows
                        self.state = LinkState::Header;
                        return i;
                    }
                }
            }
            *slot = byte;
        }
        dst.len()
    }

    /// Consume the DLE ETX that closes a packet
    ///
    /// Returns `false` if the packet does not end here. The link is then
    /// left to resynchronize on the next call to [`Link::next_report`].
    pub fn end_report(&mut self) -> bool {
        if self.next_byte() != DLE {
            self.state = LinkState::Resync;
            return false;
        }
        match self.peek_next() {
            ETX => {
                self.transport.read_byte();
                self.state = LinkState::Seek;
                true
            }
            DLE => {
                // More payload than expected
                self.transport.read_byte();
                self.state = LinkState::Resync;
                false
            }
            _ => {
                self.state = LinkState::Header;
                false
            }
        }
    }

    /// Write a packet header
    pub fn begin_packet(&mut self, id: u8) -> Result<(), T::Error> {
        self.transport.write_byte(DLE)?;
        self.transport.write_byte(id)
    }

    /// Write payload bytes, doubling every DLE
    ///
    /// May be called repeatedly between [`Link::begin_packet`] and
    /// [`Link::end_packet`].
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), T::Error> {
        for &byte in data {
            self.transport.write_byte(byte)?;
            if byte == DLE {
                self.transport.write_byte(DLE)?;
            }
        }
        Ok(())
    }

    /// Write the DLE ETX trailer
    pub fn end_packet(&mut self) -> Result<(), T::Error> {
        self.transport.write_byte(DLE)?;
        self.transport.write_byte(ETX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copernicus_hal::BufferTransport;

    type TestLink = Link<BufferTransport<64, 64>>;

    fn link_with(data: &[u8]) -> TestLink {
        let mut transport = BufferTransport::new();
        transport.feed(data).unwrap();
        Link::new(transport)
    }

    #[test]
    fn test_next_report_skips_garbage() {
        let mut link = link_with(&[0x00, 0xFF, 0x42, DLE, 0x41, 0x01, DLE, ETX]);

        assert_eq!(link.next_report(false), Some(0x41));
        assert_eq!(link.state(), LinkState::Payload);
    }

    #[test]
    fn test_next_report_non_blocking_empty() {
        let mut link = link_with(&[]);
        assert_eq!(link.next_report(false), None);
        assert_eq!(link.state(), LinkState::Seek);
    }

    #[test]
    fn test_empty_packet_is_skipped() {
        let mut link = link_with(&[DLE, ETX, DLE, 0x46, 0x00, 0x00, DLE, ETX]);
        assert_eq!(link.next_report(false), Some(0x46));
    }

    #[test]
    fn test_double_dle_is_not_a_header() {
        // Joined mid-packet: the escaped DLE pair must not open a packet
        let mut link = link_with(&[DLE, DLE, 0x4A, 0x07, DLE, ETX, DLE, 0x82, 0x03, DLE, ETX]);

        assert_eq!(link.next_report(false), Some(0x82));
    }

    #[test]
    fn test_read_data_unescapes() {
        let mut link = link_with(&[0x01, DLE, DLE, 0x02, DLE, ETX]);
        let mut buf = [0u8; 3];

        assert_eq!(link.read_data(&mut buf), 3);
        assert_eq!(buf, [0x01, DLE, 0x02]);
        assert!(link.end_report());
        assert_eq!(link.state(), LinkState::Seek);
    }

    #[test]
    fn test_read_data_short_packet() {
        let mut link = link_with(&[0x01, 0x02, DLE, ETX, 0x55]);
        let mut buf = [0u8; 4];

        assert_eq!(link.read_data(&mut buf), 2);
        assert_eq!(&buf[..2], &[0x01, 0x02]);
        assert_eq!(link.state(), LinkState::Seek);
        // The terminator was consumed, nothing beyond it
        assert_eq!(link.transport().pending(), 1);
    }

    #[test]
    fn test_read_data_interrupted_by_header() {
        let mut link = link_with(&[0x01, DLE, 0x46, 0x00, 0x00, DLE, ETX]);
        link.state = LinkState::Payload;
        let mut buf = [0u8; 4];

        assert_eq!(link.read_data(&mut buf), 1);
        assert_eq!(link.state(), LinkState::Header);
        assert_eq!(link.next_report(false), Some(0x46));
    }

    #[test]
    fn test_end_report_mismatch() {
        let mut link = link_with(&[0x07, 0x08, DLE, ETX, DLE, 0x41]);
        link.state = LinkState::Payload;

        assert!(!link.end_report());
        assert_eq!(link.state(), LinkState::Resync);
        assert_eq!(link.next_report(false), Some(0x41));
    }

    #[test]
    fn test_skip_packet_steps_over_escapes() {
        let mut link = link_with(&[0x01, DLE, DLE, ETX, 0x02, DLE, ETX, DLE, 0x43]);
        link.state = LinkState::Payload;

        assert!(link.skip_packet(true));
        assert_eq!(link.state(), LinkState::Seek);
        assert_eq!(link.next_report(false), Some(0x43));
    }

    #[test]
    fn test_skip_packet_resumes_after_running_dry() {
        let mut link = link_with(&[0x01, 0x02]);
        link.state = LinkState::Payload;

        assert!(!link.skip_packet(false));
        assert_eq!(link.state(), LinkState::Resync);

        // DLE 0x4A inside the rest of the packet would look like a header
        // if the scan restarted from Seek
        link.transport_mut().feed(&[DLE, DLE, 0x4A, DLE, ETX, DLE, 0x46]).unwrap();
        assert_eq!(link.next_report(false), Some(0x46));
    }

    #[test]
    fn test_skip_packet_at_boundary_is_noop() {
        let mut link = link_with(&[0x99, DLE, ETX]);
        assert!(link.skip_packet(false));
        assert_eq!(link.transport().pending(), 3);
    }

    #[test]
    fn test_write_packet() {
        let mut link = link_with(&[]);
        link.begin_packet(0x35).unwrap();
        link.write_data(&[0x02, DLE]).unwrap();
        link.write_data(&[0x00]).unwrap();
        link.end_packet().unwrap();

        assert_eq!(
            link.transport().written(),
            &[DLE, 0x35, 0x02, DLE, DLE, 0x00, DLE, ETX]
        );
    }
}
