//! Serial byte transport abstraction
//!
//! The TSIP engine consumes its link one byte at a time and needs a single
//! byte of lookahead to resolve DLE escape sequences.

/// Byte-oriented serial link
///
/// Reads never block: they report what is buffered right now. Callers that
/// need to wait poll [`ByteTransport::available`].
pub trait ByteTransport {
    /// Error type for transmit operations
    type Error;

    /// Number of bytes that can be read without waiting
    fn available(&mut self) -> usize;

    /// Read the next byte, or `None` if nothing is buffered
    fn read_byte(&mut self) -> Option<u8>;

    /// Look at the next byte without consuming it
    fn peek_byte(&mut self) -> Option<u8>;

    /// Write a single byte to the link
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write every byte of `data` in order
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

impl<T: ByteTransport + ?Sized> ByteTransport for &mut T {
    type Error = T::Error;

    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn peek_byte(&mut self) -> Option<u8> {
        (**self).peek_byte()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(data)
    }
}
