//! Driver error types

use copernicus_protocol::Underrun;

/// Errors from commands sent to the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsError<E> {
    /// Writing to the transport failed
    Transport(E),
    /// The receiver's reply ended before the expected data
    ShortReply,
}

impl<E> From<Underrun> for GpsError<E> {
    fn from(_: Underrun) -> Self {
        GpsError::ShortReply
    }
}

/// Errors from the listener registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListenerError {
    /// All listener slots are taken
    Full,
}
