//! Packet framing for TSIP.
//!
//! Frame format:
//! - DLE (1 byte): 0x10 start of packet
//! - ID (1 byte): report or command identifier
//! - DATA (0-N bytes): payload, with every literal 0x10 doubled
//! - DLE ETX (2 bytes): 0x10 0x03 end of packet
//!
//! The functions here build wire bytes in caller-owned buffers. Streaming
//! reads and writes against a live transport go through [`crate::link::Link`].

use heapless::Vec;

/// Data link escape: opens a packet, and doubled escapes itself in data
pub const DLE: u8 = 0x10;

/// End of text: follows a DLE to close a packet
pub const ETX: u8 = 0x03;

/// Errors that can occur while building frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Length of `data` once escaped for the wire
pub fn escaped_len(data: &[u8]) -> usize {
    data.len() + data.iter().filter(|&&byte| byte == DLE).count()
}

/// Length of a complete packet carrying `payload`
pub fn packet_len(payload: &[u8]) -> usize {
    2 + escaped_len(payload) + 2
}

/// Escape `data` into `out`, doubling every DLE
///
/// Returns the number of bytes written
pub fn escape_into(data: &[u8], out: &mut [u8]) -> Result<usize, FrameError> {
    if out.len() < escaped_len(data) {
        return Err(FrameError::BufferTooSmall);
    }

    let mut len = 0;
    for &byte in data {
        out[len] = byte;
        len += 1;
        if byte == DLE {
            out[len] = DLE;
            len += 1;
        }
    }
    Ok(len)
}

/// Encode a complete packet into a byte buffer
///
/// Returns the number of bytes written
pub fn encode_packet(id: u8, payload: &[u8], out: &mut [u8]) -> Result<usize, FrameError> {
    let frame_len = packet_len(payload);
    if out.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    out[0] = DLE;
    out[1] = id;
    let data_len = escape_into(payload, &mut out[2..])?;
    out[2 + data_len] = DLE;
    out[3 + data_len] = ETX;

    Ok(frame_len)
}

/// Encode a complete packet into a heapless Vec
pub fn encode_to_vec<const N: usize>(id: u8, payload: &[u8]) -> Result<Vec<u8, N>, FrameError> {
    let mut vec = Vec::new();
    vec.resize(packet_len(payload), 0)
        .map_err(|_| FrameError::BufferTooSmall)?;
    let len = encode_packet(id, payload, &mut vec)?;
    vec.truncate(len);
    Ok(vec)
}
