//! Fixed-layout report decoders
//!
//! Each decoder is called with the report header already consumed. It reads
//! its fields in wire order through the [`Link`], then the DLE ETX trailer.
//! Records are built in full before being returned, so a failed decode never
//! yields a half-written record.

use copernicus_hal::ByteTransport;
use heapless::Vec;

use crate::link::Link;
use crate::records::{
    Float32, Float64, GpsHealth, GpsTime, LlaFix, SatelliteSelection, VelocityEnu, VelocityXyz,
    XyzFix,
};
use crate::settings::IoOptions;

/// The packet ended (or broke off) before the expected data was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Underrun;

/// A fixed-size big-endian field
pub trait WireField: Sized {
    /// Read one field from the current packet
    fn read<T: ByteTransport>(link: &mut Link<T>) -> Result<Self, Underrun>;
}

/// Read exactly `N` decoded bytes
pub fn read_array<T: ByteTransport, const N: usize>(
    link: &mut Link<T>,
) -> Result<[u8; N], Underrun> {
    let mut buf = [0u8; N];
    if link.read_data(&mut buf) != N {
        return Err(Underrun);
    }
    Ok(buf)
}

/// Consume the packet trailer
pub fn finish<T: ByteTransport>(link: &mut Link<T>) -> Result<(), Underrun> {
    if link.end_report() {
        Ok(())
    } else {
        Err(Underrun)
    }
}

impl WireField for u8 {
    fn read<T: ByteTransport>(link: &mut Link<T>) -> Result<Self, Underrun> {
        let [byte] = read_array(link)?;
        Ok(byte)
    }
}

impl WireField for i16 {
    fn read<T: ByteTransport>(link: &mut Link<T>) -> Result<Self, Underrun> {
        Ok(i16::from_be_bytes(read_array(link)?))
    }
}

impl WireField for u32 {
    fn read<T: ByteTransport>(link: &mut Link<T>) -> Result<Self, Underrun> {
        Ok(u32::from_be_bytes(read_array(link)?))
    }
}

impl WireField for Float32 {
    fn read<T: ByteTransport>(link: &mut Link<T>) -> Result<Self, Underrun> {
        Ok(Float32::from_bits(u32::from_be_bytes(read_array(link)?)))
    }
}

impl WireField for Float64 {
    fn read<T: ByteTransport>(link: &mut Link<T>) -> Result<Self, Underrun> {
        Ok(Float64::from_bits(u64::from_be_bytes(read_array(link)?)))
    }
}

/// Position fix, lat/lng/alt (0x4A single, 0x84 double)
pub fn lla_fix<F: WireField, T: ByteTransport>(
    link: &mut Link<T>,
) -> Result<LlaFix<F>, Underrun> {
    let fix = LlaFix {
        lat: F::read(link)?,
        lng: F::read(link)?,
        alt: F::read(link)?,
        bias: F::read(link)?,
        fix_time: Float32::read(link)?,
    };
    finish(link)?;
    Ok(fix)
}

/// Position fix, ECEF (0x42 single, 0x83 double)
pub fn xyz_fix<F: WireField, T: ByteTransport>(
    link: &mut Link<T>,
) -> Result<XyzFix<F>, Underrun> {
    let fix = XyzFix {
        x: F::read(link)?,
        y: F::read(link)?,
        z: F::read(link)?,
        bias: F::read(link)?,
        fix_time: Float32::read(link)?,
    };
    finish(link)?;
    Ok(fix)
}

/// Velocity fix, ECEF (0x43)
pub fn velocity_xyz<T: ByteTransport>(link: &mut Link<T>) -> Result<VelocityXyz, Underrun> {
    let fix = VelocityXyz {
        x: Float32::read(link)?,
        y: Float32::read(link)?,
        z: Float32::read(link)?,
        bias: Float32::read(link)?,
        fix_time: Float32::read(link)?,
    };
    finish(link)?;
    Ok(fix)
}

/// Velocity fix, east/north/up (0x56)
pub fn velocity_enu<T: ByteTransport>(link: &mut Link<T>) -> Result<VelocityEnu, Underrun> {
    let fix = VelocityEnu {
        e: Float32::read(link)?,
        n: Float32::read(link)?,
        u: Float32::read(link)?,
        bias: Float32::read(link)?,
        fix_time: Float32::read(link)?,
    };
    finish(link)?;
    Ok(fix)
}

/// GPS time (0x41)
pub fn gps_time<T: ByteTransport>(link: &mut Link<T>) -> Result<GpsTime, Underrun> {
    let time = GpsTime {
        time_of_week: Float32::read(link)?,
        week_no: i16::read(link)?,
        utc_offset: Float32::read(link)?,
    };
    finish(link)?;
    Ok(time)
}

/// Receiver health (0x46)
pub fn health<T: ByteTransport>(link: &mut Link<T>) -> Result<GpsHealth, Underrun> {
    let [_, code] = read_array(link)?;
    finish(link)?;
    Ok(GpsHealth::from_code(code))
}

/// Flags from the additional status report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    pub rtclock_unavailable: bool,
    pub almanac_incomplete: bool,
}

/// Additional status (0x4B)
pub fn additional_status<T: ByteTransport>(link: &mut Link<T>) -> Result<StatusFlags, Underrun> {
    let [_, flags, _] = read_array(link)?;
    finish(link)?;
    Ok(StatusFlags {
        rtclock_unavailable: flags & 0x02 != 0,
        almanac_incomplete: flags & 0x08 != 0,
    })
}

/// Flags from the SBAS mode report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SbasFlags {
    pub corrected: bool,
    pub enabled: bool,
}

/// SBAS mode (0x82)
pub fn sbas_mode<T: ByteTransport>(link: &mut Link<T>) -> Result<SbasFlags, Underrun> {
    let flags = u8::read(link)?;
    finish(link)?;
    Ok(SbasFlags {
        corrected: flags & 0x01 != 0,
        enabled: flags & 0x02 != 0,
    })
}

/// Satellite selection (0x6D)
///
/// The mode byte carries the fix dimension (bits 0-2), the manual flag
/// (bit 3) and the number of PRNs that follow the DOPs (bits 4-7).
pub fn satellite_selection<T: ByteTransport>(
    link: &mut Link<T>,
) -> Result<SatelliteSelection, Underrun> {
    let mode = u8::read(link)?;
    let pdop = Float32::read(link)?;
    let hdop = Float32::read(link)?;
    let vdop = Float32::read(link)?;
    let tdop = Float32::read(link)?;

    let mut prns = Vec::new();
    for _ in 0..(mode >> 4) {
        prns.push(u8::read(link)?).map_err(|_| Underrun)?;
    }
    finish(link)?;

    Ok(SatelliteSelection {
        fix_dimension: mode & 0x07,
        manual: mode & 0x08 != 0,
        pdop,
        hdop,
        vdop,
        tdop,
        prns,
    })
}

/// I/O options reply (0x55)
pub fn io_options<T: ByteTransport>(link: &mut Link<T>) -> Result<IoOptions, Underrun> {
    let bytes = read_array(link)?;
    finish(link)?;
    Ok(IoOptions::from_bytes(bytes))
}
