//! Latest-value records reported by the receiver
//!
//! All angles are in radians. Fix times are GPS time-of-week seconds at
//! which the fix was acquired, usually a few seconds in the past.

use heapless::Vec;

use crate::report::ReportType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Most satellites a selection report can list (4-bit count)
pub const MAX_SELECTED_SVS: usize = 15;

/// Raw IEEE 754 single-precision value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Float32(u32);

impl Float32 {
    /// Wrap a raw bit pattern
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bit pattern
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Native float value
    pub fn to_f32(self) -> f32 {
        f32::from_bits(self.0)
    }
}

impl From<f32> for Float32 {
    fn from(value: f32) -> Self {
        Self(value.to_bits())
    }
}

/// Raw IEEE 754 double-precision value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Float64(u64);

impl Float64 {
    /// Wrap a raw bit pattern
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bit pattern
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Native float value
    pub fn to_f64(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl From<f64> for Float64 {
    fn from(value: f64) -> Self {
        Self(value.to_bits())
    }
}

/// Time of week marking an invalid or missing time (-1.0)
pub const INVALID_TIME: Float32 = Float32::from_bits(0xBF80_0000);

/// Latitude/longitude/altitude position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LlaFix<F> {
    pub lat: F,
    pub lng: F,
    pub alt: F,
    pub bias: F,
    pub fix_time: Float32,
}

/// Earth-centered, earth-fixed position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct XyzFix<F> {
    pub x: F,
    pub y: F,
    pub z: F,
    pub bias: F,
    pub fix_time: Float32,
}

/// Earth-centered, earth-fixed velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityXyz {
    pub x: Float32,
    pub y: Float32,
    pub z: Float32,
    pub bias: Float32,
    pub fix_time: Float32,
}

/// East/north/up velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityEnu {
    pub e: Float32,
    pub n: Float32,
    pub u: Float32,
    pub bias: Float32,
    pub fix_time: Float32,
}

/// Most recent position fix
///
/// The variant tracks the receiver's reporting mode. Accessors for any other
/// variant return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositionFix {
    /// No fix received yet
    #[default]
    None,
    /// Last position report could not be decoded
    Error,
    LlaSingle(LlaFix<Float32>),
    LlaDouble(LlaFix<Float64>),
    XyzSingle(XyzFix<Float32>),
    XyzDouble(XyzFix<Float64>),
}

impl PositionFix {
    /// Report type that produced this fix
    pub fn report_type(&self) -> ReportType {
        match self {
            PositionFix::None => ReportType::None,
            PositionFix::Error => ReportType::Error,
            PositionFix::LlaSingle(_) => ReportType::PositionLlaSingle,
            PositionFix::LlaDouble(_) => ReportType::PositionLlaDouble,
            PositionFix::XyzSingle(_) => ReportType::PositionXyzSingle,
            PositionFix::XyzDouble(_) => ReportType::PositionXyzDouble,
        }
    }

    pub fn lla_single(&self) -> Option<&LlaFix<Float32>> {
        match self {
            PositionFix::LlaSingle(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn lla_double(&self) -> Option<&LlaFix<Float64>> {
        match self {
            PositionFix::LlaDouble(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn xyz_single(&self) -> Option<&XyzFix<Float32>> {
        match self {
            PositionFix::XyzSingle(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn xyz_double(&self) -> Option<&XyzFix<Float64>> {
        match self {
            PositionFix::XyzDouble(fix) => Some(fix),
            _ => None,
        }
    }

    /// Acquisition time, or [`INVALID_TIME`] without a fix
    pub fn fix_time(&self) -> Float32 {
        match self {
            PositionFix::None | PositionFix::Error => INVALID_TIME,
            PositionFix::LlaSingle(fix) => fix.fix_time,
            PositionFix::LlaDouble(fix) => fix.fix_time,
            PositionFix::XyzSingle(fix) => fix.fix_time,
            PositionFix::XyzDouble(fix) => fix.fix_time,
        }
    }

    /// Check if this holds an actual fix
    pub fn is_valid(&self) -> bool {
        !matches!(self, PositionFix::None | PositionFix::Error)
    }
}

/// Most recent velocity fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VelocityFix {
    /// No fix received yet
    #[default]
    None,
    /// Last velocity report could not be decoded
    Error,
    Xyz(VelocityXyz),
    Enu(VelocityEnu),
}

impl VelocityFix {
    /// Report type that produced this fix
    pub fn report_type(&self) -> ReportType {
        match self {
            VelocityFix::None => ReportType::None,
            VelocityFix::Error => ReportType::Error,
            VelocityFix::Xyz(_) => ReportType::VelocityXyz,
            VelocityFix::Enu(_) => ReportType::VelocityEnu,
        }
    }

    pub fn xyz(&self) -> Option<&VelocityXyz> {
        match self {
            VelocityFix::Xyz(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn enu(&self) -> Option<&VelocityEnu> {
        match self {
            VelocityFix::Enu(fix) => Some(fix),
            _ => None,
        }
    }

    /// Acquisition time, or [`INVALID_TIME`] without a fix
    pub fn fix_time(&self) -> Float32 {
        match self {
            VelocityFix::None | VelocityFix::Error => INVALID_TIME,
            VelocityFix::Xyz(fix) => fix.fix_time,
            VelocityFix::Enu(fix) => fix.fix_time,
        }
    }

    /// Check if this holds an actual fix
    pub fn is_valid(&self) -> bool {
        !matches!(self, VelocityFix::None | VelocityFix::Error)
    }
}

/// GPS time as of the last PPS pulse
///
/// Add one second per PPS edge since the report to get the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsTime {
    /// Seconds into the GPS week
    pub time_of_week: Float32,
    /// Extended GPS week number
    pub week_no: i16,
    /// GPS - UTC offset in seconds
    pub utc_offset: Float32,
}

impl Default for GpsTime {
    fn default() -> Self {
        Self {
            time_of_week: INVALID_TIME,
            week_no: 0,
            utc_offset: Float32::default(),
        }
    }
}

impl GpsTime {
    /// Check if a time report has been decoded
    pub fn is_valid(&self) -> bool {
        self.time_of_week != INVALID_TIME
    }
}

/// Receiver health code (report 0x46)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsHealth {
    /// Health not reported yet
    #[default]
    Unknown,
    /// GPS lock, valid fixes
    DoingFixes,
    /// GPS time not obtained yet
    NoGpsTime,
    /// Satellite geometry too poor for a fix
    PdopTooHigh,
    /// Chosen SV unavailable
    SvUnavailable,
    NoSatellites,
    OneSatellite,
    TwoSatellites,
    ThreeSatellites,
    /// Operating in overdetermined mode
    Overdetermined,
    Other(u8),
}

impl GpsHealth {
    /// Parse a health code from its wire byte
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => GpsHealth::DoingFixes,
            0x01 => GpsHealth::NoGpsTime,
            0x03 => GpsHealth::PdopTooHigh,
            0x04 => GpsHealth::SvUnavailable,
            0x08 => GpsHealth::NoSatellites,
            0x09 => GpsHealth::OneSatellite,
            0x0A => GpsHealth::TwoSatellites,
            0x0B => GpsHealth::ThreeSatellites,
            0xBB => GpsHealth::Overdetermined,
            0xFF => GpsHealth::Unknown,
            other => GpsHealth::Other(other),
        }
    }

    /// Convert to wire byte
    pub fn code(self) -> u8 {
        match self {
            GpsHealth::Unknown => 0xFF,
            GpsHealth::DoingFixes => 0x00,
            GpsHealth::NoGpsTime => 0x01,
            GpsHealth::PdopTooHigh => 0x03,
            GpsHealth::SvUnavailable => 0x04,
            GpsHealth::NoSatellites => 0x08,
            GpsHealth::OneSatellite => 0x09,
            GpsHealth::TwoSatellites => 0x0A,
            GpsHealth::ThreeSatellites => 0x0B,
            GpsHealth::Overdetermined => 0xBB,
            GpsHealth::Other(code) => code,
        }
    }
}

/// Receiver status collected from several reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsStatus {
    /// Report 0x46
    pub health: GpsHealth,
    /// Report 0x6D
    pub n_satellites: u8,
    /// Report 0x4B
    pub almanac_incomplete: bool,
    /// Report 0x4B
    pub rtclock_unavailable: bool,
    /// Report 0x82
    pub sbas_enabled: bool,
    /// Report 0x82
    pub sbas_corrected: bool,
}

impl Default for GpsStatus {
    fn default() -> Self {
        Self {
            health: GpsHealth::Unknown,
            n_satellites: 0,
            almanac_incomplete: true,
            rtclock_unavailable: true,
            sbas_enabled: false,
            sbas_corrected: false,
        }
    }
}

/// Satellites used for the current fix and their dilution of precision
/// (report 0x6D)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SatelliteSelection {
    /// Fix dimension code (bits 0-2 of the mode byte)
    pub fix_dimension: u8,
    /// Manual rather than automatic fix mode
    pub manual: bool,
    pub pdop: Float32,
    pub hdop: Float32,
    pub vdop: Float32,
    pub tdop: Float32,
    /// PRNs of the satellites in the fix
    pub prns: Vec<u8, MAX_SELECTED_SVS>,
}
