//! I/O options (command 0x35, reply 0x55)
//!
//! Four bitfield bytes select which fix reports the receiver sends and how:
//!
//! | Byte | Mask | Field |
//! |------|------|-------|
//! | 0 | 0x13 | Position fix report (LLA/XYZ, single/double) |
//! | 0 | 0x04 | Altitude reference (HAE/MSL) |
//! | 1 | 0x03 | Velocity fix report (XYZ/ENU) |
//! | 2 | 0x01 | Time base (GPS/UTC) |
//! | 2 | 0x60 | PPS output |
//! | 3 | -    | Auxiliary, passed through untouched |

use crate::report::ReportType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const POSITION_MASK: u8 = 0x13;
pub const ALTITUDE_MASK: u8 = 0x04;
pub const VELOCITY_MASK: u8 = 0x03;
pub const TIME_MASK: u8 = 0x01;
pub const PPS_MASK: u8 = 0x60;

const POSITION_BYTE: usize = 0;
const VELOCITY_BYTE: usize = 1;
const TIMING_BYTE: usize = 2;

/// Position fix report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositionMode {
    XyzSingle,
    LlaSingle,
    XyzDouble,
    LlaDouble,
}

impl PositionMode {
    /// Bits within [`POSITION_MASK`]
    pub fn bits(self) -> u8 {
        match self {
            PositionMode::XyzSingle => 0x01,
            PositionMode::LlaSingle => 0x02,
            PositionMode::XyzDouble => 0x11,
            PositionMode::LlaDouble => 0x12,
        }
    }

    /// Parse from the position byte
    pub fn from_bits(byte: u8) -> Option<Self> {
        match byte & POSITION_MASK {
            0x01 => Some(PositionMode::XyzSingle),
            0x02 => Some(PositionMode::LlaSingle),
            0x11 => Some(PositionMode::XyzDouble),
            0x12 => Some(PositionMode::LlaDouble),
            _ => None,
        }
    }

    /// Report the receiver sends in this mode
    pub fn report_type(self) -> ReportType {
        match self {
            PositionMode::XyzSingle => ReportType::PositionXyzSingle,
            PositionMode::LlaSingle => ReportType::PositionLlaSingle,
            PositionMode::XyzDouble => ReportType::PositionXyzDouble,
            PositionMode::LlaDouble => ReportType::PositionLlaDouble,
        }
    }

    /// Mode producing the given position report
    pub fn from_report(report: ReportType) -> Option<Self> {
        match report {
            ReportType::PositionXyzSingle => Some(PositionMode::XyzSingle),
            ReportType::PositionLlaSingle => Some(PositionMode::LlaSingle),
            ReportType::PositionXyzDouble => Some(PositionMode::XyzDouble),
            ReportType::PositionLlaDouble => Some(PositionMode::LlaDouble),
            _ => None,
        }
    }
}

/// Altitude reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeMode {
    /// Height above the WGS-84 ellipsoid
    Hae,
    /// Height above mean sea level
    Msl,
}

impl AltitudeMode {
    /// Bits within [`ALTITUDE_MASK`]
    pub fn bits(self) -> u8 {
        match self {
            AltitudeMode::Hae => 0x00,
            AltitudeMode::Msl => 0x04,
        }
    }

    /// Parse from the position byte
    pub fn from_bits(byte: u8) -> Self {
        if byte & ALTITUDE_MASK != 0 {
            AltitudeMode::Msl
        } else {
            AltitudeMode::Hae
        }
    }
}

/// Velocity fix report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VelocityMode {
    Xyz,
    Enu,
}

impl VelocityMode {
    /// Bits within [`VELOCITY_MASK`]
    pub fn bits(self) -> u8 {
        match self {
            VelocityMode::Xyz => 0x01,
            VelocityMode::Enu => 0x02,
        }
    }

    /// Parse from the velocity byte
    pub fn from_bits(byte: u8) -> Option<Self> {
        match byte & VELOCITY_MASK {
            0x01 => Some(VelocityMode::Xyz),
            0x02 => Some(VelocityMode::Enu),
            _ => None,
        }
    }

    /// Report the receiver sends in this mode
    pub fn report_type(self) -> ReportType {
        match self {
            VelocityMode::Xyz => ReportType::VelocityXyz,
            VelocityMode::Enu => ReportType::VelocityEnu,
        }
    }
}

/// Pulse-per-second output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PpsMode {
    /// PPS always on
    Always,
    /// PPS only while fixing
    FixBased,
    /// PPS off
    Off,
}

impl PpsMode {
    /// Bits within [`PPS_MASK`]
    pub fn bits(self) -> u8 {
        match self {
            PpsMode::Always => 0x00,
            PpsMode::FixBased => 0x20,
            PpsMode::Off => 0x40,
        }
    }

    /// Parse from the timing byte
    pub fn from_bits(byte: u8) -> Option<Self> {
        match byte & PPS_MASK {
            0x00 => Some(PpsMode::Always),
            0x20 => Some(PpsMode::FixBased),
            0x40 => Some(PpsMode::Off),
            _ => None,
        }
    }
}

/// Time base for reported times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeMode {
    Gps,
    Utc,
}

impl TimeMode {
    /// Bits within [`TIME_MASK`]
    pub fn bits(self) -> u8 {
        match self {
            TimeMode::Gps => 0x00,
            TimeMode::Utc => 0x01,
        }
    }

    /// Parse from the timing byte
    pub fn from_bits(byte: u8) -> Self {
        if byte & TIME_MASK != 0 {
            TimeMode::Utc
        } else {
            TimeMode::Gps
        }
    }
}

/// The four I/O option bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoOptions {
    bytes: [u8; 4],
}

fn set_field(byte: &mut u8, mask: u8, bits: u8) {
    *byte = (*byte & !mask) | (bits & mask);
}

impl IoOptions {
    /// Wrap bytes as read from a 0x55 reply
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self { bytes }
    }

    /// Bytes to send in a 0x35 command
    pub fn to_bytes(self) -> [u8; 4] {
        self.bytes
    }

    pub fn position_mode(&self) -> Option<PositionMode> {
        PositionMode::from_bits(self.bytes[POSITION_BYTE])
    }

    pub fn altitude_mode(&self) -> AltitudeMode {
        AltitudeMode::from_bits(self.bytes[POSITION_BYTE])
    }

    pub fn velocity_mode(&self) -> Option<VelocityMode> {
        VelocityMode::from_bits(self.bytes[VELOCITY_BYTE])
    }

    pub fn pps_mode(&self) -> Option<PpsMode> {
        PpsMode::from_bits(self.bytes[TIMING_BYTE])
    }

    pub fn time_mode(&self) -> TimeMode {
        TimeMode::from_bits(self.bytes[TIMING_BYTE])
    }

    pub fn set_position_mode(&mut self, mode: PositionMode) {
        set_field(&mut self.bytes[POSITION_BYTE], POSITION_MASK, mode.bits());
    }

    pub fn set_altitude_mode(&mut self, mode: AltitudeMode) {
        set_field(&mut self.bytes[POSITION_BYTE], ALTITUDE_MASK, mode.bits());
    }

    pub fn set_velocity_mode(&mut self, mode: VelocityMode) {
        set_field(&mut self.bytes[VELOCITY_BYTE], VELOCITY_MASK, mode.bits());
    }

    pub fn set_pps_mode(&mut self, mode: PpsMode) {
        set_field(&mut self.bytes[TIMING_BYTE], PPS_MASK, mode.bits());
    }

    pub fn set_time_mode(&mut self, mode: TimeMode) {
        set_field(&mut self.bytes[TIMING_BYTE], TIME_MASK, mode.bits());
    }
}
