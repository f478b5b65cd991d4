//! Report and command identifiers
//!
//! Reports flow receiver → host, commands host → receiver. The engine
//! decodes the reports listed in [`ReportType`]; any other id is offered to
//! registered packet processors.

// Report IDs: position fixes
pub const RPT_FIX_POS_LLA_SP: u8 = 0x4A;
pub const RPT_FIX_POS_LLA_DP: u8 = 0x84;
pub const RPT_FIX_POS_XYZ_SP: u8 = 0x42;
pub const RPT_FIX_POS_XYZ_DP: u8 = 0x83;

// Report IDs: velocity fixes
pub const RPT_FIX_VEL_XYZ: u8 = 0x43;
pub const RPT_FIX_VEL_ENU: u8 = 0x56;

// Report IDs: other automatic reports
pub const RPT_GPSTIME: u8 = 0x41;
pub const RPT_HEALTH: u8 = 0x46;
pub const RPT_ADDL_STATUS: u8 = 0x4B;
pub const RPT_SATELLITES: u8 = 0x6D;
pub const RPT_SBAS_MODE: u8 = 0x82;

// Report IDs: replies
pub const RPT_IO_SETTINGS: u8 = 0x55;

// Command IDs
pub const CMD_IO_OPTIONS: u8 = 0x35;

/// Kind of report processed from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    /// No packet was available
    None,
    /// A known packet was corrupted or could not be processed
    Error,
    /// Position fix, lat/lng/alt, single precision
    PositionLlaSingle,
    /// Position fix, lat/lng/alt, double precision
    PositionLlaDouble,
    /// Position fix, ECEF XYZ, single precision
    PositionXyzSingle,
    /// Position fix, ECEF XYZ, double precision
    PositionXyzDouble,
    /// Velocity fix, ECEF XYZ
    VelocityXyz,
    /// Velocity fix, east/north/up
    VelocityEnu,
    /// GPS time
    GpsTime,
    /// Receiver health
    Health,
    /// Almanac and realtime clock availability
    AdditionalStatus,
    /// Satellite selection and DOP
    Satellites,
    /// Satellite-based augmentation system mode
    SbasMode,
    /// I/O options reply
    IoSettings,
    /// Any other report id
    Unknown(u8),
}

impl ReportType {
    /// Classify a report id byte
    pub fn from_id(id: u8) -> Self {
        match id {
            RPT_FIX_POS_LLA_SP => ReportType::PositionLlaSingle,
            RPT_FIX_POS_LLA_DP => ReportType::PositionLlaDouble,
            RPT_FIX_POS_XYZ_SP => ReportType::PositionXyzSingle,
            RPT_FIX_POS_XYZ_DP => ReportType::PositionXyzDouble,
            RPT_FIX_VEL_XYZ => ReportType::VelocityXyz,
            RPT_FIX_VEL_ENU => ReportType::VelocityEnu,
            RPT_GPSTIME => ReportType::GpsTime,
            RPT_HEALTH => ReportType::Health,
            RPT_ADDL_STATUS => ReportType::AdditionalStatus,
            RPT_SATELLITES => ReportType::Satellites,
            RPT_SBAS_MODE => ReportType::SbasMode,
            RPT_IO_SETTINGS => ReportType::IoSettings,
            other => ReportType::Unknown(other),
        }
    }

    /// Wire id, or `None` for the `None`/`Error` sentinels
    pub fn id(self) -> Option<u8> {
        match self {
            ReportType::None | ReportType::Error => None,
            ReportType::PositionLlaSingle => Some(RPT_FIX_POS_LLA_SP),
            ReportType::PositionLlaDouble => Some(RPT_FIX_POS_LLA_DP),
            ReportType::PositionXyzSingle => Some(RPT_FIX_POS_XYZ_SP),
            ReportType::PositionXyzDouble => Some(RPT_FIX_POS_XYZ_DP),
            ReportType::VelocityXyz => Some(RPT_FIX_VEL_XYZ),
            ReportType::VelocityEnu => Some(RPT_FIX_VEL_ENU),
            ReportType::GpsTime => Some(RPT_GPSTIME),
            ReportType::Health => Some(RPT_HEALTH),
            ReportType::AdditionalStatus => Some(RPT_ADDL_STATUS),
            ReportType::Satellites => Some(RPT_SATELLITES),
            ReportType::SbasMode => Some(RPT_SBAS_MODE),
            ReportType::IoSettings => Some(RPT_IO_SETTINGS),
            ReportType::Unknown(id) => Some(id),
        }
    }

    /// Returns true for the position fix reports
    pub fn is_position(&self) -> bool {
        matches!(
            self,
            ReportType::PositionLlaSingle
                | ReportType::PositionLlaDouble
                | ReportType::PositionXyzSingle
                | ReportType::PositionXyzDouble
        )
    }

    /// Returns true for the velocity fix reports
    pub fn is_velocity(&self) -> bool {
        matches!(self, ReportType::VelocityXyz | ReportType::VelocityEnu)
    }
}

/// Commands understood by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandId {
    /// Query (empty) or set (4 bytes) I/O options
    IoOptions,
}

impl CommandId {
    /// Convert to wire id
    pub fn id(self) -> u8 {
        match self {
            CommandId::IoOptions => CMD_IO_OPTIONS,
        }
    }
}
