//! Receiver configuration
//!
//! The reporting modes an application wants the receiver in. Applied at
//! startup with [`CopernicusGps::apply_config`](crate::CopernicusGps::apply_config).

use copernicus_protocol::{AltitudeMode, PositionMode, PpsMode, TimeMode, VelocityMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Desired receiver modes
///
/// Fields left as `None` keep whatever the receiver currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReceiverConfig {
    /// Position fix report format
    pub position: Option<PositionMode>,
    /// Velocity fix report format
    pub velocity: Option<VelocityMode>,
    /// Altitude reference
    pub altitude: Option<AltitudeMode>,
    /// PPS output
    pub pps: Option<PpsMode>,
    /// Time base
    pub time: Option<TimeMode>,
    /// Wait for the receiver to echo the new settings
    pub confirm: bool,
}

impl ReceiverConfig {
    /// Check if applying this config leaves every mode unchanged
    pub fn is_noop(&self) -> bool {
        self.position.is_none()
            && self.velocity.is_none()
            && self.altitude.is_none()
            && self.pps.is_none()
            && self.time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_changes_nothing() {
        let config = ReceiverConfig::default();
        assert!(config.is_noop());
        assert!(!config.confirm);
    }

    #[test]
    fn test_single_field_is_change() {
        let config = ReceiverConfig {
            pps: Some(PpsMode::Off),
            ..ReceiverConfig::default()
        };
        assert!(!config.is_noop());
    }
}
