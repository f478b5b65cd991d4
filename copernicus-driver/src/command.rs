//! Commands sent to the receiver
//!
//! Commands share the link with incoming reports. While waiting for a reply
//! the engine keeps decoding whatever the receiver sends unsolicited.

use copernicus_hal::ByteTransport;
use copernicus_protocol::decode;
use copernicus_protocol::{
    AltitudeMode, CommandId, IoOptions, PositionMode, PpsMode, ReportType, TimeMode, VelocityMode,
};

use crate::config::ReceiverConfig;
use crate::error::GpsError;
use crate::gps::CopernicusGps;

impl<'a, T: ByteTransport + 'a> CopernicusGps<'a, T> {
    /// Write a command header
    pub fn begin_command(&mut self, command: CommandId) -> Result<(), GpsError<T::Error>> {
        self.link
            .begin_packet(command.id())
            .map_err(GpsError::Transport)
    }

    /// Write command payload, escaping DLE bytes
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), GpsError<T::Error>> {
        self.link.write_data(data).map_err(GpsError::Transport)
    }

    /// Write the command trailer
    pub fn end_command(&mut self) -> Result<(), GpsError<T::Error>> {
        self.link.end_packet().map_err(GpsError::Transport)
    }

    /// Write a complete command packet
    pub fn send_command(
        &mut self,
        command: CommandId,
        data: &[u8],
    ) -> Result<(), GpsError<T::Error>> {
        self.begin_command(command)?;
        self.write_data(data)?;
        self.end_command()
    }

    /// Ask the receiver for its current I/O options
    ///
    /// Blocks until the 0x55 reply arrives.
    pub fn query_io_options(&mut self) -> Result<IoOptions, GpsError<T::Error>> {
        self.send_command(CommandId::IoOptions, &[])?;
        self.wait_for(Some(ReportType::IoSettings));
        let options = decode::io_options(&mut self.link)?;
        self.io_options = Some(options);
        Ok(options)
    }

    /// Change the receiver's reporting modes
    ///
    /// Reads the current I/O options, replaces the fields given as `Some`,
    /// and writes all four bytes back. Bits outside the changed fields are
    /// preserved. With `confirm`, also waits for the receiver to echo the new
    /// settings. Returns the options that were written.
    #[allow(clippy::too_many_arguments)]
    pub fn configure_modes(
        &mut self,
        position: Option<PositionMode>,
        velocity: Option<VelocityMode>,
        altitude: Option<AltitudeMode>,
        pps: Option<PpsMode>,
        time: Option<TimeMode>,
        confirm: bool,
    ) -> Result<IoOptions, GpsError<T::Error>> {
        let mut options = self.query_io_options()?;

        if let Some(mode) = position {
            options.set_position_mode(mode);
        }
        if let Some(mode) = velocity {
            options.set_velocity_mode(mode);
        }
        if let Some(mode) = altitude {
            options.set_altitude_mode(mode);
        }
        if let Some(mode) = pps {
            options.set_pps_mode(mode);
        }
        if let Some(mode) = time {
            options.set_time_mode(mode);
        }

        debug!("writing I/O options {}", options);
        self.send_command(CommandId::IoOptions, &options.to_bytes())?;

        if confirm {
            self.wait_for(Some(ReportType::IoSettings));
            self.link.skip_packet(true);
            info!("I/O options confirmed");
        }
        Ok(options)
    }

    /// Apply a stored receiver configuration
    pub fn apply_config(
        &mut self,
        config: &ReceiverConfig,
    ) -> Result<IoOptions, GpsError<T::Error>> {
        self.configure_modes(
            config.position,
            config.velocity,
            config.altitude,
            config.pps,
            config.time,
            config.confirm,
        )
    }
}
