//! Trimble Copernicus GPS driver
//!
//! Talks TSIP to a Copernicus receiver over any [`ByteTransport`] and keeps
//! the latest reported position, velocity, time and status.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  CopernicusGps                               │
//! │   drain_one / wait_for      configure_modes  │
//! │        │                          │          │
//! │   ┌────┴─────┐   ┌──────────┐     │          │
//! │   │ decoders │   │ listeners│     │          │
//! │   └────┬─────┘   └────┬─────┘     │          │
//! ├────────┴──────────────┴───────────┴──────────┤
//! │  Link (copernicus-protocol)                  │
//! ├──────────────────────────────────────────────┤
//! │  ByteTransport (copernicus-hal)              │
//! └──────────────────────────────────────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

mod command;
pub mod config;
pub mod error;
pub mod gps;
pub mod listener;

pub use config::ReceiverConfig;
pub use error::{GpsError, ListenerError};
pub use gps::CopernicusGps;
pub use listener::{ListenerRegistry, PacketProcessor, PacketStatus, MAX_LISTENERS};

pub use copernicus_hal::ByteTransport;
pub use copernicus_protocol::{
    AltitudeMode, CommandId, GpsHealth, GpsStatus, GpsTime, IoOptions, PositionFix, PositionMode,
    PpsMode, ReportType, SatelliteSelection, TimeMode, VelocityFix, VelocityMode,
};
