//! Trimble Standard Interface Protocol (TSIP)
//!
//! This crate defines the wire side of the Copernicus driver: packet framing,
//! report identifiers, the latest-value records the receiver reports, and the
//! fixed-layout decoders that fill them.
//!
//! # Protocol Overview
//!
//! Every packet is framed with DLE (0x10) bytes:
//! ```text
//! ┌─────┬────────┬──────────────────┬─────┬─────┐
//! │ DLE │ ID     │ DATA             │ DLE │ ETX │
//! │ 1B  │ 1B     │ 0–N B, escaped   │ 1B  │ 1B  │
//! └─────┴────────┴──────────────────┴─────┴─────┘
//! ```
//!
//! A literal 0x10 inside DATA is sent doubled. Multi-byte fields are
//! big-endian, and floating-point fields are kept as raw IEEE 754 bit
//! patterns so they survive targets without native float support.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod decode;
pub mod frame;
pub mod link;
pub mod records;
pub mod report;
pub mod settings;

pub use decode::{Underrun, WireField};
pub use frame::{FrameError, DLE, ETX};
pub use link::{Link, LinkState};
pub use records::{
    Float32, Float64, GpsHealth, GpsStatus, GpsTime, LlaFix, PositionFix, SatelliteSelection,
    VelocityEnu, VelocityFix, VelocityXyz, XyzFix,
};
pub use report::{CommandId, ReportType};
pub use settings::{AltitudeMode, IoOptions, PositionMode, PpsMode, TimeMode, VelocityMode};
