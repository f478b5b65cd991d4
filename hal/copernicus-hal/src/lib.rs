//! Copernicus Hardware Abstraction Layer
//!
//! This crate defines the byte transport the TSIP engine talks through.
//! Chip-specific serial drivers implement [`ByteTransport`] (directly, or via
//! the [`IoTransport`] adapter for `embedded-io` devices), so the protocol
//! engine never knows which UART or board it is running on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  copernicus-driver (engine, commands)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  copernicus-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  IoTransport  │       │BufferTransport│
//! │ (embedded-io) │       │  (in-memory)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::ByteTransport`] - Byte-at-a-time serial link

#![no_std]
#![deny(unsafe_code)]

pub mod io;
pub mod memory;
pub mod transport;

// Re-export key types at crate root for convenience
pub use io::IoTransport;
pub use memory::{BufferError, BufferTransport};
pub use transport::ByteTransport;
