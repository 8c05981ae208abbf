//! Board-agnostic core of the SRXE radio transport
//!
//! This crate contains everything in the transport that does not touch
//! transceiver registers:
//!
//! - Interrupt-safe ring buffers for the receive and transmit paths
//! - The shared link state and the frame event handlers
//! - Frame layout constants and the transmit frame builder
//! - TRX state decoding and hardware event types
//! - Channel and radio configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod frame;
pub mod link;
pub mod signal;
pub mod state;

pub use buffer::{BufferFull, RingBuffer};
pub use config::{Channel, ConfigError, RadioConfig};
pub use frame::TxFrame;
pub use link::{FrameOutcome, Link, LinkStats};
pub use signal::SignalQuality;
pub use state::{RadioEvent, TrxState};
