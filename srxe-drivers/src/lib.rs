//! Radio transport driver
//!
//! Drives the ATmega128RFA1 transceiver through the [`srxe_hal::Transceiver`]
//! trait and exposes it as a best-effort byte pipe:
//!
//! - [`Radio`] - init/terminate, the frame assembler and the transport API
//! - [`radio::irq`] - frame event handlers callable from interrupt context
//! - [`random`] - entropy seed drawn from the receiver noise
//!
//! Buffers and counters live in a [`srxe_core::Link`] shared by reference
//! between the driver and the interrupt handlers.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod radio;
pub mod random;

pub use radio::{Radio, RadioError};
