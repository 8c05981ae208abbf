//! SRXE Hardware Abstraction Layer
//!
//! This crate defines the register-level interface of the 2.4GHz
//! transceiver embedded in the ATmega128RFA1. The radio driver in
//! `srxe-drivers` only talks to the chip through these traits, so the same
//! driver runs against the real register block on the handheld and against
//! [`mock::SimTransceiver`] on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application loop / power / random      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  srxe-drivers (radio transport)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  srxe-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  ATmega128RFA1│       │ SimTransceiver│
//! │  registers    │       │  (mock)       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`radio::Transceiver`] - TRX state/status, frame buffer, IRQ control
//! - [`embedded_hal::delay::DelayNs`] - blocking delays (re-exported)

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "mock")]
pub mod mock;
pub mod radio;

// Re-export key traits at crate root for convenience
pub use embedded_hal::delay::DelayNs;
pub use radio::{irq, rssi, status, Transceiver, TrxCommand, FRAME_BUFFER_SIZE};
