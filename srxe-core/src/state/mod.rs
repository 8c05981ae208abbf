//! Transceiver state and hardware events
//!
//! Decodes what the chip reports (TRX_STATUS, IRQ_STATUS) into types the
//! driver can match on.

pub mod events;
pub mod machine;

pub use events::RadioEvent;
pub use machine::TrxState;
