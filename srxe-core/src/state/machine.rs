//! Transceiver activity states
//!
//! The chip reports its activity through TRX_STATUS and is steered with
//! commands written to TRX_STATE. The driver only ever asks for the
//! steady states; the busy ones are left by the hardware itself.

use srxe_hal::status;

/// Transceiver states as seen by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrxState {
    /// Powered down (SLEEP)
    Asleep,
    /// Powered, neither listening nor transmitting (TRX_OFF)
    Idle,
    /// PLL locked, about to transmit (PLL_ON)
    ReadyToSend,
    /// Listening for frames (RX_ON)
    Listening,
    /// Transmitting; left automatically when the frame is out (BUSY_TX)
    Sending,
    /// Receiving a frame (BUSY_RX)
    Receiving,
    /// Internal transition in progress
    Busy,
    /// Any other status code (extended operating modes)
    Unknown(u8),
}

impl TrxState {
    /// Decode a TRX_STATUS value
    pub fn from_status(code: u8) -> Self {
        match code & status::MASK {
            status::SLEEP => TrxState::Asleep,
            status::TRX_OFF => TrxState::Idle,
            status::PLL_ON => TrxState::ReadyToSend,
            status::RX_ON => TrxState::Listening,
            status::BUSY_TX => TrxState::Sending,
            status::BUSY_RX => TrxState::Receiving,
            status::STATE_TRANSITION_IN_PROGRESS => TrxState::Busy,
            other => TrxState::Unknown(other),
        }
    }

    /// Check if the chip is powered and able to take commands
    pub fn is_awake(self) -> bool {
        !matches!(self, TrxState::Asleep)
    }
}
