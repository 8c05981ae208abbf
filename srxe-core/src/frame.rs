//! Hardware frame layout
//!
//! The transceiver owns a single 128-byte frame buffer shared by both
//! directions.
//!
//! Transmit:
//! ```text
//! ┌────────┬──────────────────┬──────┐
//! │ LENGTH │ PAYLOAD          │ 0x00 │    LENGTH = payload + 2
//! │ 1B     │ 0–126B           │ 1B   │    (hardware appends the FCS)
//! └────────┴──────────────────┴──────┘
//! ```
//!
//! Receive (LENGTH is read from TST_RX_LENGTH):
//! ```text
//! ┌──────────────────┬─────┬────────┐
//! │ PAYLOAD          │ LQI │ STATUS │    payload = LENGTH - 2
//! └──────────────────┴─────┴────────┘
//! ```

use heapless::Vec;

use crate::buffer::RingBuffer;

/// Size of the hardware receive frame
pub const HW_FRAME_RX_SIZE: usize = srxe_hal::FRAME_BUFFER_SIZE;

/// Hardware payload limit for transmit (one byte goes to the length field)
pub const MAX_PAYLOAD: usize = HW_FRAME_RX_SIZE - 1;

/// Application bytes carried by one transmitted frame
///
/// One byte of [`MAX_PAYLOAD`] is reserved for the zero terminator. This is
/// also the transmit buffer fill level that triggers an automatic send.
pub const FRAME_PAYLOAD_CAPACITY: usize = MAX_PAYLOAD - 1;

/// Bytes the hardware appends after the payload
pub const FRAME_TRAILER_LEN: usize = 2;

/// Byte written after the payload of every transmitted frame
pub const FRAME_TERMINATOR: u8 = 0x00;

/// Receive buffer size: room for two full frames before the application reads
pub const RX_BUFFER_SIZE: usize = HW_FRAME_RX_SIZE * 2;

/// Transmit buffer size
pub const TX_BUFFER_SIZE: usize = MAX_PAYLOAD + 1;

/// Number of application bytes in a received frame of `frame_len` bytes
pub const fn rx_payload_len(frame_len: usize) -> usize {
    frame_len.saturating_sub(FRAME_TRAILER_LEN)
}

/// One frame's worth of transmit data, ready for the frame buffer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxFrame {
    /// Payload followed by the terminator
    psdu: Vec<u8, MAX_PAYLOAD>,
}

impl TxFrame {
    /// Pop up to [`FRAME_PAYLOAD_CAPACITY`] bytes from `source`
    pub fn drain<const N: usize>(source: &RingBuffer<N>) -> Self {
        let mut psdu = Vec::new();
        while psdu.len() < FRAME_PAYLOAD_CAPACITY {
            let Some(byte) = source.pop() else {
                break;
            };
            // Bounded by FRAME_PAYLOAD_CAPACITY < MAX_PAYLOAD
            let _ = psdu.push(byte);
        }
        let _ = psdu.push(FRAME_TERMINATOR);
        Self { psdu }
    }

    /// Application bytes in this frame
    pub fn payload(&self) -> &[u8] {
        &self.psdu[..self.psdu.len() - 1]
    }

    /// Bytes to load into the frame buffer (payload and terminator)
    pub fn psdu(&self) -> &[u8] {
        &self.psdu
    }

    /// Value for the frame length field
    pub fn length_field(&self) -> u8 {
        // At most FRAME_PAYLOAD_CAPACITY + 2 = 128
        (self.payload().len() + FRAME_TRAILER_LEN) as u8
    }
}
