//! Hardware events raised by the transceiver

use heapless::Vec;
use srxe_hal::irq;

/// Transceiver events the transport reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioEvent {
    /// A frame started arriving (RX_START)
    FrameStart,
    /// A frame finished arriving and was CRC-checked (RX_END)
    FrameEnd,
    /// A transmission finished (TX_END)
    TransmitComplete,
}

impl RadioEvent {
    /// Events in the order they must be handled
    pub const ALL: [RadioEvent; 3] = [
        RadioEvent::FrameStart,
        RadioEvent::FrameEnd,
        RadioEvent::TransmitComplete,
    ];

    /// The IRQ_STATUS bit signalling this event
    pub fn irq_bit(self) -> u8 {
        match self {
            RadioEvent::FrameStart => irq::RX_START,
            RadioEvent::FrameEnd => irq::RX_END,
            RadioEvent::TransmitComplete => irq::TX_END,
        }
    }

    /// Decode an IRQ_STATUS value into pending events
    ///
    /// A frame's start always comes before its end, so events are returned
    /// in that order regardless of bit position. Unrelated bits are ignored.
    pub fn pending(irq_status: u8) -> Vec<RadioEvent, 3> {
        Self::ALL
            .into_iter()
            .filter(|event| irq_status & event.irq_bit() != 0)
            .collect()
    }
}
