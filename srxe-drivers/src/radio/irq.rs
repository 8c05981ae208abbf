//! Frame event handlers
//!
//! Each function is what the matching transceiver interrupt does. They can
//! be called straight from the ISR with the ISR's own handle on the
//! transceiver registers, or from mainline code through
//! [`Radio::poll_events`] on targets that poll IRQ_STATUS instead.

use embedded_hal::delay::DelayNs;
use srxe_core::frame::HW_FRAME_RX_SIZE;
use srxe_core::{FrameOutcome, Link, RadioEvent};
use srxe_hal::Transceiver;

use super::Radio;

/// RX_START: capture the signal quality of the arriving frame
pub fn on_frame_start<T: Transceiver, const RX: usize, const TX: usize>(
    link: &Link<RX, TX>,
    trx: &mut T,
) {
    link.on_frame_start(trx.phy_rssi());
}

/// RX_END: copy the received frame out of the frame buffer
pub fn on_frame_end<T: Transceiver, const RX: usize, const TX: usize>(
    link: &Link<RX, TX>,
    trx: &mut T,
) -> FrameOutcome {
    if !link.is_active() {
        return FrameOutcome::Ignored;
    }
    if !link.signal().crc_valid() {
        trace!("frame discarded, bad CRC");
        return link.on_frame_end(&[]);
    }

    let len = usize::from(trx.rx_length()).min(HW_FRAME_RX_SIZE);
    let mut scratch = [0u8; HW_FRAME_RX_SIZE];
    trx.read_frame(&mut scratch[..len]);

    let outcome = link.on_frame_end(&scratch[..len]);
    if let FrameOutcome::Stored { dropped, .. } = outcome {
        if dropped > 0 {
            warn!("rx buffer full, {} bytes dropped", dropped);
        }
    }
    outcome
}

/// TX_END: a frame has been sent
pub fn on_transmit_complete<const RX: usize, const TX: usize>(link: &Link<RX, TX>) {
    link.on_transmit_complete();
}

impl<'a, T: Transceiver, D: DelayNs, const RX: usize, const TX: usize> Radio<'a, T, D, RX, TX> {
    /// Handle one event
    pub fn handle_event(&mut self, event: RadioEvent) {
        match event {
            RadioEvent::FrameStart => on_frame_start(self.link, &mut self.trx),
            RadioEvent::FrameEnd => {
                on_frame_end(self.link, &mut self.trx);
            }
            RadioEvent::TransmitComplete => on_transmit_complete(self.link),
        }
    }

    /// Read and clear IRQ_STATUS and handle whatever it reports
    ///
    /// Returns the number of events handled.
    pub fn poll_events(&mut self) -> usize {
        let events = RadioEvent::pending(self.trx.take_irq_status());
        for &event in &events {
            self.handle_event(event);
        }
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use srxe_core::RadioConfig;
    use srxe_hal::mock::{MockDelay, SimTransceiver};

    use super::*;

    #[test]
    fn test_frame_events_fill_rx_buffer() {
        let link: Link = Link::new();
        let mut trx = SimTransceiver::new();
        trx.command(srxe_hal::TrxCommand::RxOn);
        link.activate(srxe_core::Channel::DEFAULT);

        assert!(trx.receive_frame(b"abc", true));
        on_frame_start(&link, &mut trx);
        let outcome = on_frame_end(&link, &mut trx);

        assert_eq!(outcome, FrameOutcome::Stored { stored: 3, dropped: 0 });
        assert_eq!(link.rx().len(), 3);
        assert_eq!(link.signal().rssi(), 20);
    }

    #[test]
    fn test_bad_crc_is_counted() {
        let link: Link = Link::new();
        let mut trx = SimTransceiver::new();
        trx.command(srxe_hal::TrxCommand::RxOn);
        link.activate(srxe_core::Channel::DEFAULT);

        trx.receive_frame(b"abc", false);
        on_frame_start(&link, &mut trx);

        assert_eq!(on_frame_end(&link, &mut trx), FrameOutcome::Discarded);
        assert!(link.rx().is_empty());
        assert_eq!(link.stats().frames_discarded, 1);
    }

    #[test]
    fn test_poll_events_dispatches() {
        let link: Link = Link::new();
        let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), RadioConfig::default());
        radio.init(1).unwrap();

        assert_eq!(radio.poll_events(), 0);

        radio.transceiver_mut().receive_frame(b"hello", true);
        assert_eq!(radio.poll_events(), 2);
        assert_eq!(link.rx().len(), 5);

        link.tx().push(b'!').unwrap();
        radio.load_and_send().unwrap();
        assert_eq!(radio.poll_events(), 1);
        assert_eq!(link.stats().frames_sent, 1);
    }
}
