//! Frame assembler

use embedded_hal::delay::DelayNs;
use srxe_core::{TrxState, TxFrame};
use srxe_hal::{Transceiver, TrxCommand};

use super::{Radio, RadioError};

/// Time the chip needs after the TX_START pulse before it takes commands (ms)
const TX_START_SETTLE_MS: u32 = 1;

impl<'a, T: Transceiver, D: DelayNs, const RX: usize, const TX: usize> Radio<'a, T, D, RX, TX> {
    /// Move up to one frame's worth of the transmit buffer onto the air
    ///
    /// Locks the PLL, loads the frame buffer, pulses TX_START and goes back
    /// to listening. Returns the number of payload bytes sent. Completion is
    /// reported later by the transmit-complete event.
    pub(crate) fn load_and_send(&mut self) -> Result<u8, RadioError> {
        self.trx.command(TrxCommand::PllOn);
        if let Err(err) = self.wait_while(|state| state != TrxState::ReadyToSend) {
            self.trx.command(TrxCommand::RxOn);
            return Err(err);
        }

        let frame = TxFrame::drain(self.link.tx());
        self.trx.write_frame(frame.length_field(), frame.psdu());

        self.trx.command(TrxCommand::TxStart);
        self.trx.set_slptr(true);
        self.trx.set_slptr(false);
        self.delay.delay_ms(TX_START_SETTLE_MS);

        self.trx.command(TrxCommand::RxOn);

        // Bounded by FRAME_PAYLOAD_CAPACITY
        let sent = frame.payload().len() as u8;
        self.link.record_loaded(sent);
        trace!("frame loaded: {} bytes", sent);
        Ok(sent)
    }
}
