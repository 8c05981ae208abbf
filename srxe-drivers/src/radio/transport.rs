//! Byte-oriented transport API
//!
//! Reads come out of the receive buffer filled by the frame-end handler.
//! Writes collect in the transmit buffer until a frame's worth is waiting
//! or the caller asks for an explicit send.

use embedded_hal::delay::DelayNs;
use srxe_core::frame::FRAME_PAYLOAD_CAPACITY;
use srxe_core::{LinkStats, SignalQuality};
use srxe_hal::Transceiver;

use super::{Radio, RadioError};

impl<'a, T: Transceiver, D: DelayNs, const RX: usize, const TX: usize> Radio<'a, T, D, RX, TX> {
    fn ensure_active(&self) -> Result<(), RadioError> {
        if self.link.is_active() {
            Ok(())
        } else {
            Err(RadioError::Inactive)
        }
    }

    /// Send a frame if the transmit buffer holds a full payload
    ///
    /// A failed send leaves the data queued for the next attempt.
    fn send_if_full(&mut self) {
        if self.link.tx().len() < FRAME_PAYLOAD_CAPACITY {
            return;
        }
        if let Err(_err) = self.load_and_send() {
            warn!("auto-send failed: {}", _err);
        }
    }

    /// Number of received bytes waiting
    pub fn available(&self) -> Result<usize, RadioError> {
        self.ensure_active()?;
        Ok(self.link.rx().len())
    }

    /// Take the next received byte, `None` if nothing is waiting
    pub fn get_byte(&mut self) -> Result<Option<u8>, RadioError> {
        self.ensure_active()?;
        Ok(self.link.rx().pop())
    }

    /// Copy received bytes into `dest`
    ///
    /// `dest` is zeroed first, so whatever is not filled reads as zero.
    /// Returns the number of bytes copied. `dest` is left alone when the
    /// transport is inactive.
    pub fn get_buffer(&mut self, dest: &mut [u8]) -> Result<usize, RadioError> {
        self.ensure_active()?;

        dest.fill(0);
        let count = self.link.rx().len().min(dest.len());
        let mut copied = 0;
        for slot in &mut dest[..count] {
            match self.link.rx().pop() {
                Some(byte) => *slot = byte,
                None => break,
            }
            copied += 1;
        }
        Ok(copied)
    }

    /// Queue a byte for transmission
    ///
    /// Sends a frame as soon as a full payload is queued. The result only
    /// reports whether the byte was queued.
    pub fn put_byte(&mut self, byte: u8) -> Result<u8, RadioError> {
        self.ensure_active()?;

        let pushed = self.link.tx().push(byte);
        self.send_if_full();
        pushed.map_err(|_| RadioError::TxBufferFull)
    }

    /// Queue bytes for transmission
    ///
    /// Bytes that do not fit are dropped without notice. The fill level is
    /// checked once, after all bytes are queued. Returns `data.len()`.
    pub fn put_buffer(&mut self, data: &[u8]) -> Result<usize, RadioError> {
        self.ensure_active()?;

        let mut dropped = 0usize;
        for &byte in data {
            if self.link.tx().push(byte).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!("tx buffer full, {} bytes dropped", dropped);
        }

        self.send_if_full();
        Ok(data.len())
    }

    /// Queue a string and send it right away
    ///
    /// No terminator is queued, so consecutive strings end up back to back.
    pub fn put_str(&mut self, s: &str) -> Result<usize, RadioError> {
        let queued = self.put_buffer(s.as_bytes())?;
        self.transmit_now()?;
        Ok(queued)
    }

    /// Send whatever is queued (possibly nothing) as one frame
    pub fn transmit_now(&mut self) -> Result<u8, RadioError> {
        self.ensure_active()?;
        self.load_and_send()
    }

    /// Drop all received bytes and reset the overflow counter
    pub fn flush_receive_buffer(&mut self) {
        if !self.link.is_active() {
            return;
        }
        self.link.rx().flush();
        self.link.clear_rx_overflow();
    }

    /// Received bytes dropped because the receive buffer was full
    pub fn receive_overflow_count(&self) -> u16 {
        self.link.rx_overflow()
    }

    /// Signal quality of the last received frame
    pub fn signal_quality(&self) -> SignalQuality {
        self.link.signal()
    }

    /// Live PHY_RSSI, independent of frame reception
    pub fn live_signal(&mut self) -> SignalQuality {
        SignalQuality::from_raw(self.trx.phy_rssi())
    }

    /// Link counters
    pub fn stats(&self) -> LinkStats {
        self.link.stats()
    }
}
