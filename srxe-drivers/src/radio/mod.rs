//! Transceiver driver
//!
//! [`Radio`] owns the transceiver and the delay, and borrows the [`Link`]
//! it shares with the interrupt handlers. The driver is split by concern:
//!
//! - `control` - init, terminate and the force-to-idle sequence
//! - `assembler` - moving the transmit buffer into a hardware frame
//! - `transport` - the byte-oriented application API
//! - [`irq`] - frame events, from an ISR or from [`Radio::poll_events`]

mod assembler;
mod control;
pub mod irq;
mod transport;

use embedded_hal::delay::DelayNs;
use srxe_core::frame::{RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use srxe_core::{Link, RadioConfig, TrxState};
use srxe_hal::Transceiver;

/// Radio driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// The transport is not initialized
    Inactive,
    /// The transmit buffer had no room for the byte
    TxBufferFull,
    /// The chip would not enter TRX_OFF; holds the state it stayed in
    NotIdle(TrxState),
    /// A busy-wait exceeded the configured limit
    Timeout,
}

/// Radio transport driver
///
/// `RX` and `TX` are the ring buffer capacities of the shared [`Link`].
pub struct Radio<
    'a,
    T: Transceiver,
    D: DelayNs,
    const RX: usize = RX_BUFFER_SIZE,
    const TX: usize = TX_BUFFER_SIZE,
> {
    link: &'a Link<RX, TX>,
    trx: T,
    delay: D,
    config: RadioConfig,
}

impl<'a, T: Transceiver, D: DelayNs, const RX: usize, const TX: usize> Radio<'a, T, D, RX, TX> {
    /// Create a driver; the transceiver is not touched until `init`
    pub fn new(link: &'a Link<RX, TX>, trx: T, delay: D, config: RadioConfig) -> Self {
        Self {
            link,
            trx,
            delay,
            config,
        }
    }

    /// Shared link state
    pub fn link(&self) -> &'a Link<RX, TX> {
        self.link
    }

    /// Active configuration
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// The underlying transceiver
    pub fn transceiver(&self) -> &T {
        &self.trx
    }

    /// The underlying transceiver, mutably
    pub fn transceiver_mut(&mut self) -> &mut T {
        &mut self.trx
    }

    /// Give back the transceiver and the delay
    pub fn release(self) -> (T, D) {
        (self.trx, self.delay)
    }

    /// Read the current transceiver state
    pub fn state(&mut self) -> TrxState {
        TrxState::from_status(self.trx.status())
    }

    /// Block for `ms` milliseconds on the driver's delay
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Poll in 1ms steps while `cond` holds for the transceiver state
    ///
    /// Unbounded unless `busy_wait_limit_ms` is set. Returns the state that
    /// ended the wait.
    fn wait_while(&mut self, mut cond: impl FnMut(TrxState) -> bool) -> Result<TrxState, RadioError> {
        let mut waited: u32 = 0;
        loop {
            let state = self.state();
            if !cond(state) {
                return Ok(state);
            }
            if let Some(limit) = self.config.busy_wait_limit_ms {
                if waited >= u32::from(limit) {
                    warn!("busy-wait gave up in {}", state);
                    return Err(RadioError::Timeout);
                }
            }
            self.delay.delay_ms(1);
            waited = waited.saturating_add(1);
        }
    }
}
